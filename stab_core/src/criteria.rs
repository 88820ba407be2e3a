//! # Stability Criteria
//!
//! Allowable stress coefficients and minimum factors of safety. Allowable
//! stresses are never stored: [`LiftingCriteria::allowables`] and
//! [`HaulingCriteria::allowables`] derive them from the coefficients and the
//! concrete resolved for the current solve.
//!
//! Sign convention: compression is negative, so allowable compression is
//! returned as a negative stress.

use serde::{Deserialize, Serialize};

use crate::errors::{StabError, StabResult};
use crate::materials::ResolvedConcrete;
use crate::problem::SlopeCase;
use crate::units::{Ksi, SqrtKsi};

/// Tension limit expressed as `coefficient·√f'c` with an optional cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensionLimit {
    /// Coefficient on √f'c (√Pa)
    pub coefficient: f64,
    /// Apply `max_tension` as an upper bound
    pub has_max: bool,
    /// Upper bound on allowable tension (Pa)
    pub max_tension: f64,
    /// Coefficient on √f'c when bonded reinforcement resists the tension (√Pa)
    pub coefficient_with_rebar: f64,
}

impl Default for TensionLimit {
    fn default() -> Self {
        TensionLimit {
            coefficient: SqrtKsi(0.0948).to_base(),
            has_max: true,
            max_tension: Ksi(0.2).to_base(),
            coefficient_with_rebar: SqrtKsi(0.24).to_base(),
        }
    }
}

impl TensionLimit {
    /// Allowable tension (Pa)
    pub fn allowable(&self, fc: f64) -> f64 {
        let ft = self.coefficient * fc.sqrt();
        if self.has_max {
            ft.min(self.max_tension)
        } else {
            ft
        }
    }

    /// Allowable tension with bonded reinforcement (Pa)
    pub fn allowable_with_rebar(&self, fc: f64) -> f64 {
        self.coefficient_with_rebar * fc.sqrt()
    }

    fn validate(&self, field: &str) -> StabResult<()> {
        if self.coefficient < 0.0 || self.coefficient_with_rebar < 0.0 || (self.has_max && self.max_tension < 0.0) {
            return Err(StabError::invalid_input(
                field,
                format!("{}/{}", self.coefficient, self.coefficient_with_rebar),
                "Tension coefficients cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Allowable stresses for one check (Pa)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allowables {
    /// Compression limit for the plumb girder (negative)
    pub compression_global: f64,
    /// Compression limit for the tilted girder with lateral effects (negative)
    pub compression_peak: f64,
    pub tension: f64,
    pub tension_with_rebar: f64,
    /// Concrete density modification factor used for the rupture stress
    pub lambda: f64,
}

// ============================================================================
// Lifting
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftingCriteria {
    /// Coefficient on f'ci for global compression
    pub compression_coefficient_global: f64,
    /// Coefficient on f'ci for peak compression
    pub compression_coefficient_peak: f64,
    pub tension: TensionLimit,
    /// Minimum factor of safety against cracking
    pub min_fs_cracking: f64,
    /// Minimum factor of safety against failure
    pub min_fs_failure: f64,
}

impl Default for LiftingCriteria {
    fn default() -> Self {
        LiftingCriteria {
            compression_coefficient_global: 0.65,
            compression_coefficient_peak: 0.70,
            tension: TensionLimit::default(),
            min_fs_cracking: 1.0,
            min_fs_failure: 1.5,
        }
    }
}

impl LiftingCriteria {
    pub fn validate(&self) -> StabResult<()> {
        validate_common(
            self.compression_coefficient_global,
            self.compression_coefficient_peak,
            self.min_fs_cracking,
            self.min_fs_failure,
        )?;
        self.tension.validate("tension")
    }

    /// Allowable stresses for the resolved concrete
    pub fn allowables(&self, concrete: &ResolvedConcrete) -> Allowables {
        Allowables {
            compression_global: -self.compression_coefficient_global * concrete.fc,
            compression_peak: -self.compression_coefficient_peak * concrete.fc,
            tension: self.tension.allowable(concrete.fc),
            tension_with_rebar: self.tension.allowable_with_rebar(concrete.fc),
            lambda: concrete.lambda,
        }
    }
}

// ============================================================================
// Hauling
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulingCriteria {
    pub compression_coefficient_global: f64,
    pub compression_coefficient_peak: f64,
    /// Tension limit for the normal crown slope case.
    ///
    /// The maximum superelevation case is limited by the modulus of rupture.
    pub crown_slope_tension: TensionLimit,
    pub min_fs_cracking: f64,
    /// Minimum factor of safety against rollover
    pub min_fs_rollover: f64,
}

impl Default for HaulingCriteria {
    fn default() -> Self {
        HaulingCriteria {
            compression_coefficient_global: 0.65,
            compression_coefficient_peak: 0.70,
            crown_slope_tension: TensionLimit::default(),
            min_fs_cracking: 1.0,
            min_fs_rollover: 1.5,
        }
    }
}

impl HaulingCriteria {
    pub fn validate(&self) -> StabResult<()> {
        validate_common(
            self.compression_coefficient_global,
            self.compression_coefficient_peak,
            self.min_fs_cracking,
            self.min_fs_rollover,
        )?;
        self.crown_slope_tension.validate("crown_slope_tension")
    }

    /// Tension limit for a slope case; max superelevation cracks at the rupture stress
    pub fn tension_limit(&self, case: SlopeCase, concrete: &ResolvedConcrete) -> TensionLimit {
        match case {
            SlopeCase::CrownSlope => self.crown_slope_tension.clone(),
            SlopeCase::MaxSuper => TensionLimit {
                coefficient: concrete.fr_coefficient * concrete.lambda,
                has_max: false,
                max_tension: 0.0,
                coefficient_with_rebar: concrete.fr_coefficient * concrete.lambda,
            },
        }
    }

    /// Allowable stresses for a slope case
    pub fn allowables(&self, case: SlopeCase, concrete: &ResolvedConcrete) -> Allowables {
        let limit = self.tension_limit(case, concrete);
        let tension = limit.allowable(concrete.fc);
        let tension_with_rebar = limit.allowable_with_rebar(concrete.fc);
        Allowables {
            compression_global: -self.compression_coefficient_global * concrete.fc,
            compression_peak: -self.compression_coefficient_peak * concrete.fc,
            tension,
            tension_with_rebar,
            lambda: concrete.lambda,
        }
    }
}

fn validate_common(global: f64, peak: f64, fs_cracking: f64, fs_failure: f64) -> StabResult<()> {
    if !(global > 0.0) || !(peak > 0.0) {
        return Err(StabError::invalid_input(
            "compression_coefficient",
            format!("{}/{}", global, peak),
            "Compression coefficients must be positive",
        ));
    }
    if fs_cracking < 0.0 || fs_failure < 0.0 {
        return Err(StabError::invalid_input(
            "min_fs",
            format!("{}/{}", fs_cracking, fs_failure),
            "Minimum factors of safety cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{resolve, Concrete, ModulusFactors};
    use crate::settings::LrfdEdition;
    use approx::assert_relative_eq;

    fn concrete(fc_ksi: f64) -> ResolvedConcrete {
        resolve(&Concrete::new(Ksi(fc_ksi).to_base()), &ModulusFactors::default(), LrfdEdition::default()).unwrap()
    }

    #[test]
    fn test_lifting_allowables() {
        let criteria = LiftingCriteria::default();
        let allow = criteria.allowables(&concrete(5.5));
        assert_relative_eq!(Ksi::from_base(allow.compression_global).0, -0.65 * 5.5, max_relative = 1e-9);
        assert_relative_eq!(Ksi::from_base(allow.compression_peak).0, -0.70 * 5.5, max_relative = 1e-9);
        // 0.0948·√5.5 = 0.222 ksi, capped at 0.2 ksi
        assert_relative_eq!(Ksi::from_base(allow.tension).0, 0.2, max_relative = 1e-9);
        assert_relative_eq!(Ksi::from_base(allow.tension_with_rebar).0, 0.24 * 5.5_f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_uncapped_tension() {
        let mut criteria = LiftingCriteria::default();
        criteria.tension.has_max = false;
        let allow = criteria.allowables(&concrete(5.5));
        assert_relative_eq!(Ksi::from_base(allow.tension).0, 0.0948 * 5.5_f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_hauling_max_super_uses_rupture() {
        let criteria = HaulingCriteria::default();
        let c = concrete(7.0);
        let allow = criteria.allowables(SlopeCase::MaxSuper, &c);
        assert_relative_eq!(allow.tension, c.fr);

        let limit = criteria.tension_limit(SlopeCase::MaxSuper, &c);
        assert_relative_eq!(limit.allowable(c.fc), c.fr, max_relative = 1e-12);
    }

    #[test]
    fn test_hauling_allowables_follow_tension_limit() {
        let criteria = HaulingCriteria::default();
        let c = concrete(6.0);
        for case in SlopeCase::ALL {
            let limit = criteria.tension_limit(case, &c);
            let allow = criteria.allowables(case, &c);
            assert_eq!(allow.tension, limit.allowable(c.fc));
            assert_eq!(allow.tension_with_rebar, limit.allowable_with_rebar(c.fc));
        }
        assert_eq!(criteria.tension_limit(SlopeCase::CrownSlope, &c), criteria.crown_slope_tension);
    }

    #[test]
    fn test_validation() {
        assert!(LiftingCriteria::default().validate().is_ok());
        let criteria = HaulingCriteria {
            compression_coefficient_global: 0.0,
            ..Default::default()
        };
        assert!(criteria.validate().is_err());
    }
}
