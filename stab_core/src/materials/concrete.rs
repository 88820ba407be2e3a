//! # Concrete
//!
//! Concrete input properties and the derived values needed by a solve.
//!
//! Derived properties (modulus of elasticity, density modification factor
//! and modulus of rupture) are never stored on [`Concrete`]. They are
//! produced by [`resolve`] at the start of every solve so that edits to
//! strength, density or the compute flag can never leave them stale.
//!
//! ## Equations (AASHTO LRFD 5.4.2)
//!
//! ```text
//! Ec = 33000·K1·wc^1.5·√f'c            (before 7th Edition with 2015 interims)
//! Ec = 120000·K1·wc^2.0·f'c^0.33       (7th Edition with 2015 interims and later)
//! λ  = 7.5·wc, 0.75 ≤ λ ≤ 1.0          (lightweight concrete)
//! fr = coefficient·λ·√f'c
//! ```
//!
//! with `wc` in kcf and `f'c` in ksi.

use serde::{Deserialize, Serialize};

use crate::errors::{StabError, StabResult};
use crate::settings::LrfdEdition;
use crate::units::{Kcf, Ksi, SqrtKsi};

/// Concrete type per AASHTO LRFD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcreteType {
    #[default]
    Normal,
    AllLightweight,
    SandLightweight,
}

impl ConcreteType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteType::Normal => "Normal weight",
            ConcreteType::AllLightweight => "All lightweight",
            ConcreteType::SandLightweight => "Sand lightweight",
        }
    }

    pub fn is_lightweight(&self) -> bool {
        !matches!(self, ConcreteType::Normal)
    }
}

/// Modulus averaging (K1) and bounding (K2) correction factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModulusFactors {
    pub k1: f64,
    pub k2: f64,
}

impl Default for ModulusFactors {
    fn default() -> Self {
        ModulusFactors { k1: 1.0, k2: 1.0 }
    }
}

/// Concrete properties for one stage (lifting or hauling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concrete {
    pub concrete_type: ConcreteType,

    /// Compressive strength at this stage (Pa)
    pub fc: f64,

    /// Mass density used for the modulus of elasticity (kg/m³)
    pub density: f64,

    /// Mass density including an allowance for reinforcement, used for dead load (kg/m³)
    pub density_with_rebar: f64,

    /// When true the modulus is computed from strength and density
    pub compute_modulus: bool,

    /// User supplied modulus of elasticity (Pa), used when `compute_modulus` is false
    pub modulus: f64,

    /// Modulus of rupture coefficient (√Pa); `fr = coefficient·λ·√fc`
    pub fr_coefficient: f64,
}

impl Concrete {
    /// Create concrete with the default densities and the given strength
    pub fn new(fc: f64) -> Self {
        let density = Kcf(0.155).to_base();
        let mut concrete = Concrete {
            concrete_type: ConcreteType::Normal,
            fc,
            density,
            density_with_rebar: Kcf(0.165).to_base(),
            compute_modulus: true,
            modulus: 0.0,
            fr_coefficient: SqrtKsi(0.24).to_base(),
        };
        concrete.modulus = modulus_of_elasticity(fc, density, LrfdEdition::default());
        concrete
    }

    /// Validate the properties needed for a solve
    pub fn validate(&self) -> StabResult<()> {
        if !(self.fc > 0.0) {
            return Err(StabError::invalid_input(
                "fc",
                self.fc.to_string(),
                "Concrete strength must be positive",
            ));
        }
        if self.density_with_rebar < 0.0 {
            return Err(StabError::invalid_input(
                "density_with_rebar",
                self.density_with_rebar.to_string(),
                "Density cannot be negative",
            ));
        }
        if self.compute_modulus && !(self.density > 0.0) {
            return Err(StabError::invalid_input(
                "density",
                self.density.to_string(),
                "Density must be positive to compute the modulus of elasticity",
            ));
        }
        if !self.compute_modulus && !(self.modulus > 0.0) {
            return Err(StabError::invalid_input(
                "modulus",
                self.modulus.to_string(),
                "Modulus of elasticity must be positive",
            ));
        }
        if self.fr_coefficient < 0.0 {
            return Err(StabError::invalid_input(
                "fr_coefficient",
                self.fr_coefficient.to_string(),
                "Rupture coefficient cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Concrete with every derived property evaluated for one solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConcrete {
    pub concrete_type: ConcreteType,
    /// Compressive strength (Pa)
    pub fc: f64,
    /// Density for the modulus (kg/m³)
    pub density: f64,
    /// Density for dead load (kg/m³)
    pub density_with_rebar: f64,
    /// Modulus of elasticity (Pa)
    pub modulus: f64,
    /// Concrete density modification factor
    pub lambda: f64,
    /// Modulus of rupture (Pa)
    pub fr: f64,
    /// Rupture coefficient used for `fr` (√Pa)
    pub fr_coefficient: f64,
}

/// Uncorrected modulus of elasticity from strength and density
///
/// The same equations apply to every concrete type; density carries the difference.
pub fn modulus_of_elasticity(fc: f64, density: f64, edition: LrfdEdition) -> f64 {
    let wc = Kcf::from_base(density).value();
    let fc_ksi = Ksi::from_base(fc).value();
    let ec_ksi = if edition.uses_revised_modulus_equation() {
        120_000.0 * wc.powi(2) * fc_ksi.powf(0.33)
    } else {
        33_000.0 * wc.powf(1.5) * fc_ksi.sqrt()
    };
    Ksi(ec_ksi).to_base()
}

/// Concrete density modification factor
pub fn density_modification_factor(concrete_type: ConcreteType, density: f64) -> f64 {
    if concrete_type.is_lightweight() {
        let wc = Kcf::from_base(density).value();
        (7.5 * wc).clamp(0.75, 1.0)
    } else {
        1.0
    }
}

/// Resolve the derived concrete properties for one solve.
pub fn resolve(
    concrete: &Concrete,
    factors: &ModulusFactors,
    edition: LrfdEdition,
) -> StabResult<ResolvedConcrete> {
    concrete.validate()?;

    let modulus = if concrete.compute_modulus {
        let mut ec = modulus_of_elasticity(concrete.fc, concrete.density, edition);
        if edition.uses_modulus_correction_factors() {
            ec *= factors.k1 * factors.k2;
        }
        ec
    } else {
        concrete.modulus
    };

    if !(modulus > 0.0) {
        return Err(StabError::invalid_input(
            "modulus",
            modulus.to_string(),
            "Modulus of elasticity must be positive",
        ));
    }

    let lambda = density_modification_factor(concrete.concrete_type, concrete.density);
    let fr = concrete.fr_coefficient * lambda * concrete.fc.sqrt();

    Ok(ResolvedConcrete {
        concrete_type: concrete.concrete_type,
        fc: concrete.fc,
        density: concrete.density,
        density_with_rebar: concrete.density_with_rebar,
        modulus,
        lambda,
        fr,
        fr_coefficient: concrete.fr_coefficient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_modulus_older_edition() {
        let ec = modulus_of_elasticity(
            Ksi(7.0).to_base(),
            Kcf(0.155).to_base(),
            LrfdEdition::SixthEdition2012,
        );
        let expected = 33_000.0 * 0.155_f64.powf(1.5) * 7.0_f64.sqrt();
        assert_relative_eq!(Ksi::from_base(ec).0, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_modulus_revised_edition() {
        let ec = modulus_of_elasticity(
            Ksi(7.0).to_base(),
            Kcf(0.155).to_base(),
            LrfdEdition::NinthEdition2020,
        );
        let expected = 120_000.0 * 0.155_f64.powi(2) * 7.0_f64.powf(0.33);
        assert_relative_eq!(Ksi::from_base(ec).0, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_correction_factors_by_edition() {
        let concrete = Concrete::new(Ksi(7.0).to_base());
        let factors = ModulusFactors { k1: 0.9, k2: 1.1 };

        let old = resolve(&concrete, &factors, LrfdEdition::ThirdEdition2004).unwrap();
        let base = modulus_of_elasticity(concrete.fc, concrete.density, LrfdEdition::ThirdEdition2004);
        assert_relative_eq!(old.modulus, base, max_relative = 1e-12);

        let new = resolve(&concrete, &factors, LrfdEdition::FourthEdition2007).unwrap();
        assert_relative_eq!(new.modulus, base * 0.99, max_relative = 1e-12);
    }

    #[test]
    fn test_user_modulus() {
        let mut concrete = Concrete::new(Ksi(6.0).to_base());
        concrete.compute_modulus = false;
        concrete.modulus = Ksi(4000.0).to_base();
        let resolved = resolve(&concrete, &ModulusFactors::default(), LrfdEdition::default()).unwrap();
        assert_relative_eq!(Ksi::from_base(resolved.modulus).0, 4000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rupture_and_lambda() {
        let mut concrete = Concrete::new(Ksi(7.0).to_base());
        let resolved = resolve(&concrete, &ModulusFactors::default(), LrfdEdition::default()).unwrap();
        assert_eq!(resolved.lambda, 1.0);
        assert_relative_eq!(Ksi::from_base(resolved.fr).0, 0.24 * 7.0_f64.sqrt(), max_relative = 1e-9);

        concrete.concrete_type = ConcreteType::SandLightweight;
        concrete.density = Kcf(0.120).to_base();
        let resolved = resolve(&concrete, &ModulusFactors::default(), LrfdEdition::default()).unwrap();
        assert_relative_eq!(resolved.lambda, 0.9, max_relative = 1e-9);
        assert_relative_eq!(Ksi::from_base(resolved.fr).0, 0.9 * 0.24 * 7.0_f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_zero_strength_rejected() {
        let concrete = Concrete::new(0.0);
        let result = resolve(&concrete, &ModulusFactors::default(), LrfdEdition::default());
        assert!(matches!(result, Err(StabError::InvalidInput { .. })));
    }
}
