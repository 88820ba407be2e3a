//! # Analysis Settings
//!
//! Model-wide settings that control how a solve is discretized and which
//! edition of the LRFD specification governs derived material properties.
//! Settings are persisted with the model in the `Settings` block.

use serde::{Deserialize, Serialize};

use crate::errors::{StabError, StabResult};
use crate::units::FOOT;

/// Edition of the AASHTO LRFD Bridge Design Specifications.
///
/// Variants are declared in chronological order so editions can be compared
/// with `<`/`>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LrfdEdition {
    FirstEdition1994,
    SecondEdition1998,
    ThirdEdition2004,
    ThirdEditionWith2005Interims,
    ThirdEditionWith2006Interims,
    FourthEdition2007,
    FourthEditionWith2008Interims,
    FourthEditionWith2009Interims,
    FifthEdition2010,
    SixthEdition2012,
    SixthEditionWith2013Interims,
    SeventhEdition2014,
    SeventhEditionWith2015Interims,
    SeventhEditionWith2016Interims,
    EighthEdition2017,
    NinthEdition2020,
}

impl LrfdEdition {
    /// Most recent edition this build knows about
    pub const LATEST: LrfdEdition = LrfdEdition::NinthEdition2020;

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LrfdEdition::FirstEdition1994 => "1st Edition, 1994",
            LrfdEdition::SecondEdition1998 => "2nd Edition, 1998",
            LrfdEdition::ThirdEdition2004 => "3rd Edition, 2004",
            LrfdEdition::ThirdEditionWith2005Interims => "3rd Edition with 2005 interims",
            LrfdEdition::ThirdEditionWith2006Interims => "3rd Edition with 2006 interims",
            LrfdEdition::FourthEdition2007 => "4th Edition, 2007",
            LrfdEdition::FourthEditionWith2008Interims => "4th Edition with 2008 interims",
            LrfdEdition::FourthEditionWith2009Interims => "4th Edition with 2009 interims",
            LrfdEdition::FifthEdition2010 => "5th Edition, 2010",
            LrfdEdition::SixthEdition2012 => "6th Edition, 2012",
            LrfdEdition::SixthEditionWith2013Interims => "6th Edition with 2013 interims",
            LrfdEdition::SeventhEdition2014 => "7th Edition, 2014",
            LrfdEdition::SeventhEditionWith2015Interims => "7th Edition with 2015 interims",
            LrfdEdition::SeventhEditionWith2016Interims => "7th Edition with 2016 interims",
            LrfdEdition::EighthEdition2017 => "8th Edition, 2017",
            LrfdEdition::NinthEdition2020 => "9th Edition, 2020",
        }
    }

    /// Whether the K1·K2 averaging/bounding factors apply to a computed modulus
    pub fn uses_modulus_correction_factors(&self) -> bool {
        *self >= LrfdEdition::ThirdEditionWith2005Interims
    }

    /// Whether the modulus uses the `120000·K1·wc²·f'c^0.33` form
    pub fn uses_revised_modulus_equation(&self) -> bool {
        *self >= LrfdEdition::SeventhEditionWith2015Interims
    }
}

impl Default for LrfdEdition {
    fn default() -> Self {
        LrfdEdition::LATEST
    }
}

/// Unit system used when presenting results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitsMode {
    Si,
    #[default]
    Us,
}

/// Discretization and convergence settings for a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Governing LRFD edition
    pub lrfd_edition: LrfdEdition,

    /// Number of equal segments used for analysis points (N+1 points)
    pub analysis_segments: usize,

    /// Distance of the extra points placed beside each lift point when the
    /// lift cables are inclined (m)
    pub lift_point_offset: f64,

    /// Number of integration segments for lateral deflection
    pub deflection_segments: usize,

    /// Convergence tolerance on roll angle (rad)
    pub roll_tolerance: f64,

    /// Maximum bisection iterations for any angle search
    pub max_iterations: usize,

    /// Number of coarse steps used to bracket an angle before bisection
    pub angle_scan_steps: usize,

    /// Display unit system
    pub units_mode: UnitsMode,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            lrfd_edition: LrfdEdition::default(),
            analysis_segments: 10,
            lift_point_offset: 0.001 * FOOT,
            deflection_segments: 500,
            roll_tolerance: 1.0e-9,
            max_iterations: 200,
            angle_scan_steps: 360,
            units_mode: UnitsMode::default(),
        }
    }
}

impl AnalysisSettings {
    /// Validate settings before a solve
    pub fn validate(&self) -> StabResult<()> {
        if self.analysis_segments == 0 {
            return Err(StabError::invalid_input(
                "analysis_segments",
                self.analysis_segments.to_string(),
                "At least one analysis segment is required",
            ));
        }
        if self.deflection_segments < 2 {
            return Err(StabError::invalid_input(
                "deflection_segments",
                self.deflection_segments.to_string(),
                "At least two deflection segments are required",
            ));
        }
        if self.lift_point_offset <= 0.0 {
            return Err(StabError::invalid_input(
                "lift_point_offset",
                self.lift_point_offset.to_string(),
                "Lift point offset must be positive",
            ));
        }
        if self.roll_tolerance <= 0.0 {
            return Err(StabError::invalid_input(
                "roll_tolerance",
                self.roll_tolerance.to_string(),
                "Roll tolerance must be positive",
            ));
        }
        if self.max_iterations == 0 || self.angle_scan_steps == 0 {
            return Err(StabError::invalid_input(
                "max_iterations",
                format!("{}/{}", self.max_iterations, self.angle_scan_steps),
                "Iteration and scan counts must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edition_ordering() {
        assert!(LrfdEdition::FirstEdition1994 < LrfdEdition::ThirdEditionWith2005Interims);
        assert!(!LrfdEdition::ThirdEdition2004.uses_modulus_correction_factors());
        assert!(LrfdEdition::ThirdEditionWith2005Interims.uses_modulus_correction_factors());
        assert!(!LrfdEdition::SeventhEdition2014.uses_revised_modulus_equation());
        assert!(LrfdEdition::EighthEdition2017.uses_revised_modulus_equation());
    }

    #[test]
    fn test_default_settings_validate() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.analysis_segments, 10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_segments_rejected() {
        let settings = AnalysisSettings {
            analysis_segments: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(StabError::InvalidInput { .. })));
    }
}
