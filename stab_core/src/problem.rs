//! # Stability Problems
//!
//! Inputs describing how a girder is handled. A [`LiftingProblem`] models a
//! girder picked up by cables at two lift points; a [`HaulingProblem`] models
//! a girder supported on truck bunks with a flexible rotational spring.
//!
//! Both share [`StabilityParameters`]: the concrete at that stage,
//! fabrication tolerances, impact and wind.
//!
//! Every setter returns `true` when the stored value changed so callers can
//! decide whether results must be recomputed.

use serde::{Deserialize, Serialize};

use crate::errors::{StabError, StabResult};
use crate::materials::Concrete;
use crate::units::{assign_if_changed, assign_value, Feet, Inches, KipInPerRad, Ksi, GRAVITY};

/// Handling stage a strand layout applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelType {
    Lifting,
    Hauling,
}

/// How wind loading is specified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindType {
    /// Wind speed (m/s)
    #[default]
    Speed,
    /// Wind pressure (Pa)
    Pressure,
}

/// Lateral wind loading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindLoading {
    pub wind_type: WindType,
    /// Speed (m/s) or pressure (Pa) depending on `wind_type`
    pub load: f64,
}

impl WindLoading {
    pub fn speed(v: f64) -> Self {
        WindLoading {
            wind_type: WindType::Speed,
            load: v,
        }
    }

    pub fn pressure(p: f64) -> Self {
        WindLoading {
            wind_type: WindType::Pressure,
            load: p,
        }
    }

    /// Wind pressure (Pa) for the given drag coefficient.
    ///
    /// ```text
    /// p = 0.613·Cd·V²     (V in m/s)
    /// ```
    pub fn wind_pressure(&self, drag_coefficient: f64) -> f64 {
        match self.wind_type {
            WindType::Speed => 0.613 * drag_coefficient * self.load * self.load,
            WindType::Pressure => self.load,
        }
    }
}

/// Dynamic load allowance applied to the girder self-weight
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactFactors {
    /// Upward impact (fraction of dead load)
    pub up: f64,
    /// Downward impact (fraction of dead load)
    pub down: f64,
}

/// Direction of the dynamic load allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactDirection {
    NoImpact,
    ImpactUp,
    ImpactDown,
}

impl ImpactDirection {
    pub fn display_name(&self) -> &'static str {
        match self {
            ImpactDirection::NoImpact => "No impact",
            ImpactDirection::ImpactUp => "Impact up",
            ImpactDirection::ImpactDown => "Impact down",
        }
    }
}

impl ImpactFactors {
    /// Impact cases to evaluate with their dead load multipliers.
    ///
    /// The no-impact case is always present; the up and down cases are added
    /// only when their factor is non-zero.
    pub fn cases(&self) -> Vec<(ImpactDirection, f64)> {
        let mut cases = vec![(ImpactDirection::NoImpact, 1.0)];
        if self.up != 0.0 {
            cases.push((ImpactDirection::ImpactUp, 1.0 - self.up));
        }
        if self.down != 0.0 {
            cases.push((ImpactDirection::ImpactDown, 1.0 + self.down));
        }
        cases
    }
}

/// Which hauling slope cases receive impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImpactUsage {
    Both,
    #[default]
    NormalCrown,
    MaxSuper,
}

/// Direction of centrifugal force relative to the superelevation roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CentrifugalForceType {
    /// Acts in the direction of roll
    #[default]
    Adverse,
    /// Acts against the direction of roll
    Favorable,
}

impl CentrifugalForceType {
    pub fn sign(&self) -> f64 {
        match self {
            CentrifugalForceType::Adverse => 1.0,
            CentrifugalForceType::Favorable => -1.0,
        }
    }
}

/// Roadway slope cases evaluated for hauling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlopeCase {
    /// Normal crown slope, no centrifugal force
    CrownSlope,
    /// Maximum superelevation with centrifugal force
    MaxSuper,
}

impl SlopeCase {
    pub const ALL: [SlopeCase; 2] = [SlopeCase::CrownSlope, SlopeCase::MaxSuper];

    pub fn display_name(&self) -> &'static str {
        match self {
            SlopeCase::CrownSlope => "Normal crown slope",
            SlopeCase::MaxSuper => "Maximum superelevation",
        }
    }
}

// ============================================================================
// Shared parameters
// ============================================================================

/// Parameters shared by lifting and hauling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityParameters {
    /// Concrete at this stage
    pub concrete: Concrete,

    /// Vertical camber at midspan (m, upward positive)
    pub camber: f64,

    /// Lateral camber at midspan (m)
    pub lateral_camber: f64,

    /// Sweep tolerance (m of sweep per m of length)
    pub sweep_tolerance: f64,

    /// Additional sweep that develops after fabrication (m)
    pub sweep_growth: f64,

    /// Lateral placement tolerance of the supports (m)
    pub support_placement_tolerance: f64,

    pub impact: ImpactFactors,

    pub wind: WindLoading,
}

impl StabilityParameters {
    fn new(fc: f64, support_placement_tolerance: f64) -> Self {
        StabilityParameters {
            concrete: Concrete::new(fc),
            camber: 0.0,
            lateral_camber: 0.0,
            sweep_tolerance: Inches(0.125).to_base() / Feet(10.0).to_base(),
            sweep_growth: 0.0,
            support_placement_tolerance,
            impact: ImpactFactors::default(),
            wind: WindLoading::default(),
        }
    }

    pub fn set_camber(&mut self, camber: f64) -> bool {
        assign_if_changed(&mut self.camber, camber)
    }

    pub fn set_lateral_camber(&mut self, lateral_camber: f64) -> bool {
        assign_if_changed(&mut self.lateral_camber, lateral_camber)
    }

    pub fn set_sweep_tolerance(&mut self, tolerance: f64) -> bool {
        assign_if_changed(&mut self.sweep_tolerance, tolerance)
    }

    pub fn set_sweep_growth(&mut self, growth: f64) -> bool {
        assign_if_changed(&mut self.sweep_growth, growth)
    }

    pub fn set_support_placement_tolerance(&mut self, tolerance: f64) -> bool {
        assign_if_changed(&mut self.support_placement_tolerance, tolerance)
    }

    pub fn set_impact(&mut self, up: f64, down: f64) -> bool {
        let a = assign_if_changed(&mut self.impact.up, up);
        let b = assign_if_changed(&mut self.impact.down, down);
        a || b
    }

    pub fn set_wind_loading(&mut self, wind_type: WindType, load: f64) -> bool {
        let a = assign_value(&mut self.wind.wind_type, wind_type);
        let b = assign_if_changed(&mut self.wind.load, load);
        a || b
    }

    fn validate(&self) -> StabResult<()> {
        let non_negative = [
            ("sweep_tolerance", self.sweep_tolerance),
            ("sweep_growth", self.sweep_growth),
            ("support_placement_tolerance", self.support_placement_tolerance),
            ("impact.up", self.impact.up),
            ("impact.down", self.impact.down),
            ("wind.load", self.wind.load),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(StabError::invalid_input(field, value.to_string(), "Value cannot be negative"));
            }
        }
        if self.impact.up >= 1.0 {
            return Err(StabError::invalid_input(
                "impact.up",
                self.impact.up.to_string(),
                "Upward impact must be less than 1.0",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Lifting
// ============================================================================

/// Girder lifted by cables at two symmetric lift points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftingProblem {
    pub params: StabilityParameters,

    /// Distance from each girder end to the lift point (m)
    pub lift_point: f64,

    /// Elevation of the roll axis relative to the top of the girder (m, up positive)
    pub yra: f64,

    /// Angle of the lift cables from horizontal (rad); π/2 is vertical
    pub lift_angle: f64,
}

impl Default for LiftingProblem {
    fn default() -> Self {
        LiftingProblem {
            params: StabilityParameters::new(Ksi(5.5).to_base(), Inches(0.25).to_base()),
            lift_point: Feet(3.0).to_base(),
            yra: 0.0,
            lift_angle: std::f64::consts::FRAC_PI_2,
        }
    }
}

impl LiftingProblem {
    /// Distances from the left and right ends to the supports
    pub fn support_locations(&self) -> (f64, f64) {
        (self.lift_point, self.lift_point)
    }

    pub fn set_lift_point(&mut self, distance: f64) -> bool {
        assign_if_changed(&mut self.lift_point, distance)
    }

    pub fn set_yra(&mut self, yra: f64) -> bool {
        assign_if_changed(&mut self.yra, yra)
    }

    pub fn set_lift_angle(&mut self, angle: f64) -> bool {
        assign_if_changed(&mut self.lift_angle, angle)
    }

    /// Whether the lift cables are inclined
    pub fn has_inclined_cables(&self) -> bool {
        !crate::units::is_equal(self.lift_angle, std::f64::consts::FRAC_PI_2)
    }

    /// Validate lifting inputs against a girder of `length`
    pub fn validate(&self, length: f64) -> StabResult<()> {
        self.params.validate()?;
        if self.lift_point < 0.0 || 2.0 * self.lift_point >= length {
            return Err(StabError::invalid_input(
                "lift_point",
                self.lift_point.to_string(),
                "Lift points must lie on the girder with a positive span between them",
            ));
        }
        if !(self.lift_angle > 0.0 && self.lift_angle <= std::f64::consts::FRAC_PI_2 + crate::units::TOLERANCE) {
            return Err(StabError::invalid_input(
                "lift_angle",
                self.lift_angle.to_string(),
                "Lift angle must be greater than zero and at most 90°",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Hauling
// ============================================================================

/// Girder supported on truck bunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulingProblem {
    pub params: StabilityParameters,

    /// Distance from the left end to the left bunk (m)
    pub left_bunk: f64,

    /// Distance from the right end to the right bunk (m)
    pub right_bunk: f64,

    /// Height of the girder bottom above the roadway (m)
    pub height_of_girder_bottom: f64,

    /// Height of the roll center above the roadway (m)
    pub height_of_roll_axis: f64,

    /// Rotational stiffness of the trailer (N·m/rad)
    pub truck_rotational_stiffness: f64,

    /// Center-to-center spacing of the dual tire wheel lines (m)
    pub wheel_line_spacing: f64,

    /// Normal crown slope (rise/run)
    pub crown_slope: f64,

    /// Maximum superelevation (rise/run)
    pub superelevation: f64,

    /// Travel speed (m/s)
    pub velocity: f64,

    /// Radius of the turn (m)
    pub turning_radius: f64,

    pub centrifugal_force_type: CentrifugalForceType,

    pub impact_usage: ImpactUsage,
}

impl Default for HaulingProblem {
    fn default() -> Self {
        HaulingProblem {
            params: StabilityParameters::new(Ksi(7.0).to_base(), Inches(1.0).to_base()),
            left_bunk: Feet(5.0).to_base(),
            right_bunk: Feet(5.0).to_base(),
            height_of_girder_bottom: Inches(72.0).to_base(),
            height_of_roll_axis: Inches(24.0).to_base(),
            truck_rotational_stiffness: KipInPerRad(40_500.0).to_base(),
            wheel_line_spacing: Inches(72.0).to_base(),
            crown_slope: 0.02,
            superelevation: 0.06,
            velocity: 0.0,
            turning_radius: Feet(100.0).to_base(),
            centrifugal_force_type: CentrifugalForceType::Adverse,
            impact_usage: ImpactUsage::NormalCrown,
        }
    }
}

impl HaulingProblem {
    pub fn support_locations(&self) -> (f64, f64) {
        (self.left_bunk, self.right_bunk)
    }

    pub fn set_support_locations(&mut self, left: f64, right: f64) -> bool {
        let a = assign_if_changed(&mut self.left_bunk, left);
        let b = assign_if_changed(&mut self.right_bunk, right);
        a || b
    }

    pub fn set_height_of_girder_bottom(&mut self, height: f64) -> bool {
        assign_if_changed(&mut self.height_of_girder_bottom, height)
    }

    pub fn set_height_of_roll_axis(&mut self, height: f64) -> bool {
        assign_if_changed(&mut self.height_of_roll_axis, height)
    }

    pub fn set_truck_rotational_stiffness(&mut self, stiffness: f64) -> bool {
        assign_if_changed(&mut self.truck_rotational_stiffness, stiffness)
    }

    pub fn set_wheel_line_spacing(&mut self, spacing: f64) -> bool {
        assign_if_changed(&mut self.wheel_line_spacing, spacing)
    }

    pub fn set_crown_slope(&mut self, slope: f64) -> bool {
        assign_if_changed(&mut self.crown_slope, slope)
    }

    pub fn set_superelevation(&mut self, slope: f64) -> bool {
        assign_if_changed(&mut self.superelevation, slope)
    }

    pub fn set_velocity(&mut self, velocity: f64) -> bool {
        assign_if_changed(&mut self.velocity, velocity)
    }

    pub fn set_turning_radius(&mut self, radius: f64) -> bool {
        assign_if_changed(&mut self.turning_radius, radius)
    }

    pub fn set_centrifugal_force_type(&mut self, cf_type: CentrifugalForceType) -> bool {
        assign_value(&mut self.centrifugal_force_type, cf_type)
    }

    pub fn set_impact_usage(&mut self, usage: ImpactUsage) -> bool {
        assign_value(&mut self.impact_usage, usage)
    }

    /// Roadway slope for a case (rise/run)
    pub fn slope(&self, case: SlopeCase) -> f64 {
        match case {
            SlopeCase::CrownSlope => self.crown_slope,
            SlopeCase::MaxSuper => self.superelevation,
        }
    }

    /// Whether impact is applied in a slope case
    pub fn applies_impact(&self, case: SlopeCase) -> bool {
        matches!(
            (self.impact_usage, case),
            (ImpactUsage::Both, _)
                | (ImpactUsage::NormalCrown, SlopeCase::CrownSlope)
                | (ImpactUsage::MaxSuper, SlopeCase::MaxSuper)
        )
    }

    /// Centrifugal force as a fraction of the girder weight, signed by direction
    pub fn centrifugal_coefficient(&self) -> f64 {
        if self.turning_radius > 0.0 {
            self.centrifugal_force_type.sign() * self.velocity * self.velocity / (GRAVITY * self.turning_radius)
        } else {
            0.0
        }
    }

    /// Validate hauling inputs against a girder of `length`
    pub fn validate(&self, length: f64) -> StabResult<()> {
        self.params.validate()?;
        if self.left_bunk < 0.0 || self.right_bunk < 0.0 || self.left_bunk + self.right_bunk >= length {
            return Err(StabError::invalid_input(
                "bunk_locations",
                format!("{}/{}", self.left_bunk, self.right_bunk),
                "Bunks must lie on the girder with a positive span between them",
            ));
        }
        if !(self.truck_rotational_stiffness > 0.0) {
            return Err(StabError::invalid_input(
                "truck_rotational_stiffness",
                self.truck_rotational_stiffness.to_string(),
                "Rotational stiffness must be positive",
            ));
        }
        if self.wheel_line_spacing < 0.0 || self.height_of_roll_axis < 0.0 || self.height_of_girder_bottom < 0.0 {
            return Err(StabError::invalid_input(
                "truck_geometry",
                format!(
                    "{}/{}/{}",
                    self.wheel_line_spacing, self.height_of_roll_axis, self.height_of_girder_bottom
                ),
                "Truck dimensions cannot be negative",
            ));
        }
        if self.velocity < 0.0 || (self.velocity > 0.0 && !(self.turning_radius > 0.0)) {
            return Err(StabError::invalid_input(
                "turning_radius",
                self.turning_radius.to_string(),
                "A positive turning radius is required when the truck is moving",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Mph;
    use approx::assert_relative_eq;

    #[test]
    fn test_impact_cases() {
        assert_eq!(ImpactFactors::default().cases().len(), 1);

        let impact = ImpactFactors { up: 0.1, down: 0.2 };
        let cases = impact.cases();
        assert_eq!(cases.len(), 3);
        assert_relative_eq!(cases[1].1, 0.9);
        assert_relative_eq!(cases[2].1, 1.2);
    }

    #[test]
    fn test_wind_pressure() {
        let wind = WindLoading::speed(Mph(20.0).to_base());
        let v = Mph(20.0).to_base();
        assert_relative_eq!(wind.wind_pressure(2.2), 0.613 * 2.2 * v * v);
        assert_relative_eq!(WindLoading::pressure(500.0).wind_pressure(2.2), 500.0);
    }

    #[test]
    fn test_setters_report_changes() {
        let mut problem = LiftingProblem::default();
        assert!(!problem.set_lift_point(Feet(3.0).to_base()));
        assert!(problem.set_lift_point(Feet(10.0).to_base()));
        assert!(problem.params.set_impact(0.1, 0.1));
        assert!(!problem.params.set_impact(0.1, 0.1));

        let mut hauling = HaulingProblem::default();
        assert!(hauling.set_superelevation(0.08));
        assert!(!hauling.set_impact_usage(ImpactUsage::NormalCrown));
    }

    #[test]
    fn test_impact_usage() {
        let mut problem = HaulingProblem::default();
        assert!(problem.applies_impact(SlopeCase::CrownSlope));
        assert!(!problem.applies_impact(SlopeCase::MaxSuper));
        problem.impact_usage = ImpactUsage::Both;
        assert!(problem.applies_impact(SlopeCase::MaxSuper));
    }

    #[test]
    fn test_centrifugal_coefficient() {
        let mut problem = HaulingProblem::default();
        assert_eq!(problem.centrifugal_coefficient(), 0.0);

        problem.velocity = 10.0;
        problem.turning_radius = 50.0;
        assert_relative_eq!(problem.centrifugal_coefficient(), 100.0 / (GRAVITY * 50.0));
        problem.centrifugal_force_type = CentrifugalForceType::Favorable;
        assert!(problem.centrifugal_coefficient() < 0.0);
    }

    #[test]
    fn test_validation() {
        let length = Feet(100.0).to_base();
        assert!(LiftingProblem::default().validate(length).is_ok());
        assert!(HaulingProblem::default().validate(length).is_ok());

        let mut lifting = LiftingProblem::default();
        lifting.lift_point = length;
        assert!(lifting.validate(length).is_err());

        let mut hauling = HaulingProblem::default();
        hauling.truck_rotational_stiffness = 0.0;
        assert!(hauling.validate(length).is_err());
    }
}
