//! # Check Artifacts
//!
//! Everything a lifting or hauling solve produces. Artifacts are plain data:
//! they are built once by the engineer and never modified. The simplified
//! [`LiftingResults`] and [`HaulingResults`] views are extracted from them
//! for reporting and pass/fail display.
//!
//! ## Conventions
//! - Stresses in Pa, compression negative
//! - Factors of safety are `>= 0`; a check that can never fail reports `f64::MAX`
//! - Roll angles in radians

use serde::{Deserialize, Serialize};

use crate::criteria::{Allowables, HaulingCriteria, LiftingCriteria};
use crate::materials::ResolvedConcrete;
use crate::problem::{ImpactDirection, SlopeCase};

/// Stress evaluation point of a cross section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

    pub fn display_name(&self) -> &'static str {
        match self {
            Corner::TopLeft => "Top left",
            Corner::TopRight => "Top right",
            Corner::BottomLeft => "Bottom left",
            Corner::BottomRight => "Bottom right",
        }
    }
}

/// A value at each of the four stress points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerStresses {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
}

impl CornerStresses {
    pub fn from_fn<F: FnMut(Corner) -> f64>(mut f: F) -> Self {
        CornerStresses {
            top_left: f(Corner::TopLeft),
            top_right: f(Corner::TopRight),
            bottom_left: f(Corner::BottomLeft),
            bottom_right: f(Corner::BottomRight),
        }
    }

    pub fn get(&self, corner: Corner) -> f64 {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }

    /// Most tensile corner
    pub fn max(&self) -> (Corner, f64) {
        Corner::ALL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .fold((Corner::TopLeft, f64::MIN), |best, next| if next.1 > best.1 { next } else { best })
    }

    /// Most compressive corner
    pub fn min(&self) -> (Corner, f64) {
        Corner::ALL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .fold((Corner::TopLeft, f64::MAX), |best, next| if next.1 < best.1 { next } else { best })
    }
}

/// Outcome of the roll equilibrium search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RollEquilibrium {
    /// Resisting moment balances the overturning moment at `theta` (rad)
    Stable { theta: f64 },
    /// No equilibrium within the physical range of roll angles
    Unstable,
}

impl RollEquilibrium {
    pub fn theta(&self) -> Option<f64> {
        match self {
            RollEquilibrium::Stable { theta } => Some(*theta),
            RollEquilibrium::Unstable => None,
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, RollEquilibrium::Stable { .. })
    }
}

/// Cracking at the governing corner of one analysis point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackingResult {
    pub corner: Corner,
    /// Roll angle at which the corner reaches the allowable tension (rad);
    /// `None` when it never cracks
    pub theta: Option<f64>,
    pub fs: f64,
}

/// Forces and stresses at one analysis point for one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointResult {
    /// Location from the left end (m)
    pub x: f64,
    /// Vertical moment including impact (N·m)
    pub mg: f64,
    /// Lateral moment from wind and centrifugal force (N·m)
    pub ml: f64,
    /// Total effective prestress (N)
    pub fpe: f64,
    /// Plumb girder, no lateral load
    pub global: CornerStresses,
    /// Plumb girder with lateral load
    pub plumb: CornerStresses,
    /// Girder at its equilibrium roll angle; `None` when unstable
    pub tilted: Option<CornerStresses>,
    pub cracking: CrackingResult,
}

impl PointResult {
    /// Peak stress sets: plumb and, if stable, tilted
    fn peak_sets(&self) -> impl Iterator<Item = &CornerStresses> {
        std::iter::once(&self.plumb).chain(self.tilted.iter())
    }
}

/// Extreme stress with its location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressExtreme<C> {
    pub stress: f64,
    pub x: f64,
    pub corner: Corner,
    pub case: C,
}

/// Governing factor of safety with its location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoverningFs<C> {
    pub fs: f64,
    pub case: C,
    pub x: Option<f64>,
    pub corner: Option<Corner>,
}

fn keep_max<C: Copy>(slot: &mut Option<StressExtreme<C>>, stress: f64, x: f64, corner: Corner, case: C) {
    if slot.map_or(true, |s| stress > s.stress) {
        *slot = Some(StressExtreme { stress, x, corner, case });
    }
}

fn keep_min<C: Copy>(slot: &mut Option<StressExtreme<C>>, stress: f64, x: f64, corner: Corner, case: C) {
    if slot.map_or(true, |s| stress < s.stress) {
        *slot = Some(StressExtreme { stress, x, corner, case });
    }
}

fn keep_min_fs<C: Copy>(slot: &mut Option<GoverningFs<C>>, candidate: GoverningFs<C>) {
    if slot.map_or(true, |s| candidate.fs < s.fs) {
        *slot = Some(candidate);
    }
}

/// Stress extremes over a set of point results
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extremes<C> {
    max_tension: Option<StressExtreme<C>>,
    compression_global: Option<StressExtreme<C>>,
    compression_peak: Option<StressExtreme<C>>,
}

impl<C: Copy> Extremes<C> {
    fn new() -> Self {
        Extremes {
            max_tension: None,
            compression_global: None,
            compression_peak: None,
        }
    }

    fn add(&mut self, points: &[PointResult], case: C) {
        for point in points {
            let (corner, f) = point.global.min();
            keep_min(&mut self.compression_global, f, point.x, corner, case);
            for set in point.peak_sets() {
                let (corner, f) = set.max();
                keep_max(&mut self.max_tension, f, point.x, corner, case);
                let (corner, f) = set.min();
                keep_min(&mut self.compression_peak, f, point.x, corner, case);
            }
        }
    }
}

// ============================================================================
// Lifting
// ============================================================================

/// One impact case of a lifting check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftingCaseResult {
    pub impact: ImpactDirection,
    /// Dead load multiplier
    pub impact_factor: f64,
    /// Girder weight including impact (N)
    pub weight: f64,
    /// Lateral deflection of the girder under its weight applied laterally (m)
    pub zo: f64,
    /// Lateral deflection under wind, weighted by the weight distribution (m)
    pub zw: f64,
    /// Height of the roll axis above the center of gravity (m)
    pub yr: f64,
    pub equilibrium: RollEquilibrium,
    /// Governing cracking factor of safety over all points
    pub fs_cracking: f64,
    pub cracking_x: Option<f64>,
    pub cracking_corner: Option<Corner>,
    /// Tilt angle at failure (rad)
    pub theta_failure: f64,
    pub fs_failure: f64,
    pub points: Vec<PointResult>,
}

/// Full output of a lifting check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftingCheckArtifact {
    pub girder_length: f64,
    /// Lift point distance from each end (m)
    pub lift_point: f64,
    pub analysis_points: Vec<f64>,
    pub concrete: ResolvedConcrete,
    pub criteria: LiftingCriteria,
    pub allowables: Allowables,
    /// Girder weight without impact (N)
    pub weight: f64,
    /// Wind pressure (Pa) and resultant wind force (N)
    pub wind_pressure: f64,
    pub wind_force: f64,
    pub offset_factor: f64,
    /// Elevation of the center of gravity in section coordinates (m)
    pub ytop_cg: f64,
    /// Elevation of the roll axis in section coordinates (m)
    pub yra: f64,
    /// Initial lateral eccentricity of the center of gravity (m)
    pub eccentricity: f64,
    /// Horizontal compression from inclined cables without impact (N)
    pub cable_compression: f64,
    pub cases: Vec<LiftingCaseResult>,
}

/// Summary of a lifting check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftingResults {
    pub fs_cracking: GoverningFs<ImpactDirection>,
    pub fs_failure: GoverningFs<ImpactDirection>,
    pub max_tension: Option<StressExtreme<ImpactDirection>>,
    pub max_compression_global: Option<StressExtreme<ImpactDirection>>,
    pub max_compression_peak: Option<StressExtreme<ImpactDirection>>,
    pub allowables: Allowables,
    pub is_stable: bool,
    pub passes_cracking: bool,
    pub passes_failure: bool,
    pub passes_tension: bool,
    pub passes_compression: bool,
}

impl LiftingResults {
    pub fn passed(&self) -> bool {
        self.is_stable && self.passes_cracking && self.passes_failure && self.passes_tension && self.passes_compression
    }
}

impl LiftingCheckArtifact {
    /// Extract the governing values
    pub fn results(&self) -> LiftingResults {
        let mut fs_cracking = None;
        let mut fs_failure = None;
        let mut extremes = Extremes::new();

        for case in &self.cases {
            keep_min_fs(
                &mut fs_cracking,
                GoverningFs {
                    fs: case.fs_cracking,
                    case: case.impact,
                    x: case.cracking_x,
                    corner: case.cracking_corner,
                },
            );
            keep_min_fs(
                &mut fs_failure,
                GoverningFs {
                    fs: case.fs_failure,
                    case: case.impact,
                    x: None,
                    corner: None,
                },
            );
            extremes.add(&case.points, case.impact);
        }

        let unbounded = GoverningFs {
            fs: f64::MAX,
            case: ImpactDirection::NoImpact,
            x: None,
            corner: None,
        };
        let fs_cracking = fs_cracking.unwrap_or(unbounded);
        let fs_failure = fs_failure.unwrap_or(unbounded);
        let allow = self.allowables;

        LiftingResults {
            passes_cracking: fs_cracking.fs >= self.criteria.min_fs_cracking,
            passes_failure: fs_failure.fs >= self.criteria.min_fs_failure,
            passes_tension: extremes.max_tension.map_or(true, |s| s.stress <= allow.tension),
            passes_compression: extremes.compression_global.map_or(true, |s| s.stress >= allow.compression_global)
                && extremes.compression_peak.map_or(true, |s| s.stress >= allow.compression_peak),
            is_stable: self.cases.iter().all(|c| c.equilibrium.is_stable()),
            fs_cracking,
            fs_failure,
            max_tension: extremes.max_tension,
            max_compression_global: extremes.compression_global,
            max_compression_peak: extremes.compression_peak,
            allowables: allow,
        }
    }
}

// ============================================================================
// Hauling
// ============================================================================

/// Slope and impact combination identifying a hauling case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HaulingCase {
    pub slope: SlopeCase,
    pub impact: ImpactDirection,
}

/// One slope and impact case of a hauling check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulingCaseResult {
    pub case: HaulingCase,
    pub impact_factor: f64,
    pub weight: f64,
    pub zo: f64,
    pub zw: f64,
    /// Height of the center of gravity above the roll axis (m)
    pub hr: f64,
    /// Roadway slope angle (rad)
    pub alpha: f64,
    /// Centrifugal force, signed by direction (N)
    pub centrifugal_force: f64,
    /// Tilt angle at which the truck tips over (rad)
    pub theta_max: f64,
    pub allowables: Allowables,
    pub equilibrium: RollEquilibrium,
    pub fs_cracking: f64,
    pub cracking_x: Option<f64>,
    pub cracking_corner: Option<Corner>,
    pub fs_rollover: f64,
    pub points: Vec<PointResult>,
}

/// Full output of a hauling check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulingCheckArtifact {
    pub girder_length: f64,
    /// Bunk distances from the left and right ends (m)
    pub bunks: (f64, f64),
    pub analysis_points: Vec<f64>,
    pub concrete: ResolvedConcrete,
    pub criteria: HaulingCriteria,
    pub weight: f64,
    pub wind_pressure: f64,
    pub wind_force: f64,
    pub offset_factor: f64,
    pub ytop_cg: f64,
    pub yra: f64,
    pub eccentricity: f64,
    /// Half the wheel line spacing (m)
    pub zmax: f64,
    pub cases: Vec<HaulingCaseResult>,
}

/// Governing values for one slope case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeResults {
    pub slope: SlopeCase,
    pub allowables: Allowables,
    pub max_tension: Option<StressExtreme<ImpactDirection>>,
    pub fs_cracking: f64,
    pub fs_rollover: f64,
    pub passes_tension: bool,
}

/// Summary of a hauling check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulingResults {
    pub fs_cracking: GoverningFs<HaulingCase>,
    pub fs_rollover: GoverningFs<HaulingCase>,
    pub slopes: Vec<SlopeResults>,
    pub max_compression_global: Option<StressExtreme<HaulingCase>>,
    pub max_compression_peak: Option<StressExtreme<HaulingCase>>,
    pub is_stable: bool,
    pub passes_cracking: bool,
    pub passes_rollover: bool,
    pub passes_tension: bool,
    pub passes_compression: bool,
}

impl HaulingResults {
    pub fn passed(&self) -> bool {
        self.is_stable && self.passes_cracking && self.passes_rollover && self.passes_tension && self.passes_compression
    }
}

impl HaulingCheckArtifact {
    /// Extract the governing values
    pub fn results(&self) -> HaulingResults {
        let mut fs_cracking = None;
        let mut fs_rollover = None;
        let mut extremes = Extremes::new();
        let mut slopes = Vec::new();

        for slope in SlopeCase::ALL {
            let mut slope_extremes = Extremes::new();
            let mut allowables = None;
            let (mut slope_fs_cracking, mut slope_fs_rollover) = (f64::MAX, f64::MAX);

            for case in self.cases.iter().filter(|c| c.case.slope == slope) {
                allowables = Some(case.allowables);
                slope_fs_cracking = slope_fs_cracking.min(case.fs_cracking);
                slope_fs_rollover = slope_fs_rollover.min(case.fs_rollover);
                slope_extremes.add(&case.points, case.case.impact);
                extremes.add(&case.points, case.case);
                keep_min_fs(
                    &mut fs_cracking,
                    GoverningFs {
                        fs: case.fs_cracking,
                        case: case.case,
                        x: case.cracking_x,
                        corner: case.cracking_corner,
                    },
                );
                keep_min_fs(
                    &mut fs_rollover,
                    GoverningFs {
                        fs: case.fs_rollover,
                        case: case.case,
                        x: None,
                        corner: None,
                    },
                );
            }

            if let Some(allowables) = allowables {
                slopes.push(SlopeResults {
                    slope,
                    allowables,
                    max_tension: slope_extremes.max_tension,
                    fs_cracking: slope_fs_cracking,
                    fs_rollover: slope_fs_rollover,
                    passes_tension: slope_extremes.max_tension.map_or(true, |s| s.stress <= allowables.tension),
                });
            }
        }

        let unbounded = GoverningFs {
            fs: f64::MAX,
            case: HaulingCase {
                slope: SlopeCase::CrownSlope,
                impact: ImpactDirection::NoImpact,
            },
            x: None,
            corner: None,
        };
        let fs_cracking = fs_cracking.unwrap_or(unbounded);
        let fs_rollover = fs_rollover.unwrap_or(unbounded);

        // compression allowables do not depend on the slope case
        let compression_ok = match slopes.first() {
            Some(first) => {
                extremes
                    .compression_global
                    .map_or(true, |s| s.stress >= first.allowables.compression_global)
                    && extremes
                        .compression_peak
                        .map_or(true, |s| s.stress >= first.allowables.compression_peak)
            }
            None => true,
        };

        HaulingResults {
            passes_cracking: fs_cracking.fs >= self.criteria.min_fs_cracking,
            passes_rollover: fs_rollover.fs >= self.criteria.min_fs_rollover,
            passes_tension: slopes.iter().all(|s| s.passes_tension),
            passes_compression: compression_ok,
            is_stable: self.cases.iter().all(|c| c.equilibrium.is_stable()),
            fs_cracking,
            fs_rollover,
            slopes,
            max_compression_global: extremes.compression_global,
            max_compression_peak: extremes.compression_peak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, plumb: CornerStresses, tilted: Option<CornerStresses>) -> PointResult {
        PointResult {
            x,
            mg: 0.0,
            ml: 0.0,
            fpe: 0.0,
            global: plumb,
            plumb,
            tilted,
            cracking: CrackingResult {
                corner: Corner::TopLeft,
                theta: None,
                fs: f64::MAX,
            },
        }
    }

    #[test]
    fn test_corner_extremes() {
        let stresses = CornerStresses {
            top_left: -3.0,
            top_right: 1.0,
            bottom_left: 2.0,
            bottom_right: -1.0,
        };
        assert_eq!(stresses.max(), (Corner::BottomLeft, 2.0));
        assert_eq!(stresses.min(), (Corner::TopLeft, -3.0));
    }

    #[test]
    fn test_equilibrium_state() {
        assert_eq!(RollEquilibrium::Stable { theta: 0.1 }.theta(), Some(0.1));
        assert!(!RollEquilibrium::Unstable.is_stable());
        let json = serde_json::to_string(&RollEquilibrium::Unstable).unwrap();
        assert!(json.contains("Unstable"));
    }

    #[test]
    fn test_extremes_include_tilted_stresses() {
        let plumb = CornerStresses {
            top_left: -1.0,
            top_right: -1.0,
            bottom_left: 0.5,
            bottom_right: 0.5,
        };
        let tilted = CornerStresses {
            bottom_right: 2.0,
            ..plumb
        };
        let mut extremes = Extremes::new();
        extremes.add(&[point(1.0, plumb, None), point(2.0, plumb, Some(tilted))], ());

        let tension = extremes.max_tension.unwrap();
        assert_eq!(tension.stress, 2.0);
        assert_eq!(tension.x, 2.0);
        assert_eq!(tension.corner, Corner::BottomRight);
    }
}
