//! # Stability Engineer
//!
//! The numerical core. Given a girder, a strand layout, a lifting or hauling
//! problem and its criteria, the engineer finds the equilibrium roll angle,
//! evaluates stresses at every analysis point and computes factors of safety
//! against cracking and failure.
//!
//! Every call solves from scratch. Derived material properties, strand
//! samples and analysis points are rebuilt into a private
//! [`prepare::PreparedGirder`]; inputs are borrowed immutably.
//!
//! ## Roll Equilibrium
//!
//! ```text
//!   lifting:  Mr(θ) = W·yr·sinθ
//!             Mo(θ) = W·(ei + zw)·cosθ + W·zo·sinθ + Fw·yr·cosθ
//!
//!   hauling:  Mr(θ) = Kθ·(θ − α)
//!             Mo(θ) = W·(ei + zw)·cosθ + W·(zo + hr)·sinθ + (Fw + Fcf)·hr·cosθ
//! ```
//!
//! The equilibrium angle is the smallest θ ≥ 0 with `Mr(θ) >= Mo(θ)`. When
//! no such angle exists in the physical range the case is reported as
//! [`RollEquilibrium::Unstable`](crate::artifact::RollEquilibrium).
//!
//! ## Example
//!
//! ```rust
//! use stab_core::criteria::LiftingCriteria;
//! use stab_core::engineer::StabilityEngineer;
//! use stab_core::girder::{Girder, StressPointType};
//! use stab_core::materials::ModulusFactors;
//! use stab_core::problem::LiftingProblem;
//! use stab_core::settings::AnalysisSettings;
//! use stab_core::strands::StrandLayout;
//!
//! let girder = Girder::default();
//! let settings = AnalysisSettings::default();
//! let engineer = StabilityEngineer::new(&girder, StressPointType::Computed, ModulusFactors::default(), &settings);
//!
//! let artifact = engineer
//!     .lifting(&StrandLayout::default(), &LiftingProblem::default(), &LiftingCriteria::default())
//!     .unwrap();
//! let results = artifact.results();
//! assert!(results.fs_cracking.fs >= 0.0);
//! ```

pub mod hauling;
pub mod lifting;
pub mod prepare;
pub mod roll;
pub mod statics;
pub mod stress;

use std::f64::consts::FRAC_PI_2;

use crate::artifact::{Corner, CornerStresses, CrackingResult, PointResult};
use crate::girder::{Girder, StressPointType};
use crate::materials::ModulusFactors;
use crate::settings::AnalysisSettings;

use prepare::AnalysisPoint;
use roll::AngleSearch;
use stress::{corner_point, corner_stresses, RollingStress, SectionForces};

/// Solver bound to one girder and one set of analysis settings
#[derive(Debug, Clone, Copy)]
pub struct StabilityEngineer<'a> {
    girder: &'a Girder,
    stress_point_type: StressPointType,
    modulus_factors: ModulusFactors,
    settings: &'a AnalysisSettings,
}

impl<'a> StabilityEngineer<'a> {
    pub fn new(
        girder: &'a Girder,
        stress_point_type: StressPointType,
        modulus_factors: ModulusFactors,
        settings: &'a AnalysisSettings,
    ) -> Self {
        StabilityEngineer {
            girder,
            stress_point_type,
            modulus_factors,
            settings,
        }
    }

    pub fn girder(&self) -> &Girder {
        self.girder
    }

    fn search(&self) -> AngleSearch {
        AngleSearch::from(self.settings)
    }
}

/// Factor of safety `Mr/Mo`, clamped to zero; a non-positive demand never fails
pub(crate) fn moment_ratio(mr: f64, mo: f64) -> f64 {
    if mo <= 0.0 {
        f64::MAX
    } else {
        (mr / mo).max(0.0)
    }
}

/// Loads acting on one analysis point for one case
pub(crate) struct PointLoading {
    /// Prestress and any cable compression (N, N·m)
    pub fixed: SectionForces,
    /// Vertical moment including impact (N·m)
    pub mg: f64,
    /// Lateral moment (N·m)
    pub ml: f64,
    pub fpe: f64,
}

/// Stresses and cracking at one analysis point.
///
/// `allowable_tension` is the cracking threshold; `fs_at` gives the factor
/// of safety for a cracking angle.
pub(crate) fn evaluate_point<F>(
    search: &AngleSearch,
    point: &AnalysisPoint,
    loading: &PointLoading,
    theta_eq: Option<f64>,
    allowable_tension: f64,
    fs_at: F,
) -> PointResult
where
    F: Fn(f64) -> f64,
{
    let props = &point.props;
    let stresses = |ml: f64, theta: f64| -> CornerStresses {
        let forces = loading.fixed.plus(SectionForces::rolled(loading.mg, ml, theta));
        corner_stresses(&forces, props, &point.stress_points)
    };

    let mut cracking = CrackingResult {
        corner: Corner::TopLeft,
        theta: None,
        fs: f64::MAX,
    };
    let mut first = true;
    for corner in Corner::ALL {
        let location = corner_point(&point.stress_points, corner);
        let rolling = RollingStress::new(&loading.fixed, loading.mg, loading.ml, props, location);
        let scale = rolling.fixed.abs()
            + (rolling.a.abs() + rolling.b.abs()) * (loading.mg.abs() + loading.ml.abs())
            + allowable_tension.abs();
        let theta = search.first_crossing(FRAC_PI_2, scale, |t| rolling.at(t) - allowable_tension);
        let fs = match theta {
            None => f64::MAX,
            Some(t) if t == 0.0 => 0.0,
            Some(t) => fs_at(t),
        };
        if first || fs < cracking.fs {
            cracking = CrackingResult { corner, theta, fs };
            first = false;
        }
    }

    PointResult {
        x: point.x,
        mg: loading.mg,
        ml: loading.ml,
        fpe: loading.fpe,
        global: stresses(0.0, 0.0),
        plumb: stresses(loading.ml, 0.0),
        tilted: theta_eq.map(|theta| stresses(loading.ml, theta)),
        cracking,
    }
}

/// Governing cracking result over all points: `(fs, x, corner)`
pub(crate) fn governing_cracking(points: &[PointResult]) -> (f64, Option<f64>, Option<Corner>) {
    points.iter().fold((f64::MAX, None, None), |best, point| {
        if best.1.is_none() || point.cracking.fs < best.0 {
            (point.cracking.fs, Some(point.x), Some(point.cracking.corner))
        } else {
            best
        }
    })
}
