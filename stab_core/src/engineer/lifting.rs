//! Lifting check.
//!
//! The girder hangs from cables at two lift points a distance `a` from each
//! end. Each impact case is solved independently:
//!
//! 1. Roll equilibrium over `[0, π/2]`
//! 2. Stresses at every analysis point: plumb without lateral load, plumb
//!    with wind, and tilted at equilibrium
//! 3. Cracking: first roll angle at which a corner reaches the allowable
//!    tension, `FScr = Mr/Mo` at that angle
//! 4. Failure: tilt `θf = min(√(ei / 2.5·zo), 0.4)` with `zo' = zo(1 + 2.5·θf)`,
//!    `FSf = max(Mr/Mo', FScr)`

use std::f64::consts::FRAC_PI_2;

use tracing::{debug, warn};

use crate::artifact::{LiftingCaseResult, LiftingCheckArtifact, RollEquilibrium};
use crate::criteria::LiftingCriteria;
use crate::engineer::stress::SectionForces;
use crate::engineer::{evaluate_point, governing_cracking, moment_ratio, PointLoading, StabilityEngineer};
use crate::errors::StabResult;
use crate::problem::LiftingProblem;
use crate::strands::{StrandGroup, StrandLayout};
use crate::units::in_range;

/// Upper bound on the failure tilt angle (rad)
const MAX_FAILURE_TILT: f64 = 0.4;

/// Lifting moments for one impact case
#[derive(Debug, Clone, Copy)]
struct LiftingMoments {
    weight: f64,
    eccentricity: f64,
    zo: f64,
    zw: f64,
    yr: f64,
    wind_force: f64,
}

impl LiftingMoments {
    fn resisting(&self, theta: f64) -> f64 {
        self.weight * self.yr * theta.sin()
    }

    fn overturning(&self, theta: f64, zo: f64) -> f64 {
        let (sin, cos) = theta.sin_cos();
        self.weight * (self.eccentricity + self.zw) * cos + self.weight * zo * sin + self.wind_force * self.yr * cos
    }

    fn fs(&self, theta: f64) -> f64 {
        moment_ratio(self.resisting(theta), self.overturning(theta, self.zo))
    }

    fn scale(&self) -> f64 {
        self.weight * (self.yr.abs() + self.eccentricity.abs() + self.zo.abs() + self.zw.abs())
            + self.wind_force * self.yr.abs()
    }
}

impl StabilityEngineer<'_> {
    /// Run the lifting check
    pub fn lifting(
        &self,
        layout: &StrandLayout,
        problem: &LiftingProblem,
        criteria: &LiftingCriteria,
    ) -> StabResult<LiftingCheckArtifact> {
        let length = self.girder.girder_length();
        self.girder.validate()?;
        self.settings.validate()?;
        problem.validate(length)?;
        criteria.validate()?;

        let supports = problem.support_locations();
        let inclined = problem.has_inclined_cables();
        let offset = inclined.then_some(self.settings.lift_point_offset);
        let prepared = self.prepare(layout, &problem.params, supports, offset)?;
        let allowables = criteria.allowables(&prepared.concrete);
        let search = self.search();

        let yra = problem.yra;
        let yr = (yra - prepared.ytop_cg) - prepared.camber * prepared.offset_factor;
        let cable_compression = if inclined {
            prepared.weight / (2.0 * problem.lift_angle.tan())
        } else {
            0.0
        };

        let mut cases = Vec::new();
        for (impact, factor) in problem.params.impact.cases() {
            let moments = LiftingMoments {
                weight: factor * prepared.weight,
                eccentricity: prepared.eccentricity,
                zo: factor * prepared.zo,
                zw: prepared.zw,
                yr,
                wind_force: prepared.wind_force,
            };

            let equilibrium = match search.first_crossing(FRAC_PI_2, moments.scale(), |t| {
                moments.resisting(t) - moments.overturning(t, moments.zo)
            }) {
                Some(theta) => RollEquilibrium::Stable { theta },
                None => {
                    warn!(impact = impact.display_name(), "Lifted girder is unstable");
                    RollEquilibrium::Unstable
                }
            };

            let h = factor * cable_compression;
            let (a, b) = supports;
            let points = prepared
                .points
                .iter()
                .map(|point| {
                    let sample = prepared.strands.at(point.x);
                    let mut fixed = SectionForces::prestress(&sample, &point.props);
                    if h != 0.0 && in_range(a, point.x, length - b) {
                        fixed = fixed.plus(SectionForces::cable_compression(h, yra, &point.props));
                    }
                    let loading = PointLoading {
                        fixed,
                        mg: factor * point.mg,
                        ml: point.mw,
                        fpe: StrandGroup::ALL.iter().map(|g| sample.group(*g).fpe).sum(),
                    };
                    evaluate_point(&search, point, &loading, equilibrium.theta(), allowables.tension, |t| {
                        moments.fs(t)
                    })
                })
                .collect::<Vec<_>>();

            let (fs_cracking, cracking_x, cracking_corner) = governing_cracking(&points);

            let theta_failure = if moments.zo > 0.0 {
                (moments.eccentricity / (2.5 * moments.zo)).sqrt().min(MAX_FAILURE_TILT).max(1.0e-6)
            } else {
                MAX_FAILURE_TILT
            };
            let zo_failure = moments.zo * (1.0 + 2.5 * theta_failure);
            let fs_failure = moment_ratio(
                moments.resisting(theta_failure),
                moments.overturning(theta_failure, zo_failure),
            )
            .max(fs_cracking);

            debug!(
                impact = impact.display_name(),
                theta = ?equilibrium.theta(),
                fs_cracking,
                fs_failure,
                "Lifting case solved"
            );

            cases.push(LiftingCaseResult {
                impact,
                impact_factor: factor,
                weight: moments.weight,
                zo: moments.zo,
                zw: moments.zw,
                yr,
                equilibrium,
                fs_cracking,
                cracking_x,
                cracking_corner,
                theta_failure,
                fs_failure,
                points,
            });
        }

        Ok(LiftingCheckArtifact {
            girder_length: length,
            lift_point: problem.lift_point,
            analysis_points: prepared.analysis_positions(),
            concrete: prepared.concrete.clone(),
            criteria: criteria.clone(),
            allowables,
            weight: prepared.weight,
            wind_pressure: prepared.wind_pressure,
            wind_force: prepared.wind_force,
            offset_factor: prepared.offset_factor,
            ytop_cg: prepared.ytop_cg,
            yra,
            eccentricity: prepared.eccentricity,
            cable_compression,
            cases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::girder::{Face, Girder, StressPointType};
    use crate::materials::ModulusFactors;
    use crate::settings::AnalysisSettings;
    use crate::units::{Feet, Inches, Kips, SqrtKsi};
    use approx::assert_relative_eq;

    fn straight_strands() -> StrandLayout {
        StrandLayout {
            fpe_straight: Kips(400.0).to_base(),
            ys: Inches(10.0).to_base(),
            fpe_harped: 0.0,
            fpe_temp: 0.0,
            ..Default::default()
        }
    }

    fn run(problem: &LiftingProblem) -> LiftingCheckArtifact {
        let girder = Girder::default();
        let settings = AnalysisSettings::default();
        let engineer = StabilityEngineer::new(&girder, StressPointType::Computed, ModulusFactors::default(), &settings);
        engineer
            .lifting(&straight_strands(), problem, &LiftingCriteria::default())
            .unwrap()
    }

    #[test]
    fn test_default_problem_is_stable() {
        let artifact = run(&LiftingProblem::default());
        assert_eq!(artifact.cases.len(), 1);
        let case = &artifact.cases[0];
        let theta = case.equilibrium.theta().unwrap();
        assert!(theta > 0.0 && theta < 0.1);
        assert!(case.fs_failure >= case.fs_cracking);
        assert!(case.points.iter().all(|p| p.tilted.is_some()));
    }

    #[test]
    fn test_impact_cases_reported() {
        let mut problem = LiftingProblem::default();
        problem.params.set_impact(0.1, 0.2);
        let artifact = run(&problem);
        assert_eq!(artifact.cases.len(), 3);
        assert_relative_eq!(artifact.cases[2].weight, 1.2 * artifact.weight, max_relative = 1e-12);
        assert_relative_eq!(artifact.cases[2].zo, 1.2 * artifact.cases[0].zo, max_relative = 1e-12);
    }

    #[test]
    fn test_roll_axis_below_center_of_gravity_is_unstable() {
        let mut problem = LiftingProblem::default();
        // roll axis well below the center of gravity
        problem.set_yra(-Inches(60.0).to_base());
        let artifact = run(&problem);
        let case = &artifact.cases[0];
        assert!(case.yr < 0.0);
        assert_eq!(case.equilibrium, RollEquilibrium::Unstable);
        assert!(case.points.iter().all(|p| p.tilted.is_none()));
        assert!(!artifact.results().is_stable);
    }

    #[test]
    fn test_inclined_cables_add_offset_points() {
        let mut problem = LiftingProblem::default();
        problem.set_lift_angle(std::f64::consts::FRAC_PI_4);
        let artifact = run(&problem);
        let vertical = run(&LiftingProblem::default());
        assert_eq!(artifact.analysis_points.len(), vertical.analysis_points.len() + 2);
        assert_relative_eq!(artifact.cable_compression, artifact.weight / 2.0, max_relative = 1e-9);

        // compression only acts between the lift points
        let a = problem.lift_point;
        let outside = artifact.cases[0]
            .points
            .iter()
            .find(|p| p.x < a)
            .map(|p| p.global.top_left);
        let vertical_outside = vertical.cases[0].points.iter().find(|p| p.x < a).map(|p| p.global.top_left);
        assert_eq!(outside, vertical_outside);
    }

    #[test]
    fn test_prismatic_lift_matches_closed_form() {
        let girder = Girder::default();
        let props = girder.section_properties(0.0, Face::Start);
        let settings = AnalysisSettings::default();
        let engineer = StabilityEngineer::new(&girder, StressPointType::Computed, ModulusFactors::default(), &settings);

        let mut problem = LiftingProblem::default();
        problem.params.set_sweep_tolerance(0.0);
        problem.params.set_support_placement_tolerance(0.0);
        let strands = StrandLayout {
            fpe_straight: Kips(300.0).to_base(),
            ..straight_strands()
        };
        let artifact = engineer
            .lifting(&strands, &problem, &LiftingCriteria::default())
            .unwrap();

        let length = artifact.girder_length;
        let a = problem.lift_point;
        let l1 = length - 2.0 * a;
        let w = artifact.weight / length;
        let modulus = artifact.concrete.modulus;
        let zo = w / (12.0 * modulus * props.iyy * length)
            * (l1.powi(5) / 10.0 - a * a * l1.powi(3) + 3.0 * a.powi(4) * l1 + 6.0 * a.powi(5) / 5.0);

        // no initial eccentricity, so the girder hangs plumb
        let case = &artifact.cases[0];
        assert_eq!(case.equilibrium, RollEquilibrium::Stable { theta: 0.0 });
        assert_relative_eq!(case.zo, zo, max_relative = 1e-3);
        assert_relative_eq!(case.yr, -props.ytop, max_relative = 1e-12);
        assert_relative_eq!(case.fs_cracking, case.yr / case.zo, max_relative = 1e-9);
        assert!(case.cracking_x.is_some());

        let mid = case
            .points
            .iter()
            .find(|p| (p.x - length / 2.0).abs() < 1e-9)
            .unwrap();
        assert_relative_eq!(mid.mg, w * l1 * l1 / 8.0 - w * a * a / 2.0, max_relative = 1e-9);

        let force = strands.fpe_straight;
        let e = props.ytop - (strands.ys - props.hg);
        let top = -force / props.area + (force * e - mid.mg) * (-props.ytop) / props.ixx;
        assert_relative_eq!(mid.fpe, force, max_relative = 1e-12);
        assert_relative_eq!(mid.global.top_left, top, max_relative = 1e-9);
        assert_relative_eq!(mid.global.top_right, top, max_relative = 1e-9);
        assert_eq!(mid.tilted, Some(mid.plumb));
    }

    #[test]
    fn test_higher_allowable_tension_never_lowers_fs_cracking() {
        let girder = Girder::default();
        let settings = AnalysisSettings::default();
        let engineer = StabilityEngineer::new(&girder, StressPointType::Computed, ModulusFactors::default(), &settings);
        let problem = LiftingProblem::default();

        let mut previous = 0.0;
        for coefficient in [0.0948, 0.19, 0.24, 0.5] {
            let mut criteria = LiftingCriteria::default();
            criteria.tension.coefficient = SqrtKsi(coefficient).to_base();
            criteria.tension.has_max = false;
            let fs = engineer
                .lifting(&straight_strands(), &problem, &criteria)
                .unwrap()
                .cases[0]
                .fs_cracking;
            assert!(fs >= previous, "FScr dropped from {previous} to {fs}");
            previous = fs;
        }
    }

    #[test]
    fn test_lift_point_outside_girder_rejected() {
        let girder = Girder::default();
        let settings = AnalysisSettings::default();
        let engineer = StabilityEngineer::new(&girder, StressPointType::Computed, ModulusFactors::default(), &settings);
        let mut problem = LiftingProblem::default();
        problem.set_lift_point(Feet(60.0).to_base());
        assert!(engineer
            .lifting(&straight_strands(), &problem, &LiftingCriteria::default())
            .is_err());
    }
}
