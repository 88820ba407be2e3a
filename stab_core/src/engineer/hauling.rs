//! Hauling check.
//!
//! The girder rests on truck bunks and rolls about an axis at the height of
//! the truck roll center. The trailer resists roll through a rotational
//! spring `Kθ`. Two roadway cases are evaluated:
//!
//! - **Crown slope**: normal crown, no centrifugal force, tension limited by
//!   the crown slope criteria
//! - **Maximum superelevation**: superelevated roadway with centrifugal
//!   force, tension limited by the modulus of rupture
//!
//! Impact is applied only to the slope cases selected by
//! [`ImpactUsage`](crate::problem::ImpactUsage).
//!
//! ## Rollover
//!
//! ```text
//! r    = Kθ / W
//! θmax = (zmax − Hrc·α)/r + α          zmax = wheel line spacing / 2
//! FSr  = Mr(θmax) / Mo'(θmax)          zo' = zo·(1 + 2.5·θmax)
//! ```

use std::f64::consts::FRAC_PI_2;

use tracing::{debug, warn};

use crate::artifact::{HaulingCase, HaulingCaseResult, HaulingCheckArtifact, RollEquilibrium};
use crate::criteria::HaulingCriteria;
use crate::engineer::stress::SectionForces;
use crate::engineer::{evaluate_point, governing_cracking, moment_ratio, PointLoading, StabilityEngineer};
use crate::errors::StabResult;
use crate::girder::Face;
use crate::problem::{HaulingProblem, ImpactDirection, SlopeCase};
use crate::strands::{StrandGroup, StrandLayout};

/// Hauling moments for one slope and impact case
#[derive(Debug, Clone, Copy)]
struct HaulingMoments {
    weight: f64,
    stiffness: f64,
    alpha: f64,
    eccentricity: f64,
    zo: f64,
    zw: f64,
    hr: f64,
    lateral_force: f64,
}

impl HaulingMoments {
    fn resisting(&self, theta: f64) -> f64 {
        self.stiffness * (theta - self.alpha)
    }

    fn overturning(&self, theta: f64, zo: f64) -> f64 {
        let (sin, cos) = theta.sin_cos();
        self.weight * (self.eccentricity + self.zw) * cos
            + self.weight * (zo + self.hr) * sin
            + self.lateral_force * self.hr * cos
    }

    fn fs(&self, theta: f64) -> f64 {
        moment_ratio(self.resisting(theta), self.overturning(theta, self.zo))
    }

    fn scale(&self, theta_max: f64) -> f64 {
        self.stiffness * (theta_max.abs() + self.alpha.abs())
            + self.weight * (self.eccentricity.abs() + self.zw.abs() + self.zo.abs() + self.hr.abs())
            + self.lateral_force.abs() * self.hr.abs()
    }
}

impl StabilityEngineer<'_> {
    /// Run the hauling check
    pub fn hauling(
        &self,
        layout: &StrandLayout,
        problem: &HaulingProblem,
        criteria: &HaulingCriteria,
    ) -> StabResult<HaulingCheckArtifact> {
        let length = self.girder.girder_length();
        self.girder.validate()?;
        self.settings.validate()?;
        problem.validate(length)?;
        criteria.validate()?;

        let supports = problem.support_locations();
        let prepared = self.prepare(layout, &problem.params, supports, None)?;
        let search = self.search();

        let hg = self.girder.section_properties(0.0, Face::Start).hg;
        let yra = -(hg + problem.height_of_girder_bottom) + problem.height_of_roll_axis;
        debug_assert!(yra < 0.0, "roll axis must be below the top of the girder");

        let hr = prepared.ytop_cg - yra + prepared.camber * prepared.offset_factor;
        let zmax = problem.wheel_line_spacing / 2.0;
        let cf_coefficient = problem.centrifugal_coefficient();

        let mut cases = Vec::new();
        for slope in SlopeCase::ALL {
            let alpha = problem.slope(slope).atan();
            let allowables = criteria.allowables(slope, &prepared.concrete);
            let cf_coefficient = match slope {
                SlopeCase::CrownSlope => 0.0,
                SlopeCase::MaxSuper => cf_coefficient,
            };
            let centrifugal_force = cf_coefficient * prepared.weight;

            let impact_cases = if problem.applies_impact(slope) {
                problem.params.impact.cases()
            } else {
                vec![(ImpactDirection::NoImpact, 1.0)]
            };

            for (impact, factor) in impact_cases {
                let case = HaulingCase { slope, impact };
                let moments = HaulingMoments {
                    weight: factor * prepared.weight,
                    stiffness: problem.truck_rotational_stiffness,
                    alpha,
                    eccentricity: prepared.eccentricity,
                    zo: factor * prepared.zo,
                    zw: prepared.zw,
                    hr,
                    lateral_force: prepared.wind_force + centrifugal_force,
                };

                let r = moments.stiffness / moments.weight;
                let theta_max = (zmax - problem.height_of_roll_axis * alpha) / r + alpha;

                // the girder cannot roll past horizontal even on a very soft truck;
                // favorable centrifugal force can balance it at a negative angle
                let bound = theta_max.min(FRAC_PI_2);
                let equilibrium = match search.root_nearest_zero(bound, moments.scale(bound), |t| {
                    moments.resisting(t) - moments.overturning(t, moments.zo)
                }) {
                    Some(theta) => RollEquilibrium::Stable { theta },
                    None => {
                        warn!(
                            slope = slope.display_name(),
                            impact = impact.display_name(),
                            "Hauled girder rolls over"
                        );
                        RollEquilibrium::Unstable
                    }
                };

                let points = prepared
                    .points
                    .iter()
                    .map(|point| {
                        let sample = prepared.strands.at(point.x);
                        let loading = PointLoading {
                            fixed: SectionForces::prestress(&sample, &point.props),
                            mg: factor * point.mg,
                            ml: point.mw + cf_coefficient * point.mg,
                            fpe: StrandGroup::ALL.iter().map(|g| sample.group(*g).fpe).sum(),
                        };
                        evaluate_point(&search, point, &loading, equilibrium.theta(), allowables.tension, |t| {
                            moments.fs(t)
                        })
                    })
                    .collect::<Vec<_>>();

                let (fs_cracking, cracking_x, cracking_corner) = governing_cracking(&points);

                let zo_rollover = moments.zo * (1.0 + 2.5 * theta_max);
                let fs_rollover = moment_ratio(
                    moments.resisting(theta_max),
                    moments.overturning(theta_max, zo_rollover),
                );

                debug!(
                    slope = slope.display_name(),
                    impact = impact.display_name(),
                    theta = ?equilibrium.theta(),
                    theta_max,
                    fs_cracking,
                    fs_rollover,
                    "Hauling case solved"
                );

                cases.push(HaulingCaseResult {
                    case,
                    impact_factor: factor,
                    weight: moments.weight,
                    zo: moments.zo,
                    zw: moments.zw,
                    hr,
                    alpha,
                    centrifugal_force,
                    theta_max,
                    allowables,
                    equilibrium,
                    fs_cracking,
                    cracking_x,
                    cracking_corner,
                    fs_rollover,
                    points,
                });
            }
        }

        Ok(HaulingCheckArtifact {
            girder_length: length,
            bunks: supports,
            analysis_points: prepared.analysis_positions(),
            concrete: prepared.concrete.clone(),
            criteria: criteria.clone(),
            weight: prepared.weight,
            wind_pressure: prepared.wind_pressure,
            wind_force: prepared.wind_force,
            offset_factor: prepared.offset_factor,
            ytop_cg: prepared.ytop_cg,
            yra,
            eccentricity: prepared.eccentricity,
            zmax,
            cases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::girder::{Girder, StressPointType};
    use crate::materials::ModulusFactors;
    use crate::problem::{CentrifugalForceType, ImpactUsage};
    use crate::settings::AnalysisSettings;
    use crate::units::{Feet, Inches, Mph};
    use approx::assert_relative_eq;

    fn run(problem: &HaulingProblem) -> HaulingCheckArtifact {
        let girder = Girder::default();
        let settings = AnalysisSettings::default();
        let engineer = StabilityEngineer::new(&girder, StressPointType::Computed, ModulusFactors::default(), &settings);
        engineer
            .hauling(&StrandLayout::default(), problem, &HaulingCriteria::default())
            .unwrap()
    }

    /// Mr - Mo for a case at angle `theta`, rebuilt from the artifact
    fn moment_balance(problem: &HaulingProblem, artifact: &HaulingCheckArtifact, case: &HaulingCaseResult, theta: f64) -> f64 {
        let resisting = problem.truck_rotational_stiffness * (theta - case.alpha);
        let overturning = case.weight * (artifact.eccentricity + case.zw) * theta.cos()
            + case.weight * (case.zo + case.hr) * theta.sin()
            + (artifact.wind_force + case.centrifugal_force) * case.hr * theta.cos();
        resisting - overturning
    }

    #[test]
    fn test_both_slope_cases_evaluated() {
        let artifact = run(&HaulingProblem::default());
        assert_eq!(artifact.cases.len(), 2);
        assert_eq!(artifact.cases[0].case.slope, SlopeCase::CrownSlope);
        assert_eq!(artifact.cases[1].case.slope, SlopeCase::MaxSuper);
        assert!(artifact.yra < 0.0);
        for case in &artifact.cases {
            assert!(case.theta_max > case.alpha);
            assert!(case.fs_rollover > 0.0);
        }
    }

    #[test]
    fn test_impact_usage_limits_cases() {
        let mut problem = HaulingProblem::default();
        problem.params.set_impact(0.2, 0.2);
        let artifact = run(&problem);
        // crown slope gets three impact cases, max super only the static case
        assert_eq!(artifact.cases.len(), 4);

        problem.set_impact_usage(ImpactUsage::Both);
        assert_eq!(run(&problem).cases.len(), 6);
    }

    #[test]
    fn test_centrifugal_force_only_in_max_super() {
        let mut problem = HaulingProblem::default();
        problem.set_velocity(Mph(30.0).to_base());
        problem.set_turning_radius(Feet(200.0).to_base());
        let artifact = run(&problem);

        let crown = &artifact.cases[0];
        let superelevated = &artifact.cases[1];
        assert_eq!(crown.centrifugal_force, 0.0);
        assert_relative_eq!(
            superelevated.centrifugal_force,
            problem.centrifugal_coefficient() * artifact.weight,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_max_super_cracking_uses_rupture() {
        let artifact = run(&HaulingProblem::default());
        assert_relative_eq!(artifact.cases[1].allowables.tension, artifact.concrete.fr);
    }

    #[test]
    fn test_level_road_has_no_slope_or_centrifugal_force() {
        let mut problem = HaulingProblem::default();
        problem.set_crown_slope(0.0);
        problem.set_superelevation(0.0);
        problem.set_velocity(0.0);
        let artifact = run(&problem);

        assert_eq!(artifact.cases.len(), 2);
        for case in &artifact.cases {
            assert_eq!(case.alpha, 0.0);
            assert_eq!(case.centrifugal_force, 0.0);
        }
        // only the tension limit differs between the two slope cases
        assert_eq!(artifact.cases[0].equilibrium, artifact.cases[1].equilibrium);
        assert_relative_eq!(artifact.cases[0].fs_rollover, artifact.cases[1].fs_rollover);
    }

    #[test]
    fn test_soft_truck_rolls_over() {
        let mut problem = HaulingProblem::default();
        problem.set_truck_rotational_stiffness(1.0);
        let artifact = run(&problem);
        assert!(artifact.cases.iter().all(|c| c.equilibrium == RollEquilibrium::Unstable));
    }

    #[test]
    fn test_favorable_centrifugal_force_balances_at_negative_angle() {
        let mut problem = HaulingProblem::default();
        problem.set_velocity(Mph(45.0).to_base());
        problem.set_turning_radius(Feet(150.0).to_base());
        problem.set_wheel_line_spacing(Inches(144.0).to_base());
        problem.set_centrifugal_force_type(CentrifugalForceType::Favorable);
        let artifact = run(&problem);

        let superelevated = &artifact.cases[1];
        assert!(superelevated.centrifugal_force < 0.0);
        // the lateral force pushes the girder uphill harder than gravity rolls it down
        assert!(moment_balance(&problem, &artifact, superelevated, 0.0) > 0.0);

        let theta = match superelevated.equilibrium {
            RollEquilibrium::Stable { theta } => theta,
            RollEquilibrium::Unstable => panic!("expected a stable equilibrium"),
        };
        assert!(theta < 0.0);
        let tolerance = 1e-6 * problem.truck_rotational_stiffness;
        assert!(moment_balance(&problem, &artifact, superelevated, theta).abs() < tolerance);
    }

    #[test]
    fn test_equilibrium_balances_moments_in_every_case() {
        for cf_type in [CentrifugalForceType::Adverse, CentrifugalForceType::Favorable] {
            let mut problem = HaulingProblem::default();
            problem.params.set_impact(0.2, 0.2);
            problem.set_impact_usage(ImpactUsage::Both);
            problem.set_velocity(Mph(45.0).to_base());
            problem.set_turning_radius(Feet(150.0).to_base());
            problem.set_wheel_line_spacing(Inches(144.0).to_base());
            problem.set_centrifugal_force_type(cf_type);
            let artifact = run(&problem);
            assert_eq!(artifact.cases.len(), 6);

            let tolerance = 1e-6 * problem.truck_rotational_stiffness;
            for case in &artifact.cases {
                let theta = match case.equilibrium {
                    RollEquilibrium::Stable { theta } => theta,
                    RollEquilibrium::Unstable => continue,
                };
                assert!(theta.abs() <= case.theta_max.min(FRAC_PI_2));
                assert!(
                    moment_balance(&problem, &artifact, case, theta).abs() < tolerance,
                    "{:?} {:?}",
                    cf_type,
                    case.case
                );
            }
        }
    }
}
