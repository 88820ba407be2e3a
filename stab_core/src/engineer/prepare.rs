//! Solve preparation.
//!
//! Everything a check needs that depends only on the girder, the strands
//! and the stage parameters is built here into a fresh [`PreparedGirder`].
//! Nothing owned by the caller is modified.

use tracing::debug;

use crate::engineer::statics::{deflection_mesh, offset_factor, sort_and_dedup, DeflectionField, GirderStatics};
use crate::engineer::StabilityEngineer;
use crate::errors::{StabError, StabResult};
use crate::girder::{Face, Girder, SectionProperties, StressPoints};
use crate::materials::{resolve, ResolvedConcrete};
use crate::problem::StabilityParameters;
use crate::strands::{self, ResolvedStrands, StrandLayout};

/// Section data at one analysis point
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPoint {
    pub x: f64,
    pub props: SectionProperties,
    pub stress_points: StressPoints,
    /// Vertical moment from self-weight without impact (N·m)
    pub mg: f64,
    /// Lateral moment from wind (N·m)
    pub mw: f64,
}

/// Scratch data for one check
#[derive(Debug, Clone)]
pub struct PreparedGirder {
    pub length: f64,
    /// Support distances from the left and right ends (m)
    pub supports: (f64, f64),
    pub concrete: ResolvedConcrete,
    pub strands: ResolvedStrands,
    pub points: Vec<AnalysisPoint>,
    pub gravity: GirderStatics,
    /// Girder weight without impact (N)
    pub weight: f64,
    pub wind_pressure: f64,
    pub wind_force: f64,
    pub offset_factor: f64,
    /// Center of gravity elevation in section coordinates (m)
    pub ytop_cg: f64,
    /// Initial lateral eccentricity of the center of gravity (m)
    pub eccentricity: f64,
    /// Lateral deflection under self-weight applied laterally (m)
    pub zo: f64,
    /// Lateral deflection under wind, weighted by the weight distribution (m)
    pub zw: f64,
    /// Vertical camber including precamber (m)
    pub camber: f64,
}

impl PreparedGirder {
    pub fn analysis_positions(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }
}

/// Analysis point locations.
///
/// `segments + 1` evenly spaced points plus both supports. When `offset` is
/// given, a point is added just outside each support to capture the step in
/// the cable compression; offsets falling off the girder are skipped.
pub fn analysis_points(length: f64, a: f64, b: f64, segments: usize, offset: Option<f64>) -> Vec<f64> {
    let mut points: Vec<f64> = (0..=segments)
        .map(|i| length * i as f64 / segments as f64)
        .collect();
    points.push(a);
    points.push(length - b);
    if let Some(offset) = offset {
        for x in [a - offset, length - b + offset] {
            if (0.0..=length).contains(&x) {
                points.push(x);
            }
        }
    }
    sort_and_dedup(&mut points);
    points
}

/// Elevation of the center of gravity, weighted by the self-weight
/// distribution of each section and the additional point loads.
pub fn center_of_gravity_elevation(girder: &Girder, density: f64) -> f64 {
    let mut weight = 0.0;
    let mut moment = 0.0;
    for section in girder.sections() {
        let (w0, w1) = (section.start.area * density, section.end.area * density);
        let (y0, y1) = (section.start.ytop, section.end.ytop);
        let (dw, dy) = (w1 - w0, y1 - y0);
        // exact integral of a product of two linear functions
        moment += section.length * (w0 * y0 + (w0 * dy + y0 * dw) / 2.0 + dw * dy / 3.0);
        weight += section.length * (w0 + w1) / 2.0;
    }
    weight *= crate::units::GRAVITY;
    moment *= crate::units::GRAVITY;
    for load in girder.point_loads() {
        weight += load.p;
        moment += load.p * girder.section_properties(load.x, Face::Start).ytop;
    }
    if weight == 0.0 {
        girder.section_properties(0.0, Face::Start).ytop
    } else {
        moment / weight
    }
}

impl StabilityEngineer<'_> {
    /// Build the scratch data for supports at `a` and `b` from the ends.
    pub(crate) fn prepare(
        &self,
        layout: &StrandLayout,
        params: &StabilityParameters,
        (a, b): (f64, f64),
        lift_offset: Option<f64>,
    ) -> StabResult<PreparedGirder> {
        let girder = self.girder;
        let length = girder.girder_length();
        if !(length > 0.0) {
            return Err(StabError::invalid_input(
                "girder_length",
                length.to_string(),
                "Girder length must be positive",
            ));
        }

        let concrete = resolve(&params.concrete, &self.modulus_factors, self.settings.lrfd_edition)?;
        debug!(
            fc = concrete.fc,
            modulus = concrete.modulus,
            lambda = concrete.lambda,
            fr = concrete.fr,
            "Resolved concrete"
        );

        let strands = strands::resolve(layout, girder);
        let positions = analysis_points(length, a, b, self.settings.analysis_segments, lift_offset);
        if positions.is_empty() {
            return Err(StabError::invalid_input("analysis_points", "0", "No analysis points"));
        }
        debug!(count = positions.len(), length, "Prepared analysis points");

        let density = concrete.density_with_rebar;
        let gravity = GirderStatics::self_weight(girder, density, a, b);
        let wind_pressure = params.wind.wind_pressure(girder.drag_coefficient());
        let wind = GirderStatics::wind(girder, wind_pressure, a, b);

        let mesh = deflection_mesh(girder, &gravity, self.settings.deflection_segments);
        let zo = DeflectionField::lateral(girder, &gravity, concrete.modulus, &mesh).weighted_average(&gravity);
        let zw = if wind_pressure == 0.0 {
            0.0
        } else {
            DeflectionField::lateral(girder, &wind, concrete.modulus, &mesh).weighted_average(&gravity)
        };

        let fo = offset_factor(length, a, b);
        let eccentricity = (params.sweep_tolerance * length + params.sweep_growth) * fo
            + params.support_placement_tolerance
            + params.lateral_camber * fo;

        let mg = gravity.moments(&positions);
        let mw = wind.moments(&positions);
        let points = positions
            .iter()
            .zip(mg.iter().zip(&mw))
            .map(|(&x, (&mg, &mw))| AnalysisPoint {
                x,
                props: girder.section_properties(x, Face::Start),
                stress_points: girder.stress_points_for(x, Face::Start, self.stress_point_type),
                mg,
                mw,
            })
            .collect();

        let prepared = PreparedGirder {
            length,
            supports: (a, b),
            weight: gravity.total_load(),
            wind_force: wind.total_load(),
            ytop_cg: center_of_gravity_elevation(girder, density),
            camber: params.camber + girder.precamber(),
            concrete,
            strands,
            points,
            gravity,
            wind_pressure,
            offset_factor: fo,
            eccentricity,
            zo,
            zw,
        };
        debug!(
            weight = prepared.weight,
            zo = prepared.zo,
            zw = prepared.zw,
            ei = prepared.eccentricity,
            ytop_cg = prepared.ytop_cg,
            "Prepared girder"
        );
        Ok(prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Feet, Kcf, GRAVITY};
    use approx::assert_relative_eq;

    #[test]
    fn test_analysis_points_vertical_lift() {
        let points = analysis_points(100.0, 5.0, 5.0, 10, None);
        // 11 even points plus the two supports
        assert_eq!(points.len(), 13);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
        assert!(points.contains(&5.0));
        assert!(points.contains(&95.0));
    }

    #[test]
    fn test_analysis_points_with_offsets() {
        let offset = 0.001 * Feet(1.0).to_base();
        let points = analysis_points(100.0, 5.0, 5.0, 10, Some(offset));
        assert_eq!(points.len(), 15);
        assert!(points.iter().any(|x| (x - (5.0 - offset)).abs() < 1e-12));
        assert!(points.iter().any(|x| (x - (95.0 + offset)).abs() < 1e-12));
    }

    #[test]
    fn test_offsets_off_girder_skipped() {
        let points = analysis_points(100.0, 0.0, 0.0, 10, Some(0.01));
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], 0.0);
    }

    #[test]
    fn test_support_on_even_point_not_duplicated() {
        let points = analysis_points(100.0, 10.0, 10.0, 10, None);
        assert_eq!(points.len(), 11);
    }

    #[test]
    fn test_center_of_gravity_prismatic() {
        let girder = Girder::default();
        let props = SectionProperties::default();
        assert_relative_eq!(
            center_of_gravity_elevation(&girder, Kcf(0.165).to_base()),
            props.ytop,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_center_of_gravity_with_point_load() {
        let mut girder = Girder::default();
        let props = SectionProperties::default();
        let density = Kcf(0.165).to_base();
        let w = props.area * density * GRAVITY * girder.girder_length();
        girder.add_point_load(10.0, w);
        // point load acts at the centroid of a prismatic girder
        assert_relative_eq!(center_of_gravity_elevation(&girder, density), props.ytop, max_relative = 1e-12);
    }
}
