//! # Girder Section Model
//!
//! A girder is an ordered sequence of sections. Each section has a length
//! and a full set of section properties at its start and end faces;
//! properties vary linearly between the two faces.
//!
//! ## Coordinate System
//!
//! Section coordinates have their origin at the top-left corner of the
//! bounding box of the cross section. X is positive to the right and Y is
//! positive up, so every point of the section has `Y <= 0`.
//!
//! - `xleft` is the X coordinate of the centroid (distance from the left edge)
//! - `ytop` is the Y coordinate of the centroid (negative, measured down from the top)
//!
//! Explicit stress points are given in the same coordinate system.
//!
//! ## Example
//!
//! ```rust
//! use stab_core::girder::{Face, Girder, SectionProperties};
//!
//! let props = SectionProperties::default();
//! let mut girder = Girder::new();
//! girder.add_section(30.48, props, props);
//!
//! assert!((girder.girder_length() - 30.48).abs() < 1e-12);
//! let mid = girder.section_properties(15.24, Face::Start);
//! assert_eq!(mid.area, props.area);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{StabError, StabResult};
use crate::units::{assign_if_changed, assign_value, is_equal, In2, In4, Inches};

/// Which girder definition is active in a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum GirderType {
    /// Single section, constant properties along the girder
    #[default]
    Prismatic,
    /// Any number of sections with linearly varying properties
    NonPrismatic,
}

impl GirderType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            GirderType::Prismatic => "Prismatic",
            GirderType::NonPrismatic => "Non-prismatic",
        }
    }
}

/// How stress points at each section are determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StressPointType {
    /// Corners computed from height and flange widths
    #[default]
    Computed,
    /// Corners given explicitly at each section face
    Defined,
}

/// Selects the face of a section when a position falls on a section boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Start,
    End,
}

/// A point in section coordinates (m)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
        Point2 {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
        }
    }
}

/// The four stress evaluation points of a cross section
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StressPoints {
    pub top_left: Point2,
    pub top_right: Point2,
    pub bottom_left: Point2,
    pub bottom_right: Point2,
}

impl StressPoints {
    /// Corner points of the idealized section outline.
    ///
    /// The flanges are centered on the wider of the two flanges.
    pub fn computed(props: &SectionProperties) -> Self {
        let center = props.wtf.max(props.wbf) / 2.0;
        StressPoints {
            top_left: Point2::new(center - props.wtf / 2.0, 0.0),
            top_right: Point2::new(center + props.wtf / 2.0, 0.0),
            bottom_left: Point2::new(center - props.wbf / 2.0, -props.hg),
            bottom_right: Point2::new(center + props.wbf / 2.0, -props.hg),
        }
    }

    fn lerp(a: &StressPoints, b: &StressPoints, t: f64) -> StressPoints {
        StressPoints {
            top_left: Point2::lerp(a.top_left, b.top_left, t),
            top_right: Point2::lerp(a.top_right, b.top_right, t),
            bottom_left: Point2::lerp(a.bottom_left, b.bottom_left, t),
            bottom_right: Point2::lerp(a.bottom_right, b.bottom_right, t),
        }
    }
}

/// Cross section properties at one face (SI units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Gross area (m²)
    pub area: f64,
    /// Moment of inertia about the horizontal centroidal axis (m⁴)
    pub ixx: f64,
    /// Moment of inertia about the vertical centroidal axis (m⁴)
    pub iyy: f64,
    /// Product of inertia (m⁴)
    pub ixy: f64,
    /// Centroid distance from the left edge (m)
    pub xleft: f64,
    /// Centroid elevation relative to the top of the section (m, negative)
    pub ytop: f64,
    /// Overall height (m)
    pub hg: f64,
    /// Top flange width (m)
    pub wtf: f64,
    /// Bottom flange width (m)
    pub wbf: f64,
}

impl Default for SectionProperties {
    /// 72 inch deep bulb tee
    fn default() -> Self {
        let wtf = Inches(42.0).to_base();
        SectionProperties {
            area: In2(767.0).to_base(),
            ixx: In4(545_894.0).to_base(),
            iyy: In4(37_634.0).to_base(),
            ixy: 0.0,
            xleft: wtf / 2.0,
            ytop: Inches(36.6 - 72.0).to_base(),
            hg: Inches(72.0).to_base(),
            wtf,
            wbf: Inches(26.0).to_base(),
        }
    }
}

impl SectionProperties {
    /// Linear interpolation between two faces, exact at `t = 0` and `t = 1`
    pub fn lerp(a: &SectionProperties, b: &SectionProperties, t: f64) -> SectionProperties {
        SectionProperties {
            area: lerp(a.area, b.area, t),
            ixx: lerp(a.ixx, b.ixx, t),
            iyy: lerp(a.iyy, b.iyy, t),
            ixy: lerp(a.ixy, b.ixy, t),
            xleft: lerp(a.xleft, b.xleft, t),
            ytop: lerp(a.ytop, b.ytop, t),
            hg: lerp(a.hg, b.hg, t),
            wtf: lerp(a.wtf, b.wtf, t),
            wbf: lerp(a.wbf, b.wbf, t),
        }
    }

    /// Determinant of the inertia tensor, `Ixx·Iyy − Ixy²`
    pub fn inertia_determinant(&self) -> f64 {
        self.ixx * self.iyy - self.ixy * self.ixy
    }

    /// Lateral moment of inertia reduced for an unsymmetric section
    pub fn effective_iyy(&self) -> f64 {
        self.iyy - self.ixy * self.ixy / self.ixx
    }

    /// Validate the face properties
    pub fn validate(&self, field: &str) -> StabResult<()> {
        let positive = [
            ("area", self.area),
            ("ixx", self.ixx),
            ("iyy", self.iyy),
            ("hg", self.hg),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(StabError::invalid_input(
                    format!("{}.{}", field, name),
                    value.to_string(),
                    "Section property must be positive",
                ));
            }
        }
        if self.wtf < 0.0 || self.wbf < 0.0 {
            return Err(StabError::invalid_input(
                format!("{}.flange_width", field),
                format!("{}/{}", self.wtf, self.wbf),
                "Flange widths cannot be negative",
            ));
        }
        if self.inertia_determinant() <= 0.0 {
            return Err(StabError::invalid_input(
                format!("{}.ixy", field),
                self.ixy.to_string(),
                "Ixx·Iyy − Ixy² must be positive",
            ));
        }
        Ok(())
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// One girder section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section length (m)
    pub length: f64,
    pub start: SectionProperties,
    pub end: SectionProperties,
    /// Stress points used when the model is in `StressPointType::Defined` mode
    pub start_stress_points: StressPoints,
    pub end_stress_points: StressPoints,
}

impl Section {
    fn face(&self, face: Face) -> &SectionProperties {
        match face {
            Face::Start => &self.start,
            Face::End => &self.end,
        }
    }

    fn face_stress_points(&self, face: Face) -> &StressPoints {
        match face {
            Face::Start => &self.start_stress_points,
            Face::End => &self.end_stress_points,
        }
    }
}

/// Concentrated load applied to the girder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Location measured from the left end (m)
    pub x: f64,
    /// Magnitude, positive downward (N)
    pub p: f64,
}

/// Girder geometry plus the auxiliary attributes consumed by the solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Girder {
    sections: Vec<Section>,
    point_loads: Vec<PointLoad>,
    drag_coefficient: f64,
    precamber: f64,
}

impl Default for Girder {
    /// 100 ft prismatic girder with the default section
    fn default() -> Self {
        let props = SectionProperties::default();
        let mut girder = Girder::new();
        girder.add_section(crate::units::Feet(100.0).to_base(), props, props);
        girder
    }
}

impl Girder {
    /// Default wind drag coefficient
    pub const DEFAULT_DRAG_COEFFICIENT: f64 = 2.2;

    /// Create a girder with no sections
    pub fn new() -> Self {
        Girder {
            sections: Vec::new(),
            point_loads: Vec::new(),
            drag_coefficient: Self::DEFAULT_DRAG_COEFFICIENT,
            precamber: 0.0,
        }
    }

    /// Append a section and return its index.
    ///
    /// Stress points for the new section are initialized from the face geometry.
    pub fn add_section(&mut self, length: f64, start: SectionProperties, end: SectionProperties) -> usize {
        debug_assert!(length > 0.0, "section length must be positive");
        self.sections.push(Section {
            length,
            start,
            end,
            start_stress_points: StressPoints::computed(&start),
            end_stress_points: StressPoints::computed(&end),
        });
        self.sections.len() - 1
    }

    /// Replace the explicit stress points of a section
    pub fn set_stress_points(&mut self, index: usize, start: StressPoints, end: StressPoints) -> bool {
        match self.sections.get_mut(index) {
            Some(section) => {
                let a = assign_value(&mut section.start_stress_points, start);
                let b = assign_value(&mut section.end_stress_points, end);
                a || b
            }
            None => false,
        }
    }

    pub fn clear_sections(&mut self) {
        self.sections.clear();
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Total length, the sum of all section lengths
    pub fn girder_length(&self) -> f64 {
        self.sections.iter().map(|s| s.length).sum()
    }

    /// Locate the section containing `x` and the interpolation parameter in it.
    ///
    /// Returns `Err(face)` with the section index when `x` falls exactly on a
    /// face, so callers can return stored values without interpolation.
    fn locate(&self, x: f64, face: Face) -> (usize, Result<f64, Face>) {
        debug_assert!(!self.sections.is_empty(), "girder has no sections");
        let length = self.girder_length();
        debug_assert!(
            -crate::units::TOLERANCE <= x && x <= length + crate::units::TOLERANCE,
            "position {} is outside the girder (0, {})",
            x,
            length
        );

        let last = self.sections.len().saturating_sub(1);
        let mut x_start = 0.0;
        for (index, section) in self.sections.iter().enumerate() {
            let x_end = x_start + section.length;
            if is_equal(x, x_start) {
                // on the left face; the preceding section owns it when End is requested
                if index > 0 && face == Face::End {
                    return (index - 1, Err(Face::End));
                }
                return (index, Err(Face::Start));
            }
            if is_equal(x, x_end) {
                if index < last && face == Face::Start {
                    return (index + 1, Err(Face::Start));
                }
                return (index, Err(Face::End));
            }
            if x < x_end {
                return (index, Ok((x - x_start) / section.length));
            }
            x_start = x_end;
        }
        (last, Err(Face::End))
    }

    /// Section properties at `x`, interpolated within the containing section.
    ///
    /// At a section boundary `face` selects the end face of the preceding
    /// section or the start face of the following one.
    pub fn section_properties(&self, x: f64, face: Face) -> SectionProperties {
        let (index, location) = self.locate(x, face);
        let section = &self.sections[index];
        match location {
            Err(face) => *section.face(face),
            Ok(t) => SectionProperties::lerp(&section.start, &section.end, t),
        }
    }

    /// Face properties of a section by index
    pub fn section_face(&self, index: usize, face: Face) -> Option<&SectionProperties> {
        self.sections.get(index).map(|s| s.face(face))
    }

    /// Explicit stress points at `x`, interpolated within the containing section
    pub fn stress_points(&self, x: f64, face: Face) -> StressPoints {
        let (index, location) = self.locate(x, face);
        let section = &self.sections[index];
        match location {
            Err(face) => *section.face_stress_points(face),
            Ok(t) => StressPoints::lerp(&section.start_stress_points, &section.end_stress_points, t),
        }
    }

    /// Stress points at `x` for the given mode
    pub fn stress_points_for(&self, x: f64, face: Face, mode: StressPointType) -> StressPoints {
        match mode {
            StressPointType::Computed => StressPoints::computed(&self.section_properties(x, face)),
            StressPointType::Defined => self.stress_points(x, face),
        }
    }

    pub fn add_point_load(&mut self, x: f64, p: f64) {
        self.point_loads.push(PointLoad { x, p });
    }

    pub fn clear_point_loads(&mut self) {
        self.point_loads.clear();
    }

    pub fn point_loads(&self) -> &[PointLoad] {
        &self.point_loads
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn set_drag_coefficient(&mut self, cd: f64) -> bool {
        assign_if_changed(&mut self.drag_coefficient, cd)
    }

    /// Fabricated precamber (m)
    pub fn precamber(&self) -> f64 {
        self.precamber
    }

    pub fn set_precamber(&mut self, precamber: f64) -> bool {
        assign_if_changed(&mut self.precamber, precamber)
    }

    /// A single-section copy of this girder built from its first section.
    pub fn first_section_prismatic(&self) -> Girder {
        let mut girder = Girder {
            sections: Vec::new(),
            point_loads: self.point_loads.clone(),
            drag_coefficient: self.drag_coefficient,
            precamber: self.precamber,
        };
        if let Some(first) = self.sections.first() {
            let index = girder.add_section(first.length, first.start, first.start);
            girder.set_stress_points(index, first.start_stress_points, first.start_stress_points);
        }
        girder
    }

    /// Validate the girder for analysis
    pub fn validate(&self) -> StabResult<()> {
        if self.sections.is_empty() {
            return Err(StabError::invalid_input("sections", "0", "Girder must have at least one section"));
        }
        for (index, section) in self.sections.iter().enumerate() {
            if !(section.length > 0.0) {
                return Err(StabError::invalid_input(
                    format!("sections[{}].length", index),
                    section.length.to_string(),
                    "Section length must be positive",
                ));
            }
            section.start.validate(&format!("sections[{}].start", index))?;
            section.end.validate(&format!("sections[{}].end", index))?;
        }
        let length = self.girder_length();
        for (index, load) in self.point_loads.iter().enumerate() {
            if load.x < 0.0 || load.x > length {
                return Err(StabError::invalid_input(
                    format!("point_loads[{}].x", index),
                    load.x.to_string(),
                    "Point load must be located on the girder",
                ));
            }
        }
        if self.drag_coefficient < 0.0 {
            return Err(StabError::invalid_input(
                "drag_coefficient",
                self.drag_coefficient.to_string(),
                "Drag coefficient cannot be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tapered_girder() -> Girder {
        let a = SectionProperties::default();
        let b = SectionProperties {
            area: a.area * 2.0,
            hg: a.hg * 1.5,
            ..a
        };
        let mut girder = Girder::new();
        girder.add_section(10.0, a, b);
        girder.add_section(20.0, b, b);
        girder.add_section(10.0, b, a);
        girder
    }

    #[test]
    fn test_girder_length_is_sum_of_sections() {
        let girder = tapered_girder();
        assert_relative_eq!(girder.girder_length(), 40.0);
        assert_eq!(girder.section_count(), 3);
    }

    #[test]
    fn test_end_faces_are_exact() {
        let girder = tapered_girder();
        let length = girder.girder_length();
        assert_eq!(girder.section_properties(0.0, Face::Start), girder.sections()[0].start);
        assert_eq!(girder.section_properties(0.0, Face::End), girder.sections()[0].start);
        assert_eq!(girder.section_properties(length, Face::End), girder.sections()[2].end);
        assert_eq!(girder.section_properties(length, Face::Start), girder.sections()[2].end);
    }

    #[test]
    fn test_section_face_by_index() {
        let girder = tapered_girder();
        let a = SectionProperties::default();
        assert_eq!(girder.section_face(0, Face::Start), Some(&a));
        assert_eq!(girder.section_face(2, Face::End), Some(&a));
        assert_relative_eq!(girder.section_face(1, Face::Start).unwrap().area, 2.0 * a.area);
        assert_eq!(girder.section_face(3, Face::Start), None);
    }

    #[test]
    fn test_interpolation_within_section() {
        let girder = tapered_girder();
        let a = SectionProperties::default();
        let props = girder.section_properties(5.0, Face::Start);
        assert_relative_eq!(props.area, 1.5 * a.area, max_relative = 1e-12);
        assert_relative_eq!(props.hg, 1.25 * a.hg, max_relative = 1e-12);
    }

    #[test]
    fn test_boundary_face_selection() {
        let a = SectionProperties::default();
        let b = SectionProperties { area: a.area * 3.0, ..a };
        let mut girder = Girder::new();
        girder.add_section(10.0, a, a);
        girder.add_section(10.0, b, b);

        assert_eq!(girder.section_properties(10.0, Face::End).area, a.area);
        assert_eq!(girder.section_properties(10.0, Face::Start).area, b.area);
    }

    #[test]
    fn test_computed_stress_points() {
        let props = SectionProperties::default();
        let points = StressPoints::computed(&props);
        assert_relative_eq!(points.top_left.x, 0.0);
        assert_relative_eq!(points.top_right.x, props.wtf);
        assert_relative_eq!(points.bottom_left.x, (props.wtf - props.wbf) / 2.0, epsilon = 1e-12);
        assert_relative_eq!(points.bottom_right.y, -props.hg);
    }

    #[test]
    fn test_setters_report_changes() {
        let mut girder = Girder::default();
        assert!(!girder.set_drag_coefficient(2.2));
        assert!(girder.set_drag_coefficient(1.8));
        assert!(girder.set_precamber(0.01));
        assert!(!girder.set_precamber(0.01));
    }

    #[test]
    fn test_first_section_prismatic() {
        let girder = tapered_girder();
        let prismatic = girder.first_section_prismatic();
        assert_eq!(prismatic.section_count(), 1);
        assert_relative_eq!(prismatic.girder_length(), 10.0);
        assert_eq!(prismatic.sections()[0].end, girder.sections()[0].start);
    }

    #[test]
    fn test_validation() {
        assert!(Girder::default().validate().is_ok());
        assert!(Girder::new().validate().is_err());

        let mut girder = Girder::default();
        girder.add_point_load(500.0, 1000.0);
        assert!(girder.validate().is_err());
    }
}
