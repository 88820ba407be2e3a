//! # Strand Layout
//!
//! Prestressing strands are described in one of two ways:
//!
//! - **Simplified**: one effective force per strand group, a constant
//!   elevation for the straight and temporary strands, and a harped profile
//!   through four harp points.
//! - **Exact**: an editable table of [`FpeRecord`]s, one per longitudinal
//!   position, each carrying force and location for every strand group.
//!
//! [`resolve`] turns either description into the sample table the solver
//! interpolates. Elevations are converted to section coordinates (Y negative,
//! measured down from the top of the girder) using the girder height at each
//! sample position.
//!
//! ## Harped Profile
//!
//! ```text
//!   Yh1 ──────●                                ●────── Yh4
//!              \                              /
//!               \                            /
//!                ●──────────────────────────●
//!   0          Xh1      Xh2            Xh3   Xh4       L
//! ```
//!
//! The elevation holds constant outside the outermost harp points and is
//! linear between consecutive harp points.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::girder::{Face, Girder};
use crate::units::{in_range, is_equal, lin_interp, Inches, Kips};

/// How the strand layout is described
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrandMethod {
    #[default]
    Simplified,
    Exact,
}

/// Reference face for a strand elevation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElevationMeasure {
    /// Distance down from the top of the girder
    Top,
    /// Distance up from the bottom of the girder
    #[default]
    Bottom,
}

/// How a harp point location is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HarpPointMeasure {
    /// Fraction of the girder length
    #[default]
    Fraction,
    /// Distance from the left end (m)
    Absolute,
}

/// Strand groups carried by every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrandGroup {
    Straight,
    Harped,
    Temporary,
}

impl StrandGroup {
    pub const ALL: [StrandGroup; 3] = [StrandGroup::Straight, StrandGroup::Harped, StrandGroup::Temporary];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            StrandGroup::Straight => "Straight",
            StrandGroup::Harped => "Harped",
            StrandGroup::Temporary => "Temporary",
        }
    }
}

/// One harp point of the simplified layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarpPoint {
    pub x: f64,
    pub x_measure: HarpPointMeasure,
    pub y: f64,
    pub y_measure: ElevationMeasure,
}

// ============================================================================
// Exact table
// ============================================================================

/// Force and location of one strand group in an [`FpeRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrandInput {
    /// Effective prestress force (N)
    pub fpe: f64,
    /// Horizontal location measured from the left edge of the section (m)
    pub xps: f64,
    /// Elevation measured from the `measure` face (m, positive)
    pub yps: f64,
    pub measure: ElevationMeasure,
}

/// Effective prestress at one longitudinal position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FpeRecord {
    /// Location measured from the left end of the girder (m)
    pub x: f64,
    pub straight: StrandInput,
    pub harped: StrandInput,
    pub temporary: StrandInput,
}

impl FpeRecord {
    pub fn group(&self, group: StrandGroup) -> &StrandInput {
        match group {
            StrandGroup::Straight => &self.straight,
            StrandGroup::Harped => &self.harped,
            StrandGroup::Temporary => &self.temporary,
        }
    }
}

/// Fpe records ordered by position with at most one record per position
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FpeRecord>", into = "Vec<FpeRecord>")]
pub struct FpeTable {
    records: Vec<FpeRecord>,
}

impl FpeTable {
    pub fn new() -> Self {
        FpeTable::default()
    }

    /// Insert a record. A record at an existing position is rejected and the
    /// existing record kept. Returns whether the record was inserted.
    pub fn insert(&mut self, record: FpeRecord) -> bool {
        if self.records.iter().any(|r| is_equal(r.x, record.x)) {
            return false;
        }
        let index = self.records.partition_point(|r| r.x < record.x);
        self.records.insert(index, record);
        true
    }

    /// Remove and return the record at `index`
    pub fn remove(&mut self, index: usize) -> Option<FpeRecord> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[FpeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<FpeRecord>> for FpeTable {
    fn from(records: Vec<FpeRecord>) -> Self {
        let mut table = FpeTable::new();
        for record in records {
            table.insert(record);
        }
        table
    }
}

impl From<FpeTable> for Vec<FpeRecord> {
    fn from(table: FpeTable) -> Self {
        table.records
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Strand layout for one girder and one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandLayout {
    pub method: StrandMethod,

    /// Horizontal eccentricity of all strands from the centroid (m)
    pub ex: f64,

    /// Straight strand force (N) and elevation (m)
    pub fpe_straight: f64,
    pub ys: f64,
    pub ys_measure: ElevationMeasure,

    /// Harped strand force (N) and profile
    pub fpe_harped: f64,
    pub harp_points: [HarpPoint; 4],

    /// Temporary strand force (N) and elevation (m)
    pub fpe_temp: f64,
    pub yt: f64,
    pub yt_measure: ElevationMeasure,

    /// Prestress transfer length (m), applied to the simplified layout only
    pub transfer_length: f64,

    /// Editable table used by the exact method
    pub fpe_table: FpeTable,
}

impl Default for StrandLayout {
    fn default() -> Self {
        let top = |y: f64, x: f64| HarpPoint {
            x,
            x_measure: HarpPointMeasure::Fraction,
            y: Inches(y).to_base(),
            y_measure: ElevationMeasure::Top,
        };
        let bottom = |y: f64, x: f64| HarpPoint {
            x,
            x_measure: HarpPointMeasure::Fraction,
            y: Inches(y).to_base(),
            y_measure: ElevationMeasure::Bottom,
        };
        StrandLayout {
            method: StrandMethod::Simplified,
            ex: 0.0,
            fpe_straight: Kips(600.0).to_base(),
            ys: Inches(4.0).to_base(),
            ys_measure: ElevationMeasure::Bottom,
            fpe_harped: Kips(300.0).to_base(),
            harp_points: [top(10.0, 0.0), bottom(6.0, 0.4), bottom(6.0, 0.6), top(10.0, 1.0)],
            fpe_temp: 0.0,
            yt: Inches(3.0).to_base(),
            yt_measure: ElevationMeasure::Top,
            transfer_length: Inches(36.0).to_base(),
            fpe_table: FpeTable::new(),
        }
    }
}

/// Convert an elevation to section coordinates
pub fn section_elevation(y: f64, measure: ElevationMeasure, hg: f64) -> f64 {
    match measure {
        ElevationMeasure::Top => -y,
        ElevationMeasure::Bottom => y - hg,
    }
}

/// Simplified layout converted to positions on a specific girder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifiedLocations {
    /// Horizontal location of every group from the left edge (m)
    pub xps: f64,
    /// Straight strand elevation (section coordinates)
    pub ys: f64,
    /// Harp point positions and elevations (section coordinates)
    pub harp: [(f64, f64); 4],
    /// Temporary strand elevation (section coordinates)
    pub yt: f64,
}

/// Locate the simplified strands on `girder`.
///
/// Straight and temporary elevations use the girder height at the left end;
/// each harp point uses the height at its own position.
pub fn simplified_locations(layout: &StrandLayout, girder: &Girder) -> SimplifiedLocations {
    let length = girder.girder_length();
    let start = girder.section_properties(0.0, Face::Start);

    let xps = start.xleft + layout.ex;
    let ys = section_elevation(layout.ys, layout.ys_measure, start.hg);
    let yt = section_elevation(layout.yt, layout.yt_measure, start.hg);

    let harp = layout.harp_points.map(|point| {
        let x = match point.x_measure {
            HarpPointMeasure::Fraction => length * point.x,
            HarpPointMeasure::Absolute => point.x,
        };
        let hg = girder.section_properties(x.clamp(0.0, length), Face::Start).hg;
        (x, section_elevation(point.y, point.y_measure, hg))
    });

    SimplifiedLocations { xps, ys, harp, yt }
}

/// Seed an exact table from the simplified description.
///
/// Records are created at `0, Xh1..Xh4, L`; a duplicate position keeps
/// the first record.
pub fn map_simplified_to_exact(layout: &StrandLayout, girder: &Girder) -> FpeTable {
    let locations = simplified_locations(layout, girder);
    let length = girder.girder_length();

    let straight = StrandInput {
        fpe: layout.fpe_straight,
        xps: locations.xps,
        yps: layout.ys,
        measure: layout.ys_measure,
    };
    let temporary = StrandInput {
        fpe: layout.fpe_temp,
        xps: locations.xps,
        yps: layout.yt,
        measure: layout.yt_measure,
    };
    let harped = |point: &HarpPoint| StrandInput {
        fpe: layout.fpe_harped,
        xps: locations.xps,
        yps: point.y,
        measure: point.y_measure,
    };

    let hp = &layout.harp_points;
    let stations = [
        (0.0, &hp[0]),
        (locations.harp[0].0, &hp[0]),
        (locations.harp[1].0, &hp[1]),
        (locations.harp[2].0, &hp[2]),
        (locations.harp[3].0, &hp[3]),
        (length, &hp[3]),
    ];

    let mut table = FpeTable::new();
    for (x, point) in stations {
        table.insert(FpeRecord {
            x,
            straight,
            harped: harped(point),
            temporary,
        });
    }
    table
}

// ============================================================================
// Resolution
// ============================================================================

/// Force and location of one strand group in section coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrandSample {
    /// Effective prestress force (N)
    pub fpe: f64,
    /// Horizontal location from the left edge (m)
    pub xps: f64,
    /// Elevation in section coordinates (m, negative)
    pub yps: f64,
}

impl StrandSample {
    fn interpolate(x: f64, x1: f64, a: &StrandSample, x2: f64, b: &StrandSample) -> StrandSample {
        StrandSample {
            fpe: lin_interp(x, x1, a.fpe, x2, b.fpe),
            xps: lin_interp(x, x1, a.xps, x2, b.xps),
            yps: lin_interp(x, x1, a.yps, x2, b.yps),
        }
    }
}

/// Strand samples for every group at one position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedFpe {
    pub x: f64,
    pub straight: StrandSample,
    pub harped: StrandSample,
    pub temporary: StrandSample,
}

impl ResolvedFpe {
    pub fn group(&self, group: StrandGroup) -> &StrandSample {
        match group {
            StrandGroup::Straight => &self.straight,
            StrandGroup::Harped => &self.harped,
            StrandGroup::Temporary => &self.temporary,
        }
    }

    fn interpolate(x: f64, a: &ResolvedFpe, b: &ResolvedFpe) -> ResolvedFpe {
        ResolvedFpe {
            x,
            straight: StrandSample::interpolate(x, a.x, &a.straight, b.x, &b.straight),
            harped: StrandSample::interpolate(x, a.x, &a.harped, b.x, &b.harped),
            temporary: StrandSample::interpolate(x, a.x, &a.temporary, b.x, &b.temporary),
        }
    }

    fn scaled(mut self, factor: f64) -> ResolvedFpe {
        self.straight.fpe *= factor;
        self.harped.fpe *= factor;
        self.temporary.fpe *= factor;
        self
    }
}

/// Sample table built fresh for every solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStrands {
    pub records: Vec<ResolvedFpe>,
    /// Transfer length applied to the forces, if any (m)
    pub transfer_length: Option<f64>,
    pub girder_length: f64,
}

impl ResolvedStrands {
    /// Strand forces and locations at `x`.
    ///
    /// Values are linearly interpolated between samples and held constant
    /// beyond the first and last samples.
    pub fn at(&self, x: f64) -> ResolvedFpe {
        let sample = match (self.records.first(), self.records.last()) {
            (None, _) | (_, None) => return ResolvedFpe { x, ..Default::default() },
            (Some(first), Some(last)) => self
                .records
                .windows(2)
                .find(|pair| in_range(pair[0].x, x, pair[1].x))
                .map(|pair| ResolvedFpe::interpolate(x, &pair[0], &pair[1]))
                .unwrap_or_else(|| {
                    let nearest = if x <= first.x { first } else { last };
                    ResolvedFpe { x, ..*nearest }
                }),
        };
        sample.scaled(self.transfer_factor(x))
    }

    /// Fraction of the effective prestress developed at `x`
    pub fn transfer_factor(&self, x: f64) -> f64 {
        match self.transfer_length {
            Some(lt) if lt > 0.0 => {
                let developed = x.min(self.girder_length - x) / lt;
                developed.clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Total effective prestress at `x` (N)
    pub fn total_force(&self, x: f64) -> f64 {
        let sample = self.at(x);
        StrandGroup::ALL.iter().map(|g| sample.group(*g).fpe).sum()
    }
}

/// Convert an exact record into section coordinates
pub fn strand_locations(record: &FpeRecord, girder: &Girder) -> ResolvedFpe {
    let hg = girder.section_properties(record.x, Face::Start).hg;
    let convert = |input: &StrandInput| StrandSample {
        fpe: input.fpe,
        xps: input.xps,
        yps: section_elevation(input.yps, input.measure, hg),
    };
    ResolvedFpe {
        x: record.x,
        straight: convert(&record.straight),
        harped: convert(&record.harped),
        temporary: convert(&record.temporary),
    }
}

/// Build the sample table for a solve.
///
/// The simplified method always yields six samples at `0, Xh1..Xh4, L`.
/// The exact method yields one sample per record located on the girder;
/// records beyond the ends of the girder are skipped.
pub fn resolve(layout: &StrandLayout, girder: &Girder) -> ResolvedStrands {
    let length = girder.girder_length();
    match layout.method {
        StrandMethod::Simplified => {
            let loc = simplified_locations(layout, girder);
            let straight = StrandSample {
                fpe: layout.fpe_straight,
                xps: loc.xps,
                yps: loc.ys,
            };
            let temporary = StrandSample {
                fpe: layout.fpe_temp,
                xps: loc.xps,
                yps: loc.yt,
            };
            let harped = |y: f64| StrandSample {
                fpe: layout.fpe_harped,
                xps: loc.xps,
                yps: y,
            };
            let [h1, h2, h3, h4] = loc.harp;
            let stations = [(0.0, h1.1), h1, h2, h3, h4, (length, h4.1)];
            let records = stations
                .iter()
                .map(|&(x, yh)| ResolvedFpe {
                    x,
                    straight,
                    harped: harped(yh),
                    temporary,
                })
                .collect();
            ResolvedStrands {
                records,
                transfer_length: Some(layout.transfer_length),
                girder_length: length,
            }
        }
        StrandMethod::Exact => {
            let mut records = Vec::with_capacity(layout.fpe_table.len());
            for record in layout.fpe_table.records() {
                if in_range(0.0, record.x, length) {
                    records.push(strand_locations(record, girder));
                } else {
                    warn!(x = record.x, girder_length = length, "Fpe record is not on the girder, ignored");
                }
            }
            ResolvedStrands {
                records,
                transfer_length: None,
                girder_length: length,
            }
        }
    }
}

/// Strand profiles for graphing, `(X, Y)` in section coordinates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrandProfiles {
    pub straight: Vec<(f64, f64)>,
    pub harped: Vec<(f64, f64)>,
    pub temporary: Vec<(f64, f64)>,
}

/// Build the strand profiles of a layout on `girder`
pub fn strand_profiles(layout: &StrandLayout, girder: &Girder) -> StrandProfiles {
    let length = girder.girder_length();
    let mut profiles = StrandProfiles::default();

    match layout.method {
        StrandMethod::Simplified => {
            let loc = simplified_locations(layout, girder);
            let [h1, h2, h3, h4] = loc.harp;
            profiles.straight = vec![(0.0, loc.ys), (length, loc.ys)];
            profiles.harped = vec![(0.0, h1.1), h1, h2, h3, h4, (length, h4.1)];
            profiles.temporary = vec![(0.0, loc.yt), (length, loc.yt)];
        }
        StrandMethod::Exact => {
            let on_girder: Vec<ResolvedFpe> = layout
                .fpe_table
                .records()
                .iter()
                .filter(|r| in_range(0.0, r.x, length))
                .map(|r| strand_locations(r, girder))
                .collect();

            let (first, last) = match (on_girder.first(), on_girder.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => return profiles,
            };

            let mut push = |x: f64, sample: &ResolvedFpe| {
                profiles.straight.push((x, sample.straight.yps));
                profiles.harped.push((x, sample.harped.yps));
                profiles.temporary.push((x, sample.temporary.yps));
            };
            push(0.0, &first);
            for sample in &on_girder {
                push(sample.x, sample);
            }
            push(length, &last);
        }
    }
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::girder::SectionProperties;
    use approx::assert_relative_eq;

    fn girder() -> Girder {
        Girder::default()
    }

    #[test]
    fn test_simplified_resolves_to_six_samples() {
        let girder = girder();
        let resolved = resolve(&StrandLayout::default(), &girder);
        assert_eq!(resolved.records.len(), 6);
        assert_eq!(resolved.records[0].x, 0.0);
        assert_relative_eq!(resolved.records[5].x, girder.girder_length());
    }

    #[test]
    fn test_harped_interpolation_between_harp_points() {
        let girder = girder();
        let layout = StrandLayout {
            transfer_length: 0.0,
            ..Default::default()
        };
        let resolved = resolve(&layout, &girder);
        let loc = simplified_locations(&layout, &girder);

        let (x1, y1) = loc.harp[0];
        let (x2, y2) = loc.harp[1];
        for t in [0.1, 0.25, 0.5, 0.9] {
            let x = x1 + t * (x2 - x1);
            let expected = y1 + t * (y2 - y1);
            assert_relative_eq!(resolved.at(x).harped.yps, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_elevation_measures() {
        let hg = 1.8;
        assert_relative_eq!(section_elevation(0.1, ElevationMeasure::Top, hg), -0.1);
        assert_relative_eq!(section_elevation(0.1, ElevationMeasure::Bottom, hg), -1.7);
    }

    #[test]
    fn test_degenerate_harp_points() {
        let girder = girder();
        let mut layout = StrandLayout::default();
        let y = Inches(8.0).to_base();
        for point in layout.harp_points.iter_mut() {
            point.x = 0.5;
            point.y = y;
            point.y_measure = ElevationMeasure::Bottom;
        }
        let resolved = resolve(&layout, &girder);
        let hg = SectionProperties::default().hg;
        let length = girder.girder_length();
        for i in 0..=20 {
            let x = length * i as f64 / 20.0;
            let yps = resolved.at(x).harped.yps;
            assert!(yps.is_finite());
            assert_relative_eq!(yps, y - hg, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transfer_length_ramp() {
        let girder = girder();
        let layout = StrandLayout::default();
        let resolved = resolve(&layout, &girder);
        let lt = layout.transfer_length;

        assert_eq!(resolved.at(0.0).straight.fpe, 0.0);
        assert_relative_eq!(resolved.at(lt / 2.0).straight.fpe, layout.fpe_straight / 2.0, max_relative = 1e-9);
        assert_relative_eq!(resolved.at(girder.girder_length() / 2.0).straight.fpe, layout.fpe_straight);
    }

    #[test]
    fn test_table_set_semantics() {
        let mut table = FpeTable::new();
        let mut record = FpeRecord { x: 5.0, ..Default::default() };
        record.straight.fpe = 1.0;
        assert!(table.insert(record));

        record.straight.fpe = 2.0;
        assert!(!table.insert(record));
        assert_eq!(table.records()[0].straight.fpe, 1.0);

        assert!(table.insert(FpeRecord { x: 1.0, ..Default::default() }));
        assert_eq!(table.records()[0].x, 1.0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_map_simplified_to_exact_dedupes() {
        let girder = girder();
        let layout = StrandLayout::default();
        // default harp points sit at 0 and L, which coincide with the end records
        let table = map_simplified_to_exact(&layout, &girder);
        assert_eq!(table.len(), 4);
        assert_eq!(table.records()[0].harped.yps, layout.harp_points[0].y);

        let mut distinct = layout.clone();
        distinct.harp_points[0].x = 0.2;
        distinct.harp_points[3].x = 0.8;
        assert_eq!(map_simplified_to_exact(&distinct, &girder).len(), 6);
    }

    #[test]
    fn test_exact_matches_simplified() {
        let girder = girder();
        let simplified = StrandLayout {
            transfer_length: 0.0,
            ..Default::default()
        };
        let exact = StrandLayout {
            method: StrandMethod::Exact,
            fpe_table: map_simplified_to_exact(&simplified, &girder),
            ..simplified.clone()
        };
        let a = resolve(&simplified, &girder);
        let b = resolve(&exact, &girder);
        for x in [0.0, 3.0, 12.0, 15.24, 20.0, girder.girder_length()] {
            assert_relative_eq!(a.at(x).harped.yps, b.at(x).harped.yps, epsilon = 1e-12);
            assert_relative_eq!(a.total_force(x), b.total_force(x), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_exact_table_interpolates_between_records() {
        let girder = girder();
        let length = girder.girder_length();
        let mut layout = StrandLayout {
            method: StrandMethod::Exact,
            ..Default::default()
        };
        for (i, fraction) in [0.0, 0.1, 0.3, 0.5, 0.8, 1.0].iter().enumerate() {
            let mut record = FpeRecord {
                x: fraction * length,
                ..Default::default()
            };
            record.straight.fpe = 1.0e6 * (i + 1) as f64;
            record.straight.yps = 0.1 * i as f64;
            record.straight.measure = ElevationMeasure::Bottom;
            layout.fpe_table.insert(record);
        }

        let resolved = resolve(&layout, &girder);
        assert_eq!(resolved.records.len(), 6);
        assert_eq!(resolved.transfer_factor(0.0), 1.0);

        // halfway between the records at 0.3L and 0.5L
        let sample = resolved.at(0.4 * length);
        let hg = SectionProperties::default().hg;
        assert_relative_eq!(sample.straight.fpe, 3.5e6, max_relative = 1e-12);
        assert_relative_eq!(sample.straight.yps, 0.25 - hg, epsilon = 1e-12);
        assert_relative_eq!(resolved.at(length).straight.fpe, 6.0e6);
    }

    #[test]
    fn test_exact_ignores_records_off_girder() {
        let girder = girder();
        let mut layout = StrandLayout {
            method: StrandMethod::Exact,
            ..Default::default()
        };
        layout.fpe_table.insert(FpeRecord { x: 0.0, ..Default::default() });
        layout.fpe_table.insert(FpeRecord { x: 1000.0, ..Default::default() });
        let resolved = resolve(&layout, &girder);
        assert_eq!(resolved.records.len(), 1);
    }

    #[test]
    fn test_strand_profiles() {
        let girder = girder();
        let layout = StrandLayout::default();
        let profiles = strand_profiles(&layout, &girder);
        assert_eq!(profiles.straight.len(), 2);
        assert_eq!(profiles.harped.len(), 6);

        let exact = StrandLayout {
            method: StrandMethod::Exact,
            fpe_table: map_simplified_to_exact(&layout, &girder),
            ..layout
        };
        let profiles = strand_profiles(&exact, &girder);
        assert_eq!(profiles.harped.len(), exact.fpe_table.len() + 2);
        assert_eq!(profiles.harped.first().map(|p| p.0), Some(0.0));
    }
}
