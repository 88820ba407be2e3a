//! # Model Documents
//!
//! Versioned JSON representation of a [`StabilityModel`]. All numbers are
//! stored in SI base units. Every block carries its own `Version`; older
//! blocks are brought forward by the pure steps in [`migrate`] before the
//! typed records below are read.
//!
//! ## Layout
//!
//! ```text
//! PGStable (v2)
//! ├── Units, GirderType, StressPointType, DragCoefficient, Precamber
//! ├── Girder (v2)
//! │   ├── Sections (v1) → Section[] (v1) → StartFace / EndFace (v2)
//! │   ├── DensityWithRebar, Density, K1, K2, ConcreteType
//! │   └── AdditionalLoads[]
//! ├── LiftingProblem (v5) ── Strands (v1)
//! ├── HaulingProblem (v5) ── Strands (v1)
//! ├── LiftingCriteria (v1)
//! ├── HaulingCriteria (v1)
//! └── Settings (v1, optional)
//! ```
//!
//! Only the active girder is written. On load the other girder is derived
//! from it and both girder types share the stored strand layouts.

pub mod migrate;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::criteria::{HaulingCriteria, LiftingCriteria, TensionLimit};
use crate::errors::{StabError, StabResult};
use crate::girder::{Girder, GirderType, Point2, SectionProperties, StressPointType, StressPoints};
use crate::materials::{Concrete, ConcreteType};
use crate::model::{PerGirderType, PerModelType, StabilityModel};
use crate::problem::{
    CentrifugalForceType, HaulingProblem, ImpactFactors, ImpactUsage, LiftingProblem, ModelType, WindLoading,
    WindType,
};
use crate::settings::{AnalysisSettings, LrfdEdition, UnitsMode};
use crate::strands::{
    ElevationMeasure, FpeRecord, HarpPoint, HarpPointMeasure, StrandInput, StrandLayout, StrandMethod,
};

use migrate::{
    CRITERIA_VERSION, FACE_VERSION, GIRDER_VERSION, PROBLEM_VERSION, ROOT_VERSION, SECTIONS_VERSION,
    SECTION_VERSION, SETTINGS_VERSION, STRANDS_VERSION,
};

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentFile {
    #[serde(rename = "PGStable")]
    root: RootBlock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RootBlock {
    version: u32,
    units: UnitsMode,
    girder_type: GirderType,
    stress_point_type: StressPointType,
    drag_coefficient: f64,
    precamber: f64,
    girder: GirderBlock,
    lifting_problem: LiftingProblemBlock,
    hauling_problem: HaulingProblemBlock,
    lifting_criteria: LiftingCriteriaBlock,
    hauling_criteria: HaulingCriteriaBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    settings: Option<SettingsBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GirderBlock {
    version: u32,
    sections: SectionsBlock,
    density_with_rebar: f64,
    density: f64,
    #[serde(rename = "K1")]
    k1: f64,
    #[serde(rename = "K2")]
    k2: f64,
    concrete_type: ConcreteType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    additional_loads: Vec<PointLoadRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SectionsBlock {
    version: u32,
    #[serde(default)]
    section: Vec<SectionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SectionRecord {
    version: u32,
    #[serde(rename = "L")]
    length: f64,
    start_face: FaceRecord,
    end_face: FaceRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FaceRecord {
    version: u32,
    ag: f64,
    #[serde(rename = "Ix")]
    ixx: f64,
    #[serde(rename = "Iy")]
    iyy: f64,
    ixy: f64,
    xleft: f64,
    ytop: f64,
    hg: f64,
    wtf: f64,
    wbf: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stress_points: Option<StressPointsRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StressPointsRecord {
    top_left: PointRecord,
    top_right: PointRecord,
    bottom_left: PointRecord,
    bottom_right: PointRecord,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PointRecord {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PointLoadRecord {
    x: f64,
    p: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StrandsBlock {
    version: u32,
    method: StrandMethod,
    ex: f64,
    fpe_straight: f64,
    ys: f64,
    ys_measure: ElevationMeasure,
    fpe_harped: f64,
    harp_points: [HarpPointRecord; 4],
    fpe_temp: f64,
    yt: f64,
    yt_measure: ElevationMeasure,
    transfer_length: f64,
    #[serde(default)]
    fpe: Vec<FpeRecordBlock>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HarpPointRecord {
    x: f64,
    x_measure: HarpPointMeasure,
    y: f64,
    y_measure: ElevationMeasure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FpeRecordBlock {
    x: f64,
    straight: StrandInputRecord,
    harped: StrandInputRecord,
    temporary: StrandInputRecord,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StrandInputRecord {
    fpe: f64,
    xps: f64,
    yps: f64,
    measure: ElevationMeasure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LiftingProblemBlock {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strands: Option<StrandsBlock>,
    camber: f64,
    lateral_camber: f64,
    lift_point: f64,
    yra: f64,
    sweep_tolerance: f64,
    sweep_growth: f64,
    support_placement_tolerance: f64,
    impact_up: f64,
    impact_down: f64,
    wind_load_type: WindType,
    wind_load: f64,
    lift_angle: f64,
    fr_coefficient: f64,
    fci: f64,
    compute_eci: bool,
    eci: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HaulingProblemBlock {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strands: Option<StrandsBlock>,
    camber: f64,
    lateral_camber: f64,
    left_bunk_point: f64,
    right_bunk_point: f64,
    hgb: f64,
    sweep_tolerance: f64,
    sweep_growth: f64,
    support_placement_tolerance: f64,
    impact_up: f64,
    impact_down: f64,
    impact_usage: ImpactUsage,
    wind_load_type: WindType,
    wind_load: f64,
    ktheta: f64,
    wcc: f64,
    hrc: f64,
    crown_slope: f64,
    superelevation: f64,
    velocity: f64,
    radius: f64,
    #[serde(rename = "CFType")]
    cf_type: CentrifugalForceType,
    fr_coefficient: f64,
    fc: f64,
    compute_ec: bool,
    ec: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TensionRecord {
    #[serde(rename = "TensionCoefficient")]
    coefficient: f64,
    #[serde(rename = "bMaxTension")]
    has_max: bool,
    #[serde(rename = "MaxTension")]
    max_tension: f64,
    #[serde(rename = "TensionCoefficientWithRebar")]
    coefficient_with_rebar: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LiftingCriteriaBlock {
    #[serde(rename = "Version")]
    version: u32,
    #[serde(rename = "CompressionCoefficient_GlobalStress")]
    compression_global: f64,
    #[serde(rename = "CompressionCoefficient_PeakStress")]
    compression_peak: f64,
    #[serde(flatten)]
    tension: TensionRecord,
    #[serde(rename = "MinFScr")]
    min_fs_cracking: f64,
    #[serde(rename = "MinFSf")]
    min_fs_failure: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HaulingCriteriaBlock {
    #[serde(rename = "Version")]
    version: u32,
    #[serde(rename = "CompressionCoefficient_GlobalStress")]
    compression_global: f64,
    #[serde(rename = "CompressionCoefficient_PeakStress")]
    compression_peak: f64,
    #[serde(flatten)]
    tension: TensionRecord,
    #[serde(rename = "MinFScr")]
    min_fs_cracking: f64,
    #[serde(rename = "MinFSr")]
    min_fs_rollover: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsBlock {
    version: u32,
    lrfd_edition: LrfdEdition,
    analysis_segments: usize,
    lift_point_offset: f64,
    deflection_segments: usize,
    roll_tolerance: f64,
    max_iterations: usize,
    angle_scan_steps: usize,
}

// ============================================================================
// Public API
// ============================================================================

/// Serialize a model to a pretty-printed document
pub fn to_json(model: &StabilityModel) -> StabResult<String> {
    let document = write_document(model);
    serde_json::to_string_pretty(&document).map_err(|e| StabError::SerializationError { reason: e.to_string() })
}

/// Parse a document of any supported version into a new model.
///
/// Any structural problem is reported as [`StabError::InvalidFileFormat`],
/// except a block newer than this build, which is
/// [`StabError::VersionMismatch`].
pub fn from_json(json: &str) -> StabResult<StabilityModel> {
    let value: Value = serde_json::from_str(json).map_err(|e| StabError::invalid_format(e.to_string()))?;
    let value = migrate::upgrade_document(value).map_err(|e| match e {
        StabError::VersionMismatch { .. } | StabError::InvalidFileFormat { .. } => e,
        other => StabError::invalid_format(other.to_string()),
    })?;
    let document: DocumentFile =
        serde_json::from_value(value).map_err(|e| StabError::invalid_format(e.to_string()))?;
    read_document(document.root)
}

// ============================================================================
// Writing
// ============================================================================

fn write_document(model: &StabilityModel) -> DocumentFile {
    let girder = model.girder();
    let lifting = model.lifting_problem();
    let hauling = model.hauling_problem();
    // concrete type and densities are shared; the lifting concrete is authoritative
    let concrete = &lifting.params.concrete;
    let factors = model.modulus_factors();
    let defined = model.stress_point_type() == StressPointType::Defined;

    let sections = girder
        .sections()
        .iter()
        .map(|section| SectionRecord {
            version: SECTION_VERSION,
            length: section.length,
            start_face: face_record(&section.start, defined.then_some(&section.start_stress_points)),
            end_face: face_record(&section.end, defined.then_some(&section.end_stress_points)),
        })
        .collect();

    let settings = model.settings();

    DocumentFile {
        root: RootBlock {
            version: ROOT_VERSION,
            units: settings.units_mode,
            girder_type: model.girder_type(),
            stress_point_type: model.stress_point_type(),
            drag_coefficient: girder.drag_coefficient(),
            precamber: girder.precamber(),
            girder: GirderBlock {
                version: GIRDER_VERSION,
                sections: SectionsBlock {
                    version: SECTIONS_VERSION,
                    section: sections,
                },
                density_with_rebar: concrete.density_with_rebar,
                density: concrete.density,
                k1: factors.k1,
                k2: factors.k2,
                concrete_type: concrete.concrete_type,
                additional_loads: girder
                    .point_loads()
                    .iter()
                    .map(|load| PointLoadRecord { x: load.x, p: load.p })
                    .collect(),
            },
            lifting_problem: LiftingProblemBlock {
                version: PROBLEM_VERSION,
                strands: Some(strands_block(model.active_strands(ModelType::Lifting))),
                camber: lifting.params.camber,
                lateral_camber: lifting.params.lateral_camber,
                lift_point: lifting.lift_point,
                yra: lifting.yra,
                sweep_tolerance: lifting.params.sweep_tolerance,
                sweep_growth: lifting.params.sweep_growth,
                support_placement_tolerance: lifting.params.support_placement_tolerance,
                impact_up: lifting.params.impact.up,
                impact_down: lifting.params.impact.down,
                wind_load_type: lifting.params.wind.wind_type,
                wind_load: lifting.params.wind.load,
                lift_angle: lifting.lift_angle,
                fr_coefficient: concrete.fr_coefficient,
                fci: concrete.fc,
                compute_eci: concrete.compute_modulus,
                eci: concrete.modulus,
            },
            hauling_problem: HaulingProblemBlock {
                version: PROBLEM_VERSION,
                strands: Some(strands_block(model.active_strands(ModelType::Hauling))),
                camber: hauling.params.camber,
                lateral_camber: hauling.params.lateral_camber,
                left_bunk_point: hauling.left_bunk,
                right_bunk_point: hauling.right_bunk,
                hgb: hauling.height_of_girder_bottom,
                sweep_tolerance: hauling.params.sweep_tolerance,
                sweep_growth: hauling.params.sweep_growth,
                support_placement_tolerance: hauling.params.support_placement_tolerance,
                impact_up: hauling.params.impact.up,
                impact_down: hauling.params.impact.down,
                impact_usage: hauling.impact_usage,
                wind_load_type: hauling.params.wind.wind_type,
                wind_load: hauling.params.wind.load,
                ktheta: hauling.truck_rotational_stiffness,
                wcc: hauling.wheel_line_spacing,
                hrc: hauling.height_of_roll_axis,
                crown_slope: hauling.crown_slope,
                superelevation: hauling.superelevation,
                velocity: hauling.velocity,
                radius: hauling.turning_radius,
                cf_type: hauling.centrifugal_force_type,
                fr_coefficient: hauling.params.concrete.fr_coefficient,
                fc: hauling.params.concrete.fc,
                compute_ec: hauling.params.concrete.compute_modulus,
                ec: hauling.params.concrete.modulus,
            },
            lifting_criteria: {
                let c = model.lifting_criteria();
                LiftingCriteriaBlock {
                    version: CRITERIA_VERSION,
                    compression_global: c.compression_coefficient_global,
                    compression_peak: c.compression_coefficient_peak,
                    tension: tension_record(&c.tension),
                    min_fs_cracking: c.min_fs_cracking,
                    min_fs_failure: c.min_fs_failure,
                }
            },
            hauling_criteria: {
                let c = model.hauling_criteria();
                HaulingCriteriaBlock {
                    version: CRITERIA_VERSION,
                    compression_global: c.compression_coefficient_global,
                    compression_peak: c.compression_coefficient_peak,
                    tension: tension_record(&c.crown_slope_tension),
                    min_fs_cracking: c.min_fs_cracking,
                    min_fs_rollover: c.min_fs_rollover,
                }
            },
            settings: Some(SettingsBlock {
                version: SETTINGS_VERSION,
                lrfd_edition: settings.lrfd_edition,
                analysis_segments: settings.analysis_segments,
                lift_point_offset: settings.lift_point_offset,
                deflection_segments: settings.deflection_segments,
                roll_tolerance: settings.roll_tolerance,
                max_iterations: settings.max_iterations,
                angle_scan_steps: settings.angle_scan_steps,
            }),
        },
    }
}

fn face_record(props: &SectionProperties, stress_points: Option<&StressPoints>) -> FaceRecord {
    let point = |p: Point2| PointRecord { x: p.x, y: p.y };
    FaceRecord {
        version: FACE_VERSION,
        ag: props.area,
        ixx: props.ixx,
        iyy: props.iyy,
        ixy: props.ixy,
        xleft: props.xleft,
        ytop: props.ytop,
        hg: props.hg,
        wtf: props.wtf,
        wbf: props.wbf,
        stress_points: stress_points.map(|sp| StressPointsRecord {
            top_left: point(sp.top_left),
            top_right: point(sp.top_right),
            bottom_left: point(sp.bottom_left),
            bottom_right: point(sp.bottom_right),
        }),
    }
}

fn strands_block(layout: &StrandLayout) -> StrandsBlock {
    let input = |s: &StrandInput| StrandInputRecord {
        fpe: s.fpe,
        xps: s.xps,
        yps: s.yps,
        measure: s.measure,
    };
    StrandsBlock {
        version: STRANDS_VERSION,
        method: layout.method,
        ex: layout.ex,
        fpe_straight: layout.fpe_straight,
        ys: layout.ys,
        ys_measure: layout.ys_measure,
        fpe_harped: layout.fpe_harped,
        harp_points: layout.harp_points.map(|hp| HarpPointRecord {
            x: hp.x,
            x_measure: hp.x_measure,
            y: hp.y,
            y_measure: hp.y_measure,
        }),
        fpe_temp: layout.fpe_temp,
        yt: layout.yt,
        yt_measure: layout.yt_measure,
        transfer_length: layout.transfer_length,
        fpe: layout
            .fpe_table
            .records()
            .iter()
            .map(|r| FpeRecordBlock {
                x: r.x,
                straight: input(&r.straight),
                harped: input(&r.harped),
                temporary: input(&r.temporary),
            })
            .collect(),
    }
}

fn tension_record(limit: &TensionLimit) -> TensionRecord {
    TensionRecord {
        coefficient: limit.coefficient,
        has_max: limit.has_max,
        max_tension: limit.max_tension,
        coefficient_with_rebar: limit.coefficient_with_rebar,
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Build a model from an upgraded document.
///
/// Stored strand layouts are applied to both girder types, whichever one is active.
fn read_document(root: RootBlock) -> StabResult<StabilityModel> {
    let girder_block = &root.girder;
    if girder_block.sections.section.is_empty() {
        return Err(StabError::invalid_format("Girder must have at least one section"));
    }

    let mut girder = Girder::new();
    girder.set_drag_coefficient(root.drag_coefficient);
    girder.set_precamber(root.precamber);
    for (i, record) in girder_block.sections.section.iter().enumerate() {
        if !(record.length.is_finite() && record.length > 0.0) {
            return Err(StabError::invalid_format(format!(
                "Section[{i}] has an invalid length: {}",
                record.length
            )));
        }
        let start = face_properties(&record.start_face);
        let end = face_properties(&record.end_face);
        for (face, props) in [("StartFace", &start), ("EndFace", &end)] {
            props
                .validate(&format!("Section[{i}].{face}"))
                .map_err(|e| StabError::invalid_format(e.to_string()))?;
        }
        let index = girder.add_section(record.length, start, end);
        if root.stress_point_type == StressPointType::Defined {
            if let (Some(start), Some(end)) = (record.start_face.stress_points, record.end_face.stress_points) {
                girder.set_stress_points(index, stress_points(start), stress_points(end));
            }
        }
    }
    for load in &girder_block.additional_loads {
        girder.add_point_load(load.x, load.p);
    }

    let girders = match root.girder_type {
        GirderType::Prismatic => PerGirderType {
            non_prismatic: girder.clone(),
            prismatic: girder,
        },
        GirderType::NonPrismatic => PerGirderType {
            prismatic: girder.first_section_prismatic(),
            non_prismatic: girder,
        },
    };

    let shared = |fc: f64, compute_modulus: bool, modulus: f64, fr_coefficient: f64| Concrete {
        concrete_type: girder_block.concrete_type,
        fc,
        density: girder_block.density,
        density_with_rebar: girder_block.density_with_rebar,
        compute_modulus,
        modulus,
        fr_coefficient,
    };

    let lp = &root.lifting_problem;
    let mut lifting = LiftingProblem::default();
    lifting.params.concrete = shared(lp.fci, lp.compute_eci, lp.eci, lp.fr_coefficient);
    lifting.params.camber = lp.camber;
    lifting.params.lateral_camber = lp.lateral_camber;
    lifting.params.sweep_tolerance = lp.sweep_tolerance;
    lifting.params.sweep_growth = lp.sweep_growth;
    lifting.params.support_placement_tolerance = lp.support_placement_tolerance;
    lifting.params.impact = ImpactFactors {
        up: lp.impact_up,
        down: lp.impact_down,
    };
    lifting.params.wind = WindLoading {
        wind_type: lp.wind_load_type,
        load: lp.wind_load,
    };
    lifting.lift_point = lp.lift_point;
    lifting.yra = lp.yra;
    lifting.lift_angle = lp.lift_angle;

    let hp = &root.hauling_problem;
    let mut hauling = HaulingProblem::default();
    hauling.params.concrete = shared(hp.fc, hp.compute_ec, hp.ec, hp.fr_coefficient);
    hauling.params.camber = hp.camber;
    hauling.params.lateral_camber = hp.lateral_camber;
    hauling.params.sweep_tolerance = hp.sweep_tolerance;
    hauling.params.sweep_growth = hp.sweep_growth;
    hauling.params.support_placement_tolerance = hp.support_placement_tolerance;
    hauling.params.impact = ImpactFactors {
        up: hp.impact_up,
        down: hp.impact_down,
    };
    hauling.params.wind = WindLoading {
        wind_type: hp.wind_load_type,
        load: hp.wind_load,
    };
    hauling.left_bunk = hp.left_bunk_point;
    hauling.right_bunk = hp.right_bunk_point;
    hauling.height_of_girder_bottom = hp.hgb;
    hauling.height_of_roll_axis = hp.hrc;
    hauling.truck_rotational_stiffness = hp.ktheta;
    hauling.wheel_line_spacing = hp.wcc;
    hauling.crown_slope = hp.crown_slope;
    hauling.superelevation = hp.superelevation;
    hauling.velocity = hp.velocity;
    hauling.turning_radius = hp.radius;
    hauling.centrifugal_force_type = hp.cf_type;
    hauling.impact_usage = hp.impact_usage;

    let lc = &root.lifting_criteria;
    let lifting_criteria = LiftingCriteria {
        compression_coefficient_global: lc.compression_global,
        compression_coefficient_peak: lc.compression_peak,
        tension: tension_limit(&lc.tension),
        min_fs_cracking: lc.min_fs_cracking,
        min_fs_failure: lc.min_fs_failure,
    };
    let hc = &root.hauling_criteria;
    let hauling_criteria = HaulingCriteria {
        compression_coefficient_global: hc.compression_global,
        compression_coefficient_peak: hc.compression_peak,
        crown_slope_tension: tension_limit(&hc.tension),
        min_fs_cracking: hc.min_fs_cracking,
        min_fs_rollover: hc.min_fs_rollover,
    };

    let settings = match &root.settings {
        Some(block) => AnalysisSettings {
            lrfd_edition: block.lrfd_edition,
            analysis_segments: block.analysis_segments,
            lift_point_offset: block.lift_point_offset,
            deflection_segments: block.deflection_segments,
            roll_tolerance: block.roll_tolerance,
            max_iterations: block.max_iterations,
            angle_scan_steps: block.angle_scan_steps,
            units_mode: root.units,
        },
        None => AnalysisSettings {
            units_mode: root.units,
            ..Default::default()
        },
    };

    let mut model = StabilityModel::default();
    model.set_girder_type(root.girder_type);
    model.set_stress_point_type(root.stress_point_type);
    model.set_girders(girders);
    model.set_modulus_factors(girder_block.k1, girder_block.k2);
    model.set_lifting_problem(lifting);
    model.set_hauling_problem(hauling);
    model.set_lifting_criteria(lifting_criteria);
    model.set_hauling_criteria(hauling_criteria);
    model.set_settings(settings);

    // a stored layout is kept as written; a missing one is seeded from the defaults
    let stored = |block: &Option<StrandsBlock>| block.as_ref().map(strand_layout);
    match (stored(&lp.strands), stored(&hp.strands)) {
        (Some(lifting), Some(hauling)) => {
            let per_model = PerModelType { lifting, hauling };
            model.set_all_strands(PerGirderType {
                prismatic: per_model.clone(),
                non_prismatic: per_model,
            });
        }
        (lifting, hauling) => {
            for girder_type in [GirderType::Prismatic, GirderType::NonPrismatic] {
                model.set_strands(girder_type, ModelType::Lifting, lifting.clone().unwrap_or_default());
                model.set_strands(girder_type, ModelType::Hauling, hauling.clone().unwrap_or_default());
            }
        }
    }

    debug!(
        girder_type = root.girder_type.display_name(),
        sections = model.girder().section_count(),
        "Read stability document"
    );
    Ok(model)
}

fn face_properties(face: &FaceRecord) -> SectionProperties {
    SectionProperties {
        area: face.ag,
        ixx: face.ixx,
        iyy: face.iyy,
        ixy: face.ixy,
        xleft: face.xleft,
        ytop: face.ytop,
        hg: face.hg,
        wtf: face.wtf,
        wbf: face.wbf,
    }
}

fn stress_points(record: StressPointsRecord) -> StressPoints {
    let point = |p: PointRecord| Point2::new(p.x, p.y);
    StressPoints {
        top_left: point(record.top_left),
        top_right: point(record.top_right),
        bottom_left: point(record.bottom_left),
        bottom_right: point(record.bottom_right),
    }
}

fn strand_layout(block: &StrandsBlock) -> StrandLayout {
    let input = |s: &StrandInputRecord| StrandInput {
        fpe: s.fpe,
        xps: s.xps,
        yps: s.yps,
        measure: s.measure,
    };
    StrandLayout {
        method: block.method,
        ex: block.ex,
        fpe_straight: block.fpe_straight,
        ys: block.ys,
        ys_measure: block.ys_measure,
        fpe_harped: block.fpe_harped,
        harp_points: block.harp_points.map(|hp| HarpPoint {
            x: hp.x,
            x_measure: hp.x_measure,
            y: hp.y,
            y_measure: hp.y_measure,
        }),
        fpe_temp: block.fpe_temp,
        yt: block.yt,
        yt_measure: block.yt_measure,
        transfer_length: block.transfer_length,
        fpe_table: block
            .fpe
            .iter()
            .map(|r| FpeRecord {
                x: r.x,
                straight: input(&r.straight),
                harped: input(&r.harped),
                temporary: input(&r.temporary),
            })
            .collect::<Vec<_>>()
            .into(),
    }
}

fn tension_limit(record: &TensionRecord) -> TensionLimit {
    TensionLimit {
        coefficient: record.coefficient,
        has_max: record.has_max,
        max_tension: record.max_tension,
        coefficient_with_rebar: record.coefficient_with_rebar,
    }
}
