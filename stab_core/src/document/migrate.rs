//! Per-block document migrations.
//!
//! Every block carries a `Version`. A block older than the current version
//! is brought forward one step at a time; each step is a pure function from
//! the old JSON object to the next one. A block newer than this build
//! understands is rejected with [`StabError::VersionMismatch`].

use serde_json::{Map, Value};

use crate::errors::{StabError, StabResult};

/// A single migration step from version `n` to `n + 1`
pub type Migration = fn(Value) -> StabResult<Value>;

pub const ROOT_VERSION: u32 = 2;
pub const GIRDER_VERSION: u32 = 2;
pub const SECTIONS_VERSION: u32 = 1;
pub const SECTION_VERSION: u32 = 1;
pub const FACE_VERSION: u32 = 2;
pub const STRANDS_VERSION: u32 = 1;
pub const PROBLEM_VERSION: u32 = 5;
pub const CRITERIA_VERSION: u32 = 1;
pub const SETTINGS_VERSION: u32 = 1;

const ROOT_MIGRATIONS: [Migration; 1] = [root_v1_to_v2];
const GIRDER_MIGRATIONS: [Migration; 1] = [girder_v1_to_v2];
const FACE_MIGRATIONS: [Migration; 1] = [face_v1_to_v2];
const PROBLEM_MIGRATIONS: [Migration; 4] = [problem_v1_to_v2, problem_v2_to_v3, problem_v3_to_v4, problem_v4_to_v5];

// ============================================================================
// Document walk
// ============================================================================

/// Bring every block of a parsed document to its current version
pub fn upgrade_document(mut document: Value) -> StabResult<Value> {
    let root = object_mut(&mut document, "document")?;
    let block = root
        .remove("PGStable")
        .ok_or_else(|| StabError::missing_field("PGStable"))?;

    let mut block = upgrade("PGStable", block, ROOT_VERSION, &ROOT_MIGRATIONS)?;
    let fields = object_mut(&mut block, "PGStable")?;

    if let Some(girder) = fields.remove("Girder") {
        fields.insert("Girder".into(), upgrade_girder(girder)?);
    }
    for name in ["LiftingProblem", "HaulingProblem"] {
        if let Some(problem) = fields.remove(name) {
            fields.insert(name.into(), upgrade_problem(name, problem)?);
        }
    }
    for name in ["LiftingCriteria", "HaulingCriteria"] {
        if let Some(criteria) = fields.remove(name) {
            fields.insert(name.into(), upgrade(name, criteria, CRITERIA_VERSION, &[])?);
        }
    }
    if let Some(settings) = fields.remove("Settings") {
        fields.insert("Settings".into(), upgrade("Settings", settings, SETTINGS_VERSION, &[])?);
    }

    root.insert("PGStable".into(), block);
    Ok(document)
}

fn upgrade_girder(girder: Value) -> StabResult<Value> {
    let mut girder = upgrade("Girder", girder, GIRDER_VERSION, &GIRDER_MIGRATIONS)?;
    let fields = object_mut(&mut girder, "Girder")?;
    if let Some(sections) = fields.remove("Sections") {
        let mut sections = upgrade("Sections", sections, SECTIONS_VERSION, &[])?;
        let list = object_mut(&mut sections, "Sections")?;
        if let Some(Value::Array(items)) = list.remove("Section") {
            let upgraded = items
                .into_iter()
                .map(upgrade_section)
                .collect::<StabResult<Vec<_>>>()?;
            list.insert("Section".into(), Value::Array(upgraded));
        }
        fields.insert("Sections".into(), sections);
    }
    Ok(girder)
}

fn upgrade_section(section: Value) -> StabResult<Value> {
    let mut section = upgrade("Section", section, SECTION_VERSION, &[])?;
    let fields = object_mut(&mut section, "Section")?;
    for face in ["StartFace", "EndFace"] {
        if let Some(value) = fields.remove(face) {
            fields.insert(face.into(), upgrade(face, value, FACE_VERSION, &FACE_MIGRATIONS)?);
        }
    }
    Ok(section)
}

fn upgrade_problem(name: &str, problem: Value) -> StabResult<Value> {
    let mut problem = upgrade(name, problem, PROBLEM_VERSION, &PROBLEM_MIGRATIONS)?;
    let fields = object_mut(&mut problem, name)?;
    if let Some(strands) = fields.remove("Strands") {
        fields.insert("Strands".into(), upgrade("Strands", strands, STRANDS_VERSION, &[])?);
    }
    Ok(problem)
}

/// Apply the migrations needed to bring `block` to `current`.
///
/// `migrations[i]` takes version `i + 1` to `i + 2`.
pub fn upgrade(name: &str, mut block: Value, current: u32, migrations: &[Migration]) -> StabResult<Value> {
    debug_assert_eq!(migrations.len() as u32, current - 1);
    let version = block_version(name, &block)?;
    if version > current {
        return Err(StabError::VersionMismatch {
            block: name.to_string(),
            file_version: version,
            supported_version: current,
        });
    }
    for step in (version as usize - 1)..migrations.len() {
        block = migrations[step](block)?;
    }
    object_mut(&mut block, name)?.insert("Version".into(), Value::from(current));
    Ok(block)
}

/// Read the `Version` of a block; versions may be written as `2` or `2.0`
pub fn block_version(name: &str, block: &Value) -> StabResult<u32> {
    let value = block
        .get("Version")
        .ok_or_else(|| StabError::missing_field(format!("{name}.Version")))?;
    match value.as_f64() {
        Some(v) if v >= 1.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(v as u32),
        _ => Err(StabError::invalid_format(format!("{name} has an invalid version: {value}"))),
    }
}

fn object_mut<'a>(value: &'a mut Value, name: &str) -> StabResult<&'a mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| StabError::invalid_format(format!("{name} must be an object")))
}

fn number(fields: &Map<String, Value>, block: &str, key: &str) -> StabResult<f64> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| StabError::missing_field(format!("{block}.{key}")))
}

// ============================================================================
// Steps
// ============================================================================

/// Stress point mode and precamber were added
fn root_v1_to_v2(mut block: Value) -> StabResult<Value> {
    let fields = object_mut(&mut block, "PGStable")?;
    fields.entry("StressPointType").or_insert_with(|| Value::from("Computed"));
    fields.entry("Precamber").or_insert_with(|| Value::from(0.0));
    Ok(block)
}

/// Concrete type was added; older files are normal weight
fn girder_v1_to_v2(mut block: Value) -> StabResult<Value> {
    let fields = object_mut(&mut block, "Girder")?;
    fields.entry("ConcreteType").or_insert_with(|| Value::from("Normal"));
    Ok(block)
}

/// Product of inertia and horizontal centroid were added, `Yt` became `Ytop`.
///
/// Older sections were symmetric about the web; the centroid is placed at
/// the middle of the top flange.
fn face_v1_to_v2(mut block: Value) -> StabResult<Value> {
    let fields = object_mut(&mut block, "Face")?;
    let wtf = number(fields, "Face", "Wtf")?;
    let ytop = fields
        .remove("Yt")
        .ok_or_else(|| StabError::missing_field("Face.Yt"))?;
    fields.insert("Ytop".into(), ytop);
    fields.entry("Ixy").or_insert_with(|| Value::from(0.0));
    fields.entry("Xleft").or_insert_with(|| Value::from(wtf / 2.0));
    Ok(block)
}

/// `PlumbGirderStresses` was replaced by its inverse
fn problem_v1_to_v2(mut block: Value) -> StabResult<Value> {
    let fields = object_mut(&mut block, "Problem")?;
    if let Some(plumb) = fields.remove("PlumbGirderStresses") {
        let plumb = plumb
            .as_bool()
            .ok_or_else(|| StabError::invalid_format("PlumbGirderStresses must be a boolean"))?;
        fields.insert("EvaluateStressesAtEquilibriumAngle".into(), Value::from(!plumb));
    }
    Ok(block)
}

fn problem_v2_to_v3(mut block: Value) -> StabResult<Value> {
    let fields = object_mut(&mut block, "Problem")?;
    fields.entry("LateralCamber").or_insert_with(|| Value::from(0.0));
    Ok(block)
}

/// Stresses are always reported for both the plumb and tilted girder
fn problem_v3_to_v4(mut block: Value) -> StabResult<Value> {
    let fields = object_mut(&mut block, "Problem")?;
    fields.remove("DirectCamber");
    fields.remove("EvaluateStressesAtEquilibriumAngle");
    Ok(block)
}

fn problem_v4_to_v5(mut block: Value) -> StabResult<Value> {
    let fields = object_mut(&mut block, "Problem")?;
    fields.entry("SweepGrowth").or_insert_with(|| Value::from(0.0));
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_accepts_float() {
        assert_eq!(block_version("Girder", &json!({ "Version": 2.0 })).unwrap(), 2);
        assert_eq!(block_version("Girder", &json!({ "Version": 1 })).unwrap(), 1);
    }

    #[test]
    fn test_version_rejects_garbage() {
        assert!(matches!(
            block_version("Girder", &json!({})),
            Err(StabError::MissingField { .. })
        ));
        assert!(matches!(
            block_version("Girder", &json!({ "Version": 1.5 })),
            Err(StabError::InvalidFileFormat { .. })
        ));
        assert!(block_version("Girder", &json!({ "Version": 0 })).is_err());
    }

    #[test]
    fn test_newer_block_rejected() {
        let result = upgrade("Girder", json!({ "Version": 3 }), GIRDER_VERSION, &GIRDER_MIGRATIONS);
        assert_eq!(
            result,
            Err(StabError::VersionMismatch {
                block: "Girder".into(),
                file_version: 3,
                supported_version: 2,
            })
        );
    }

    #[test]
    fn test_face_v1() {
        let face = json!({ "Version": 1, "Ag": 0.5, "Yt": -0.9, "Wtf": 1.2 });
        let face = upgrade("StartFace", face, FACE_VERSION, &FACE_MIGRATIONS).unwrap();
        assert_eq!(face["Version"], 2);
        assert_eq!(face["Ytop"], -0.9);
        assert_eq!(face["Xleft"], 0.6);
        assert_eq!(face["Ixy"], 0.0);
        assert!(face.get("Yt").is_none());
    }

    #[test]
    fn test_face_v1_without_yt_is_missing_field() {
        let face = json!({ "Version": 1, "Wtf": 1.2 });
        assert!(matches!(
            upgrade("StartFace", face, FACE_VERSION, &FACE_MIGRATIONS),
            Err(StabError::MissingField { .. })
        ));
    }

    #[test]
    fn test_problem_v1_through_v5() {
        let problem = json!({
            "Version": 1,
            "Camber": 0.05,
            "DirectCamber": true,
            "PlumbGirderStresses": true
        });
        let problem = upgrade("LiftingProblem", problem, PROBLEM_VERSION, &PROBLEM_MIGRATIONS).unwrap();
        assert_eq!(problem["Version"], 5);
        assert_eq!(problem["LateralCamber"], 0.0);
        assert_eq!(problem["SweepGrowth"], 0.0);
        assert_eq!(problem["Camber"], 0.05);
        assert!(problem.get("DirectCamber").is_none());
        assert!(problem.get("PlumbGirderStresses").is_none());
        assert!(problem.get("EvaluateStressesAtEquilibriumAngle").is_none());
    }

    #[test]
    fn test_plumb_flag_is_inverted() {
        let v2 = problem_v1_to_v2(json!({ "PlumbGirderStresses": true })).unwrap();
        assert_eq!(v2["EvaluateStressesAtEquilibriumAngle"], false);
    }

    #[test]
    fn test_current_block_untouched() {
        let problem = json!({ "Version": 5, "SweepGrowth": 0.01, "LateralCamber": 0.02 });
        let upgraded = upgrade("HaulingProblem", problem.clone(), PROBLEM_VERSION, &PROBLEM_MIGRATIONS).unwrap();
        assert_eq!(upgraded, problem);
    }

    #[test]
    fn test_missing_root_block() {
        assert!(matches!(
            upgrade_document(json!({ "Other": {} })),
            Err(StabError::MissingField { .. })
        ));
    }
}
