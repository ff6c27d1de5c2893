//! Pre-import validation of narutogen NPC files. Works on the raw JSON so a
//! half-broken file yields diagnostics instead of one parse error; the
//! import itself stays tolerant, this is the stricter opt-in check.

use std::fmt;
use std::fs;

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

const STAT_KEYS: [&str; 6] = ["str", "dex", "con", "int", "wis", "cha"];
const MAPPED_NATURES: [&str; 5] = ["fire", "water", "wind", "earth", "lightning"];

/// Validate a narutogen NPC file (single record or array of records).
pub fn validate_npc_file(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{path}': {err}"))?;

    let single = [payload.clone()];
    let entries: &[Value] = match payload.as_array() {
        Some(entries) => entries.as_slice(),
        None => &single,
    };

    let mut report = ValidationReport::default();
    for (index, entry) in entries.iter().enumerate() {
        validate_npc(&mut report, entry, index);
    }
    Ok(report)
}

fn validate_npc(report: &mut ValidationReport, entry: &Value, index: usize) {
    let base_context = format!("npc[{index}]");
    let Some(object) = entry.as_object() else {
        report.push(
            ValidationSeverity::Error,
            base_context,
            "record is not an object",
        );
        return;
    };

    let name = match object.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            report.push(
                ValidationSeverity::Error,
                format!("{base_context}.name"),
                "missing non-empty 'name'",
            );
            "<unnamed>".to_string()
        }
    };
    let context = format!("npc[{index}] '{name}'");

    validate_stats(report, object, &context);

    for key in ["hp", "maxHp", "chakra", "maxChakra", "ac"] {
        if object.get(key).and_then(Value::as_u64).unwrap_or(0) == 0 {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.{key}"),
                format!("'{key}' is zero or missing"),
            );
        }
    }

    if let Some(jutsu) = object.get("jutsu").and_then(Value::as_array) {
        for (jutsu_index, jutsu) in jutsu.iter().enumerate() {
            validate_jutsu(report, jutsu, &context, jutsu_index);
        }
    }

    if let Some(weapons) = object.get("weapons").and_then(Value::as_array) {
        for (weapon_index, weapon) in weapons.iter().enumerate() {
            let weapon_context = format!("{context}.weapons[{weapon_index}]");
            match weapon.get("name").and_then(Value::as_str) {
                Some(name) if !name.trim().is_empty() => {}
                _ => report.push(
                    ValidationSeverity::Error,
                    weapon_context.clone(),
                    "missing non-empty 'name'",
                ),
            }
            match weapon.get("damage").and_then(Value::as_str) {
                Some(damage) if !damage.trim().is_empty() => {}
                _ => report.push(
                    ValidationSeverity::Warning,
                    weapon_context,
                    "missing damage text; the 1d4 piercing fallback will be used",
                ),
            }
        }
    }
}

fn validate_stats(report: &mut ValidationReport, object: &Map<String, Value>, context: &str) {
    let Some(stats) = object.get("stats") else {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.stats"),
            "missing stats block; the import will reject this record",
        );
        return;
    };
    let Some(stats) = stats.as_object() else {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.stats"),
            "expected object",
        );
        return;
    };
    for key in STAT_KEYS {
        if stats.get(key).and_then(Value::as_i64).is_none() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.stats.{key}"),
                format!("missing numeric '{key}'"),
            );
        }
    }
}

fn validate_jutsu(report: &mut ValidationReport, jutsu: &Value, context: &str, index: usize) {
    let jutsu_context = format!("{context}.jutsu[{index}]");
    let Some(object) = jutsu.as_object() else {
        report.push(
            ValidationSeverity::Error,
            jutsu_context,
            "jutsu is not an object",
        );
        return;
    };

    match object.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => {}
        _ => report.push(
            ValidationSeverity::Error,
            format!("{jutsu_context}.name"),
            "missing non-empty 'name'",
        ),
    }

    if let Some(nature) = object.get("nature").and_then(Value::as_str) {
        if !MAPPED_NATURES.contains(&nature.to_lowercase().as_str()) {
            report.push(
                ValidationSeverity::Info,
                format!("{jutsu_context}.nature"),
                format!("nature '{nature}' has no school mapping; evocation will be used"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn write_fixture(name: &str, content: &str) -> std::path::PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("konoha-validate-{name}-{stamp}.json"));
        fs::write(&path, content).expect("fixture should be written");
        path
    }

    #[test]
    fn missing_stats_and_name_are_errors() {
        let path = write_fixture("errors", r#"[{"hp": 10}]"#);
        let report =
            validate_npc_file(path.to_string_lossy().as_ref()).expect("file should be readable");
        assert!(report.has_errors());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.context.ends_with(".name")));
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.message.contains("missing stats block")));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn complete_record_yields_no_errors() {
        let path = write_fixture(
            "clean",
            r#"{
                "name": "Test NPC",
                "stats": {"str": 10, "dex": 12, "con": 11, "int": 10, "wis": 10, "cha": 9},
                "hp": 10, "maxHp": 10, "chakra": 5, "maxChakra": 5, "ac": 12
            }"#,
        );
        let report =
            validate_npc_file(path.to_string_lossy().as_ref()).expect("file should be readable");
        assert!(!report.has_errors());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unmapped_nature_is_informational() {
        let path = write_fixture(
            "nature",
            r#"{
                "name": "Test NPC",
                "stats": {"str": 10, "dex": 12, "con": 11, "int": 10, "wis": 10, "cha": 9},
                "hp": 10, "maxHp": 10, "chakra": 5, "maxChakra": 5, "ac": 12,
                "jutsu": [{"name": "Ice Spike", "nature": "Ice"}]
            }"#,
        );
        let report =
            validate_npc_file(path.to_string_lossy().as_ref()).expect("file should be readable");
        assert!(!report.has_errors());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.severity == ValidationSeverity::Info && d.message.contains("Ice")));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unreadable_file_is_a_top_level_error() {
        let err = validate_npc_file("/nonexistent/npcs.json").expect_err("read should fail");
        assert!(err.contains("unable to read"));
    }
}
