//! Per-item import report entries and the CSV export of a batch report.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::import::batch::BatchResult;
use crate::schema::source::ItemKind;

/// What happened to one item during an NPC's import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOutcome {
    /// Synthesized fresh from the source record.
    Created,
    /// Cloned from the working set or a library.
    Reused,
    /// Could not be resolved; the NPC continued without it.
    Failed,
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Reused => "reused",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// One row of an NPC's item report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReportEntry {
    pub name: String,
    pub kind: ItemKind,
    /// "created", "working-set", or the source library's name.
    pub origin: String,
    pub outcome: ItemOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Write the per-item report of a completed batch as CSV, one row per item
/// of every successfully imported NPC.
pub fn write_report_csv(path: impl AsRef<Path>, batch: &BatchResult) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["npc", "item", "kind", "origin", "outcome", "error"])?;
    for imported in &batch.success {
        for entry in &imported.report {
            let outcome = entry.outcome.to_string();
            writer.write_record([
                imported.name.as_str(),
                entry.name.as_str(),
                entry.kind.as_str(),
                entry.origin.as_str(),
                outcome.as_str(),
                entry.error.as_deref().unwrap_or(""),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::store::ActorHandle;
    use crate::import::batch::ImportedNpc;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn csv_export_writes_one_row_per_item() {
        let batch = BatchResult {
            success: vec![ImportedNpc {
                name: "Aburame Genin".to_string(),
                actor: ActorHandle {
                    id: "a1".to_string(),
                    name: "Aburame Genin".to_string(),
                },
                report: vec![
                    ImportReportEntry {
                        name: "Fireball Jutsu".to_string(),
                        kind: ItemKind::Spell,
                        origin: "Jutsu Pack".to_string(),
                        outcome: ItemOutcome::Reused,
                        error: None,
                    },
                    ImportReportEntry {
                        name: "Kunai".to_string(),
                        kind: ItemKind::Weapon,
                        origin: "created".to_string(),
                        outcome: ItemOutcome::Created,
                        error: None,
                    },
                ],
            }],
            failed: Vec::new(),
            skipped: Vec::new(),
        };

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("konoha-report-{stamp}.csv"));
        write_report_csv(&path, &batch).expect("report should be written");

        let raw = std::fs::read_to_string(&path).expect("report should be readable");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "npc,item,kind,origin,outcome,error");
        assert!(lines[1].contains("Fireball Jutsu"));
        assert!(lines[1].contains("reused"));
        assert!(lines[2].contains("created"));

        let _ = std::fs::remove_file(path);
    }
}
