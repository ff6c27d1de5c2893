//! Batch import orchestration: drives NPC conversions end-to-end and
//! collects the success/skip/fail report.

pub mod batch;
pub mod report;

pub use batch::{BatchResult, FailedNpc, ImportError, ImportOptions, ImportedNpc, Importer};
pub use report::{write_report_csv, ImportReportEntry, ItemOutcome};
