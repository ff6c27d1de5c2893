//! JSON payload builders for the import service endpoints. Content sources
//! are opened fresh per request from the configured data directory, so
//! edits to library files on disk are picked up without a restart.

use std::fmt;
use std::fs;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use chrono::TimeZone;
use serde_json::Value;

use crate::content::file_store::{load_libraries, FileStore};
use crate::content::store::ContentStore;
use crate::convert::icons::IconConfig;
use crate::import::batch::{FailedNpc, ImportOptions, Importer};
use crate::schema::source::SourceNpc;

/// Data directory for the file-backed store and libraries.
fn data_dir() -> String {
    std::env::var("KONOHA_DATA").unwrap_or_else(|_| "data".to_string())
}

fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

#[derive(Debug)]
pub enum ApiError {
    Runtime(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime(err) => write!(f, "runtime unavailable: {err}"),
            Self::Serialize(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug)]
pub enum ImportPayloadError {
    Parse(serde_json::Error),
    Shape(&'static str),
    Runtime(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for ImportPayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Shape(message) => write!(f, "{message}"),
            Self::Runtime(err) => write!(f, "runtime unavailable: {err}"),
            Self::Serialize(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ImportPayloadError {}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "konoha-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Configured libraries with their indexed entry counts, in lookup order.
pub fn libraries_payload() -> Result<String, ApiError> {
    let root = data_dir();
    let store = Arc::new(FileStore::new(&root)) as Arc<dyn ContentStore>;
    let libraries = load_libraries(&root);
    let importer = Importer::new(store, libraries, IconConfig::default());

    let counts = runtime()
        .map_err(ApiError::Runtime)?
        .block_on(importer.index().library_counts());
    let libraries: Vec<Value> = counts
        .into_iter()
        .map(|(name, entries)| serde_json::json!({"name": name, "entries": entries}))
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "data_dir": root,
        "libraries": libraries,
    }))
    .map_err(ApiError::Serialize)
}

/// Working-set status: actor count and the actors directory's last-modified
/// time (RFC3339) or null when nothing has been imported yet.
pub fn status_payload() -> Result<String, ApiError> {
    let root = data_dir();
    let actors_dir = std::path::Path::new(&root).join("world/actors");
    let actor_count = fs::read_dir(&actors_dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count()
        })
        .unwrap_or(0);
    let last_modified_iso: Option<String> = fs::metadata(&actors_dir)
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|t| {
            t.duration_since(UNIX_EPOCH).ok().and_then(|d| {
                chrono::Utc
                    .timestamp_opt(d.as_secs() as i64, d.subsec_nanos())
                    .single()
                    .map(|dt| dt.to_rfc3339())
            })
        });
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "data_dir": root,
        "actors": actor_count,
        "last_modified_iso": last_modified_iso,
    }))
    .map_err(ApiError::Serialize)
}

/// Handles POST /api/import: body must be a JSON array of NPC records.
/// Records that fail to parse are reported as failed without blocking the
/// rest of the payload.
pub fn import_payload(body: &str) -> Result<String, ImportPayloadError> {
    let payload: Value = serde_json::from_str(body).map_err(ImportPayloadError::Parse)?;
    let Some(records) = payload.as_array() else {
        return Err(ImportPayloadError::Shape(
            "Request body must be a JSON array of NPC records",
        ));
    };

    let mut npcs = Vec::new();
    let mut unparsed = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("npc[{index}]"));
        match serde_json::from_value::<SourceNpc>(record.clone()) {
            Ok(npc) => npcs.push(npc),
            Err(err) => unparsed.push(FailedNpc {
                name,
                error: format!("unparseable record: {err}"),
            }),
        }
    }

    let root = data_dir();
    let store = Arc::new(FileStore::new(&root)) as Arc<dyn ContentStore>;
    let libraries = load_libraries(&root);
    let importer = Importer::new(store, libraries, IconConfig::default());

    let mut batch = runtime()
        .map_err(ImportPayloadError::Runtime)?
        .block_on(importer.import_batch(&npcs, &ImportOptions::default()));
    batch.failed.extend(unparsed);

    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "summary": batch.summary(),
        "result": batch,
    }))
    .map_err(ImportPayloadError::Serialize)
}
