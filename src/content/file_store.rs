//! File-backed content store and libraries for the CLI and server.
//!
//! Layout mirrors the rest of the data directory: libraries live under
//! `<root>/libraries/<lib>/` as an `index.json` listing plus one
//! `<id>.json` document per entry; the working set lives under
//! `<root>/world/items/` and `<root>/world/actors/`, one JSON document per
//! file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::content::store::{
    ActorHandle, ContentLibrary, ContentStore, LibraryEntry, LibraryError, StoreError, WorldItem,
};
use crate::schema::source::ItemKind;

/// Working set rooted at `<root>/world`. Documents are plain JSON files;
/// ids are assigned on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn items_dir(&self) -> PathBuf {
        self.root.join("world/items")
    }

    fn actors_dir(&self) -> PathBuf {
        self.root.join("world/actors")
    }

    fn read_documents(dir: &Path) -> Vec<Value> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();
        paths
            .into_iter()
            .filter_map(|path| {
                let raw = fs::read_to_string(&path).ok()?;
                match serde_json::from_str(&raw) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        eprintln!("file store: skipping '{}': {err}", path.display());
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl ContentStore for FileStore {
    async fn world_items(&self) -> Result<Vec<WorldItem>, StoreError> {
        let items = Self::read_documents(&self.items_dir())
            .into_iter()
            .filter_map(|document| {
                let name = document.get("name")?.as_str()?.to_string();
                let kind = ItemKind::parse(document.get("type")?.as_str()?)?;
                Some(WorldItem {
                    name,
                    kind,
                    document,
                })
            })
            .collect();
        Ok(items)
    }

    async fn actor_exists(&self, name: &str, kind: &str) -> Result<bool, StoreError> {
        let exists = Self::read_documents(&self.actors_dir()).iter().any(|doc| {
            doc.get("name").and_then(Value::as_str) == Some(name)
                && doc.get("type").and_then(Value::as_str) == Some(kind)
        });
        Ok(exists)
    }

    async fn create_actor(&self, mut document: Value) -> Result<ActorHandle, StoreError> {
        let name = document
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let id = Uuid::new_v4().simple().to_string();
        match document.as_object_mut() {
            Some(map) => {
                map.insert("_id".to_string(), Value::String(id.clone()));
            }
            None => {
                return Err(StoreError::Rejected(
                    "actor document must be a JSON object".to_string(),
                ))
            }
        }
        let dir = self.actors_dir();
        fs::create_dir_all(&dir).map_err(StoreError::Io)?;
        let serialized = serde_json::to_string_pretty(&document).map_err(StoreError::Serialize)?;
        fs::write(dir.join(format!("{id}.json")), serialized).map_err(StoreError::Io)?;
        Ok(ActorHandle { id, name })
    }

    async fn attach_items(
        &self,
        actor: &ActorHandle,
        items: Vec<Value>,
    ) -> Result<(), StoreError> {
        let path = self.actors_dir().join(format!("{}.json", actor.id));
        let raw = fs::read_to_string(&path).map_err(StoreError::Io)?;
        let mut document: Value = serde_json::from_str(&raw).map_err(StoreError::Serialize)?;
        let map = document.as_object_mut().ok_or_else(|| {
            StoreError::Rejected("actor document must be a JSON object".to_string())
        })?;
        let embedded = map
            .entry("items".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(embedded) = embedded.as_array_mut() else {
            return Err(StoreError::Rejected(
                "actor items field must be an array".to_string(),
            ));
        };
        for mut item in items {
            if let Some(item_map) = item.as_object_mut() {
                item_map.insert(
                    "_id".to_string(),
                    Value::String(Uuid::new_v4().simple().to_string()),
                );
            }
            embedded.push(item);
        }
        let serialized = serde_json::to_string_pretty(&document).map_err(StoreError::Serialize)?;
        fs::write(&path, serialized).map_err(StoreError::Io)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct LibraryIndexFile {
    #[serde(default)]
    name: Option<String>,
    entries: Vec<LibraryIndexEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryIndexEntry {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Read-only library backed by a directory: `index.json` plus one
/// `<id>.json` per entry.
#[derive(Debug, Clone)]
pub struct FileLibrary {
    name: String,
    dir: PathBuf,
}

impl FileLibrary {
    /// Open a library directory. Returns `None` when `index.json` is missing
    /// or malformed; the caller skips the directory.
    pub fn open(dir: impl Into<PathBuf>) -> Option<FileLibrary> {
        let dir = dir.into();
        let raw = fs::read_to_string(dir.join("index.json")).ok()?;
        let index: LibraryIndexFile = serde_json::from_str(&raw).ok()?;
        let name = index.name.unwrap_or_else(|| {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "library".to_string())
        });
        Some(FileLibrary { name, dir })
    }
}

#[async_trait]
impl ContentLibrary for FileLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    async fn entries(&self) -> Result<Vec<LibraryEntry>, LibraryError> {
        let raw = fs::read_to_string(self.dir.join("index.json")).map_err(LibraryError::Read)?;
        let index: LibraryIndexFile = serde_json::from_str(&raw).map_err(LibraryError::Parse)?;
        // Entries of kinds this importer does not handle are skipped.
        let entries = index
            .entries
            .into_iter()
            .filter_map(|entry| {
                let kind = ItemKind::parse(&entry.kind)?;
                Some(LibraryEntry {
                    id: entry.id,
                    name: entry.name,
                    kind,
                })
            })
            .collect();
        Ok(entries)
    }

    async fn fetch(&self, id: &str) -> Result<Value, LibraryError> {
        let path = self.dir.join(format!("{id}.json"));
        if !path.is_file() {
            return Err(LibraryError::Missing(id.to_string()));
        }
        let raw = fs::read_to_string(&path).map_err(LibraryError::Read)?;
        serde_json::from_str(&raw).map_err(LibraryError::Parse)
    }
}

/// Discover libraries under `<root>/libraries`, in sorted directory order so
/// lookup precedence is stable across runs.
pub fn load_libraries(root: impl AsRef<Path>) -> Vec<Arc<dyn ContentLibrary>> {
    let dir = root.as_ref().join("libraries");
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs.into_iter()
        .filter_map(|path| {
            FileLibrary::open(&path).map(|lib| Arc::new(lib) as Arc<dyn ContentLibrary>)
        })
        .collect()
}
