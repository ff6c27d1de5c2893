//! Collaborator traits at the engine boundary: the live working set plus
//! persistence (`ContentStore`) and read-only external libraries
//! (`ContentLibrary`). The engine never parses transport bytes itself; it
//! consumes these capabilities and produces documents for them.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::schema::source::ItemKind;

/// One item available in the live working set, with its full document.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldItem {
    pub name: String,
    pub kind: ItemKind,
    pub document: Value,
}

/// Handle to a persisted actor, returned by `create_actor` and consumed by
/// `attach_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorHandle {
    pub id: String,
    pub name: String,
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "store i/o failed: {err}"),
            Self::Serialize(err) => write!(f, "store document malformed: {err}"),
            Self::Rejected(reason) => write!(f, "store rejected operation: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug)]
pub enum LibraryError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    Missing(String),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "library read failed: {err}"),
            Self::Parse(err) => write!(f, "library data malformed: {err}"),
            Self::Missing(id) => write!(f, "library entry '{id}' not found"),
        }
    }
}

impl std::error::Error for LibraryError {}

/// The live working set and persistence capability. Mutable: imports create
/// actors here and attach item documents to them.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every item currently in the working set, with full documents.
    async fn world_items(&self) -> Result<Vec<WorldItem>, StoreError>;

    /// Exact name+kind existence check for actors (not normalized; used by
    /// the batch skip-duplicates option).
    async fn actor_exists(&self, name: &str, kind: &str) -> Result<bool, StoreError>;

    /// Persist a new actor document.
    async fn create_actor(&self, document: Value) -> Result<ActorHandle, StoreError>;

    /// Attach a batch of item documents to an actor in one operation.
    async fn attach_items(&self, actor: &ActorHandle, items: Vec<Value>)
        -> Result<(), StoreError>;
}

/// One entry of an external library's listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
}

/// A named, read-only collection of predefined items.
#[async_trait]
pub trait ContentLibrary: Send + Sync {
    fn name(&self) -> &str;

    /// List every entry (name + kind + fetch id). Called once per index
    /// build; a failure drops this library from the snapshot.
    async fn entries(&self) -> Result<Vec<LibraryEntry>, LibraryError>;

    /// Fetch one entry's full document. A failure here is treated as a miss
    /// by the caller, never as a fatal error.
    async fn fetch(&self, id: &str) -> Result<Value, LibraryError>;
}
