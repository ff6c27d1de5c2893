//! Multi-source content index: recognizes "this item already exists" across
//! the live working set and the configured external libraries.
//!
//! Library listings are fetched concurrently and cached for the life of the
//! index; the working set is scanned live on every lookup so freshly
//! attached items are visible immediately. The cache is guarded so that
//! concurrent first-time callers await one in-flight build instead of
//! fanning out duplicate queries.

use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::content::store::{ContentLibrary, ContentStore};
use crate::convert::normalize::normalize_key;
use crate::schema::source::ItemKind;

/// Where a resolved item came from. Library origins carry the library name
/// for the import report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    Created,
    WorkingSet,
    Library(String),
}

impl ItemSource {
    pub fn label(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::WorkingSet => "working-set",
            Self::Library(name) => name,
        }
    }
}

impl fmt::Display for ItemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An index hit: the full document plus its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundItem {
    pub document: Value,
    pub origin: ItemSource,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    key: String,
    kind: ItemKind,
    id: String,
}

struct LibrarySnapshot {
    library: Arc<dyn ContentLibrary>,
    entries: Vec<IndexEntry>,
}

type Snapshot = Arc<Vec<LibrarySnapshot>>;

/// Process-lifetime index over the working set and external libraries.
/// Build-once, consult-many; `invalidate` is the only way to refresh, and it
/// replaces the whole snapshot on the next lookup.
pub struct ContentIndex {
    store: Arc<dyn ContentStore>,
    libraries: Vec<Arc<dyn ContentLibrary>>,
    cache: Mutex<Option<Snapshot>>,
}

impl ContentIndex {
    pub fn new(store: Arc<dyn ContentStore>, libraries: Vec<Arc<dyn ContentLibrary>>) -> Self {
        Self {
            store,
            libraries,
            cache: Mutex::new(None),
        }
    }

    /// Drop the cached library snapshot; the next lookup rebuilds it.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    /// The cached library snapshot, building it on first use. The cache lock
    /// is held across the build, so concurrent first-time callers block on
    /// the same fan-out instead of starting their own.
    async fn snapshot(&self) -> Snapshot {
        let mut cache = self.cache.lock().await;
        if let Some(snapshot) = cache.as_ref() {
            return snapshot.clone();
        }

        let indexed = join_all(self.libraries.iter().map(|library| {
            let library = library.clone();
            async move {
                match library.entries().await {
                    Ok(entries) => {
                        let entries = entries
                            .into_iter()
                            .map(|entry| IndexEntry {
                                key: normalize_key(&entry.name),
                                kind: entry.kind,
                                id: entry.id,
                            })
                            .collect();
                        Some(LibrarySnapshot { library, entries })
                    }
                    Err(err) => {
                        eprintln!(
                            "content index: skipping library '{}': {err}",
                            library.name()
                        );
                        None
                    }
                }
            }
        }))
        .await;

        let snapshot: Snapshot = Arc::new(indexed.into_iter().flatten().collect());
        *cache = Some(snapshot.clone());
        snapshot
    }

    /// Entry counts per indexed library, in configuration order.
    pub async fn library_counts(&self) -> Vec<(String, usize)> {
        self.snapshot()
            .await
            .iter()
            .map(|snap| (snap.library.name().to_string(), snap.entries.len()))
            .collect()
    }

    /// Find an existing item equivalent to `name` of `kind`. The working set
    /// strictly precedes every library; libraries are scanned in
    /// configuration order and the first match wins. A failed document fetch
    /// is logged and treated as a miss.
    pub async fn find(&self, name: &str, kind: ItemKind) -> Option<FoundItem> {
        let key = normalize_key(name);

        match self.store.world_items().await {
            Ok(items) => {
                for item in items {
                    if item.kind == kind && normalize_key(&item.name) == key {
                        return Some(FoundItem {
                            document: item.document,
                            origin: ItemSource::WorkingSet,
                        });
                    }
                }
            }
            Err(err) => {
                eprintln!("content index: working set unavailable: {err}");
            }
        }

        for snap in self.snapshot().await.iter() {
            let Some(entry) = snap
                .entries
                .iter()
                .find(|entry| entry.kind == kind && entry.key == key)
            else {
                continue;
            };
            match snap.library.fetch(&entry.id).await {
                Ok(document) => {
                    return Some(FoundItem {
                        document,
                        origin: ItemSource::Library(snap.library.name().to_string()),
                    });
                }
                Err(err) => {
                    eprintln!(
                        "content index: failed to fetch '{}' from '{}': {err}",
                        name,
                        snap.library.name()
                    );
                }
            }
        }

        None
    }
}
