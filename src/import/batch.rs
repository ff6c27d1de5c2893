//! Import orchestrator: one NPC end-to-end (create actor, resolve items,
//! batched attach) and the batch driver over many NPCs.
//!
//! Failure containment, from the inside out: extractor issues become
//! defaults and never surface; a single item failing to resolve is recorded
//! and the NPC continues; actor creation or attach failure fails only that
//! NPC; nothing aborts the batch. The batch always completes with a full
//! report.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::content::index::ContentIndex;
use crate::content::store::{ActorHandle, ContentLibrary, ContentStore, StoreError};
use crate::convert::actor::{convert_actor, ConvertError};
use crate::convert::icons::IconConfig;
use crate::convert::resolve::{ItemResolver, ResolveError, ResolvedItem};
use crate::import::report::{ImportReportEntry, ItemOutcome};
use crate::schema::document::ACTOR_KIND;
use crate::schema::source::{ItemKind, SourceNpc};

#[derive(Debug)]
pub enum ImportError {
    /// The source record could not be converted; no actor was created.
    Convert(ConvertError),
    /// Persisting the actor document failed; no actor exists.
    Create(StoreError),
    /// The batched item attach failed; the actor and any documents already
    /// persisted are left in place.
    Attach(StoreError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert(err) => write!(f, "{err}"),
            Self::Create(err) => write!(f, "actor creation failed: {err}"),
            Self::Attach(err) => write!(f, "item attach failed: {err}"),
        }
    }
}

impl std::error::Error for ImportError {}

/// Progress callback, invoked before each NPC with its 1-based position,
/// the batch size, and the NPC's name.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize, &str) + Send + Sync);

pub struct ImportOptions<'a> {
    /// Skip NPCs whose exact name+kind already exists in the store.
    pub skip_existing: bool,
    pub progress: Option<ProgressFn<'a>>,
}

impl Default for ImportOptions<'_> {
    fn default() -> Self {
        Self {
            skip_existing: true,
            progress: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedNpc {
    pub name: String,
    pub actor: ActorHandle,
    pub report: Vec<ImportReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedNpc {
    pub name: String,
    pub error: String,
}

/// Outcome of a whole batch, in input order per bucket. Partial success is
/// the expected common case, not an exceptional one.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct BatchResult {
    pub success: Vec<ImportedNpc>,
    pub failed: Vec<FailedNpc>,
    pub skipped: Vec<String>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.success.len() + self.failed.len() + self.skipped.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "imported {} of {} ({} skipped, {} failed)",
            self.success.len(),
            self.total(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Drives imports against one store + library configuration. Holds no
/// per-batch state; the only cached piece is the content index snapshot.
pub struct Importer {
    store: Arc<dyn ContentStore>,
    index: ContentIndex,
    icons: IconConfig,
}

impl Importer {
    pub fn new(
        store: Arc<dyn ContentStore>,
        libraries: Vec<Arc<dyn ContentLibrary>>,
        icons: IconConfig,
    ) -> Self {
        let index = ContentIndex::new(store.clone(), libraries);
        Self {
            store,
            index,
            icons,
        }
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    /// Import a single NPC: create the actor, resolve every item, attach the
    /// resolved documents in one batched operation.
    pub async fn import_npc(&self, npc: &SourceNpc) -> Result<ImportedNpc, ImportError> {
        let actor_document = convert_actor(npc, &self.icons).map_err(ImportError::Convert)?;
        let actor_value = serde_json::to_value(&actor_document)
            .map_err(|err| ImportError::Create(StoreError::Serialize(err)))?;
        let handle = self
            .store
            .create_actor(actor_value)
            .await
            .map_err(ImportError::Create)?;

        let resolver = ItemResolver {
            index: &self.index,
            icons: &self.icons,
        };
        let mut report = Vec::new();
        let mut documents = Vec::new();

        for jutsu in &npc.jutsu {
            let resolved = resolver.resolve_jutsu(jutsu).await;
            record(&mut report, &mut documents, &jutsu.name, ItemKind::Spell, resolved);
        }
        for weapon in &npc.weapons {
            let resolved = resolver.resolve_weapon(weapon).await;
            record(&mut report, &mut documents, &weapon.name, ItemKind::Weapon, resolved);
        }
        for ability in &npc.abilities {
            let resolved = resolver.resolve_feature(ability);
            let name = crate::convert::feature::feature_name(ability);
            record(&mut report, &mut documents, &name, ItemKind::Feat, resolved);
        }

        if !documents.is_empty() {
            self.store
                .attach_items(&handle, documents)
                .await
                .map_err(ImportError::Attach)?;
        }

        Ok(ImportedNpc {
            name: npc.name.clone(),
            actor: handle,
            report,
        })
    }

    /// Import a list of NPCs in input order. One NPC's failure never
    /// prevents the rest from being attempted.
    pub async fn import_batch(
        &self,
        npcs: &[SourceNpc],
        options: &ImportOptions<'_>,
    ) -> BatchResult {
        let mut result = BatchResult::default();
        let total = npcs.len();

        for (position, npc) in npcs.iter().enumerate() {
            if let Some(progress) = options.progress {
                progress(position + 1, total, &npc.name);
            }

            if options.skip_existing {
                match self.store.actor_exists(&npc.name, ACTOR_KIND).await {
                    Ok(true) => {
                        result.skipped.push(npc.name.clone());
                        continue;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        // Duplicate check failing must not block the import.
                        eprintln!(
                            "batch import: duplicate check failed for '{}': {err}",
                            npc.name
                        );
                    }
                }
            }

            match self.import_npc(npc).await {
                Ok(imported) => result.success.push(imported),
                Err(err) => result.failed.push(FailedNpc {
                    name: npc.name.clone(),
                    error: err.to_string(),
                }),
            }
        }

        result
    }
}

fn record(
    report: &mut Vec<ImportReportEntry>,
    documents: &mut Vec<serde_json::Value>,
    name: &str,
    kind: ItemKind,
    resolved: Result<ResolvedItem, ResolveError>,
) {
    match resolved {
        Ok(item) => {
            let outcome = match &item.origin {
                crate::content::index::ItemSource::Created => ItemOutcome::Created,
                _ => ItemOutcome::Reused,
            };
            report.push(ImportReportEntry {
                name: item.name,
                kind,
                origin: item.origin.label().to_string(),
                outcome,
                error: None,
            });
            documents.push(item.document);
        }
        Err(err) => {
            report.push(ImportReportEntry {
                name: name.to_string(),
                kind,
                origin: String::new(),
                outcome: ItemOutcome::Failed,
                error: Some(err.to_string()),
            });
        }
    }
}
