//! Batch import behavior against in-memory content sources: ordering,
//! failure isolation, duplicate skipping, working-set reuse, and provenance.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use konoha::content::store::{
    ActorHandle, ContentStore, StoreError, WorldItem,
};
use konoha::convert::icons::IconConfig;
use konoha::import::batch::{ImportOptions, Importer};
use konoha::import::report::ItemOutcome;
use konoha::schema::source::{ItemKind, SourceJutsu, SourceNpc, SourceWeapon, StatBlock};

#[derive(Default)]
struct MemoryStore {
    /// Pre-seeded working-set items.
    items: Vec<WorldItem>,
    /// Pre-existing actors as (name, kind) pairs for the duplicate check.
    existing_actors: Vec<(String, String)>,
    created: Mutex<Vec<ActorHandle>>,
    attached: Mutex<Vec<(String, Vec<Value>)>>,
    world_item_calls: AtomicUsize,
    create_calls: AtomicUsize,
    fail_attach: bool,
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn world_items(&self) -> Result<Vec<WorldItem>, StoreError> {
        self.world_item_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.clone())
    }

    async fn actor_exists(&self, name: &str, kind: &str) -> Result<bool, StoreError> {
        Ok(self
            .existing_actors
            .iter()
            .any(|(n, k)| n == name && k == kind))
    }

    async fn create_actor(&self, document: Value) -> Result<ActorHandle, StoreError> {
        let count = self.create_calls.fetch_add(1, Ordering::SeqCst);
        let handle = ActorHandle {
            id: format!("actor-{count}"),
            name: document
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        };
        self.created
            .lock()
            .expect("lock should not be poisoned")
            .push(handle.clone());
        Ok(handle)
    }

    async fn attach_items(
        &self,
        actor: &ActorHandle,
        items: Vec<Value>,
    ) -> Result<(), StoreError> {
        if self.fail_attach {
            return Err(StoreError::Rejected("attach disabled".to_string()));
        }
        self.attached
            .lock()
            .expect("lock should not be poisoned")
            .push((actor.id.clone(), items));
        Ok(())
    }
}

fn stats() -> StatBlock {
    StatBlock {
        strength: 10,
        dexterity: 14,
        constitution: 12,
        intelligence: 13,
        wisdom: 12,
        charisma: 8,
    }
}

fn npc(name: &str) -> SourceNpc {
    SourceNpc {
        name: name.to_string(),
        clan: None,
        rank: None,
        specialty: None,
        stats: Some(stats()),
        hp: 20,
        max_hp: 20,
        chakra: 10,
        max_chakra: 10,
        ac: 13,
        speed: 30,
        cr: 1.0,
        xp: 200,
        chakra_natures: Vec::new(),
        jutsu: Vec::new(),
        weapons: Vec::new(),
        abilities: Vec::new(),
    }
}

fn jutsu(name: &str, nature: Option<&str>) -> SourceJutsu {
    SourceJutsu {
        name: name.to_string(),
        rank: Some("C".to_string()),
        clan: None,
        nature: nature.map(str::to_string),
        keywords: vec!["Ninjutsu".to_string()],
        components: Vec::new(),
        chakra_cost: 3,
        casting_time: Some("1 Action".to_string()),
        range: Some("30 feet".to_string()),
        duration: Some("Instantaneous".to_string()),
        description: None,
        effects: Vec::new(),
    }
}

fn importer(store: Arc<MemoryStore>) -> Importer {
    Importer::new(store, Vec::new(), IconConfig::default())
}

#[tokio::test]
async fn batch_preserves_input_order_and_isolates_failures() {
    let store = Arc::new(MemoryStore::default());
    let driver = importer(store.clone());

    let mut second = npc("Nara Chunin");
    second.stats = None;
    let npcs = vec![npc("Aburame Genin"), second, npc("Hyuga Jonin")];

    let batch = driver
        .import_batch(&npcs, &ImportOptions::default())
        .await;

    let success_names: Vec<&str> = batch.success.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(success_names, vec!["Aburame Genin", "Hyuga Jonin"]);
    assert_eq!(batch.failed.len(), 1);
    assert_eq!(batch.failed[0].name, "Nara Chunin");
    assert!(batch.failed[0].error.contains("missing field"));
    assert!(batch.skipped.is_empty());
    assert_eq!(batch.total(), 3);
    // The failed NPC never produced an actor.
    assert_eq!(store.created.lock().expect("lock").len(), 2);
}

#[tokio::test]
async fn skip_existing_short_circuits_the_converter() {
    let store = Arc::new(MemoryStore {
        existing_actors: vec![("Aburame Genin".to_string(), "npc".to_string())],
        ..MemoryStore::default()
    });
    let driver = importer(store.clone());

    let progress_log: Mutex<Vec<(usize, usize, String)>> = Mutex::new(Vec::new());
    let progress = |current: usize, total: usize, name: &str| {
        progress_log
            .lock()
            .expect("lock should not be poisoned")
            .push((current, total, name.to_string()));
    };
    let options = ImportOptions {
        skip_existing: true,
        progress: Some(&progress),
    };

    let batch = driver.import_batch(&[npc("Aburame Genin")], &options).await;

    assert_eq!(batch.skipped, vec!["Aburame Genin".to_string()]);
    assert!(batch.success.is_empty());
    // The converter was never invoked for the skipped NPC.
    assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.world_item_calls.load(Ordering::SeqCst), 0);
    // The progress callback still fired, before the duplicate check.
    assert_eq!(
        progress_log.lock().expect("lock").as_slice(),
        &[(1, 1, "Aburame Genin".to_string())]
    );
}

#[tokio::test]
async fn include_existing_imports_duplicates() {
    let store = Arc::new(MemoryStore {
        existing_actors: vec![("Aburame Genin".to_string(), "npc".to_string())],
        ..MemoryStore::default()
    });
    let driver = importer(store.clone());

    let options = ImportOptions {
        skip_existing: false,
        progress: None,
    };
    let batch = driver.import_batch(&[npc("Aburame Genin")], &options).await;

    assert_eq!(batch.success.len(), 1);
    assert!(batch.skipped.is_empty());
}

#[tokio::test]
async fn working_set_item_is_reused_instead_of_synthesized() {
    let existing = json!({
        "_id": "w1",
        "name": "fireball jutsu",
        "type": "spell",
        "system": {"school": "evo"}
    });
    let store = Arc::new(MemoryStore {
        items: vec![WorldItem {
            name: "fireball jutsu".to_string(),
            kind: ItemKind::Spell,
            document: existing,
        }],
        ..MemoryStore::default()
    });
    let driver = importer(store.clone());

    let mut record = npc("Uchiha Genin");
    // Different surface name, identical normalized key.
    record.jutsu.push(jutsu("Fireball Jutsu!", Some("Fire")));

    let batch = driver
        .import_batch(std::slice::from_ref(&record), &ImportOptions::default())
        .await;

    assert_eq!(batch.success.len(), 1);
    let report = &batch.success[0].report;
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].origin, "working-set");
    assert_eq!(report[0].outcome, ItemOutcome::Reused);

    let attached = store.attached.lock().expect("lock");
    let (_, items) = &attached[0];
    assert_eq!(items.len(), 1);
    // Reused clone, with the persistent identity stripped before attach
    // (the store then assigns a fresh embedded id).
    assert_eq!(items[0]["name"], "fireball jutsu");
}

#[tokio::test]
async fn attach_failure_marks_the_npc_failed() {
    let store = Arc::new(MemoryStore {
        fail_attach: true,
        ..MemoryStore::default()
    });
    let driver = importer(store.clone());

    let mut record = npc("Nara Jonin");
    record.weapons.push(SourceWeapon {
        name: "Kunai".to_string(),
        category: "Kunai".to_string(),
        damage: "1d4".to_string(),
        properties: vec!["Thrown (20/60)".to_string()],
        description: None,
    });

    let batch = driver
        .import_batch(std::slice::from_ref(&record), &ImportOptions::default())
        .await;

    assert!(batch.success.is_empty());
    assert_eq!(batch.failed.len(), 1);
    assert!(batch.failed[0].error.contains("item attach failed"));
    // The actor itself was created and is left in place.
    assert_eq!(store.created.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn synthesized_jutsu_carries_nature_verbatim_in_flags() {
    let store = Arc::new(MemoryStore::default());
    let driver = importer(store.clone());

    let mut record = npc("Uchiha Chunin");
    record.jutsu.push(jutsu("Great Fireball", Some("Fire")));

    let batch = driver
        .import_batch(std::slice::from_ref(&record), &ImportOptions::default())
        .await;

    assert_eq!(batch.success[0].report[0].origin, "created");
    let attached = store.attached.lock().expect("lock");
    let (_, items) = &attached[0];
    assert_eq!(items[0]["flags"]["narutogen"]["jutsu"]["nature"], "Fire");
    assert_eq!(
        items[0]["flags"]["narutogen"]["jutsu"]["original"]["name"],
        "Great Fireball"
    );
}

#[tokio::test]
async fn all_item_kinds_resolve_and_attach_together() {
    let store = Arc::new(MemoryStore::default());
    let driver = importer(store.clone());

    let mut record = npc("Aburame Jonin");
    record.jutsu.push(jutsu("Insect Sphere", None));
    record.weapons.push(SourceWeapon {
        name: "Katana".to_string(),
        category: "Katana".to_string(),
        damage: "1d8 + 2".to_string(),
        properties: vec!["Versatile (1d10)".to_string()],
        description: None,
    });
    record
        .abilities
        .push("Insect Swarm: Commands kikaichu beetles.".to_string());

    let batch = driver
        .import_batch(std::slice::from_ref(&record), &ImportOptions::default())
        .await;

    let report = &batch.success[0].report;
    let kinds: Vec<ItemKind> = report.iter().map(|entry| entry.kind).collect();
    assert_eq!(kinds, vec![ItemKind::Spell, ItemKind::Weapon, ItemKind::Feat]);
    assert!(report.iter().all(|entry| entry.outcome == ItemOutcome::Created));

    let attached = store.attached.lock().expect("lock");
    assert_eq!(attached.len(), 1, "one batched attach operation");
    let (_, items) = &attached[0];
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["system"]["damage"]["parts"][0][0], "1d8");
    assert_eq!(items[1]["system"]["damage"]["parts"][0][1], "slashing");
    assert_eq!(items[2]["name"], "Insect Swarm");
}
