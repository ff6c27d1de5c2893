pub mod document;
pub mod source;

pub use document::{
    ActorDocument, FeatureDocument, ItemFlags, SpellDocument, WeaponDocument,
};
pub use source::{load_source_npcs, ItemKind, SourceJutsu, SourceNpc, SourceWeapon, StatBlock};
