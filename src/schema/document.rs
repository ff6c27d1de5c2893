//! Target documents in the n5eb content-store schema. These are the subset of
//! fields the store requires plus the provenance flags that make every created
//! document traceable back to its source record.

use serde::{Deserialize, Serialize};

use crate::schema::source::{Ability, ItemKind, SourceJutsu, SourceNpc, SourceWeapon};

pub const ACTOR_KIND: &str = "npc";
pub const IMPORT_SOURCE: &str = "narutogen";
pub const IMPORT_SOURCE_LABEL: &str = "Narutogen Import";

/// Fixed proficiency multiplier applied to every imported ability score.
pub const DEFAULT_PROFICIENCY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub img: String,
    pub system: ActorSystem,
    pub flags: ActorFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSystem {
    pub abilities: AbilityScores,
    pub attributes: ActorAttributes,
    pub details: ActorDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "str")]
    pub strength: AbilityScore,
    #[serde(rename = "dex")]
    pub dexterity: AbilityScore,
    #[serde(rename = "con")]
    pub constitution: AbilityScore,
    #[serde(rename = "int")]
    pub intelligence: AbilityScore,
    #[serde(rename = "wis")]
    pub wisdom: AbilityScore,
    #[serde(rename = "cha")]
    pub charisma: AbilityScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub value: i64,
    pub proficient: f64,
}

impl AbilityScore {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            proficient: DEFAULT_PROFICIENCY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorAttributes {
    pub hp: Pool,
    /// Chakra points; the store schema names this resource pool `cp`.
    pub cp: Pool,
    pub ac: ArmorClass,
    pub movement: Movement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub value: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorClass {
    pub flat: u32,
    pub calc: String,
}

impl ArmorClass {
    pub fn flat(value: u32) -> Self {
        Self {
            flat: value,
            calc: "flat".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub walk: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDetails {
    pub biography: Biography,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub cr: f64,
    pub xp: XpValue,
    pub source: SourceLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biography {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureType {
    pub value: String,
    pub subtype: String,
    pub custom: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpValue {
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLabel {
    pub custom: String,
}

/// Actor-level flags: importer provenance plus the summary block sheet
/// macros read (clan, rank, specialty, chakra natures).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorFlags {
    pub konoha: ImportProvenance,
    pub narutogen: ActorSummaryFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProvenance {
    pub source: String,
    pub import_date: String,
    pub original: SourceNpc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummaryFlags {
    pub clan: Option<String>,
    pub rank: Option<String>,
    pub specialty: Option<String>,
    pub chakra_natures: Vec<String>,
}

// ---------------------------------------------------------------------------
// Item documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub img: String,
    pub system: SpellSystem,
    pub flags: ItemFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSystem {
    pub description: Description,
    pub source: SourceLabel,
    pub activation: Activation,
    pub duration: DurationBlock,
    pub target: TargetBlock,
    pub range: RangeBlock,
    pub ability: Option<Ability>,
    pub action_type: String,
    pub damage: DamageBlock,
    pub save: SaveBlock,
    pub level: u8,
    pub school: String,
    pub properties: Vec<String>,
    pub preparation: Preparation,
    pub chakra_cost: u32,
    pub chakra_scaling: ChakraScaling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub img: String,
    pub system: WeaponSystem,
    pub flags: ItemFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponSystem {
    pub description: Description,
    pub quantity: u32,
    pub equipped: bool,
    pub activation: Activation,
    pub target: TargetBlock,
    pub range: RangeBlock,
    pub ability: Ability,
    pub action_type: String,
    pub damage: DamageBlock,
    #[serde(rename = "type")]
    pub category: WeaponCategory,
    pub properties: Vec<String>,
    pub proficient: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponCategory {
    pub value: String,
    pub base_item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub img: String,
    pub system: FeatureSystem,
    pub flags: ItemFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSystem {
    pub description: Description,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub requirements: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureType {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    #[serde(rename = "type")]
    pub kind: String,
    pub cost: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationBlock {
    pub value: String,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBlock {
    pub value: u32,
    pub units: String,
    #[serde(rename = "type")]
    pub shape: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBlock {
    pub value: u32,
    pub long: Option<u32>,
    pub units: String,
}

/// One damage part, `(dice expression, damage type)`. Serializes as a
/// two-element array, the shape the store expects in `damage.parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagePart(pub String, pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageBlock {
    pub parts: Vec<DamagePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBlock {
    pub ability: Option<Ability>,
    pub scaling: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preparation {
    pub mode: String,
    pub prepared: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChakraScaling {
    pub mode: String,
    pub value: u32,
}

impl ChakraScaling {
    /// Scaling is always emitted disabled; the source format carries no
    /// explicit scaling and rank is never used to infer one.
    pub fn none() -> Self {
        Self {
            mode: "none".to_string(),
            value: 0,
        }
    }
}

/// Item-level flags. Exactly one of the kind-specific provenance blocks is
/// present, matching the document's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFlags {
    pub narutogen: ItemProvenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProvenance {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jutsu: Option<JutsuFlags>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weapon: Option<WeaponFlags>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ability: Option<AbilityFlags>,
}

impl ItemProvenance {
    pub fn jutsu(flags: JutsuFlags) -> Self {
        Self {
            jutsu: Some(flags),
            weapon: None,
            ability: None,
        }
    }

    pub fn weapon(flags: WeaponFlags) -> Self {
        Self {
            jutsu: None,
            weapon: Some(flags),
            ability: None,
        }
    }

    pub fn ability(flags: AbilityFlags) -> Self {
        Self {
            jutsu: None,
            weapon: None,
            ability: Some(flags),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JutsuFlags {
    pub rank: Option<String>,
    pub keywords: Vec<String>,
    pub clan: Option<String>,
    pub nature: Option<String>,
    pub components: Vec<String>,
    pub original: SourceJutsu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponFlags {
    pub original_type: String,
    pub original_properties: Vec<String>,
    pub original: SourceWeapon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityFlags {
    pub original_text: String,
}
