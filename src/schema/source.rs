//! Source NPC records as produced by the narutogen generator.
//! Loosely typed on purpose: everything except `name` is optional and the
//! converter degrades to documented defaults instead of failing.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Six-ability stat block. Required as a whole for actor creation; a record
/// without one is rejected with a missing-field error, never silently zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(rename = "str")]
    pub strength: i64,
    #[serde(rename = "dex")]
    pub dexterity: i64,
    #[serde(rename = "con")]
    pub constitution: i64,
    #[serde(rename = "int")]
    pub intelligence: i64,
    #[serde(rename = "wis")]
    pub wisdom: i64,
    #[serde(rename = "cha")]
    pub charisma: i64,
}

/// One of the six ability identifiers used across documents (governing
/// ability, save ability, weapon attack ability).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Item document categories recognized by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Spell,
    Weapon,
    Feat,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spell => "spell",
            Self::Weapon => "weapon",
            Self::Feat => "feat",
        }
    }

    /// Parse a store-level type string. Unknown types return `None` so index
    /// builders can skip entries this importer does not handle.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "spell" => Some(Self::Spell),
            "weapon" => Some(Self::Weapon),
            "feat" => Some(Self::Feat),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One NPC record from a narutogen export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNpc {
    pub name: String,
    #[serde(default)]
    pub clan: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub stats: Option<StatBlock>,
    #[serde(default)]
    pub hp: u32,
    #[serde(default)]
    pub max_hp: u32,
    #[serde(default)]
    pub chakra: u32,
    #[serde(default)]
    pub max_chakra: u32,
    #[serde(default)]
    pub ac: u32,
    #[serde(default)]
    pub speed: u32,
    /// Challenge rating; fractional values (1/2, 1/4) are legal.
    #[serde(default)]
    pub cr: f64,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub chakra_natures: Vec<String>,
    #[serde(default)]
    pub jutsu: Vec<SourceJutsu>,
    #[serde(default)]
    pub weapons: Vec<SourceWeapon>,
    /// Free-text special abilities, `"<Name>: <description>"` per entry.
    #[serde(default)]
    pub abilities: Vec<String>,
}

/// One jutsu (spell-like ability) from a source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceJutsu {
    pub name: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub clan: Option<String>,
    #[serde(default)]
    pub nature: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub chakra_cost: u32,
    #[serde(default)]
    pub casting_time: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub effects: Vec<String>,
}

/// One weapon from a source record. `type` is a free-text category
/// ("Kunai", "Katana", ...); `damage` a free-text dice expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceWeapon {
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug)]
pub enum SourceFileError {
    Read(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SourceFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read NPC file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse NPC JSON: {err}"),
        }
    }
}

impl std::error::Error for SourceFileError {}

/// Load NPC records from a JSON file holding either a single record or an
/// array of records.
pub fn load_source_npcs(path: impl AsRef<Path>) -> Result<Vec<SourceNpc>, SourceFileError> {
    let raw = fs::read_to_string(path).map_err(SourceFileError::Read)?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(SourceFileError::Parse)?;
    let npcs = match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(SourceFileError::Parse)?
        }
        _ => vec![serde_json::from_value(value).map_err(SourceFileError::Parse)?],
    };
    Ok(npcs)
}
