//! Actor conversion: direct field mapping from a source NPC to an actor
//! document, plus the biography text assembled from the descriptive fields.

use std::fmt;

use crate::convert::icons::IconConfig;
use crate::schema::document::{
    AbilityScore, AbilityScores, ActorAttributes, ActorDetails, ActorDocument, ActorFlags,
    ActorSummaryFlags, ActorSystem, ArmorClass, Biography, CreatureType, ImportProvenance,
    Movement, Pool, SourceLabel, XpValue, ACTOR_KIND, IMPORT_SOURCE, IMPORT_SOURCE_LABEL,
};
use crate::schema::source::SourceNpc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The record has no usable name.
    MissingName,
    /// The record has no stats block; actors are never created with
    /// zeroed scores.
    MissingStats { name: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "missing field: name"),
            Self::MissingStats { name } => {
                write!(f, "missing field: stats block for '{name}'")
            }
        }
    }
}

impl std::error::Error for ConvertError {}

/// Biography text: clan, rank, specialty, chakra natures, and the
/// special-ability list in a fixed template.
pub fn generate_biography(npc: &SourceNpc) -> String {
    let mut bio = format!("<h2>{}</h2>", npc.name);
    bio.push_str(&format!(
        "<p><strong>Clan:</strong> {}</p>",
        npc.clan.as_deref().unwrap_or_default()
    ));
    bio.push_str(&format!(
        "<p><strong>Rank:</strong> {}</p>",
        npc.rank.as_deref().unwrap_or_default()
    ));
    bio.push_str(&format!(
        "<p><strong>Specialty:</strong> {}</p>",
        npc.specialty.as_deref().unwrap_or_default()
    ));
    if !npc.chakra_natures.is_empty() {
        bio.push_str(&format!(
            "<p><strong>Chakra Natures:</strong> {}</p>",
            npc.chakra_natures.join(", ")
        ));
    }
    if !npc.abilities.is_empty() {
        bio.push_str("<h3>Special Abilities</h3><ul>");
        for ability in &npc.abilities {
            bio.push_str(&format!("<li>{ability}</li>"));
        }
        bio.push_str("</ul>");
    }
    bio
}

/// Convert one source NPC into an actor document. Requires a name and a
/// stats block; everything else degrades to defaults. The full source
/// record is carried in the provenance flags for later re-import.
pub fn convert_actor(
    npc: &SourceNpc,
    icons: &IconConfig,
) -> Result<ActorDocument, ConvertError> {
    if npc.name.trim().is_empty() {
        return Err(ConvertError::MissingName);
    }
    let stats = npc.stats.ok_or_else(|| ConvertError::MissingStats {
        name: npc.name.clone(),
    })?;

    Ok(ActorDocument {
        name: npc.name.clone(),
        kind: ACTOR_KIND.to_string(),
        img: icons
            .actor_icon(npc.clan.as_deref(), npc.rank.as_deref())
            .to_string(),
        system: ActorSystem {
            abilities: AbilityScores {
                strength: AbilityScore::new(stats.strength),
                dexterity: AbilityScore::new(stats.dexterity),
                constitution: AbilityScore::new(stats.constitution),
                intelligence: AbilityScore::new(stats.intelligence),
                wisdom: AbilityScore::new(stats.wisdom),
                charisma: AbilityScore::new(stats.charisma),
            },
            attributes: ActorAttributes {
                hp: Pool {
                    value: npc.hp,
                    max: npc.max_hp,
                },
                cp: Pool {
                    value: npc.chakra,
                    max: npc.max_chakra,
                },
                ac: ArmorClass::flat(npc.ac),
                movement: Movement { walk: npc.speed },
            },
            details: ActorDetails {
                biography: Biography {
                    value: generate_biography(npc),
                },
                creature_type: CreatureType {
                    value: "custom".to_string(),
                    subtype: npc.rank.clone().unwrap_or_default(),
                    custom: npc.clan.clone().unwrap_or_default(),
                },
                cr: npc.cr,
                xp: XpValue { value: npc.xp },
                source: SourceLabel {
                    custom: IMPORT_SOURCE_LABEL.to_string(),
                },
            },
        },
        flags: ActorFlags {
            konoha: ImportProvenance {
                source: IMPORT_SOURCE.to_string(),
                import_date: chrono::Utc::now().to_rfc3339(),
                original: npc.clone(),
            },
            narutogen: ActorSummaryFlags {
                clan: npc.clan.clone(),
                rank: npc.rank.clone(),
                specialty: npc.specialty.clone(),
                chakra_natures: npc.chakra_natures.clone(),
            },
        },
    })
}
