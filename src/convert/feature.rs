//! Free-text special abilities: `"<Name>: <description>"` strings converted
//! into feature documents. Features are always synthesized fresh for the
//! actor when no library equivalent exists; the raw text is preserved in the
//! provenance flags.

use crate::convert::icons::IconConfig;
use crate::schema::document::{
    AbilityFlags, Description, FeatureDocument, FeatureSystem, FeatureType, ItemFlags,
    ItemProvenance,
};
use crate::schema::source::ItemKind;

/// Placeholder name for an ability string without a `Name:` prefix.
pub const FALLBACK_FEATURE_NAME: &str = "Special Ability";

/// Name part of an ability string: everything before the first colon,
/// trimmed. No colon means the fixed placeholder name.
pub fn feature_name(text: &str) -> String {
    match text.split_once(':') {
        Some((name, _)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => FALLBACK_FEATURE_NAME.to_string(),
    }
}

/// Description part of an ability string: everything after the first colon,
/// trimmed of leading whitespace. No colon means the whole string.
pub fn feature_description(text: &str) -> String {
    match text.split_once(':') {
        Some((name, rest)) if !name.trim().is_empty() && !rest.trim().is_empty() => {
            rest.trim_start().to_string()
        }
        _ => text.to_string(),
    }
}

/// Build a feature document from one free-text ability string.
pub fn synthesize_feature(text: &str, icons: &IconConfig) -> FeatureDocument {
    let name = feature_name(text);
    FeatureDocument {
        img: icons.feature_icon(&name).to_string(),
        name,
        kind: ItemKind::Feat,
        system: FeatureSystem {
            description: Description {
                value: format!("<p>{}</p>", feature_description(text)),
            },
            feature_type: FeatureType {
                value: "monster".to_string(),
            },
            requirements: String::new(),
        },
        flags: ItemFlags {
            narutogen: ItemProvenance::ability(AbilityFlags {
                original_text: text.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_name_and_description_at_first_colon() {
        let text = "Insect Swarm: The swarm obeys spoken commands: attack or defend.";
        assert_eq!(feature_name(text), "Insect Swarm");
        assert_eq!(
            feature_description(text),
            "The swarm obeys spoken commands: attack or defend."
        );
    }

    #[test]
    fn missing_colon_uses_placeholder_name_and_full_text() {
        let text = "Regenerates 5 hp at the start of each turn";
        assert_eq!(feature_name(text), FALLBACK_FEATURE_NAME);
        assert_eq!(feature_description(text), text);
    }

    #[test]
    fn synthesized_feature_resolves_icon_from_name() {
        let doc = synthesize_feature(
            "Sharingan: Predicts enemy movements.",
            &IconConfig::default(),
        );
        assert_eq!(doc.name, "Sharingan");
        assert!(doc.img.ends_with("Mangekyo Sharingan.webp"));
        let flags = doc.flags.narutogen.ability.expect("ability flags present");
        assert_eq!(flags.original_text, "Sharingan: Predicts enemy movements.");
    }
}
