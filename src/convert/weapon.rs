//! Weapon extractors and synthesis: ranged/melee classification, thrown
//! range pairs, damage dice and type, property flags, store category.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::convert::icons::IconConfig;
use crate::schema::document::{
    Activation, DamageBlock, DamagePart, Description, ItemFlags, ItemProvenance, RangeBlock,
    TargetBlock, WeaponCategory, WeaponDocument, WeaponFlags, WeaponSystem,
};
use crate::schema::source::{Ability, ItemKind, SourceWeapon};

static RANGE_PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)/(\d+)\)").expect("range pair pattern compiles"));
static DAMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+d\d+)\s*\+?\s*(\d*)").expect("damage pattern compiles"));

/// Normal/long range pair in feet. `long` is absent for melee weapons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponRanges {
    pub normal: u32,
    pub long: Option<u32>,
}

/// A weapon is ranged iff any property tag mentions thrown or range.
pub fn is_ranged(properties: &[String]) -> bool {
    properties.iter().any(|p| {
        let p = p.to_lowercase();
        p.contains("thrown") || p.contains("range")
    })
}

/// Range pair from the property tags: a thrown tag is consulted first,
/// unconditionally, then a range tag; either contributes a `(N/M)` pair.
/// Without one the weapon gets the melee default of 5 ft and no long range.
pub fn extract_ranges(properties: &[String]) -> WeaponRanges {
    let thrown = properties.iter().find(|p| p.to_lowercase().contains("thrown"));
    if let Some(pair) = thrown.and_then(|p| range_pair(p)) {
        return pair;
    }
    let ranged = properties.iter().find(|p| p.to_lowercase().contains("range"));
    if let Some(pair) = ranged.and_then(|p| range_pair(p)) {
        return pair;
    }
    WeaponRanges {
        normal: 5,
        long: None,
    }
}

fn range_pair(tag: &str) -> Option<WeaponRanges> {
    let caps = RANGE_PAIR_RE.captures(tag)?;
    Some(WeaponRanges {
        normal: caps[1].parse().ok()?,
        long: Some(caps[2].parse().ok()?),
    })
}

/// Dice and flat bonus from a damage expression like `"1d8 + 2"`. The bonus
/// is parsed separately and does not become part of the damage part.
pub fn parse_damage_expression(damage: &str) -> Option<(String, u32)> {
    let caps = DAMAGE_RE.captures(damage)?;
    let dice = caps[1].to_string();
    let bonus = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    Some((dice, bonus))
}

/// Damage type inferred from the weapon category text.
pub fn damage_type_for(category: &str) -> &'static str {
    let category = category.to_lowercase();
    if category.contains("shuriken") || category.contains("kunai") {
        "piercing"
    } else if category.contains("sword") || category.contains("blade") {
        "slashing"
    } else {
        "bludgeoning"
    }
}

/// The weapon's single damage part. Unparseable damage text falls back to a
/// fixed 1d4 piercing part rather than failing the conversion.
pub fn weapon_damage_part(weapon: &SourceWeapon) -> DamagePart {
    match parse_damage_expression(&weapon.damage) {
        Some((dice, _bonus)) => DamagePart(dice, damage_type_for(&weapon.category).to_string()),
        None => DamagePart("1d4".to_string(), "piercing".to_string()),
    }
}

/// Store property flags from the free-text tags. Each tag is checked against
/// the whole vocabulary, so one tag may contribute several flags.
pub fn property_flags(properties: &[String]) -> Vec<String> {
    const VOCABULARY: [(&str, &str); 7] = [
        ("thrown", "thr"),
        ("light", "lgt"),
        ("heavy", "hvy"),
        ("finesse", "fin"),
        ("versatile", "ver"),
        ("two-handed", "two"),
        ("reach", "rch"),
    ];
    let mut flags = Vec::new();
    for property in properties {
        let p = property.to_lowercase();
        for (needle, flag) in VOCABULARY {
            if p.contains(needle) {
                flags.push(flag.to_string());
            }
        }
    }
    flags
}

/// Store weapon category from the free-text category.
pub fn weapon_store_category(category: &str) -> &'static str {
    let category = category.to_lowercase();
    if category.contains("shuriken") || category.contains("kunai") {
        "simpleR"
    } else if category.contains("sword") || category.contains("blade") {
        "martialM"
    } else {
        "simpleM"
    }
}

/// Build a brand-new weapon document from a source weapon. Used when the
/// content index holds no equivalent item.
pub fn synthesize_weapon(weapon: &SourceWeapon, icons: &IconConfig) -> WeaponDocument {
    let ranged = is_ranged(&weapon.properties);
    let ranges = extract_ranges(&weapon.properties);
    WeaponDocument {
        name: weapon.name.clone(),
        kind: ItemKind::Weapon,
        img: icons.weapon_icon(&weapon.category).to_string(),
        system: WeaponSystem {
            description: Description {
                value: weapon.description.clone().unwrap_or_default(),
            },
            quantity: 1,
            equipped: true,
            activation: Activation {
                kind: "action".to_string(),
                cost: 1,
            },
            target: TargetBlock {
                value: 1,
                units: String::new(),
                shape: "creature".to_string(),
            },
            range: RangeBlock {
                value: ranges.normal,
                long: ranges.long,
                units: "ft".to_string(),
            },
            ability: if ranged { Ability::Dex } else { Ability::Str },
            action_type: if ranged { "rwak" } else { "mwak" }.to_string(),
            damage: DamageBlock {
                parts: vec![weapon_damage_part(weapon)],
            },
            category: WeaponCategory {
                value: weapon_store_category(&weapon.category).to_string(),
                base_item: String::new(),
            },
            properties: property_flags(&weapon.properties),
            proficient: 1,
        },
        flags: ItemFlags {
            narutogen: ItemProvenance::weapon(WeaponFlags {
                original_type: weapon.category.clone(),
                original_properties: weapon.properties.clone(),
                original: weapon.clone(),
            }),
        },
    }
}
