//! Heuristic extractors for jutsu (spell-like ability) free text, plus
//! synthesis of a new spell document when no existing equivalent is found.
//!
//! Every extractor is pure and total: unrecognizable input yields the
//! documented default, never an error. Token priority and tie-break order
//! are load-bearing; existing imported content depends on them, so widen
//! none of the patterns.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::convert::icons::IconConfig;
use crate::schema::document::{
    Activation, ChakraScaling, DamageBlock, DamagePart, Description, DurationBlock, ItemFlags,
    ItemProvenance, JutsuFlags, Preparation, RangeBlock, SaveBlock, SourceLabel, SpellDocument,
    SpellSystem, TargetBlock,
};
use crate::schema::source::{Ability, ItemKind, SourceJutsu};

static CONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)-foot cone").expect("cone pattern compiles"));
static LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)-foot line").expect("line pattern compiles"));
static RADIUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)-foot (?:radius|sphere)").expect("radius pattern compiles"));
static CUBE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)-foot cube").expect("cube pattern compiles"));
static DICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+d\d+)(?:\s+(\w+)\s+damage)?").expect("dice pattern compiles"));

/// First run of ASCII digits in `text`, if any.
fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn captured_feet(re: &Regex, text: &str, fallback: u32) -> u32 {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(fallback)
}

/// Target shape from the combined effect text. Shape tokens are checked in
/// priority order cone, line, radius/sphere, cube; the leading `<N>-foot`
/// measurement is captured when present, otherwise the shape's stock
/// distance applies (15/30/20/10). No shape token means a single creature.
pub fn extract_target(effects: &[String]) -> TargetBlock {
    let text = effects.join(" ").to_lowercase();

    if text.contains("cone") {
        return area(captured_feet(&CONE_RE, &text, 15), "cone");
    }
    if text.contains("line") {
        return area(captured_feet(&LINE_RE, &text, 30), "line");
    }
    if text.contains("radius") || text.contains("sphere") {
        return area(captured_feet(&RADIUS_RE, &text, 20), "radius");
    }
    if text.contains("cube") {
        return area(captured_feet(&CUBE_RE, &text, 10), "cube");
    }

    TargetBlock {
        value: 1,
        units: String::new(),
        shape: "creature".to_string(),
    }
}

fn area(value: u32, shape: &str) -> TargetBlock {
    TargetBlock {
        value,
        units: "ft".to_string(),
        shape: shape.to_string(),
    }
}

/// Duration value and units. Absent or empty duration is empty/empty;
/// otherwise the first integer becomes the value and the unit is the first
/// of minute/hour/round/turn/day found as a substring, else instantaneous.
pub fn extract_duration(duration: Option<&str>) -> DurationBlock {
    let Some(duration) = duration.filter(|d| !d.is_empty()) else {
        return DurationBlock {
            value: String::new(),
            units: String::new(),
        };
    };
    let value = first_integer(duration)
        .map(|n| n.to_string())
        .unwrap_or_default();
    let lowered = duration.to_lowercase();
    let units = if lowered.contains("minute") {
        "minute"
    } else if lowered.contains("hour") {
        "hour"
    } else if lowered.contains("round") {
        "round"
    } else if lowered.contains("turn") {
        "turn"
    } else if lowered.contains("day") {
        "day"
    } else {
        "inst"
    };
    DurationBlock {
        value,
        units: units.to_string(),
    }
}

/// Action classification over description + effect text, first match wins:
/// save phrasing -> save, attack -> ranged spell attack, healing -> heal,
/// anything else -> utility.
pub fn classify_action(description: Option<&str>, effects: &[String]) -> &'static str {
    let combined = format!(
        "{} {}",
        effects.join(" ").to_lowercase(),
        description.unwrap_or_default().to_lowercase()
    );
    if combined.contains("saving throw") || combined.contains("save") {
        "save"
    } else if combined.contains("attack") {
        "rsak"
    } else if combined.contains("heal") || combined.contains("hit point") || combined.contains("hp")
    {
        "heal"
    } else {
        "util"
    }
}

/// Governing ability from the keyword list: taijutsu is strength-based,
/// genjutsu wisdom-based, everything else (ninjutsu) intelligence-based.
pub fn governing_ability(keywords: &[String]) -> Ability {
    let joined = keywords.join(" ").to_lowercase();
    if joined.contains("taijutsu") {
        Ability::Str
    } else if joined.contains("genjutsu") {
        Ability::Wis
    } else {
        Ability::Int
    }
}

/// Spell school for a chakra nature. Unmapped or absent natures fall back to
/// evocation.
pub fn school_for_nature(nature: Option<&str>) -> &'static str {
    match nature.map(str::to_lowercase).as_deref() {
        Some("fire") => "evo",
        Some("water") => "trs",
        Some("wind") => "evo",
        Some("earth") => "abj",
        Some("lightning") => "evo",
        _ => "evo",
    }
}

/// Save ability mentioned in description/effects. The six abilities are
/// probed in a fixed order (dex, con, wis, str, int, cha); the first hit
/// wins; no mention means no save.
pub fn save_ability(description: Option<&str>, effects: &[String]) -> Option<Ability> {
    // Concatenated without a separator to match how existing content was
    // classified.
    let text = format!(
        "{}{}",
        description.unwrap_or_default().to_lowercase(),
        effects.join(" ").to_lowercase()
    );
    const PROBES: [(&str, &str, Ability); 6] = [
        ("dex save", "dexterity save", Ability::Dex),
        ("con save", "constitution save", Ability::Con),
        ("wis save", "wisdom save", Ability::Wis),
        ("str save", "strength save", Ability::Str),
        ("int save", "intelligence save", Ability::Int),
        ("cha save", "charisma save", Ability::Cha),
    ];
    PROBES
        .iter()
        .find(|(short, long, _)| text.contains(short) || text.contains(long))
        .map(|(_, _, ability)| *ability)
}

/// Range in feet: self is 0, touch is 5, otherwise the first integer; a
/// range string with no number falls back to 30, an absent range to 0.
pub fn extract_range(range: Option<&str>) -> u32 {
    let Some(range) = range else { return 0 };
    if range.is_empty() {
        return 0;
    }
    let lowered = range.to_lowercase();
    if lowered.contains("self") {
        return 0;
    }
    if lowered.contains("touch") {
        return 5;
    }
    first_integer(range).unwrap_or(30)
}

/// Damage parts: each effect string is scanned independently for an
/// `NdM [type damage]` expression and every hit is appended in effect order.
pub fn extract_damage_parts(effects: &[String]) -> Vec<DamagePart> {
    let mut parts = Vec::new();
    for effect in effects {
        if let Some(caps) = DICE_RE.captures(effect) {
            let dice = caps[1].to_string();
            let damage_type = caps
                .get(2)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            parts.push(DamagePart(dice, damage_type));
        }
    }
    parts
}

/// Activation classification from the casting-time text.
pub fn activation_type(casting_time: Option<&str>) -> &'static str {
    let lowered = casting_time.unwrap_or_default().to_lowercase();
    if lowered.contains("bonus") {
        "bonus"
    } else if lowered.contains("reaction") {
        "reaction"
    } else {
        "action"
    }
}

/// Jutsu rank letter to spell level.
pub fn rank_to_level(rank: Option<&str>) -> u8 {
    match rank {
        Some("E") => 0,
        Some("D") => 1,
        Some("C") => 3,
        Some("B") => 5,
        Some("A") => 7,
        Some("S") => 9,
        _ => 1,
    }
}

/// Item properties from components (HS = hand seals -> somatic, CM = chakra
/// molding -> verbal) and a concentration marker in the duration text.
pub fn jutsu_properties(components: &[String], duration: Option<&str>) -> Vec<String> {
    let mut properties = Vec::new();
    if components.iter().any(|c| c == "HS") {
        properties.push("somatic".to_string());
    }
    if components.iter().any(|c| c == "CM") {
        properties.push("verbal".to_string());
    }
    if duration.is_some_and(|d| d.contains("Concentration")) {
        properties.push("concentration".to_string());
    }
    properties
}

/// Rich-text description assembled from the source fields, in the fixed
/// order the sheet template expects.
pub fn format_description(jutsu: &SourceJutsu) -> String {
    let mut html = format!(
        "<p><strong>{}</strong> - Rank {}</p>",
        jutsu.name,
        jutsu.rank.as_deref().unwrap_or("?")
    );
    html.push_str(&format!(
        "<p>{}</p>",
        jutsu.description.as_deref().unwrap_or_default()
    ));
    html.push_str(&format!(
        "<p><strong>Chakra Cost:</strong> {}</p>",
        jutsu.chakra_cost
    ));
    html.push_str(&format!(
        "<p><strong>Casting Time:</strong> {}</p>",
        jutsu.casting_time.as_deref().unwrap_or_default()
    ));
    html.push_str(&format!(
        "<p><strong>Range:</strong> {}</p>",
        jutsu.range.as_deref().unwrap_or_default()
    ));
    html.push_str(&format!(
        "<p><strong>Duration:</strong> {}</p>",
        jutsu.duration.as_deref().unwrap_or_default()
    ));
    if !jutsu.components.is_empty() {
        html.push_str(&format!(
            "<p><strong>Components:</strong> {}</p>",
            jutsu.components.join(", ")
        ));
    }
    if !jutsu.keywords.is_empty() {
        html.push_str(&format!(
            "<p><strong>Keywords:</strong> {}</p>",
            jutsu.keywords.join(", ")
        ));
    }
    if let Some(nature) = &jutsu.nature {
        html.push_str(&format!("<p><strong>Nature:</strong> {nature}</p>"));
    }
    if let Some(clan) = &jutsu.clan {
        html.push_str(&format!("<p><strong>Clan:</strong> {clan}</p>"));
    }
    if !jutsu.effects.is_empty() {
        html.push_str("<p><strong>Effects:</strong></p><ul>");
        for effect in &jutsu.effects {
            html.push_str(&format!("<li>{effect}</li>"));
        }
        html.push_str("</ul>");
    }
    html
}

/// Build a brand-new spell document from a source jutsu. Used when the
/// content index holds no equivalent item.
pub fn synthesize_jutsu(jutsu: &SourceJutsu, icons: &IconConfig) -> SpellDocument {
    SpellDocument {
        name: jutsu.name.clone(),
        kind: ItemKind::Spell,
        img: icons
            .jutsu_icon(
                jutsu.nature.as_deref(),
                &jutsu.keywords,
                jutsu.clan.as_deref(),
            )
            .to_string(),
        system: SpellSystem {
            description: Description {
                value: format_description(jutsu),
            },
            source: SourceLabel {
                custom: jutsu.clan.clone().unwrap_or_default(),
            },
            activation: Activation {
                kind: activation_type(jutsu.casting_time.as_deref()).to_string(),
                cost: 1,
            },
            duration: extract_duration(jutsu.duration.as_deref()),
            target: extract_target(&jutsu.effects),
            range: RangeBlock {
                value: extract_range(jutsu.range.as_deref()),
                long: None,
                units: "ft".to_string(),
            },
            ability: Some(governing_ability(&jutsu.keywords)),
            action_type: classify_action(jutsu.description.as_deref(), &jutsu.effects).to_string(),
            damage: DamageBlock {
                parts: extract_damage_parts(&jutsu.effects),
            },
            save: SaveBlock {
                ability: save_ability(jutsu.description.as_deref(), &jutsu.effects),
                scaling: "spell".to_string(),
            },
            level: rank_to_level(jutsu.rank.as_deref()),
            school: school_for_nature(jutsu.nature.as_deref()).to_string(),
            properties: jutsu_properties(&jutsu.components, jutsu.duration.as_deref()),
            preparation: Preparation {
                mode: "innate".to_string(),
                prepared: true,
            },
            chakra_cost: jutsu.chakra_cost,
            chakra_scaling: ChakraScaling::none(),
        },
        flags: ItemFlags {
            narutogen: ItemProvenance::jutsu(JutsuFlags {
                rank: jutsu.rank.clone(),
                keywords: jutsu.keywords.clone(),
                clan: jutsu.clan.clone(),
                nature: jutsu.nature.clone(),
                components: jutsu.components.clone(),
                original: jutsu.clone(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn target_captures_measured_cone() {
        let target = extract_target(&strings(&["Exhale a 15-foot cone of flame."]));
        assert_eq!(target.shape, "cone");
        assert_eq!(target.value, 15);
        assert_eq!(target.units, "ft");
    }

    #[test]
    fn target_uses_shape_default_distance_when_unmeasured() {
        let target = extract_target(&strings(&["A line of water erupts forward."]));
        assert_eq!(target.shape, "line");
        assert_eq!(target.value, 30);
    }

    #[test]
    fn cone_outranks_later_shapes() {
        let target = extract_target(&strings(&["A 20-foot cube collapses into a 15-foot cone."]));
        assert_eq!(target.shape, "cone");
        assert_eq!(target.value, 15);
    }

    #[test]
    fn no_shape_token_means_single_creature() {
        let target = extract_target(&strings(&["The target is stunned."]));
        assert_eq!(target.shape, "creature");
        assert_eq!(target.value, 1);
        assert_eq!(target.units, "");
    }

    #[test]
    fn duration_extracts_value_and_units() {
        let duration = extract_duration(Some("3 rounds"));
        assert_eq!(duration.value, "3");
        assert_eq!(duration.units, "round");
    }

    #[test]
    fn absent_or_empty_duration_is_empty() {
        for duration in [extract_duration(None), extract_duration(Some(""))] {
            assert_eq!(duration.value, "");
            assert_eq!(duration.units, "");
        }
    }

    #[test]
    fn unitless_duration_is_instantaneous() {
        let duration = extract_duration(Some("until dispelled"));
        assert_eq!(duration.value, "");
        assert_eq!(duration.units, "inst");
    }

    #[test]
    fn duration_unit_priority_is_fixed() {
        // "minute" outranks "round" even when round appears first.
        let duration = extract_duration(Some("1 round per minute"));
        assert_eq!(duration.units, "minute");
    }

    #[test]
    fn save_phrasing_wins_over_attack() {
        let action = classify_action(
            Some("Make a spell attack; on a hit the target makes a saving throw."),
            &[],
        );
        assert_eq!(action, "save");
    }

    #[test]
    fn action_falls_through_to_heal_then_util() {
        assert_eq!(classify_action(Some("Restores 2d4 hit points."), &[]), "heal");
        assert_eq!(classify_action(Some("You walk on water."), &[]), "util");
    }

    #[test]
    fn governing_ability_follows_keywords() {
        assert_eq!(governing_ability(&strings(&["Taijutsu"])), Ability::Str);
        assert_eq!(governing_ability(&strings(&["Genjutsu"])), Ability::Wis);
        assert_eq!(governing_ability(&strings(&["Ninjutsu"])), Ability::Int);
        assert_eq!(governing_ability(&[]), Ability::Int);
    }

    #[test]
    fn school_mapping_and_default() {
        assert_eq!(school_for_nature(Some("Water")), "trs");
        assert_eq!(school_for_nature(Some("earth")), "abj");
        assert_eq!(school_for_nature(Some("Blood")), "evo");
        assert_eq!(school_for_nature(None), "evo");
    }

    #[test]
    fn save_ability_probe_order() {
        let effects = strings(&["Each creature makes a dex save or a con save."]);
        assert_eq!(save_ability(None, &effects), Some(Ability::Dex));
        assert_eq!(
            save_ability(Some("Wisdom save negates."), &[]),
            Some(Ability::Wis)
        );
        assert_eq!(save_ability(Some("no rolls involved"), &[]), None);
    }

    #[test]
    fn range_handles_self_touch_numbers_and_absence() {
        assert_eq!(extract_range(Some("Self")), 0);
        assert_eq!(extract_range(Some("Touch")), 5);
        assert_eq!(extract_range(Some("60 feet")), 60);
        assert_eq!(extract_range(Some("sight")), 30);
        assert_eq!(extract_range(None), 0);
    }

    #[test]
    fn damage_parts_accumulate_across_effects_in_order() {
        let effects = strings(&[
            "Deals 8d6 fire damage in the area.",
            "The target is knocked prone.",
            "Burning creatures take 2d4 damage at the start of each turn.",
        ]);
        let parts = extract_damage_parts(&effects);
        assert_eq!(
            parts,
            vec![
                DamagePart("8d6".to_string(), "fire".to_string()),
                DamagePart("2d4".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn activation_type_from_casting_time() {
        assert_eq!(activation_type(Some("1 Bonus Action")), "bonus");
        assert_eq!(activation_type(Some("Reaction")), "reaction");
        assert_eq!(activation_type(Some("1 Action")), "action");
        assert_eq!(activation_type(None), "action");
    }

    #[test]
    fn rank_letters_map_to_levels() {
        assert_eq!(rank_to_level(Some("E")), 0);
        assert_eq!(rank_to_level(Some("C")), 3);
        assert_eq!(rank_to_level(Some("S")), 9);
        assert_eq!(rank_to_level(Some("X")), 1);
        assert_eq!(rank_to_level(None), 1);
    }

    #[test]
    fn components_and_concentration_become_properties() {
        let properties = jutsu_properties(
            &strings(&["HS", "CM"]),
            Some("Concentration, up to 1 minute"),
        );
        assert_eq!(properties, vec!["somatic", "verbal", "concentration"]);
        assert!(jutsu_properties(&[], None).is_empty());
    }

    #[test]
    fn synthesized_jutsu_keeps_nature_verbatim_in_flags() {
        let jutsu = SourceJutsu {
            name: "Fireball Jutsu".to_string(),
            rank: Some("C".to_string()),
            clan: None,
            nature: Some("Fire".to_string()),
            keywords: strings(&["Ninjutsu"]),
            components: strings(&["HS"]),
            chakra_cost: 4,
            casting_time: Some("1 Action".to_string()),
            range: Some("60 feet".to_string()),
            duration: Some("Instantaneous".to_string()),
            description: Some("A roaring ball of flame.".to_string()),
            effects: strings(&["Deals 6d6 fire damage in a 20-foot radius."]),
        };
        let doc = synthesize_jutsu(&jutsu, &IconConfig::default());
        let flags = doc.flags.narutogen.jutsu.expect("jutsu flags present");
        assert_eq!(flags.nature.as_deref(), Some("Fire"));
        assert_eq!(flags.original, jutsu);
        assert_eq!(doc.system.level, 3);
        assert_eq!(doc.system.target.shape, "radius");
        assert!(doc.img.ends_with("Fire.png"));
    }
}
