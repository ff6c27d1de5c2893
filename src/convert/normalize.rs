//! Lookup-key normalization: lowercase alphanumeric projection of a display
//! name, the sole equality test for item matching. No fuzzy or partial
//! matching anywhere; two names refer to the same item iff their keys match.

/// Reduce a display name to its comparison key: ASCII letters and digits
/// only, lowercased. Empty or fully-symbolic input yields the empty string.
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::normalize_key;

    #[test]
    fn strips_punctuation_and_whitespace() {
        assert_eq!(normalize_key("Fireball Jutsu!"), "fireballjutsu");
        assert_eq!(normalize_key("  Chidori: One Thousand Birds "), "chidorionethousandbirds");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize_key("Eight Gates (7th)"), "eightgates7th");
    }

    #[test]
    fn empty_and_symbolic_input_yield_empty_key() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("---"), "");
    }

    #[test]
    fn idempotent() {
        let names = ["Rasengan", "Fūma Shuriken", "Water Style: Bubble 2"];
        for name in names {
            let once = normalize_key(name);
            assert_eq!(normalize_key(&once), once);
        }
    }

    #[test]
    fn case_and_symbol_variants_collide() {
        assert_eq!(normalize_key("SHADOW-CLONE"), normalize_key("shadow clone"));
    }
}
