//! Icon resolution: four deterministic priority chains over ordered lookup
//! tables. Every chain ends in a mandatory default, so resolution is total.
//! Tables can be overridden from a YAML file; the built-in set mirrors the
//! stock n5eb asset layout.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One `key -> icon path` row. Tables are ordered lists, not maps, because
/// row order is the tie-break for substring chains and must be stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconEntry {
    pub key: String,
    pub icon: String,
}

impl IconEntry {
    fn new(key: &str, icon: &str) -> Self {
        Self {
            key: key.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JutsuIcons {
    /// Chakra nature rows; an exact nature match always wins.
    pub nature: Vec<IconEntry>,
    pub keyword: Vec<IconEntry>,
    pub clan: Vec<IconEntry>,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponIcons {
    pub entries: Vec<IconEntry>,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIcons {
    pub clan: Vec<IconEntry>,
    pub rank: Vec<IconEntry>,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureIcons {
    /// Substring patterns matched against the feature name, in row order.
    pub patterns: Vec<IconEntry>,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconConfig {
    pub jutsu: JutsuIcons,
    pub weapons: WeaponIcons,
    pub actors: ActorIcons,
    pub features: FeatureIcons,
}

impl IconConfig {
    /// Load an icon table override from YAML. Returns `None` if the file is
    /// missing or malformed; callers fall back to the built-in tables.
    pub fn load(path: impl AsRef<Path>) -> Option<IconConfig> {
        let raw = fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&raw).ok()
    }

    /// Jutsu chain: nature (always wins when present) -> first matching
    /// keyword in keyword-list order -> clan -> default.
    pub fn jutsu_icon(
        &self,
        nature: Option<&str>,
        keywords: &[String],
        clan: Option<&str>,
    ) -> &str {
        if let Some(nature) = nature {
            if let Some(entry) = self.jutsu.nature.iter().find(|e| e.key == nature) {
                return &entry.icon;
            }
        }
        for keyword in keywords {
            if let Some(entry) = self.jutsu.keyword.iter().find(|e| &e.key == keyword) {
                return &entry.icon;
            }
        }
        if let Some(clan) = clan {
            if let Some(entry) = self.jutsu.clan.iter().find(|e| e.key == clan) {
                return &entry.icon;
            }
        }
        &self.jutsu.default
    }

    /// Weapon chain: exact category match -> first row whose key and the
    /// category contain each other (either direction, lowercased, row order
    /// is the tie-break) -> default.
    pub fn weapon_icon(&self, category: &str) -> &str {
        if let Some(entry) = self.weapons.entries.iter().find(|e| e.key == category) {
            return &entry.icon;
        }
        let needle = category.to_lowercase();
        for entry in &self.weapons.entries {
            let key = entry.key.to_lowercase();
            if key.contains(&needle) || needle.contains(&key) {
                return &entry.icon;
            }
        }
        &self.weapons.default
    }

    /// Actor portrait chain: clan -> rank -> default.
    pub fn actor_icon(&self, clan: Option<&str>, rank: Option<&str>) -> &str {
        if let Some(clan) = clan {
            if let Some(entry) = self.actors.clan.iter().find(|e| e.key == clan) {
                return &entry.icon;
            }
        }
        if let Some(rank) = rank {
            if let Some(entry) = self.actors.rank.iter().find(|e| e.key == rank) {
                return &entry.icon;
            }
        }
        &self.actors.default
    }

    /// Feature chain: first pattern appearing anywhere in the feature name,
    /// row order is the tie-break -> default.
    pub fn feature_icon(&self, name: &str) -> &str {
        for entry in &self.features.patterns {
            if name.contains(&entry.key) {
                return &entry.icon;
            }
        }
        &self.features.default
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        const ICONS: &str = "systems/n5eb/assets/Icons & Images/Icons";
        Self {
            jutsu: JutsuIcons {
                nature: vec![
                    IconEntry::new("Fire", &format!("{ICONS}/Fire.png")),
                    IconEntry::new("Water", &format!("{ICONS}/Water.png")),
                    IconEntry::new("Wind", &format!("{ICONS}/Wind.png")),
                    IconEntry::new("Earth", &format!("{ICONS}/Earth.png")),
                    IconEntry::new("Lightning", &format!("{ICONS}/Lightning.png")),
                    IconEntry::new("Wood", &format!("{ICONS}/Wood.png")),
                    IconEntry::new("Ice", &format!("{ICONS}/Lunar Slayer.webp")),
                    IconEntry::new("Scorch", &format!("{ICONS}/Scorch.png")),
                    IconEntry::new("Boil", &format!("{ICONS}/Boil Release.png")),
                    IconEntry::new("Storm", &format!("{ICONS}/Swift.png")),
                    IconEntry::new("Explosive", &format!("{ICONS}/Explosive Release.png")),
                    IconEntry::new("Dark", &format!("{ICONS}/Dark Release.png")),
                ],
                keyword: vec![
                    IconEntry::new("Ninjutsu", &format!("{ICONS}/NonElemental.png")),
                    IconEntry::new("Taijutsu", &format!("{ICONS}/Taijutsu.png")),
                    IconEntry::new("Genjutsu", &format!("{ICONS}/Genjutsu.png")),
                    IconEntry::new("Hijutsu", &format!("{ICONS}/Non Elemental.png")),
                    IconEntry::new("Kinjutsu", &format!("{ICONS}/Toxic.png")),
                    IconEntry::new("Fuinjutsu", &format!("{ICONS}/Matrix.jpg")),
                    IconEntry::new("Senjutsu", &format!("{ICONS}/Sage_Mode.webp")),
                    IconEntry::new("Medical", &format!("{ICONS}/Medical.png")),
                    IconEntry::new("Bukijutsu", &format!("{ICONS}/Bukijutsu.png")),
                ],
                clan: vec![
                    IconEntry::new("Uchiha", &format!("{ICONS}/Mangekyo Sharingan.webp")),
                    IconEntry::new("Hyuga", &format!("{ICONS}/Otsutsuki.png")),
                    IconEntry::new("Nara", &format!("{ICONS}/Shadow_Clone.webp")),
                ],
                default: format!("{ICONS}/Jujutsu Sorcerer.webp"),
            },
            weapons: WeaponIcons {
                entries: vec![
                    IconEntry::new("Kunai", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Shuriken", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Fuma-Shuriken", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Senbon", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Katana", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Tanto", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Wakizashi", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Naginata", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Bo Staff", &format!("{ICONS}/Bukijutsu.png")),
                    IconEntry::new("Kusarigama", &format!("{ICONS}/Bukijutsu.png")),
                ],
                default: format!("{ICONS}/Bukijutsu.png"),
            },
            actors: ActorIcons {
                clan: vec![
                    IconEntry::new("Aburame", &format!("{ICONS}/Jinchuuriki.jpg")),
                    IconEntry::new("Uchiha", &format!("{ICONS}/Mangekyo Sharingan.webp")),
                    IconEntry::new("Hyuga", &format!("{ICONS}/Otsutsuki.png")),
                    IconEntry::new("Nara", &format!("{ICONS}/Shadow_Clone.webp")),
                    IconEntry::new("Shakuton", &format!("{ICONS}/Scorch.png")),
                ],
                rank: vec![
                    IconEntry::new("Genin", &format!("{ICONS}/NonElemental.png")),
                    IconEntry::new("Chunin", &format!("{ICONS}/Jujutsu Sorcerer.webp")),
                    IconEntry::new("Jonin", &format!("{ICONS}/inner-gates.jpg")),
                    IconEntry::new("ANBU", &format!("{ICONS}/Shadow_Clone.webp")),
                    IconEntry::new("Kage", &format!("{ICONS}/7th-inner-gate.jpg")),
                ],
                default: "icons/svg/mystery-man.svg".to_string(),
            },
            features: FeatureIcons {
                patterns: vec![
                    IconEntry::new("Chakra", &format!("{ICONS}/NonElemental.png")),
                    IconEntry::new("Byakugan", &format!("{ICONS}/Otsutsuki.png")),
                    IconEntry::new("Sharingan", &format!("{ICONS}/Mangekyo Sharingan.webp")),
                    IconEntry::new("Rinnegan", &format!("{ICONS}/Otsutsuki.png")),
                    IconEntry::new("Sage Mode", &format!("{ICONS}/Sage_Mode.webp")),
                    IconEntry::new("Kekkei Genkai", &format!("{ICONS}/Non Elemental.png")),
                    IconEntry::new("Inner Gate", &format!("{ICONS}/inner-gates.jpg")),
                    IconEntry::new("Eight Gates", &format!("{ICONS}/7th-inner-gate.jpg")),
                ],
                default: format!("{ICONS}/NonElemental.png"),
            },
        }
    }
}
