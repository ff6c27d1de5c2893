//! Item resolution: ask the content index for an existing equivalent first,
//! synthesize a fresh document on a miss. Reused documents are cloned with
//! their persistent identity stripped so the store assigns a new one.

use std::fmt;

use serde_json::Value;

use crate::content::index::{ContentIndex, ItemSource};
use crate::convert::icons::IconConfig;
use crate::convert::{feature, jutsu, weapon};
use crate::schema::source::{ItemKind, SourceJutsu, SourceWeapon};

/// One resolved item ready to attach: the document plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub name: String,
    pub kind: ItemKind,
    pub origin: ItemSource,
    pub document: Value,
}

#[derive(Debug)]
pub enum ResolveError {
    Serialize(serde_json::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "item document malformed: {err}"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Remove the store-assigned identity from a reused document so attaching it
/// creates a fresh embedded copy.
fn strip_identity(mut document: Value) -> Value {
    if let Some(map) = document.as_object_mut() {
        map.remove("_id");
    }
    document
}

/// Resolves source items against a content index, synthesizing when no
/// equivalent exists. Holds no state across calls.
pub struct ItemResolver<'a> {
    pub index: &'a ContentIndex,
    pub icons: &'a IconConfig,
}

impl ItemResolver<'_> {
    pub async fn resolve_jutsu(&self, jutsu: &SourceJutsu) -> Result<ResolvedItem, ResolveError> {
        if let Some(found) = self.index.find(&jutsu.name, ItemKind::Spell).await {
            return Ok(ResolvedItem {
                name: jutsu.name.clone(),
                kind: ItemKind::Spell,
                origin: found.origin,
                document: strip_identity(found.document),
            });
        }
        let document = serde_json::to_value(jutsu::synthesize_jutsu(jutsu, self.icons))
            .map_err(ResolveError::Serialize)?;
        Ok(ResolvedItem {
            name: jutsu.name.clone(),
            kind: ItemKind::Spell,
            origin: ItemSource::Created,
            document,
        })
    }

    pub async fn resolve_weapon(
        &self,
        weapon: &SourceWeapon,
    ) -> Result<ResolvedItem, ResolveError> {
        if let Some(found) = self.index.find(&weapon.name, ItemKind::Weapon).await {
            return Ok(ResolvedItem {
                name: weapon.name.clone(),
                kind: ItemKind::Weapon,
                origin: found.origin,
                document: strip_identity(found.document),
            });
        }
        let document = serde_json::to_value(weapon::synthesize_weapon(weapon, self.icons))
            .map_err(ResolveError::Serialize)?;
        Ok(ResolvedItem {
            name: weapon.name.clone(),
            kind: ItemKind::Weapon,
            origin: ItemSource::Created,
            document,
        })
    }

    /// Free-text abilities are always synthesized; no index lookup is
    /// defined for them.
    pub fn resolve_feature(&self, text: &str) -> Result<ResolvedItem, ResolveError> {
        let document = feature::synthesize_feature(text, self.icons);
        let name = document.name.clone();
        let document = serde_json::to_value(document).map_err(ResolveError::Serialize)?;
        Ok(ResolvedItem {
            name,
            kind: ItemKind::Feat,
            origin: ItemSource::Created,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::strip_identity;
    use serde_json::json;

    #[test]
    fn strip_identity_removes_only_the_id() {
        let doc = json!({"_id": "abc123", "name": "Kunai", "type": "weapon"});
        let stripped = strip_identity(doc);
        assert!(stripped.get("_id").is_none());
        assert_eq!(stripped["name"], "Kunai");
    }
}
