use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::store::{Entity, EntityKind, NaturalKey, Scope};

/// A game category posts and profiles belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Category(title) => &self.title == title,
            _ => false,
        }
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        self.title
            .cmp(&other.title)
            .then_with(|| self.id.cmp(&other.id))
    }

    fn natural_key(&self) -> Option<NaturalKey> {
        Some(NaturalKey::new([self.title.as_str()]))
    }
}
