use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{newest_first, Entity, EntityKind, Scope};

/// A post published under a category by one of the author's profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(alias = "_id")]
    pub id: String,
    pub category: String,
    /// Id of the publishing profile.
    pub profile: String,
    /// Username of the author.
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
    #[serde(default)]
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Post {
    const KIND: EntityKind = EntityKind::Post;

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Category(title) => &self.category == title,
            Scope::Profile(id) => &self.profile == id,
            Scope::Author(username) => &self.author == username,
            Scope::Post(id) => &self.id == id,
            Scope::Comment(_) => false,
        }
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        newest_first(self.created_at, &self.id, other.created_at, &other.id)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
