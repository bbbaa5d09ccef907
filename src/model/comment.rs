use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{newest_first, Entity, EntityKind, Scope};

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "_id")]
    pub id: String,
    /// Id of the commented post.
    #[serde(alias = "postId")]
    pub post: String,
    pub profile: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
    #[serde(default)]
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
}

/// A reply to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcomment {
    #[serde(alias = "_id")]
    pub id: String,
    /// Id of the parent comment.
    #[serde(alias = "commentId")]
    pub comment: String,
    pub profile: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
    #[serde(default)]
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Comment {
    const KIND: EntityKind = EntityKind::Comment;

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Post(id) => &self.post == id,
            Scope::Profile(id) => &self.profile == id,
            Scope::Author(username) => &self.author == username,
            Scope::Comment(id) => &self.id == id,
            Scope::Category(_) => false,
        }
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        newest_first(self.created_at, &self.id, other.created_at, &other.id)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Entity for Subcomment {
    const KIND: EntityKind = EntityKind::Subcomment;

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Comment(id) => &self.comment == id,
            Scope::Profile(id) => &self.profile == id,
            Scope::Author(username) => &self.author == username,
            Scope::Post(_) | Scope::Category(_) => false,
        }
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        newest_first(self.created_at, &self.id, other.created_at, &other.id)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
