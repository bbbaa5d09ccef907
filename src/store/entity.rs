use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

/// The entity kinds tracked by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Category,
    Profile,
    Post,
    Comment,
    Subcomment,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Profile => "profile",
            EntityKind::Post => "post",
            EntityKind::Comment => "comment",
            EntityKind::Subcomment => "subcomment",
        }
    }

    /// Collection path segment on the API.
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Category => "categories",
            EntityKind::Profile => "profiles",
            EntityKind::Post => "posts",
            EntityKind::Comment => "comments",
            EntityKind::Subcomment => "subcomments",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter restricting which entities a list operation returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    All,
    /// By category title.
    Category(String),
    /// By profile id.
    Profile(String),
    /// By author username.
    Author(String),
    /// Comments of a post (or the post itself).
    Post(String),
    /// Replies to a comment (or the comment itself).
    Comment(String),
}

/// Identity of an entity apart from its server id, compared part by part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey(Vec<String>);

impl NaturalKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

/// A domain object kept in an ordered client-side collection.
pub trait Entity: Clone + PartialEq + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn matches(&self, scope: &Scope) -> bool;

    /// Total order the collection is kept in.
    fn cmp_order(&self, other: &Self) -> Ordering;

    /// Key that must be unique across the collection, if the kind has one.
    fn natural_key(&self) -> Option<NaturalKey> {
        None
    }

    /// Creation time, for kinds that paginate by it.
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Reverse-chronological order with the id as tie-breaker.
pub fn newest_first(a_at: DateTime<Utc>, a_id: &str, b_at: DateTime<Utc>, b_id: &str) -> Ordering {
    b_at.cmp(&a_at).then_with(|| a_id.cmp(b_id))
}
