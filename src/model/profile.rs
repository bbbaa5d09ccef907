use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::store::{Entity, EntityKind, NaturalKey, Scope};

/// A per-game persona owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(alias = "_id")]
    pub id: String,
    pub nickname: String,
    /// Title of the category this profile plays in.
    pub category: String,
    /// Owning username.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Natural key shared by stored profiles and new-profile payloads.
pub(crate) fn profile_key(category: &str, nickname: &str) -> NaturalKey {
    NaturalKey::new([category, nickname])
}

impl Entity for Profile {
    const KIND: EntityKind = EntityKind::Profile;

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Category(title) => &self.category == title,
            Scope::Profile(id) => &self.id == id,
            Scope::Author(username) => &self.user == username,
            Scope::Post(_) | Scope::Comment(_) => false,
        }
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.nickname.cmp(&other.nickname))
            .then_with(|| self.id.cmp(&other.id))
    }

    fn natural_key(&self) -> Option<NaturalKey> {
        Some(profile_key(&self.category, &self.nickname))
    }
}
