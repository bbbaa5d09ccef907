//! Sorted-collection operations shared by every entity kind.
//!
//! All functions take a collection that is already sorted by
//! `Entity::cmp_order` and leave it sorted.

use std::collections::HashSet;

use super::entity::{Entity, Scope};

/// Insert `entity`, replacing any entry with the same id and evicting any
/// other entry with the same natural key. Returns the ids of evicted entries.
pub fn upsert<T: Entity>(items: &mut Vec<T>, entity: T) -> Vec<String> {
    let natural_key = entity.natural_key();
    let mut evicted = Vec::new();
    items.retain(|item| {
        if item.id() == entity.id() {
            return false;
        }
        let clashes = natural_key.is_some() && item.natural_key() == natural_key;
        if clashes {
            evicted.push(item.id().to_string());
        }
        !clashes
    });
    let at = items.partition_point(|item| item.cmp_order(&entity).is_lt());
    items.insert(at, entity);
    evicted
}

/// Remove the entity with `id`. Returns whether it was present.
pub fn remove<T: Entity>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Entities of `incoming` whose ids are neither held nor repeated earlier
/// in `incoming`.
pub fn unseen<T: Entity>(items: &[T], incoming: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<String> = items.iter().map(|item| item.id().to_string()).collect();
    incoming
        .into_iter()
        .filter(|entity| seen.insert(entity.id().to_string()))
        .collect()
}

/// Add entities whose ids are not held yet. Returns the ids evicted by
/// natural key.
pub fn append_unique<T: Entity>(items: &mut Vec<T>, incoming: Vec<T>) -> Vec<String> {
    let fresh = unseen(items, incoming);
    let mut evicted = Vec::new();
    for entity in fresh {
        evicted.extend(upsert(items, entity));
    }
    evicted
}

/// Replace everything matching `scope` with `incoming`. Returns the ids
/// evicted by natural key.
pub fn replace_scope<T: Entity>(items: &mut Vec<T>, scope: &Scope, incoming: Vec<T>) -> Vec<String> {
    items.retain(|item| !item.matches(scope));
    let mut evicted = Vec::new();
    for entity in incoming {
        evicted.extend(upsert(items, entity));
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Post, Profile};
    use chrono::{TimeZone, Utc};

    fn category(id: &str, title: &str) -> Category {
        Category {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            image: None,
        }
    }

    fn profile(id: &str, category: &str, nickname: &str) -> Profile {
        Profile {
            id: id.to_string(),
            nickname: nickname.to_string(),
            category: category.to_string(),
            user: "mira".to_string(),
            introduction: None,
            image: None,
        }
    }

    fn post(id: &str, minute: u32) -> Post {
        Post {
            id: id.to_string(),
            category: "Chess".to_string(),
            profile: "pr1".to_string(),
            author: "mira".to_string(),
            title: format!("post {}", id),
            content: String::new(),
            images: vec![],
            likes: 0,
            dislikes: 0,
            blocked: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        }
    }

    fn is_sorted<T: Entity>(items: &[T]) -> bool {
        items.windows(2).all(|w| w[0].cmp_order(&w[1]).is_le())
    }

    #[test]
    fn test_categories_stay_sorted_by_title() {
        let mut items = Vec::new();
        for (id, title) in [("1", "Tetris"), ("2", "Chess"), ("3", "Go"), ("4", "Apex")] {
            upsert(&mut items, category(id, title));
            assert!(is_sorted(&items));
        }
        let titles: Vec<&str> = items.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Apex", "Chess", "Go", "Tetris"]);
    }

    #[test]
    fn test_profiles_sorted_by_category_then_nickname() {
        let mut items = Vec::new();
        upsert(&mut items, profile("a", "Go", "zed"));
        upsert(&mut items, profile("b", "Chess", "yun"));
        upsert(&mut items, profile("c", "Go", "abe"));
        upsert(&mut items, profile("d", "Chess", "ann"));

        let order: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_upsert_replaces_by_id_and_resorts() {
        let mut items = Vec::new();
        upsert(&mut items, category("1", "Apex"));
        upsert(&mut items, category("2", "Chess"));
        upsert(&mut items, category("1", "Zelda"));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Chess");
        assert_eq!(items[1].title, "Zelda");
    }

    #[test]
    fn test_upsert_evicts_same_natural_key() {
        let mut items = Vec::new();
        assert!(upsert(&mut items, category("1", "Chess")).is_empty());
        assert_eq!(upsert(&mut items, category("2", "Chess")), vec!["1"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "2");
    }

    #[test]
    fn test_profile_keys_compare_by_part() {
        let mut items = Vec::new();
        upsert(&mut items, profile("a", "Fate/Grand Order", "saber"));
        let evicted = upsert(&mut items, profile("b", "Fate", "Grand Order/saber"));

        assert!(evicted.is_empty());
        let ids: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_same_nickname_in_other_category_is_kept() {
        let mut items = Vec::new();
        upsert(&mut items, profile("a", "Go", "zed"));
        upsert(&mut items, profile("b", "Chess", "zed"));
        assert_eq!(items.len(), 2);

        assert_eq!(upsert(&mut items, profile("c", "Go", "zed")), vec!["a"]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_posts_newest_first() {
        let mut items = Vec::new();
        upsert(&mut items, post("old", 1));
        upsert(&mut items, post("new", 30));
        upsert(&mut items, post("mid", 10));
        let order: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_append_unique_skips_held_ids() {
        let mut items = vec![post("b", 20), post("a", 10)];
        let incoming = vec![post("a", 10), post("c", 5), post("c", 5)];
        assert_eq!(unseen(&items, incoming.clone()).len(), 1);

        assert!(append_unique(&mut items, incoming).is_empty());
        assert_eq!(items.len(), 3);
        let order: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_replace_scope_keeps_other_scopes() {
        let mut items = Vec::new();
        upsert(&mut items, profile("a", "Go", "zed"));
        upsert(&mut items, profile("b", "Chess", "yun"));
        replace_scope(
            &mut items,
            &Scope::Category("Go".to_string()),
            vec![profile("c", "Go", "abe")],
        );
        let ids: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_remove() {
        let mut items = vec![category("1", "Apex")];
        assert!(remove(&mut items, "1"));
        assert!(!remove(&mut items, "1"));
        assert!(items.is_empty());
    }
}
