use std::collections::HashMap;
use std::marker::PhantomData;

use super::collection;
use super::entity::{Entity, Scope};
use super::mvi::{Intent, Reducer, StoreState};
use super::status::{EntityStatus, MutationKey};

/// Items of one kind plus the status of mutations against them.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<T: Entity> {
    pub items: Vec<T>,
    pub statuses: HashMap<MutationKey, EntityStatus>,
}

impl<T: Entity> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            statuses: HashMap::new(),
        }
    }
}

impl<T: Entity> StoreState for EntityState<T> {}

#[derive(Debug, Clone)]
pub enum EntityIntent<T: Entity> {
    /// Server list for `scope`; replaces what the scope held.
    Replace { scope: Scope, items: Vec<T> },
    /// Next page; ids already held are skipped.
    Append { items: Vec<T> },
    Upsert(T),
    /// Drops the entity and any status tracked under its id.
    Remove(String),
    SetStatus(MutationKey, EntityStatus),
    ClearStatus(MutationKey),
}

impl<T: Entity> Intent for EntityIntent<T> {}

pub struct EntityReducer<T>(PhantomData<T>);

impl<T: Entity> Reducer for EntityReducer<T> {
    type State = EntityState<T>;
    type Intent = EntityIntent<T>;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        let evicted = match intent {
            EntityIntent::Replace { scope, items } => {
                collection::replace_scope(&mut state.items, &scope, items)
            }
            EntityIntent::Append { items } => collection::append_unique(&mut state.items, items),
            EntityIntent::Upsert(entity) => collection::upsert(&mut state.items, entity),
            EntityIntent::Remove(id) => {
                collection::remove(&mut state.items, &id);
                vec![id]
            }
            EntityIntent::SetStatus(key, status) => {
                state.statuses.insert(key, status);
                Vec::new()
            }
            EntityIntent::ClearStatus(key) => {
                state.statuses.remove(&key);
                Vec::new()
            }
        };
        // Statuses follow the entities they track.
        for id in evicted {
            state.statuses.remove(&MutationKey::Id(id));
        }
        state
    }
}
