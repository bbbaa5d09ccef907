use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::collection;
use super::entity::{Entity, EntityKind, NaturalKey, Scope};
use super::mvi::Reducer;
use super::reducer::{EntityIntent, EntityReducer, EntityState};
use super::status::{self, EntityStatus, MutationKey, StatusError, Transition};

const EVENT_BUFFER: usize = 256;

/// Notification sent to subscribers after the store changed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEvent {
    pub kind: EntityKind,
    pub change: StoreChange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    /// The item list changed.
    Items,
    /// A mutation key changed; `None` means the key was removed.
    Status {
        key: MutationKey,
        status: Option<EntityStatus>,
    },
}

/// Thread-safe store for one entity kind.
///
/// Cloning yields another handle to the same state. Locks are only held
/// for the duration of a reduction, never across a network call.
#[derive(Clone)]
pub struct EntityStore<T: Entity> {
    inner: Arc<RwLock<EntityState<T>>>,
    events: broadcast::Sender<StoreEvent>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(RwLock::new(EntityState::default())),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> EntityState<T> {
        self.inner.read().clone()
    }

    /// Entities matching `scope`, in collection order.
    pub fn list(&self, scope: &Scope) -> Vec<T> {
        self.inner
            .read()
            .items
            .iter()
            .filter(|item| item.matches(scope))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.inner
            .read()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    pub fn has_natural_key(&self, key: &NaturalKey) -> bool {
        self.inner
            .read()
            .items
            .iter()
            .any(|item| item.natural_key().as_ref() == Some(key))
    }

    /// Creation time of the oldest entity held for `scope`; the cursor for
    /// fetching the next page.
    pub fn oldest(&self, scope: &Scope) -> Option<DateTime<Utc>> {
        self.inner
            .read()
            .items
            .iter()
            .filter(|item| item.matches(scope))
            .filter_map(|item| item.created_at())
            .min()
    }

    /// Append a page, skipping ids already held. Returns how many entities
    /// were added.
    pub fn append(&self, items: Vec<T>) -> usize {
        let mut changes = Vec::new();
        let added = {
            let mut state = self.inner.write();
            let fresh = collection::unseen(&state.items, items);
            let added = fresh.len();
            apply(&mut state, EntityIntent::Append { items: fresh }, &mut changes);
            added
        };
        self.emit(changes);
        added
    }

    pub fn upsert(&self, entity: T) {
        self.dispatch(EntityIntent::Upsert(entity));
    }

    pub fn remove(&self, id: &str) {
        self.dispatch(EntityIntent::Remove(id.to_string()));
    }

    pub fn status(&self, key: &MutationKey) -> Option<EntityStatus> {
        self.inner.read().statuses.get(key).copied()
    }

    pub fn set_status(&self, key: MutationKey, status: EntityStatus) {
        self.dispatch(EntityIntent::SetStatus(key, status));
    }

    /// Move `key` to pending.
    pub fn begin(&self, key: &MutationKey) -> Result<(), StatusError> {
        self.transition(key, Transition::Start)
    }

    /// Reset a settled key to idle.
    pub fn acknowledge(&self, key: &MutationKey) -> Result<(), StatusError> {
        self.transition(key, Transition::Acknowledge)
    }

    /// Apply `data` and mark `key` succeeded in one step.
    ///
    /// If the key was acknowledged or removed meanwhile (e.g. by the
    /// delete itself) its status is left alone.
    pub(crate) fn succeed(&self, key: &MutationKey, data: Option<EntityIntent<T>>) {
        self.settle(key, Transition::Succeed, data);
    }

    pub(crate) fn fail(&self, key: &MutationKey) {
        self.settle(key, Transition::Fail, None);
    }

    pub fn dispatch(&self, intent: EntityIntent<T>) {
        let mut changes = Vec::new();
        {
            let mut state = self.inner.write();
            apply(&mut state, intent, &mut changes);
        }
        self.emit(changes);
    }

    fn transition(&self, key: &MutationKey, transition: Transition) -> Result<(), StatusError> {
        let mut changes = Vec::new();
        {
            let mut state = self.inner.write();
            let current = state.statuses.get(key).copied();
            let next = status::next(key, current, transition)?;

            if transition == Transition::Start && current == Some(EntityStatus::Pending) {
                tracing::warn!(
                    kind = %T::KIND,
                    key = %key,
                    "Mutation started while another is pending, last completion wins"
                );
            }

            apply(
                &mut state,
                EntityIntent::SetStatus(key.clone(), next),
                &mut changes,
            );
        }
        self.emit(changes);
        Ok(())
    }

    fn settle(&self, key: &MutationKey, transition: Transition, data: Option<EntityIntent<T>>) {
        let mut changes = Vec::new();
        {
            let mut state = self.inner.write();
            if let Some(data) = data {
                apply(&mut state, data, &mut changes);
            }
            let current = state.statuses.get(key).copied();
            match status::next(key, current, transition) {
                Ok(next) => apply(
                    &mut state,
                    EntityIntent::SetStatus(key.clone(), next),
                    &mut changes,
                ),
                Err(err) => {
                    tracing::debug!(kind = %T::KIND, key = %key, error = %err, "Status left unchanged")
                }
            }
        }
        self.emit(changes);
    }

    fn emit(&self, changes: Vec<StoreChange>) {
        for change in changes {
            // No subscribers is fine.
            let _ = self.events.send(StoreEvent {
                kind: T::KIND,
                change,
            });
        }
    }
}

fn apply<T: Entity>(
    state: &mut EntityState<T>,
    intent: EntityIntent<T>,
    changes: &mut Vec<StoreChange>,
) {
    let status_change = match &intent {
        EntityIntent::SetStatus(key, status) => Some((key.clone(), Some(*status))),
        EntityIntent::ClearStatus(key) => Some((key.clone(), None)),
        _ => None,
    };
    // Item changes can drop id statuses (removal, natural-key eviction).
    let tracked: Vec<MutationKey> = match status_change {
        Some(_) => Vec::new(),
        None => state
            .statuses
            .keys()
            .filter(|key| matches!(key, MutationKey::Id(_)))
            .cloned()
            .collect(),
    };

    let current = std::mem::take(state);
    *state = EntityReducer::<T>::reduce(current, intent);

    match status_change {
        Some((key, status)) => changes.push(StoreChange::Status { key, status }),
        None => {
            changes.push(StoreChange::Items);
            changes.extend(
                tracked
                    .into_iter()
                    .filter(|key| !state.statuses.contains_key(key))
                    .map(|key| StoreChange::Status { key, status: None }),
            );
        }
    }
}
