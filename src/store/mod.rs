//! Per-entity client state.
//!
//! Each entity kind gets an [`EntityStore`]: a sorted collection plus a map
//! from mutation key to [`EntityStatus`], so a spinner or error on one item
//! never blocks the rest. State changes go through a pure reducer and are
//! broadcast to subscribers.

mod collection;
mod entity;
mod handle;
mod mvi;
mod reducer;
mod status;

pub use entity::{newest_first, Entity, EntityKind, NaturalKey, Scope};
pub use handle::{EntityStore, StoreChange, StoreEvent};
pub use mvi::{Intent, Reducer, StoreState};
pub use reducer::{EntityIntent, EntityReducer, EntityState};
pub use status::{next as next_status, EntityStatus, MutationKey, StatusError, Transition};
