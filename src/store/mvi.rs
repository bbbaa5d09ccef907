//! Unidirectional data flow primitives for the entity stores.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ subscribers
//! ```
//!
//! - **State**: plain data, cloned into snapshots for readers
//! - **Intent**: a store mutation (server data arrived, status changed)
//! - **Reducer**: pure function that transforms state based on intents

/// Marker trait for store state objects.
///
/// States should be:
/// - Cloneable (readers get snapshots)
/// - Comparable (PartialEq for detecting changes)
pub trait StoreState: Clone + PartialEq + Default + Send + 'static {}

/// Marker trait for intent objects.
pub trait Intent: Send + 'static {}

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Intent) -> State
pub trait Reducer {
    type State: StoreState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
