//! Client core for the forum API: an authenticated transport that survives
//! access-token expiry, and per-entity stores that track every mutation's
//! status independently.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod model;
pub mod store;
pub mod transport;
