//! Authenticated transport for the forum API.
//!
//! Attaches the session's bearer token to outgoing requests and recovers
//! from access-token expiry with a single refresh and a single retry.

mod client;
mod error;
mod request;
mod scope;
mod session;

pub use client::Transport;
pub use error::{TransportError, TOKEN_EXPIRED};
pub use request::{ApiRequest, ApiResponse, Attachment, FormData, FormValue, RequestBody};
pub use scope::RequestScope;
pub use session::{Session, SessionSnapshot, TokenClaims};
