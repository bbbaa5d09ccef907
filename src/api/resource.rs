use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;

use crate::store::{Entity, NaturalKey, Scope};
use crate::transport::{ApiRequest, RequestBody};

use super::error::ApiError;

/// An entity kind the API can list.
pub trait Resource: Entity + DeserializeOwned {
    /// First page (or the whole list) for `scope`.
    fn list_request(scope: &Scope) -> Result<ApiRequest, ApiError>;
}

/// A kind listed newest-first in pages keyed by creation time.
pub trait Paginated: Resource {
    /// Entities of `scope` created strictly before `before`.
    fn page_request(scope: &Scope, before: DateTime<Utc>) -> Result<ApiRequest, ApiError>;
}

/// Body of a create or update against `T`.
pub trait Payload<T: Resource> {
    fn into_body(self) -> Result<RequestBody, ApiError>;

    /// Natural key of the entity a create would produce.
    fn natural_key(&self) -> Option<NaturalKey> {
        None
    }
}

/// Per-entity actions beyond plain edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
    /// Moderator only.
    Block,
}

impl Reaction {
    pub fn segment(&self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
            Reaction::Block => "block",
        }
    }
}

/// Cursor format used in pagination URLs (`2024-05-01T12:00:00.000Z`).
pub fn format_cursor(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cursor_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_cursor(at), "2024-05-01T12:00:00.000Z");
    }
}
