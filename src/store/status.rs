//! Mutation status tracking.
//!
//! Every create/update/delete runs under a mutation key: the entity id, or
//! `Add` for creations. Each key moves through
//! `idle -> pending -> success | failed -> idle`. A missing key means no
//! mutation was ever attempted; `Idle` means the last result was
//! acknowledged.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Idle => "idle",
            EntityStatus::Pending => "pending",
            EntityStatus::Success => "success",
            EntityStatus::Failed => "failed",
        }
    }

    /// Whether the status holds an unacknowledged result.
    pub fn is_settled(&self) -> bool {
        matches!(self, EntityStatus::Success | EntityStatus::Failed)
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key a mutation's status is tracked under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationKey {
    /// Creation of a new entity.
    Add,
    Id(String),
}

impl MutationKey {
    pub fn id(id: impl Into<String>) -> Self {
        MutationKey::Id(id.into())
    }
}

impl fmt::Display for MutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKey::Add => f.write_str("add"),
            MutationKey::Id(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Succeed,
    Fail,
    Acknowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("Mutation '{key}' has an unacknowledged {status} result")]
    Unacknowledged { key: MutationKey, status: EntityStatus },

    #[error("Invalid status transition for '{key}': {from:?} on {transition:?}")]
    InvalidTransition {
        key: MutationKey,
        from: Option<EntityStatus>,
        transition: Transition,
    },
}

/// Compute the status after `transition`.
///
/// Starting a mutation on a pending key is allowed and overwrites it; the
/// later-completing request wins. `Add` acknowledges its previous result
/// implicitly when a new creation starts.
pub fn next(
    key: &MutationKey,
    current: Option<EntityStatus>,
    transition: Transition,
) -> Result<EntityStatus, StatusError> {
    use EntityStatus::*;

    match (transition, current) {
        (Transition::Start, None | Some(Idle) | Some(Pending)) => Ok(Pending),
        (Transition::Start, Some(status)) => match key {
            MutationKey::Add => Ok(Pending),
            MutationKey::Id(_) => Err(StatusError::Unacknowledged {
                key: key.clone(),
                status,
            }),
        },
        // A settled key can be settled again by an overlapping request.
        (Transition::Succeed, Some(Pending | Success | Failed)) => Ok(Success),
        (Transition::Fail, Some(Pending | Success | Failed)) => Ok(Failed),
        (Transition::Acknowledge, Some(Idle | Success | Failed)) => Ok(Idle),
        (transition, from) => Err(StatusError::InvalidTransition {
            key: key.clone(),
            from,
            transition,
        }),
    }
}
