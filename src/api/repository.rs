//! Generic fetch and mutation operations for one entity kind.
//!
//! Every mutation follows the same sequence: mark the mutation key pending,
//! call the transport, then either apply the server's answer and mark the
//! key succeeded, or mark it failed and leave the held data untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::store::{EntityIntent, EntityStatus, EntityStore, MutationKey, Scope};
use crate::transport::{ApiRequest, ApiResponse, RequestScope, Transport, TransportError};

use super::error::ApiError;
use super::resource::{Paginated, Payload, Reaction, Resource};

/// Store and API operations for entities of type `T`.
#[derive(Clone)]
pub struct Repository<T: Resource> {
    transport: Arc<Transport>,
    store: EntityStore<T>,
    scope: Option<RequestScope>,
}

impl<T: Resource> Repository<T> {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            store: EntityStore::new(),
            scope: None,
        }
    }

    pub fn store(&self) -> &EntityStore<T> {
        &self.store
    }

    /// A handle sharing this store whose requests belong to `scope`.
    ///
    /// Once the scope is cancelled, in-flight operations started through
    /// the handle fail with `Cancelled` and apply nothing.
    pub fn scoped(&self, scope: RequestScope) -> Self {
        Self {
            transport: self.transport.clone(),
            store: self.store.clone(),
            scope: Some(scope),
        }
    }

    pub fn list(&self, scope: &Scope) -> Vec<T> {
        self.store.list(scope)
    }

    pub fn status(&self, key: &MutationKey) -> Option<EntityStatus> {
        self.store.status(key)
    }

    pub fn acknowledge(&self, key: &MutationKey) -> Result<(), ApiError> {
        Ok(self.store.acknowledge(key)?)
    }

    /// Load `scope` from the server, replacing what the store held for it.
    pub async fn fetch(&self, scope: &Scope) -> Result<Vec<T>, ApiError> {
        let request = T::list_request(scope)?;
        let items: Vec<T> = self.send(&request).await?.json()?;
        self.ensure_live()?;

        tracing::debug!(kind = %T::KIND, scope = ?scope, count = items.len(), "Fetched");
        self.store.dispatch(EntityIntent::Replace {
            scope: scope.clone(),
            items,
        });
        Ok(self.store.list(scope))
    }

    /// Load a single entity and keep it in the store.
    pub(super) async fn fetch_one(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let entity: T = self.send(request).await?.json()?;
        self.ensure_live()?;
        self.store.upsert(entity.clone());
        Ok(entity)
    }

    /// Create an entity under the `add` key.
    ///
    /// Fails with `Duplicate` before any request if the store already holds
    /// an entity with the payload's natural key.
    pub async fn create<P: Payload<T>>(&self, payload: P) -> Result<T, ApiError> {
        if let Some(key) = payload.natural_key() {
            if self.store.has_natural_key(&key) {
                return Err(ApiError::Duplicate {
                    kind: T::KIND,
                    key: key.to_string(),
                });
            }
        }

        let request = ApiRequest::post([T::KIND.path()]).with_body(payload.into_body()?);
        self.mutate(MutationKey::Add, request).await
    }

    pub async fn update<P: Payload<T>>(&self, id: &str, payload: P) -> Result<T, ApiError> {
        let request = ApiRequest::patch([T::KIND.path(), id]).with_body(payload.into_body()?);
        self.mutate(MutationKey::id(id), request).await
    }

    /// Delete an entity. On success the entity and its status entry are
    /// both removed.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let key = MutationKey::id(id);
        self.store.begin(&key)?;

        let request = ApiRequest::delete([T::KIND.path(), id]);
        let result = self
            .send(&request)
            .await
            .and_then(|_| self.ensure_live());

        match result {
            Ok(()) => {
                self.store
                    .succeed(&key, Some(EntityIntent::Remove(id.to_string())));
                tracing::info!(kind = %T::KIND, id = %id, "Deleted");
                Ok(())
            }
            Err(err) => {
                self.record_failure(&key, &err);
                Err(err.into())
            }
        }
    }

    /// Like, dislike or block an entity, tracked under its id.
    pub async fn react(&self, id: &str, reaction: Reaction) -> Result<T, ApiError> {
        if reaction == Reaction::Block && !self.can_moderate() {
            return Err(ApiError::Forbidden);
        }

        let request = ApiRequest::patch([T::KIND.path(), id, reaction.segment()]);
        self.mutate(MutationKey::id(id), request).await
    }

    fn can_moderate(&self) -> bool {
        self.transport
            .session()
            .user()
            .is_some_and(|user| user.can_moderate())
    }

    async fn mutate(&self, key: MutationKey, request: ApiRequest) -> Result<T, ApiError> {
        self.store.begin(&key)?;

        let result = async {
            let entity: T = self.send(&request).await?.json()?;
            self.ensure_live()?;
            Ok::<T, TransportError>(entity)
        }
        .await;

        match result {
            Ok(entity) => {
                self.store
                    .succeed(&key, Some(EntityIntent::Upsert(entity.clone())));
                tracing::info!(
                    kind = %T::KIND,
                    key = %key,
                    method = %request.method,
                    "Mutation succeeded"
                );
                Ok(entity)
            }
            Err(err) => {
                self.record_failure(&key, &err);
                Err(err.into())
            }
        }
    }

    fn record_failure(&self, key: &MutationKey, err: &TransportError) {
        tracing::warn!(
            kind = %T::KIND,
            key = %key,
            error = %err,
            error_type = err.error_type(),
            "Mutation failed"
        );
        self.store.fail(key);
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        match &self.scope {
            Some(scope) => self.transport.request_in(scope, request).await,
            None => self.transport.request(request).await,
        }
    }

    fn ensure_live(&self) -> Result<(), TransportError> {
        if self.scope.as_ref().is_some_and(|scope| scope.is_cancelled()) {
            Err(TransportError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl<T: Paginated> Repository<T> {
    /// Fetch the page of `scope` strictly older than `before` and append
    /// it. Ids already held are skipped. Returns how many were added.
    pub async fn fetch_more(&self, scope: &Scope, before: DateTime<Utc>) -> Result<usize, ApiError> {
        let request = T::page_request(scope, before)?;
        let items: Vec<T> = self.send(&request).await?.json()?;
        self.ensure_live()?;

        let received = items.len();
        let older: Vec<T> = items
            .into_iter()
            .filter(|item| item.created_at().is_some_and(|at| at < before))
            .collect();

        let added = self.store.append(older);

        tracing::debug!(
            kind = %T::KIND,
            scope = ?scope,
            received,
            added,
            "Fetched next page"
        );
        Ok(added)
    }

    /// Fetch the next page after the oldest held entity of `scope`, or the
    /// first page if nothing is held yet.
    pub async fn load_more(&self, scope: &Scope) -> Result<usize, ApiError> {
        match self.store.oldest(scope) {
            Some(cursor) => self.fetch_more(scope, cursor).await,
            None => Ok(self.fetch(scope).await?.len()),
        }
    }
}
