use std::sync::Arc;

use async_trait::async_trait;
use hakwon_core::{EntityId, EntityType, Record};
use serde_json::Value;

use crate::error::RemoteError;
use crate::pending::{PendingOperationsRegistry, WriteKind};
use crate::store::RemoteStore;

/// [`RemoteStore`] decorator that registers every write with a
/// [`PendingOperationsRegistry`] for the duration of the call.
pub struct TrackedStore<S> {
    inner: S,
    registry: Arc<PendingOperationsRegistry>,
}

impl<S: RemoteStore> TrackedStore<S> {
    pub fn new(inner: S, registry: Arc<PendingOperationsRegistry>) -> Self {
        Self { inner, registry }
    }

    pub fn registry(&self) -> &Arc<PendingOperationsRegistry> {
        &self.registry
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: RemoteStore> RemoteStore for TrackedStore<S> {
    async fn create_entity(
        &self,
        entity: EntityType,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        let _pending = self.registry.begin(entity, WriteKind::Create);
        self.inner.create_entity(entity, data).await
    }

    async fn update_entity(
        &self,
        entity: EntityType,
        id: &EntityId,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        let _pending = self.registry.begin(entity, WriteKind::Update);
        self.inner.update_entity(entity, id, data).await
    }

    async fn delete_entity(&self, entity: EntityType, id: &EntityId) -> Result<Value, RemoteError> {
        let _pending = self.registry.begin(entity, WriteKind::Delete);
        self.inner.delete_entity(entity, id).await
    }

    async fn list_entities(&self, entity: EntityType) -> Result<Vec<Record>, RemoteError> {
        self.inner.list_entities(entity).await
    }
}
