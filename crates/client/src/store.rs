use async_trait::async_trait;
use hakwon_core::{EntityId, EntityType, Record};

use crate::error::RemoteError;

/// Generic CRUD contract of the backend.
///
/// Implementations must be shareable across tasks; commands hold them as
/// `Arc<dyn RemoteStore>`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Persist a new record. The returned record must include the
    /// server-assigned `id`.
    async fn create_entity(&self, entity: EntityType, data: &Record)
        -> Result<Record, RemoteError>;

    /// Overwrite a record and return its canonical form.
    async fn update_entity(
        &self,
        entity: EntityType,
        id: &EntityId,
        data: &Record,
    ) -> Result<Record, RemoteError>;

    /// Remove a record (soft or hard, per the implementation).
    async fn delete_entity(
        &self,
        entity: EntityType,
        id: &EntityId,
    ) -> Result<serde_json::Value, RemoteError>;

    /// Fetch every record of a kind. Used to rebuild the local view when it
    /// may have drifted from the server.
    async fn list_entities(&self, entity: EntityType) -> Result<Vec<Record>, RemoteError>;
}
