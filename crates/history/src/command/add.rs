use async_trait::async_trait;
use hakwon_client::RemoteError;
use hakwon_core::validation::prepare_for_create;
use hakwon_core::{EntityId, EntityType, Record};

use super::{Reversible, SharedCache, SharedStore};
use crate::error::CommandError;

/// Create a record. The server-assigned id is captured on execute so undo
/// deletes exactly that record.
pub struct AddEntityCommand {
    entity: EntityType,
    data: Record,
    created_id: Option<EntityId>,
    store: SharedStore,
    cache: SharedCache,
}

impl AddEntityCommand {
    pub fn new(entity: EntityType, data: Record, store: SharedStore, cache: SharedCache) -> Self {
        Self {
            entity,
            data,
            created_id: None,
            store,
            cache,
        }
    }

    /// Id of the record created by the last successful `execute`, if it has
    /// not been undone since.
    pub fn created_id(&self) -> Option<&EntityId> {
        self.created_id.as_ref()
    }
}

#[async_trait]
impl Reversible for AddEntityCommand {
    async fn execute(&mut self) -> Result<(), CommandError> {
        let validated = prepare_for_create(self.entity, &self.data)?;
        let created = self.store.create_entity(self.entity, &validated).await?;
        let id = EntityId::from_record(&created).ok_or(RemoteError::MissingId {
            entity: self.entity,
        })?;

        tracing::debug!(entity = %self.entity, %id, "Record created");
        self.created_id = Some(id);
        self.cache.on_local_add(&created);
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), CommandError> {
        let id = self
            .created_id
            .clone()
            .ok_or_else(|| CommandError::NotExecuted(self.description()))?;

        self.store.delete_entity(self.entity, &id).await?;
        self.cache.on_local_remove(&id);
        self.created_id = None;
        Ok(())
    }

    fn can_execute(&self) -> bool {
        !self.data.is_empty()
    }

    fn description(&self) -> String {
        format!("{} 추가", self.entity.label())
    }
}
