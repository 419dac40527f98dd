use async_trait::async_trait;
use hakwon_core::validation::validate_and_transform;
use hakwon_core::{EntityId, EntityType, Record};

use super::{Reversible, SharedCache, SharedStore};
use crate::error::CommandError;

/// Replace a record's fields, remembering the previous row for undo.
pub struct EditEntityCommand {
    entity: EntityType,
    id: EntityId,
    old_data: Record,
    new_data: Record,
    store: SharedStore,
    cache: SharedCache,
}

impl EditEntityCommand {
    /// `old_data` and `new_data` are full rows before and after the edit.
    pub fn new(
        entity: EntityType,
        id: EntityId,
        old_data: Record,
        new_data: Record,
        store: SharedStore,
        cache: SharedCache,
    ) -> Self {
        Self {
            entity,
            id,
            old_data,
            new_data,
            store,
            cache,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Validate `data`, write it, then mirror the written row locally.
    async fn write(&self, data: &Record) -> Result<(), CommandError> {
        let validated = validate_and_transform(self.entity, data)?;
        self.store
            .update_entity(self.entity, &self.id, &validated)
            .await?;

        let mut local = validated;
        local
            .entry("id")
            .or_insert_with(|| self.id.to_value());
        self.cache.on_local_update(&local);
        Ok(())
    }
}

#[async_trait]
impl Reversible for EditEntityCommand {
    async fn execute(&mut self) -> Result<(), CommandError> {
        tracing::debug!(entity = %self.entity, id = %self.id, "Applying edit");
        self.write(&self.new_data).await
    }

    async fn undo(&mut self) -> Result<(), CommandError> {
        tracing::debug!(entity = %self.entity, id = %self.id, "Restoring previous row");
        self.write(&self.old_data).await
    }

    fn can_execute(&self) -> bool {
        self.id.is_defined() && !self.old_data.is_empty() && !self.new_data.is_empty()
    }

    fn description(&self) -> String {
        format!("{} 편집 (ID: {})", self.entity.label(), self.id)
    }
}
