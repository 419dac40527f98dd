use async_trait::async_trait;
use hakwon_core::{EntityId, EntityType, Record};

use super::{Reversible, SharedCache, SharedStore};
use crate::error::CommandError;

/// Delete a record, keeping a snapshot to recreate it on undo.
///
/// Recreation goes through `create_entity`, so the restored row usually
/// gets a new id. The command follows that id for later redos; rows in
/// other tables that referenced the original id are not re-linked.
pub struct DeleteEntityCommand {
    entity: EntityType,
    original_id: EntityId,
    /// Id of the record as it currently exists (or last existed) remotely.
    id: EntityId,
    snapshot: Record,
    store: SharedStore,
    cache: SharedCache,
}

impl DeleteEntityCommand {
    pub fn new(
        entity: EntityType,
        id: EntityId,
        snapshot: Record,
        store: SharedStore,
        cache: SharedCache,
    ) -> Self {
        Self {
            entity,
            original_id: id.clone(),
            id,
            snapshot,
            store,
            cache,
        }
    }

    pub fn current_id(&self) -> &EntityId {
        &self.id
    }
}

#[async_trait]
impl Reversible for DeleteEntityCommand {
    async fn execute(&mut self) -> Result<(), CommandError> {
        self.store.delete_entity(self.entity, &self.id).await?;
        self.cache.on_local_remove(&self.id);
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), CommandError> {
        let mut payload = self.snapshot.clone();
        payload.remove("id");

        let created = self.store.create_entity(self.entity, &payload).await?;
        match EntityId::from_record(&created) {
            Some(new_id) => {
                if new_id != self.original_id {
                    tracing::warn!(
                        entity = %self.entity,
                        original_id = %self.original_id,
                        %new_id,
                        "Restored record has a new id; references to the old id are not re-linked",
                    );
                }
                self.id = new_id;
            }
            None => {
                tracing::warn!(entity = %self.entity, "Restored record came back without an id");
            }
        }

        self.cache.on_local_add(&created);
        Ok(())
    }

    fn can_execute(&self) -> bool {
        self.id.is_defined() && !self.snapshot.is_empty()
    }

    fn description(&self) -> String {
        format!("{} 삭제 (ID: {})", self.entity.label(), self.original_id)
    }
}
