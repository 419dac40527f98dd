#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hakwon_client::{MemoryStore, RemoteError, RemoteStore};
use hakwon_core::types::record_from_value;
use hakwon_core::{EntityId, EntityType, Record};
use hakwon_history::command::{SharedCache, SharedStore};
use hakwon_history::{LocalCacheSync, LocalTable};
use serde_json::Value;

/// Callback invocations observed by [`RecordingCache`].
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    Add(Record),
    Update(Record),
    Remove(EntityId),
}

/// A [`LocalTable`] that also logs every callback.
pub struct RecordingCache {
    pub table: LocalTable,
    events: Mutex<Vec<CacheEvent>>,
}

impl RecordingCache {
    pub fn new(entity: EntityType) -> Arc<Self> {
        Arc::new(Self {
            table: LocalTable::new(entity),
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<CacheEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl LocalCacheSync for RecordingCache {
    fn on_local_add(&self, record: &Record) {
        self.events.lock().unwrap().push(CacheEvent::Add(record.clone()));
        self.table.on_local_add(record);
    }

    fn on_local_update(&self, record: &Record) {
        self.events.lock().unwrap().push(CacheEvent::Update(record.clone()));
        self.table.on_local_update(record);
    }

    fn on_local_remove(&self, id: &EntityId) {
        self.events.lock().unwrap().push(CacheEvent::Remove(id.clone()));
        self.table.on_local_remove(id);
    }
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<RecordingCache>,
}

impl Fixture {
    pub fn new(entity: EntityType) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            cache: RecordingCache::new(entity),
        }
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn cache(&self) -> SharedCache {
        self.cache.clone()
    }

    /// Seed a row remotely and mirror it into the local table.
    pub fn seed(&self, entity: EntityType, value: Value) -> Record {
        let stored = self.store.seed(entity, record(value));
        self.cache.table.on_local_add(&stored);
        stored
    }
}

/// [`MemoryStore`] front that fails the next delete of one chosen id.
pub struct FlakyStore {
    pub inner: Arc<MemoryStore>,
    fail_delete_of: Mutex<Option<EntityId>>,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_delete_of: Mutex::new(None),
        })
    }

    pub fn fail_delete_of(&self, id: EntityId) {
        *self.fail_delete_of.lock().unwrap() = Some(id);
    }
}

#[async_trait]
impl RemoteStore for FlakyStore {
    async fn create_entity(
        &self,
        entity: EntityType,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        self.inner.create_entity(entity, data).await
    }

    async fn update_entity(
        &self,
        entity: EntityType,
        id: &EntityId,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        self.inner.update_entity(entity, id, data).await
    }

    async fn delete_entity(
        &self,
        entity: EntityType,
        id: &EntityId,
    ) -> Result<Value, RemoteError> {
        let armed = {
            let mut target = self.fail_delete_of.lock().unwrap();
            if target.as_ref() == Some(id) {
                target.take()
            } else {
                None
            }
        };
        if armed.is_some() {
            return Err(RemoteError::Injected("network blip".into()));
        }
        self.inner.delete_entity(entity, id).await
    }

    async fn list_entities(&self, entity: EntityType) -> Result<Vec<Record>, RemoteError> {
        self.inner.list_entities(entity).await
    }
}

pub fn record(value: Value) -> Record {
    record_from_value(value).unwrap()
}

pub fn id_of(record: &Record) -> EntityId {
    EntityId::from_record(record).unwrap()
}
