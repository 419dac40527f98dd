//! In-process [`RemoteStore`] with sequential numeric ids.
//!
//! Every call is recorded, and a single failure can be armed with
//! [`MemoryStore::fail_next`] to exercise error paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use hakwon_core::{EntityId, EntityType, Record};
use serde_json::Value;

use crate::error::RemoteError;
use crate::store::RemoteStore;

/// One call observed by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create { entity: EntityType, data: Record },
    Update { entity: EntityType, id: EntityId, data: Record },
    Delete { entity: EntityType, id: EntityId },
    List { entity: EntityType },
}

#[derive(Default)]
struct Inner {
    tables: HashMap<EntityType, BTreeMap<i64, Record>>,
    last_id: i64,
    calls: Vec<StoreCall>,
    fail_next: Option<String>,
}

impl Inner {
    fn take_failure(&mut self) -> Result<(), RemoteError> {
        match self.fail_next.take() {
            Some(message) => Err(RemoteError::Injected(message)),
            None => Ok(()),
        }
    }

    fn insert_new(&mut self, entity: EntityType, data: &Record) -> Record {
        self.last_id += 1;
        let id = self.last_id;
        let mut record = data.clone();
        record.insert("id".into(), Value::from(id));
        self.tables
            .entry(entity)
            .or_default()
            .insert(id, record.clone());
        record
    }
}

/// Shared in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a row without recording a call. Returns the stored record.
    pub fn seed(&self, entity: EntityType, data: Record) -> Record {
        self.lock().insert_new(entity, &data)
    }

    /// Make the next call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    pub fn get(&self, entity: EntityType, id: &EntityId) -> Option<Record> {
        let key = numeric_key(id)?;
        self.lock().tables.get(&entity)?.get(&key).cloned()
    }

    pub fn len(&self, entity: EntityType) -> usize {
        self.lock().tables.get(&entity).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, entity: EntityType) -> bool {
        self.len(entity) == 0
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

fn numeric_key(id: &EntityId) -> Option<i64> {
    match id {
        EntityId::Number(n) => Some(*n),
        EntityId::Text(s) => s.parse().ok(),
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn create_entity(
        &self,
        entity: EntityType,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Create {
            entity,
            data: data.clone(),
        });
        inner.take_failure()?;
        Ok(inner.insert_new(entity, data))
    }

    async fn update_entity(
        &self,
        entity: EntityType,
        id: &EntityId,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Update {
            entity,
            id: id.clone(),
            data: data.clone(),
        });
        inner.take_failure()?;

        let not_found = || RemoteError::NotFound {
            entity,
            id: id.clone(),
        };
        let key = numeric_key(id).ok_or_else(not_found)?;
        let stored = inner
            .tables
            .get_mut(&entity)
            .and_then(|table| table.get_mut(&key))
            .ok_or_else(not_found)?;

        for (field, value) in data {
            stored.insert(field.clone(), value.clone());
        }
        stored.insert("id".into(), Value::from(key));
        Ok(stored.clone())
    }

    async fn delete_entity(&self, entity: EntityType, id: &EntityId) -> Result<Value, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Delete {
            entity,
            id: id.clone(),
        });
        inner.take_failure()?;

        let removed = numeric_key(id)
            .and_then(|key| inner.tables.get_mut(&entity)?.remove(&key));
        match removed {
            Some(_) => Ok(serde_json::json!({ "id": id.to_value(), "deleted": true })),
            None => Err(RemoteError::NotFound {
                entity,
                id: id.clone(),
            }),
        }
    }

    async fn list_entities(&self, entity: EntityType) -> Result<Vec<Record>, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::List { entity });
        inner.take_failure()?;
        Ok(inner
            .tables
            .get(&entity)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default())
    }
}
