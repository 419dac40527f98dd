//! Local cache synchronisation.
//!
//! Commands push their confirmed results into the caller's visible row set
//! through [`LocalCacheSync`]. Callbacks run synchronously after the remote
//! call succeeded and are never invoked on failure.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hakwon_core::{EntityId, EntityType, Record};

/// Callbacks owned by the view layer. Implementations must not block or
/// panic; the command layer does not catch anything raised here.
pub trait LocalCacheSync: Send + Sync {
    fn on_local_add(&self, record: &Record);
    fn on_local_update(&self, record: &Record);
    fn on_local_remove(&self, id: &EntityId);
}

/// Ordered in-memory row set for one entity kind.
pub struct LocalTable {
    entity: EntityType,
    rows: RwLock<Vec<Record>>,
}

impl LocalTable {
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Record>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Record>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace every row, e.g. after a refetch from the remote store.
    pub fn replace_all(&self, rows: Vec<Record>) {
        tracing::debug!(entity = %self.entity, count = rows.len(), "Local table replaced");
        *self.write() = rows;
    }

    pub fn rows(&self) -> Vec<Record> {
        self.read().clone()
    }

    pub fn get(&self, id: &EntityId) -> Option<Record> {
        self.read().iter().find(|row| row_has_id(row, id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

fn row_has_id(row: &Record, id: &EntityId) -> bool {
    row.get("id").is_some_and(|value| id.matches(value))
}

impl LocalCacheSync for LocalTable {
    /// Append the row, or replace an existing row carrying the same id.
    fn on_local_add(&self, record: &Record) {
        let mut rows = self.write();
        let existing = EntityId::from_record(record)
            .and_then(|id| rows.iter().position(|row| row_has_id(row, &id)));
        match existing {
            Some(index) => rows[index] = record.clone(),
            None => rows.push(record.clone()),
        }
    }

    /// Merge the record's fields into the row with the same id.
    fn on_local_update(&self, record: &Record) {
        let Some(id) = EntityId::from_record(record) else {
            tracing::warn!(entity = %self.entity, "Local update without id ignored");
            return;
        };
        let mut rows = self.write();
        match rows.iter_mut().find(|row| row_has_id(row, &id)) {
            Some(row) => {
                for (field, value) in record {
                    row.insert(field.clone(), value.clone());
                }
            }
            None => tracing::debug!(entity = %self.entity, %id, "Local update for unknown row"),
        }
    }

    fn on_local_remove(&self, id: &EntityId) {
        self.write().retain(|row| !row_has_id(row, id));
    }
}

#[cfg(test)]
mod tests {
    use hakwon_core::types::record_from_value;
    use serde_json::{json, Value};

    use super::*;

    fn record(value: Value) -> Record {
        record_from_value(value).unwrap()
    }

    fn table() -> LocalTable {
        let table = LocalTable::new(EntityType::Student);
        table.replace_all(vec![
            record(json!({"id": 1, "name": "A"})),
            record(json!({"id": 2, "name": "B"})),
        ]);
        table
    }

    #[test]
    fn update_merges_into_matching_row() {
        let table = table();
        table.on_local_update(&record(json!({"id": 2, "name": "B2", "phone": null})));
        let row = table.get(&EntityId::Number(2)).unwrap();
        assert_eq!(row["name"], json!("B2"));
        assert_eq!(row["phone"], Value::Null);
        assert_eq!(table.rows()[0]["name"], json!("A"));
    }

    #[test]
    fn update_for_unknown_row_is_ignored() {
        let table = table();
        table.on_local_update(&record(json!({"id": 9, "name": "Z"})));
        table.on_local_update(&record(json!({"name": "no id"})));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn add_appends_or_replaces() {
        let table = table();
        table.on_local_add(&record(json!({"id": 3, "name": "C"})));
        assert_eq!(table.len(), 3);

        table.on_local_add(&record(json!({"id": 1, "name": "A2"})));
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0]["name"], json!("A2"));
    }

    #[test]
    fn remove_by_id() {
        let table = table();
        table.on_local_remove(&EntityId::Number(1));
        assert_eq!(table.len(), 1);
        assert!(table.get(&EntityId::Number(1)).is_none());

        table.on_local_remove(&EntityId::Number(42));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn string_and_numeric_ids_match() {
        let table = LocalTable::new(EntityType::Lecture);
        table.on_local_add(&record(json!({"id": "7", "title": "T"})));
        assert!(table.get(&EntityId::Number(7)).is_some());
    }
}
