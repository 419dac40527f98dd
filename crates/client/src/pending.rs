//! Registry of remote writes that have been sent but not yet answered.
//!
//! Components that must not act on a possibly stale view (a refetch, a
//! "leave page" prompt) receive an `Arc<PendingOperationsRegistry>` and
//! ask it whether unflushed writes exist.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use hakwon_core::types::Timestamp;
use hakwon_core::EntityType;
use serde::Serialize;
use uuid::Uuid;

/// Kind of remote write being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteKind {
    Create,
    Update,
    Delete,
}

/// One in-flight write.
#[derive(Debug, Clone, Serialize)]
pub struct PendingOperation {
    pub id: Uuid,
    pub entity: EntityType,
    pub kind: WriteKind,
    pub started_at: Timestamp,
}

#[derive(Debug, Default)]
pub struct PendingOperationsRegistry {
    operations: Mutex<HashMap<Uuid, PendingOperation>>,
}

impl PendingOperationsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, PendingOperation>> {
        self.operations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a write. It stays pending until the returned guard drops.
    pub fn begin(self: &Arc<Self>, entity: EntityType, kind: WriteKind) -> PendingGuard {
        let operation = PendingOperation {
            id: Uuid::new_v4(),
            entity,
            kind,
            started_at: Utc::now(),
        };
        let id = operation.id;
        self.lock().insert(id, operation);
        tracing::trace!(%id, %entity, ?kind, "Remote write pending");

        PendingGuard {
            registry: Arc::clone(self),
            id,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.lock().is_empty()
    }

    pub fn has_pending_for(&self, entity: EntityType) -> bool {
        self.lock().values().any(|op| op.entity == entity)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Pending operations, oldest first.
    pub fn snapshot(&self) -> Vec<PendingOperation> {
        let mut ops: Vec<_> = self.lock().values().cloned().collect();
        ops.sort_by_key(|op| op.started_at);
        ops
    }

    fn finish(&self, id: &Uuid) {
        self.lock().remove(id);
    }
}

/// Keeps an operation registered while alive.
#[must_use = "the operation is unregistered as soon as the guard drops"]
pub struct PendingGuard {
    registry: Arc<PendingOperationsRegistry>,
    id: Uuid,
}

impl PendingGuard {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.registry.finish(&self.id);
    }
}
