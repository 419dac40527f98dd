use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::command::Command;
use crate::error::HistoryError;
use crate::manager::{HistoryInfo, HistoryManager};

/// A [`HistoryManager`] shared between tasks.
///
/// Operations queue on an async mutex and run one at a time in the order
/// they acquire it, so the cursor never races.
#[derive(Clone)]
pub struct SharedHistory {
    inner: Arc<Mutex<HistoryManager>>,
}

impl SharedHistory {
    pub fn new(manager: HistoryManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub async fn execute_command(&self, command: impl Into<Command>) -> Result<(), HistoryError> {
        self.inner.lock().await.execute_command(command).await
    }

    pub async fn undo(&self) -> Result<(), HistoryError> {
        self.inner.lock().await.undo().await
    }

    pub async fn redo(&self) -> Result<(), HistoryError> {
        self.inner.lock().await.redo().await
    }

    pub async fn clear_history(&self) {
        self.inner.lock().await.clear_history();
    }

    pub async fn history_info(&self) -> HistoryInfo {
        self.inner.lock().await.history_info()
    }

    /// Exclusive access for several operations in a row.
    pub async fn lock(&self) -> MutexGuard<'_, HistoryManager> {
        self.inner.lock().await
    }
}
