use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::Reversible;
use crate::error::CommandError;

const DEFAULT_DESCRIPTION: &str = "로컬 상태 변경";

/// Callback that installs a view state.
pub type StateSetter = Arc<dyn Fn(&Value) + Send + Sync>;

/// A purely local state transition (column layout, filters, ...). No
/// remote call is made in either direction.
pub struct LocalStateCommand {
    old_state: Value,
    new_state: Value,
    on_state_change: StateSetter,
    description: String,
}

impl LocalStateCommand {
    pub fn new(old_state: Value, new_state: Value, on_state_change: StateSetter) -> Self {
        Self {
            old_state,
            new_state,
            on_state_change,
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[async_trait]
impl Reversible for LocalStateCommand {
    async fn execute(&mut self) -> Result<(), CommandError> {
        (self.on_state_change)(&self.new_state);
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), CommandError> {
        (self.on_state_change)(&self.old_state);
        Ok(())
    }

    /// Both states are fixed at construction.
    fn can_execute(&self) -> bool {
        true
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}
