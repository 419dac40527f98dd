use async_trait::async_trait;
use futures::future::join_all;

use super::{Command, Reversible};
use crate::error::CommandError;

const DEFAULT_DESCRIPTION: &str = "배치 작업";

/// Several commands recorded as one history entry.
///
/// Sub-commands execute concurrently with no ordering between them and are
/// undone strictly in reverse order. The batch remembers which sub-commands
/// are currently applied, so a failed execute, undo or redo can be retried
/// and only touches the sub-commands that still need it.
pub struct BatchCommand {
    commands: Vec<Command>,
    applied: Vec<bool>,
    description: String,
}

impl BatchCommand {
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            applied: vec![false; commands.len()],
            commands,
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of sub-commands whose effect is currently in place.
    pub fn applied_count(&self) -> usize {
        self.applied.iter().filter(|&&applied| applied).count()
    }
}

#[async_trait]
impl Reversible for BatchCommand {
    /// Runs every sub-command not yet applied and reports the first
    /// failure. Sub-commands that succeeded stay applied.
    async fn execute(&mut self) -> Result<(), CommandError> {
        let applied = &self.applied;
        let runs = self
            .commands
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| !applied[*i])
            .map(|(i, cmd)| async move { (i, cmd.execute().await) });
        let results = join_all(runs).await;

        let attempted = results.len();
        let mut first_error = None;
        let mut failed = 0;
        for (i, result) in results {
            match result {
                Ok(()) => self.applied[i] = true,
                Err(e) => {
                    failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => {
                tracing::warn!(
                    description = %self.description,
                    failed,
                    attempted,
                    "Batch partially failed",
                );
                Err(e)
            }
        }
    }

    /// Undoes applied sub-commands last to first, stopping at the first
    /// failure. Already reversed sub-commands are skipped on a retry.
    async fn undo(&mut self) -> Result<(), CommandError> {
        for i in (0..self.commands.len()).rev() {
            if !self.applied[i] {
                continue;
            }
            self.commands[i].undo().await?;
            self.applied[i] = false;
        }
        Ok(())
    }

    fn can_execute(&self) -> bool {
        !self.commands.is_empty() && self.commands.iter().all(Command::can_execute)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}
