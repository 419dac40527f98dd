//! Linear undo/redo history.
//!
//! [`HistoryManager`] owns the executed commands of one editing session and
//! a cursor separating applied commands from undone ones. Executing a new
//! command discards the undone tail (branch truncation); the list is capped
//! at [`HistoryConfig::max_commands`] by evicting the oldest entries.

use chrono::Utc;
use hakwon_client::config::ConfigError;
use hakwon_core::types::Timestamp;
use serde::Serialize;

use crate::command::{Command, Reversible};
use crate::error::HistoryError;
use crate::notify::{Notification, Notifier};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default cap on retained history entries.
pub const DEFAULT_MAX_COMMANDS: usize = 100;

/// History limits, loaded from the environment by [`HistoryConfig::from_env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of retained commands (at least 1).
    pub max_commands: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_commands: DEFAULT_MAX_COMMANDS,
        }
    }
}

impl HistoryConfig {
    /// Read `HISTORY_MAX_COMMANDS` (default: `100`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(std::env::var("HISTORY_MAX_COMMANDS").ok())
    }

    fn from_value(raw: Option<String>) -> Result<Self, ConfigError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(Self { max_commands: n }),
            _ => Err(ConfigError::Invalid {
                var: "HISTORY_MAX_COMMANDS",
                expected: "a positive integer",
                value: raw,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Summary for undo/redo controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryInfo {
    /// Number of recorded commands, applied or undone.
    pub total: usize,
    /// Number of applied commands (the zero-based cursor plus one).
    pub current: usize,
    /// At least one applied command exists.
    pub can_undo: bool,
    /// At least one undone command can be re-executed.
    pub can_redo: bool,
}

/// One line of a history listing.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// The command's [`description`](Reversible::description).
    pub description: String,
    /// `false` once undone (the entry is redoable).
    pub applied: bool,
    /// When the command was first executed.
    pub executed_at: Timestamp,
}

struct Recorded {
    command: Command,
    executed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// HistoryManager
// ---------------------------------------------------------------------------

/// Command stack plus cursor for one editing session.
///
/// Every operation takes `&mut self`, so two history operations can never
/// overlap on the same manager; share one across tasks through
/// [`SharedHistory`](crate::SharedHistory).
pub struct HistoryManager {
    entries: Vec<Recorded>,
    /// Number of applied entries; `entries[..cursor]` can be undone,
    /// `entries[cursor..]` redone.
    cursor: usize,
    max_commands: usize,
    notifier: Option<Notifier>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryManager {
    /// Create an empty history. A `max_commands` of zero is raised to one.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_commands: config.max_commands.max(1),
            notifier: None,
        }
    }

    /// Publish failures through `notifier`.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Execute `command` and record it.
    ///
    /// Nothing is attempted when the command's preconditions fail. On
    /// success the undone tail is discarded before the command is
    /// appended. On failure the history is left untouched and a
    /// notification is published.
    pub async fn execute_command(
        &mut self,
        command: impl Into<Command>,
    ) -> Result<(), HistoryError> {
        let mut command = command.into();
        let description = command.description();

        if !command.can_execute() {
            tracing::warn!(%description, "Command cannot be executed");
            return Err(HistoryError::Rejected(description));
        }

        if let Err(source) = command.execute().await {
            tracing::error!(%description, error = %source, "Command execution failed");
            self.notify("작업 실패", source.to_string());
            return Err(HistoryError::Failed {
                description,
                source,
            });
        }

        self.entries.truncate(self.cursor);
        self.entries.push(Recorded {
            command,
            executed_at: Utc::now(),
        });
        self.cursor += 1;
        self.evict_overflow();

        tracing::info!(%description, total = self.entries.len(), "Command executed");
        Ok(())
    }

    /// Reverse the most recently applied command.
    ///
    /// On failure the cursor stays put. The local view may then disagree
    /// with the server; refetching is the caller's recovery path.
    pub async fn undo(&mut self) -> Result<(), HistoryError> {
        if self.cursor == 0 {
            tracing::warn!("No commands to undo");
            return Err(HistoryError::NothingToUndo);
        }

        let entry = &mut self.entries[self.cursor - 1];
        let description = entry.command.description();
        let result = entry.command.undo().await;

        match result {
            Ok(()) => {
                self.cursor -= 1;
                tracing::info!(%description, "Command undone");
                Ok(())
            }
            Err(source) => {
                tracing::error!(%description, error = %source, "Undo failed");
                self.notify("실행 취소 실패", source.to_string());
                Err(HistoryError::Failed {
                    description,
                    source,
                })
            }
        }
    }

    /// Re-execute the next undone command.
    pub async fn redo(&mut self) -> Result<(), HistoryError> {
        if self.cursor >= self.entries.len() {
            tracing::warn!("No commands to redo");
            return Err(HistoryError::NothingToRedo);
        }

        let entry = &mut self.entries[self.cursor];
        let description = entry.command.description();
        let result = entry.command.execute().await;

        match result {
            Ok(()) => {
                self.cursor += 1;
                tracing::info!(%description, "Command redone");
                Ok(())
            }
            Err(source) => {
                tracing::error!(%description, error = %source, "Redo failed");
                self.notify("다시 실행 실패", source.to_string());
                Err(HistoryError::Failed {
                    description,
                    source,
                })
            }
        }
    }

    /// Forget every entry. Used after operations that invalidate prior
    /// history, such as bulk inserts or an explicit reset.
    pub fn clear_history(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        tracing::debug!("History cleared");
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Index of the last applied command, `None` when nothing is applied.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Effective cap on retained entries.
    pub fn max_commands(&self) -> usize {
        self.max_commands
    }

    /// Counters for undo/redo controls.
    pub fn history_info(&self) -> HistoryInfo {
        HistoryInfo {
            total: self.entries.len(),
            current: self.cursor,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Description of the command the next [`undo`](Self::undo) reverses.
    pub fn next_undo_description(&self) -> Option<String> {
        let index = self.current_index()?;
        Some(self.entries[index].command.description())
    }

    /// Description of the command the next [`redo`](Self::redo) re-executes.
    pub fn next_redo_description(&self) -> Option<String> {
        self.entries
            .get(self.cursor)
            .map(|entry| entry.command.description())
    }

    /// Entries oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| HistoryEntry {
                description: entry.command.description(),
                applied: i < self.cursor,
                executed_at: entry.executed_at,
            })
            .collect()
    }

    // ---- private helpers ----

    fn evict_overflow(&mut self) {
        if self.entries.len() <= self.max_commands {
            return;
        }
        let excess = self.entries.len() - self.max_commands;
        self.entries.drain(..excess);
        self.cursor = self.cursor.saturating_sub(excess);
        tracing::debug!(evicted = excess, "Oldest history entries evicted");
    }

    fn notify(&self, title: &str, description: String) {
        if let Some(notifier) = &self.notifier {
            notifier.publish(Notification::destructive(title, description));
        }
    }
}
