//! Reversible commands.
//!
//! Every user action that changes data is wrapped in a [`Command`] that
//! knows how to apply and reverse it. Remote-backed variants follow the
//! same protocol in both directions: validate locally, call the remote
//! store, and only then update the local cache.

mod add;
mod batch;
mod delete;
mod edit;
mod local_state;

use std::sync::Arc;

use async_trait::async_trait;
use hakwon_client::RemoteStore;

use crate::error::CommandError;
use crate::sync::LocalCacheSync;

pub use add::AddEntityCommand;
pub use batch::BatchCommand;
pub use delete::DeleteEntityCommand;
pub use edit::EditEntityCommand;
pub use local_state::{LocalStateCommand, StateSetter};

/// Remote store handle shared by commands.
pub type SharedStore = Arc<dyn RemoteStore>;

/// Local cache handle shared by commands.
pub type SharedCache = Arc<dyn LocalCacheSync>;

/// The capabilities every command offers.
///
/// `undo` is only meaningful after a successful `execute`; the history
/// cursor is what keeps the two in step.
#[async_trait]
pub trait Reversible: Send + Sync {
    async fn execute(&mut self) -> Result<(), CommandError>;

    async fn undo(&mut self) -> Result<(), CommandError>;

    /// Structural preconditions; checked before `execute` is attempted.
    fn can_execute(&self) -> bool;

    /// Human-readable label for history lists.
    fn description(&self) -> String;
}

/// A reversible unit of work.
pub enum Command {
    Edit(EditEntityCommand),
    Add(AddEntityCommand),
    Delete(DeleteEntityCommand),
    Batch(BatchCommand),
    LocalState(LocalStateCommand),
}

#[async_trait]
impl Reversible for Command {
    async fn execute(&mut self) -> Result<(), CommandError> {
        match self {
            Self::Edit(cmd) => cmd.execute().await,
            Self::Add(cmd) => cmd.execute().await,
            Self::Delete(cmd) => cmd.execute().await,
            Self::Batch(cmd) => cmd.execute().await,
            Self::LocalState(cmd) => cmd.execute().await,
        }
    }

    async fn undo(&mut self) -> Result<(), CommandError> {
        match self {
            Self::Edit(cmd) => cmd.undo().await,
            Self::Add(cmd) => cmd.undo().await,
            Self::Delete(cmd) => cmd.undo().await,
            Self::Batch(cmd) => cmd.undo().await,
            Self::LocalState(cmd) => cmd.undo().await,
        }
    }

    fn can_execute(&self) -> bool {
        match self {
            Self::Edit(cmd) => cmd.can_execute(),
            Self::Add(cmd) => cmd.can_execute(),
            Self::Delete(cmd) => cmd.can_execute(),
            Self::Batch(cmd) => cmd.can_execute(),
            Self::LocalState(cmd) => cmd.can_execute(),
        }
    }

    fn description(&self) -> String {
        match self {
            Self::Edit(cmd) => cmd.description(),
            Self::Add(cmd) => cmd.description(),
            Self::Delete(cmd) => cmd.description(),
            Self::Batch(cmd) => cmd.description(),
            Self::LocalState(cmd) => cmd.description(),
        }
    }
}

impl From<EditEntityCommand> for Command {
    fn from(cmd: EditEntityCommand) -> Self {
        Self::Edit(cmd)
    }
}

impl From<AddEntityCommand> for Command {
    fn from(cmd: AddEntityCommand) -> Self {
        Self::Add(cmd)
    }
}

impl From<DeleteEntityCommand> for Command {
    fn from(cmd: DeleteEntityCommand) -> Self {
        Self::Delete(cmd)
    }
}

impl From<BatchCommand> for Command {
    fn from(cmd: BatchCommand) -> Self {
        Self::Batch(cmd)
    }
}

impl From<LocalStateCommand> for Command {
    fn from(cmd: LocalStateCommand) -> Self {
        Self::LocalState(cmd)
    }
}
