use hakwon_client::RemoteError;
use hakwon_core::CoreError;

/// Why a single command's `execute` or `undo` failed.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Rejected locally before any remote call.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The remote store call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// `undo` was called on a command that has nothing to reverse.
    #[error("{0} has not been executed")]
    NotExecuted(String),
}

impl CommandError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Outcome of a history operation that did not go through.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The command's preconditions do not hold; nothing was attempted.
    #[error("Command cannot be executed: {0}")]
    Rejected(String),

    #[error("No commands to undo")]
    NothingToUndo,

    #[error("No commands to redo")]
    NothingToRedo,

    /// The command ran and failed; history is unchanged.
    #[error("{description}: {source}")]
    Failed {
        description: String,
        #[source]
        source: CommandError,
    },
}
