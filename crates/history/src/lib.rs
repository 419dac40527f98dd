//! Undo/redo engine for academy record editing.
//!
//! - [`Command`]: reversible edit/add/delete/batch/local-state actions.
//! - [`HistoryManager`]: linear history with branch truncation and a
//!   bounded length.
//! - [`SharedHistory`]: the same manager behind an async mutex.
//! - [`LocalCacheSync`] / [`LocalTable`]: how confirmed results reach the
//!   visible rows.
//! - [`Notifier`]: failure notifications for the view layer.

pub mod command;
pub mod error;
pub mod manager;
pub mod notify;
pub mod shared;
pub mod sync;

pub use command::{
    AddEntityCommand, BatchCommand, Command, DeleteEntityCommand, EditEntityCommand,
    LocalStateCommand, Reversible,
};
pub use error::{CommandError, HistoryError};
pub use manager::{HistoryConfig, HistoryInfo, HistoryManager};
pub use notify::{Notification, Notifier, Severity};
pub use shared::SharedHistory;
pub use sync::{LocalCacheSync, LocalTable};
