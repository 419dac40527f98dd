//! Interactive console over the undo/redo engine.

pub mod cli;
pub mod parse;
pub mod session;

pub use cli::Cli;
pub use parse::{parse_line, ParseError, ShellCommand};
pub use session::{Outcome, Session, SessionError};
