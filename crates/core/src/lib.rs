//! Domain types and pure validation logic for academy record editing.
//!
//! No I/O lives here: the remote store client and the undo/redo engine
//! build on these types from their own crates.

pub mod entity;
pub mod error;
pub mod types;
pub mod validation;

pub use entity::EntityType;
pub use error::CoreError;
pub use types::{EntityId, Record};
