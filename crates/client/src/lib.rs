//! Remote store client for academy records.
//!
//! - [`RemoteStore`]: the create/update/delete/list contract commands
//!   are written against.
//! - [`HttpRemoteStore`]: adapter for the backend REST API.
//! - [`MemoryStore`]: in-process store for tests and offline sessions.
//! - [`PendingOperationsRegistry`] and [`TrackedStore`]: bookkeeping of
//!   remote writes still in flight.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod pending;
pub mod store;
pub mod tracked;

pub use config::{ClientConfig, DeleteMode};
pub use error::RemoteError;
pub use http::HttpRemoteStore;
pub use memory::MemoryStore;
pub use pending::PendingOperationsRegistry;
pub use store::RemoteStore;
pub use tracked::TrackedStore;
