use hakwon_core::{EntityId, EntityType};

/// Errors from the remote store layer.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message assembled from the status line and the error body.
        message: String,
    },

    /// A create response carried no usable `id`.
    #[error("Created {entity} record has no id")]
    MissingId { entity: EntityType },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: EntityType, id: EntityId },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Failure injected into a [`MemoryStore`](crate::MemoryStore).
    #[error("{0}")]
    Injected(String),
}
