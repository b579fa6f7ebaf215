//! Error types for the datasets API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant since "the history or dataset does not
//! exist" is the failure callers most often branch on. Every other unexpected
//! status lands in `Http` with the raw status code and body.

use thiserror::Error;

/// Errors surfaced by `DatasetsClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status the operation does not expect.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The base URL does not parse, or carries a query or fragment.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    /// The transport could not produce a response at all.
    #[error("transport failed: {0}")]
    Transport(String),
}
