//! Error type for the todo API client.
//!
//! # Design
//! No status code gets a variant of its own: any non-2xx response lands in
//! `Http` with the raw status and body, and the caller decides what it means.
//! The other variants cover the edges of a round-trip (encoding the request,
//! moving bytes, decoding the reply).

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods and `Transport`s.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (connect, DNS, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
