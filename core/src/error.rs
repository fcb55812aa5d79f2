//! Error types for the user API client and controllers.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the record does not exist" from "the server returned an unexpected
//! status." Payload rejections (400/422) land in `Validation`; every other
//! non-2xx response lands in `HttpError` with the raw status code and body.
//! The type is `Clone` so controllers can keep the last failure in their
//! observable state.

use thiserror::Error;

/// Coarse classification shown to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Transport,
    UnknownServer,
}

/// Errors returned by the client, the service and the controllers.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server returned 404; the referenced user does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the payload (400 or 422).
    #[error("rejected by server (HTTP {status}): {body}")]
    Validation { status: u16, body: String },

    /// A required field was blank; nothing was sent.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// An edit was submitted for a record that never loaded.
    #[error("no record loaded for editing")]
    MissingId,

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned a non-2xx status other than 400, 404 and 422.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::Validation { .. } | ApiError::MissingField { .. } | ApiError::MissingId => {
                ErrorKind::Validation
            }
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::HttpError { .. }
            | ApiError::DeserializationError(_)
            | ApiError::SerializationError(_) => ErrorKind::UnknownServer,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
