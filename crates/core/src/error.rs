//! Unified error types for the appraiser search stack.
//!
//! Messages carry a stable code prefix so callers on the far side of the
//! MCP boundary can match on them.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for appraiser search.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No search filter was set before a fetch.
    #[error("INVALID_QUERY: {0}")]
    InvalidQuery(String),

    /// Invalid input parameters (e.g., an unknown filter field name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Network or HTTP-layer failure talking to the search endpoint.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// The response does not contain the expected top-level table structure.
    #[error("MALFORMED_DOCUMENT: {0}")]
    MalformedDocument(String),

    /// A result row does not match either recognized cell/segment shape.
    #[error("UNEXPECTED_ROW_SHAPE: {0}")]
    UnexpectedRowShape(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A cached payload could not be encoded or decoded.
    #[error("CACHE_ERROR: corrupt entry: {0}")]
    CacheCorrupt(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidQuery(msg) => (-32602, msg.clone()),
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::MalformedDocument(msg) => (-32000, msg.clone()),
            Error::UnexpectedRowShape(msg) => (-32001, msg.clone()),
            Error::Transport(msg) => (-32008, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::CacheCorrupt(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
