//! Error types for raikv
//!
//! Provides a unified error type for all operations.
//!
//! Only connection- and process-level faults live here. A missing key or an
//! unknown method is reported to the client inside the response's
//! `error_msg` field and never becomes a `KvError`.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for raikv operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported storage backend: {0}")]
    UnknownBackend(String),

    #[error("Storage backend '{0}' is recognized but not implemented yet")]
    BackendUnavailable(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Wire Codec Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Frame exceeds {limit} bytes")]
    FrameTooLarge { limit: usize },

    #[error("Protocol error: {0}")]
    Protocol(String),
}
