//! Error types used throughout the scheduling subsystem

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Palco scheduling operations
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PalcoError {
    /// Caller supplied an invalid combination; rejected before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A Remote Schedule Store call failed. Reads recover via the local
    /// cache; writes surface this to the caller.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Local cache store failure.
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation was superseded by a newer one with the same key.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Palco operations
pub type Result<T> = std::result::Result<T, PalcoError>;
