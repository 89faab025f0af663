//! Error types for the Wellspring engine

use thiserror::Error;

/// Errors that can occur while analyzing or planning.
///
/// Missing biometric data is never an error; only malformed input and
/// violated preconditions end up here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Invalid plan duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
