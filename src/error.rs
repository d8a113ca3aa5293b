// src/error.rs

//! Defines the primary error type for the crate.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all failures a database operation can report.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
///
/// Per the propagation policy, only usage errors reach callers: absence of a key,
/// value, or file is always an empty result or a no-op, and availability problems
/// with remote artifacts degrade to an empty database after a single warning.
#[derive(Error, Debug, Clone)]
pub enum ExemplaError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("HTTP client error: {0}")]
    HttpClientError(String),

    #[error("{0} is not directly writable; wrap it in ReadOnlyDatabase to discard writes")]
    NotWritable(&'static str),

    #[error("Corrupt artifact archive: {0}")]
    CorruptArtifact(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for ExemplaError {
    fn from(e: std::io::Error) -> Self {
        ExemplaError::Io(Arc::new(e))
    }
}

impl From<reqwest::Error> for ExemplaError {
    fn from(e: reqwest::Error) -> Self {
        ExemplaError::HttpClientError(e.to_string())
    }
}

impl From<zip::result::ZipError> for ExemplaError {
    fn from(e: zip::result::ZipError) -> Self {
        ExemplaError::CorruptArtifact(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ExemplaError {
    fn from(e: tokio::task::JoinError) -> Self {
        ExemplaError::Internal(format!("background task failed: {e}"))
    }
}
