//! Error types for walcheck
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using WalCheckError
pub type Result<T> = std::result::Result<T, WalCheckError>;

/// Unified error type for walcheck operations
#[derive(Debug, Error)]
pub enum WalCheckError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryMissing(PathBuf),

    // -------------------------------------------------------------------------
    // Segment Name Errors
    // -------------------------------------------------------------------------
    #[error("Malformed segment name {name:?}: {reason}")]
    MalformedSegmentName { name: String, reason: String },

    #[error("Sequence number {0:#X} does not fit a segment name")]
    SequenceOutOfRange(u64),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalCheckError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        WalCheckError::MalformedSegmentName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
