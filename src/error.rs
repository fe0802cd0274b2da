//! Error types for binspill
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SpillError
pub type Result<T> = std::result::Result<T, SpillError>;

/// Unified error type for binspill operations
#[derive(Debug, Error)]
pub enum SpillError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Initialization Errors
    // -------------------------------------------------------------------------
    #[error("Scratch directory error: {0}")]
    ScratchDir(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Bin index out of range: {0} (must be non-negative)")]
    KeyOutOfRange(i64),

    // -------------------------------------------------------------------------
    // Page Data Errors
    // -------------------------------------------------------------------------
    #[error("Page corruption detected: {0}")]
    PageCorruption(String),
}
