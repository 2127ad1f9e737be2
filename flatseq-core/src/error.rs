//! Structured error types for flatseq.
//!
//! Problems with the *content* of a record never surface here; they are
//! reported as [`Diagnostics`](crate::Diagnostics). A [`FlatseqError`] means
//! the input could not be read at all, or the API was misused.

use thiserror::Error;

use crate::Dialect;

/// Unified error type for all flatseq operations.
#[derive(Debug, Error)]
pub enum FlatseqError {
    /// I/O error (file not found, permission denied, truncated stream, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input that cannot be interpreted as a flat file at all
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, API misuse)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A record was handed to a writer for a different dialect
    #[error("dialect mismatch: writer expects {expected} records, got a {found} record")]
    DialectMismatch { expected: Dialect, found: Dialect },
}

/// Convenience alias used throughout flatseq.
pub type Result<T> = std::result::Result<T, FlatseqError>;
