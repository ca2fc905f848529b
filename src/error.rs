//! Unified error types for talkpack.
//!
//! This module provides a single [`TalkpackError`] enum that covers every
//! failure the library can surface. Extraction itself is tolerant: missing
//! structural signals and malformed metadata payloads never become errors.
//! What remains are faults at the edges (loading a page, compiling marker
//! patterns, writing output) and misuse of the editing operations.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for talkpack operations.
///
/// # Example
///
/// ```rust
/// use talkpack::error::Result;
/// use talkpack::ConversationEvent;
///
/// fn my_function() -> Result<Vec<ConversationEvent>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, TalkpackError>;

/// The error type for all talkpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TalkpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when the captured page can't be read or the
    /// output file can't be written.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    ///
    /// Raised for malformed snapshots and when writing JSON output. Malformed
    /// metadata payloads on message nodes are *not* reported through this.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A marker pattern in the configuration could not be compiled.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern source as written in the configuration
        pattern: String,
        /// What is wrong with it
        message: String,
    },

    /// The snapshot node table is structurally broken.
    ///
    /// This occurs when:
    /// - a child index points outside the node table
    /// - a node is listed as the child of two parents
    /// - the table contains a cycle or no root
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The input or output format doesn't match what was expected.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A reorder request referenced an index outside the event list.
    #[error("Cannot move event {from} to {to}: sequence has {len} events")]
    InvalidMove {
        /// Source index
        from: usize,
        /// Destination index
        to: usize,
        /// Length of the sequence
        len: usize,
    },

    /// A partial export was requested from an index that doesn't start a day.
    #[error("Cannot export range starting at {index}: {reason}")]
    InvalidRange {
        /// Requested start index
        index: usize,
        /// Why the index was rejected
        reason: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TalkpackError {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        TalkpackError::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid snapshot error.
    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        TalkpackError::InvalidSnapshot(message.into())
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        TalkpackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid range error.
    pub fn invalid_range(index: usize, reason: impl Into<String>) -> Self {
        TalkpackError::InvalidRange {
            index,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, TalkpackError::Io(_))
    }

    /// Returns `true` if this is a pattern compilation error.
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, TalkpackError::InvalidPattern { .. })
    }

    /// Returns `true` if this is a snapshot structure error.
    pub fn is_invalid_snapshot(&self) -> bool {
        matches!(self, TalkpackError::InvalidSnapshot(_))
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, TalkpackError::InvalidFormat { .. })
    }
}
