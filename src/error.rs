//! Error types for tailwatch.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific error conditions and provides clear error messages.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionId;

/// Validation errors produced while checking `start` arguments.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("At least one source path is required")]
    NoSources,

    #[error("Keyword cannot be empty")]
    EmptyKeyword,

    #[error("Keyword is {len} bytes, exceeding the maximum of {max}")]
    KeywordTooLong {
        len: usize,
        max: usize,
    },
}

/// Top-level error type for tailwatch.
///
/// Argument-shape failures are grouped under [`ValidationError`]; everything
/// else names the session or path it concerns. Per-iteration read and write
/// failures inside a running worker are recovered locally and never surface
/// through this type.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Too many sources: {count} (max: {max})")]
    TooManySources {
        count: usize,
        max: usize,
    },

    #[error("Source not found: {}", path.display())]
    SourceNotFound {
        path: PathBuf,
    },

    #[error("Session not found: {id}")]
    SessionNotFound {
        id: SessionId,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker thread for session {id} panicked")]
    WorkerPanicked {
        id: SessionId,
    },
}

impl WatchError {
    /// Wraps an I/O error with the path it occurred on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this error reports a missing source or session.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. } | Self::SessionNotFound { .. })
    }

    /// Returns true if this is an I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if a per-session resource limit was hit.
    #[must_use]
    pub const fn is_resource_exhausted(&self) -> bool {
        matches!(self, Self::TooManySources { .. })
    }
}

/// Result type alias for tailwatch operations.
pub type WatchResult<T> = Result<T, WatchError>;
