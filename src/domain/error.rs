//! Error types for linesift.
//!
//! This module defines the centralized error type [`LinesiftError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Errors fall into two groups:
//!
//! - **Per-operation**: returned to the immediate caller and never escalated
//!   (`OutOfRange`, `DuplicateFilter`, `UnknownFilter`, `ExternalFilter`, `InvalidQuery`).
//! - **Fatal**: recorded once in the lifecycle's terminal-error slot and reported
//!   at process exit (`Signal`, `Internal`, `Canceled`, `Io`).

use thiserror::Error;

/// The main error type for linesift operations.
#[derive(Debug, Error)]
pub enum LinesiftError {
    /// A position lookup fell outside the current bounds of a line sequence.
    ///
    /// Callers treat this as a no-op.
    #[error("index {index} out of range (size {size})")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Size of the sequence at lookup time.
        size: usize,
    },

    /// A filter with the same name is already registered.
    #[error("duplicate filter: '{0}'")]
    DuplicateFilter(String),

    /// No filter with the given name is registered.
    #[error("unknown filter: '{0}'")]
    UnknownFilter(String),

    /// The external filter process could not be spawned or failed.
    ///
    /// Surfaced as a status message; the active sequence falls back to
    /// "no matches" for that query.
    #[error("external filter failed: {0}")]
    ExternalFilter(String),

    /// The query could not be compiled by the current filter (e.g. a bad regex).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// An OS termination signal was received.
    #[error("received signal {0}")]
    Signal(i32),

    /// The user abandoned the session without picking anything.
    #[error("canceled")]
    Canceled,

    /// An internal invariant was violated or a loop could not be started.
    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration is invalid or missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// A theme file could not be loaded.
    #[error("theme error: {0}")]
    Theme(String),

    /// No input source was available.
    #[error("you must supply something to work with via filename or stdin")]
    NoInput,

    /// Filesystem, pipe or terminal I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinesiftError {
    /// Returns `true` for conditions that drive shutdown rather than being
    /// handled by the immediate caller.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Signal(_) | Self::Canceled | Self::Internal(_) | Self::Io(_)
        )
    }

    /// Process exit status the binary reports for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Signal(signo) => 128 + *signo,
            _ => 1,
        }
    }
}

/// A specialized `Result` type for linesift operations.
pub type Result<T> = std::result::Result<T, LinesiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(LinesiftError::Signal(2).is_fatal());
        assert!(LinesiftError::Canceled.is_fatal());
        assert!(!LinesiftError::OutOfRange { index: 3, size: 1 }.is_fatal());
        assert!(!LinesiftError::UnknownFilter("x".into()).is_fatal());
    }

    #[test]
    fn signal_exit_code_follows_shell_convention() {
        assert_eq!(LinesiftError::Signal(15).exit_code(), 143);
        assert_eq!(LinesiftError::Canceled.exit_code(), 1);
    }

    #[test]
    fn messages() {
        assert_eq!(
            LinesiftError::UnknownFilter("Foo".into()).to_string(),
            "unknown filter: 'Foo'"
        );
        assert_eq!(
            LinesiftError::OutOfRange { index: 5, size: 2 }.to_string(),
            "index 5 out of range (size 2)"
        );
    }
}
