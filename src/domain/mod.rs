//! Domain layer for linesift.
//!
//! This module contains the core value types of the filter engine, independent
//! of threads, terminals or configuration sources.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`line`]: Raw and matched line model
//!
//! # Examples
//!
//! ```
//! use linesift::domain::{Line, RawLine};
//! use std::sync::Arc;
//!
//! let line = Line::Raw(Arc::new(RawLine::new(0, "hello\n", false)));
//! assert_eq!(line.display(), "hello");
//! ```

pub mod error;
pub mod line;

pub use error::{LinesiftError, Result};
pub use line::{Line, MatchRange, MatchedLine, RawLine};
