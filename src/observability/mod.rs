//! Structured logging to a rotating file.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFile → <state dir>/linesift/linesift.log
//! ```
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the rc file
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust,no_run
//! use linesift::observability::init_tracing;
//!
//! init_tracing(Some("debug"));
//! tracing::debug!("logging is active");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Size-rotated log file

pub mod file_writer;
pub mod init;

pub use file_writer::RotatingFile;
pub use init::init_tracing;
