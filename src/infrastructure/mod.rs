//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the rc file and the log live on the current platform.

pub mod paths;

pub use paths::{config_dir, expand_tilde, find_rc_file, state_dir};
