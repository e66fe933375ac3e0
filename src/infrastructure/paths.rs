//! Platform paths for the rc file and the log.
//!
//! Directories come from `dirs` so they follow each platform's conventions
//! (XDG on Linux, `~/Library` on macOS, `%APPDATA%` on Windows).

use std::path::{Path, PathBuf};

/// Subdirectory used under every platform directory.
pub const APP_DIR: &str = "linesift";

/// rc file names tried in order inside the config directory.
pub const RC_FILE_NAMES: [&str; 2] = ["config.toml", "config.json"];

/// Returns `<config dir>/linesift`, e.g. `~/.config/linesift`.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// Returns the directory the log file lives in.
///
/// Uses the state directory where the platform has one, else the local data
/// directory.
#[must_use]
pub fn state_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join(APP_DIR))
}

/// Finds the default rc file: the first of [`RC_FILE_NAMES`] that exists in
/// [`config_dir`].
#[must_use]
pub fn find_rc_file() -> Option<PathBuf> {
    config_dir().and_then(|dir| find_rc_file_in(&dir))
}

/// Like [`find_rc_file`] for an explicit directory.
#[must_use]
pub fn find_rc_file_in(dir: &Path) -> Option<PathBuf> {
    RC_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Expands a leading `~` to the home directory.
///
/// # Examples
///
/// ```
/// use linesift::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}
