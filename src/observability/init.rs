//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFile;
use crate::infrastructure::paths;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the state directory.
pub const LOG_FILE_NAME: &str = "linesift.log";

/// Initializes the tracing subscriber with a rotating log file.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` if set and valid
/// 2. `level` (the config's `trace_level`) if given
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the state directory if it doesn't exist
/// - Silently does nothing if that fails (observability is optional)
/// - Idempotent: only the first call installs a subscriber
pub fn init_tracing(level: Option<&str>) {
    let Some(dir) = paths::state_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));

    let layer = fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_target(true)
        .with_writer(RotatingFile::new(dir.join(LOG_FILE_NAME)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
