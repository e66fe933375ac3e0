//! Rotating log file with size-based rotation and backup retention.
//!
//! The terminal is in raw mode while a session runs, so log output goes to a
//! file. [`RotatingFile`] plugs into `tracing-subscriber`'s fmt layer through
//! [`MakeWriter`].

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// When the file grows past the size limit it is renamed to
/// `<name>.<YYYYmmddHHMMSSfff>` and a fresh file is started. Backups beyond
/// the retention limit are removed, oldest first.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened on first write.
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    /// A writer for `path` with the default limits.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_bytes(&self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        if fs::metadata(&self.path).is_ok_and(|m| m.len() > self.max_bytes) {
            *file = None;
            self.rotate()?;
        }

        let handle = match file.as_mut() {
            Some(handle) => handle,
            None => file.insert(OpenOptions::new().create(true).append(true).open(&self.path)?),
        };
        handle.write_all(buf)?;
        handle.flush()?;
        Ok(buf.len())
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = Local::now().format("%Y%m%d%H%M%S%3f");
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".{stamp}"));

        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
        }
        self.cleanup_old_backups()
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log path has no parent"))?;
        let prefix = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| format!("{n}."))
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "invalid log file name"))?;

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Timestamps sort lexically; newest first.
        backups.sort_unstable_by(|a, b| b.cmp(a));
        for old in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl Write for &RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = &'a Self;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;
    use std::time::Duration;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("test.log."))
            .count()
    }

    #[test]
    fn appends_until_limit_then_rotates() {
        let dir = tempfile::tempdir().unwrap();
        let log = RotatingFile::with_limits(dir.path().join("test.log"), 16, 2);

        (&log).write_all(b"0123456789\n").unwrap();
        (&log).write_all(b"0123456789\n").unwrap();
        assert_eq!(backups(dir.path()), 0);

        // The file is now past 16 bytes; the next write rotates first.
        (&log).write_all(b"fresh\n").unwrap();
        assert_eq!(backups(dir.path()), 1);
        assert_eq!(fs::read_to_string(log.path()).unwrap(), "fresh\n");
    }

    #[test]
    fn keeps_at_most_max_backups() {
        let dir = tempfile::tempdir().unwrap();
        let log = RotatingFile::with_limits(dir.path().join("test.log"), 1, 2);

        for _ in 0..5 {
            (&log).write_all(b"xx\n").unwrap();
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(backups(dir.path()), 2);
    }
}
