//! Terminal setup and teardown.
//!
//! Standard output carries the selected lines, so the screen is drawn on the
//! controlling terminal instead.

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use std::io::{self, Write};

use super::renderer::Size;

/// Fallback when the terminal cannot report its size.
pub const FALLBACK_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Opens the writer the screen is painted on: `/dev/tty` where available,
/// standard error otherwise.
pub fn open_tty() -> Box<dyn Write + Send> {
    #[cfg(unix)]
    {
        match std::fs::OpenOptions::new().write(true).open("/dev/tty") {
            Ok(tty) => return Box::new(tty),
            Err(e) => tracing::debug!(error = %e, "no /dev/tty, drawing on stderr"),
        }
    }
    Box::new(io::stderr())
}

/// Current terminal size, or [`FALLBACK_SIZE`].
#[must_use]
pub fn current_size() -> Size {
    terminal::size().map_or(FALLBACK_SIZE, |(w, h)| Size {
        width: usize::from(w),
        height: usize::from(h),
    })
}

/// Raw mode plus the alternate screen for as long as the guard lives.
pub struct TerminalGuard {
    tty: Box<dyn Write + Send>,
}

impl TerminalGuard {
    /// Switches the terminal into raw mode on the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the terminal refuses either switch; raw mode
    /// is undone before returning in that case.
    pub fn enter() -> io::Result<Self> {
        let mut tty = open_tty();
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(tty, EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        tracing::debug!("terminal entered");
        Ok(Self { tty })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.tty, LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
        tracing::debug!("terminal restored");
    }
}
