//! Line buffers: the ingested line store and filter results.
//!
//! Both buffers implement [`LineBuffer`], the random-access contract the state
//! coordinator exposes as the "active viewable sequence".
//!
//! - [`RawLineBuffer`]: append-only, optionally capacity-bounded store with a
//!   streaming notification channel and replay
//! - [`FilteredBuffer`]: immutable result of one filter run

pub mod filtered;
pub mod raw;

pub use filtered::FilteredBuffer;
pub use raw::RawLineBuffer;

use crate::domain::{Line, Result};

/// Random access over a sequence of lines.
pub trait LineBuffer: Send + Sync {
    /// Returns the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::OutOfRange`](crate::domain::LinesiftError::OutOfRange)
    /// when `index` is outside `[0, size())`.
    fn line_at(&self, index: usize) -> Result<Line>;

    /// Number of lines currently reachable by position.
    fn size(&self) -> usize;

    /// Returns `true` when the buffer holds no lines.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
