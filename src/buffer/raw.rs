//! The ingested line store.
//!
//! [`RawLineBuffer`] has a single writer (the reader loop) and many concurrent
//! readers. When a capacity is configured, appending past it evicts the oldest
//! line: memory stays bounded and [`LineBuffer::size`] reports only what is
//! retained. Ordinals keep counting, so evicted lines never alias new ones.
//!
//! Every append, and every line re-emitted by [`RawLineBuffer::replay`], is
//! published to the current subscriber, if any. There is at most one: a new
//! [`RawLineBuffer::subscribe`] disconnects the previous receiver. With no
//! live subscriber nothing is queued, so eviction really frees lines.

use super::LineBuffer;
use crate::domain::{Line, LinesiftError, RawLine, Result};
use crossbeam_channel::{Receiver, Sender};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Append-only, optionally capacity-bounded store of raw lines.
#[derive(Debug)]
pub struct RawLineBuffer {
    lines: RwLock<VecDeque<Arc<RawLine>>>,
    /// Maximum retained lines; `0` means unbounded.
    capacity: usize,
    enable_sep: bool,
    next_id: AtomicU64,
    notify_tx: Mutex<Option<Sender<Arc<RawLine>>>>,
}

impl Default for RawLineBuffer {
    fn default() -> Self {
        Self::new(0, false)
    }
}

impl RawLineBuffer {
    /// Creates an empty store.
    ///
    /// `capacity == 0` disables eviction. `enable_sep` turns on null-separator
    /// parsing for every appended line.
    #[must_use]
    pub fn new(capacity: usize, enable_sep: bool) -> Self {
        Self {
            lines: RwLock::new(VecDeque::new()),
            capacity,
            enable_sep,
            next_id: AtomicU64::new(0),
            notify_tx: Mutex::new(None),
        }
    }

    /// Configured capacity, `0` when unbounded.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends one line and notifies the streaming channel.
    ///
    /// Always succeeds. Returns the stored line with its assigned ordinal.
    pub fn append(&self, text: impl Into<String>) -> Arc<RawLine> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let line = Arc::new(RawLine::new(id, text, self.enable_sep));

        let evicted = {
            let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
            lines.push_back(Arc::clone(&line));
            if self.capacity > 0 && lines.len() > self.capacity {
                lines.pop_front().is_some()
            } else {
                false
            }
        };

        if evicted {
            tracing::trace!(capacity = self.capacity, "evicted oldest line");
        }

        self.notify(Arc::clone(&line));
        line
    }

    /// Re-emits every retained line on the notification channel, oldest first,
    /// without re-appending. Returns the number of lines emitted.
    pub fn replay(&self) -> usize {
        let snapshot = self.snapshot();
        let count = snapshot.len();
        for line in snapshot {
            self.notify(line);
        }
        tracing::debug!(count, "replayed line store");
        count
    }

    /// Opens a fresh notification channel and returns its only receiver.
    ///
    /// Lines appended before this call are not delivered. A previous
    /// subscriber is disconnected.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<Arc<RawLine>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        *self.notify_tx.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
        rx
    }

    fn notify(&self, line: Arc<RawLine>) {
        let mut tx = self.notify_tx.lock().unwrap_or_else(PoisonError::into_inner);
        if tx.as_ref().is_some_and(|sender| sender.send(line).is_err()) {
            tracing::debug!("notification subscriber gone");
            *tx = None;
        }
    }

    /// Copies the retained lines (cheap `Arc` clones) so callers can work
    /// without holding the store's lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<RawLine>> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Total number of lines ever appended, evicted ones included.
    #[must_use]
    pub fn total_appended(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Returns the raw line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::OutOfRange`] when `index >= size()`.
    pub fn raw_line_at(&self, index: usize) -> Result<Arc<RawLine>> {
        let lines = self.lines.read().unwrap_or_else(PoisonError::into_inner);
        lines.get(index).cloned().ok_or(LinesiftError::OutOfRange {
            index,
            size: lines.len(),
        })
    }
}

impl LineBuffer for RawLineBuffer {
    fn line_at(&self, index: usize) -> Result<Line> {
        self.raw_line_at(index).map(Line::Raw)
    }

    fn size(&self) -> usize {
        self.lines.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
