//! Lines marked for output.
//!
//! Entries are keyed by the raw line's ordinal, so a line stays selected when
//! a new query moves it to another row or hides it. Output order is ingestion
//! order.

use crate::domain::RawLine;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Selected lines plus the optional range-mode anchor row.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    lines: BTreeMap<u64, Arc<RawLine>>,
    range_start: Option<usize>,
}

impl Selection {
    /// An empty selection outside range mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `line`. Returns `false` if it was already marked.
    pub fn add(&mut self, line: Arc<RawLine>) -> bool {
        self.lines.insert(line.id(), line).is_none()
    }

    /// Unmarks the line with ordinal `id`.
    pub fn remove(&mut self, id: u64) -> bool {
        self.lines.remove(&id).is_some()
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.lines.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every entry and leaves range mode.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.range_start = None;
    }

    /// Marked lines in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RawLine>> {
        self.lines.values()
    }

    /// The range-mode anchor row, if range mode is active.
    #[must_use]
    pub const fn range_start(&self) -> Option<usize> {
        self.range_start
    }

    #[must_use]
    pub const fn is_range_mode(&self) -> bool {
        self.range_start.is_some()
    }

    /// Sets (or with `None`, clears) the range anchor.
    pub fn set_range_start(&mut self, row: Option<usize>) {
        self.range_start = row;
    }

    /// `true` when `row` lies between the anchor and `cursor`, inclusive.
    #[must_use]
    pub fn in_range(&self, row: usize, cursor: usize) -> bool {
        self.range_start.is_some_and(|anchor| {
            let (lo, hi) = if anchor <= cursor { (anchor, cursor) } else { (cursor, anchor) };
            (lo..=hi).contains(&row)
        })
    }
}
