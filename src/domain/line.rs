//! Line model: raw ingested records and their query-matched views.
//!
//! A [`RawLine`] is created once per ingested record and never mutated. A
//! [`MatchedLine`] wraps a raw line together with the byte ranges of its
//! display text that satisfied the current query. Both are addressed through
//! the [`Line`] enum so buffers can hand out either variant.
//!
//! Identity for selection purposes is the raw line's ordinal [`RawLine::id`],
//! which is assigned at ingestion and survives eviction from a bounded store.

use std::sync::Arc;

/// Byte range `(start, end)` into a line's display text, end exclusive.
pub type MatchRange = (usize, usize);

/// One ingested record in its original form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    id: u64,
    text: String,
    /// Byte offset of the NUL separator when null-separator mode is enabled.
    sep: Option<usize>,
}

impl RawLine {
    /// Creates a raw line with the given ordinal.
    ///
    /// Trailing `\n` / `\r\n` are stripped. When `enable_sep` is set and the
    /// text contains a NUL byte, the part before it is displayed and the part
    /// after it is emitted on output.
    #[must_use]
    pub fn new(id: u64, text: impl Into<String>, enable_sep: bool) -> Self {
        let mut text = text.into();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        let sep = if enable_sep { text.find('\0') } else { None };
        Self { id, text, sep }
    }

    /// Stable ordinal assigned at ingestion.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The full ingested text, separator included.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.text
    }

    /// Text that is shown and matched against.
    #[must_use]
    pub fn display(&self) -> &str {
        self.sep.map_or(self.text.as_str(), |at| &self.text[..at])
    }

    /// Text that is emitted when the line is picked.
    #[must_use]
    pub fn output(&self) -> &str {
        self.sep.map_or(self.text.as_str(), |at| &self.text[at + 1..])
    }
}

/// A raw line annotated with the ranges that matched a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedLine {
    raw: Arc<RawLine>,
    ranges: Vec<MatchRange>,
}

impl MatchedLine {
    /// Wraps `raw`, normalizing `ranges` into sorted, non-overlapping order.
    #[must_use]
    pub fn new(raw: Arc<RawLine>, ranges: Vec<MatchRange>) -> Self {
        Self {
            raw,
            ranges: merge_ranges(ranges),
        }
    }

    /// The underlying raw line.
    #[must_use]
    pub const fn raw(&self) -> &Arc<RawLine> {
        &self.raw
    }

    /// Highlight ranges into the display text.
    #[must_use]
    pub fn ranges(&self) -> &[MatchRange] {
        &self.ranges
    }
}

/// Either variant of a line as handed out by a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A line straight from the store.
    Raw(Arc<RawLine>),
    /// A line produced by a filter run.
    Matched(MatchedLine),
}

impl Line {
    /// The underlying raw line.
    #[must_use]
    pub const fn raw(&self) -> &Arc<RawLine> {
        match self {
            Self::Raw(raw) => raw,
            Self::Matched(matched) => matched.raw(),
        }
    }

    /// Selection identity.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.raw().id()
    }

    /// See [`RawLine::display`].
    #[must_use]
    pub fn display(&self) -> &str {
        self.raw().display()
    }

    /// See [`RawLine::output`].
    #[must_use]
    pub fn output(&self) -> &str {
        self.raw().output()
    }

    /// Highlight ranges; empty for raw lines.
    #[must_use]
    pub fn ranges(&self) -> &[MatchRange] {
        match self {
            Self::Raw(_) => &[],
            Self::Matched(matched) => matched.ranges(),
        }
    }
}

/// Sorts ranges and merges overlapping or touching ones.
fn merge_ranges(mut ranges: Vec<MatchRange>) -> Vec<MatchRange> {
    ranges.retain(|(start, end)| start < end);
    ranges.sort_unstable();
    let mut merged: Vec<MatchRange> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_line_terminators() {
        assert_eq!(RawLine::new(0, "foo\n", false).buffer(), "foo");
        assert_eq!(RawLine::new(0, "foo\r\n", false).buffer(), "foo");
        assert_eq!(RawLine::new(0, "foo", false).buffer(), "foo");
    }

    #[test]
    fn null_separator_splits_display_and_output() {
        let line = RawLine::new(1, "shown\0emitted", true);
        assert_eq!(line.display(), "shown");
        assert_eq!(line.output(), "emitted");

        let plain = RawLine::new(2, "shown\0emitted", false);
        assert_eq!(plain.display(), "shown\0emitted");
        assert_eq!(plain.output(), "shown\0emitted");
    }

    #[test]
    fn matched_ranges_are_merged() {
        let raw = Arc::new(RawLine::new(0, "abcdefgh", false));
        let matched = MatchedLine::new(raw, vec![(4, 6), (0, 2), (1, 3), (6, 7), (5, 5)]);
        assert_eq!(matched.ranges(), &[(0, 3), (4, 7)]);
    }

    #[test]
    fn identity_is_the_raw_ordinal() {
        let raw = Arc::new(RawLine::new(42, "x", false));
        let a = Line::Raw(Arc::clone(&raw));
        let b = Line::Matched(MatchedLine::new(raw, vec![(0, 1)]));
        assert_eq!(a.id(), b.id());
        assert!(a.ranges().is_empty());
        assert_eq!(b.ranges(), &[(0, 1)]);
    }
}
