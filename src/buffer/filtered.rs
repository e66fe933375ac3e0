//! Immutable result of a single filter run.

use super::LineBuffer;
use crate::domain::{Line, LinesiftError, MatchedLine, Result};

/// The lines a filter produced for one query, in the strategy's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredBuffer {
    query: String,
    lines: Vec<MatchedLine>,
}

impl FilteredBuffer {
    /// Collects a finished filter run.
    #[must_use]
    pub fn new(query: impl Into<String>, lines: Vec<MatchedLine>) -> Self {
        Self {
            query: query.into(),
            lines,
        }
    }

    /// An empty result, used when a query fails.
    #[must_use]
    pub fn no_matches(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }

    /// The query that produced this result.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Iterates the matched lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchedLine> {
        self.lines.iter()
    }
}

impl LineBuffer for FilteredBuffer {
    fn line_at(&self, index: usize) -> Result<Line> {
        self.lines
            .get(index)
            .cloned()
            .map(Line::Matched)
            .ok_or(LinesiftError::OutOfRange {
                index,
                size: self.lines.len(),
            })
    }

    fn size(&self) -> usize {
        self.lines.len()
    }
}
