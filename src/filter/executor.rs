//! Runs one strategy over a snapshot of the line store.

use super::QueryFilterer;
use crate::buffer::FilteredBuffer;
use crate::domain::{RawLine, Result};
use std::sync::Arc;
use std::time::Instant;

/// Drains `filter`'s matches for `query` into a [`FilteredBuffer`].
///
/// `abandon` is polled between matches; once it returns `true` the run stops
/// and `Ok(None)` is returned. The caller must not hold any lock: strategies
/// may block on a subprocess.
///
/// # Errors
///
/// Propagates the strategy's error, either from compiling the query or from
/// a failing item.
pub fn execute<F>(
    filter: &dyn QueryFilterer,
    query: &str,
    lines: Vec<Arc<RawLine>>,
    abandon: F,
) -> Result<Option<FilteredBuffer>>
where
    F: Fn() -> bool,
{
    let _span = tracing::debug_span!(
        "filter_run",
        filter = %filter.name(),
        query = %query,
        candidates = lines.len()
    )
    .entered();
    let started = Instant::now();

    let mut matched = Vec::new();
    for item in filter.filter(query, lines)? {
        if abandon() {
            tracing::debug!(matched = matched.len(), "filter run abandoned");
            return Ok(None);
        }
        matched.push(item?);
    }

    tracing::debug!(
        matched = matched.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "filter run complete"
    );
    Ok(Some(FilteredBuffer::new(query, matched)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LineBuffer;
    use crate::filter::{RegexFilter, RegexMode};
    use std::cell::Cell;

    fn lines(n: usize) -> Vec<Arc<RawLine>> {
        (0..n)
            .map(|i| Arc::new(RawLine::new(i as u64, format!("line {i}"), false)))
            .collect()
    }

    #[test]
    fn collects_all_matches() {
        let filter = RegexFilter::new(RegexMode::IgnoreCase);
        let result = execute(&filter, "line 1", lines(20), || false).unwrap().unwrap();
        // "line 1" and "line 10".."line 19"
        assert_eq!(result.size(), 11);
        assert_eq!(result.query(), "line 1");
    }

    #[test]
    fn abandons_when_asked() {
        let filter = RegexFilter::new(RegexMode::IgnoreCase);
        let polls = Cell::new(0);
        let result = execute(&filter, "line", lines(100), || {
            polls.set(polls.get() + 1);
            polls.get() > 3
        })
        .unwrap();
        assert!(result.is_none());
        assert_eq!(polls.get(), 4);
    }
}
