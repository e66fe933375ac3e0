//! Fuzzy strategy backed by `fuzzy-matcher`'s Skim algorithm.
//!
//! Every whitespace-separated term must fuzzy-match the display text. Scores
//! are not used for ranking: matches keep source order so the view does not
//! reshuffle while typing. Matching follows the Skim matcher's smart-case rule.

use super::{terms, MatchIter, QueryFilterer, FUZZY};
use crate::domain::{LinesiftError, MatchRange, MatchedLine, RawLine, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::sync::Arc;

/// Skim-style fuzzy matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyFilter;

impl QueryFilterer for FuzzyFilter {
    fn name(&self) -> &str {
        FUZZY
    }

    fn filter(&self, query: &str, lines: Vec<Arc<RawLine>>) -> Result<MatchIter> {
        let terms: Vec<String> = terms(query).into_iter().map(String::from).collect();
        let matcher = SkimMatcherV2::default();

        Ok(Box::new(lines.into_iter().filter_map(move |raw| {
            let text = raw.display();
            let mut ranges = Vec::new();
            for term in &terms {
                let (_score, indices) = matcher.fuzzy_indices(text, term)?;
                ranges.extend(coalesce(text, &indices));
            }
            Some(Ok::<_, LinesiftError>(MatchedLine::new(raw, ranges)))
        })))
    }
}

/// Turns matched character indices into byte ranges, joining consecutive runs.
fn coalesce(text: &str, indices: &[usize]) -> Vec<MatchRange> {
    let bounds: Vec<(usize, usize)> = text
        .char_indices()
        .map(|(at, ch)| (at, at + ch.len_utf8()))
        .collect();

    let mut ranges: Vec<MatchRange> = Vec::new();
    let mut prev: Option<usize> = None;
    for &idx in indices {
        let Some(&(start, end)) = bounds.get(idx) else {
            continue;
        };
        match (prev, ranges.last_mut()) {
            (Some(p), Some(last)) if idx == p + 1 => last.1 = end,
            _ => ranges.push((start, end)),
        }
        prev = Some(idx);
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(id: u64, text: &str) -> Arc<RawLine> {
        Arc::new(RawLine::new(id, text, false))
    }

    #[test]
    fn matches_subsequences_in_source_order() {
        let got: Vec<String> = FuzzyFilter
            .filter("mnrs", vec![raw(0, "src/main.rs"), raw(1, "README.md"), raw(2, "main_rs.txt")])
            .unwrap()
            .map(|m| m.unwrap().raw().display().to_string())
            .collect();
        assert_eq!(got, vec!["src/main.rs", "main_rs.txt"]);
    }

    #[test]
    fn highlight_ranges_are_byte_offsets() {
        assert_eq!(coalesce("héllo", &[0, 1, 2]), vec![(0, 4)]);
        assert_eq!(coalesce("abcdef", &[0, 2, 3]), vec![(0, 1), (2, 4)]);
    }
}
