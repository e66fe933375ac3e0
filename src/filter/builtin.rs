//! Substring and regular-expression strategies.
//!
//! All four built-ins share one implementation: every whitespace-separated
//! query term is compiled to a [`Regex`] (escaped for the substring modes) and
//! a line matches when every term matches its display text. Highlight ranges
//! are every non-empty match of every term. Source order is preserved.

use super::{terms, MatchIter, QueryFilterer, CASE_SENSITIVE, IGNORE_CASE, REGEXP, SMART_CASE};
use crate::domain::{LinesiftError, MatchedLine, RawLine, Result};
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

/// How query terms are turned into patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexMode {
    /// Literal terms, case-insensitive.
    IgnoreCase,
    /// Literal terms, case-sensitive.
    CaseSensitive,
    /// Literal terms, case-sensitive only when the query has an uppercase letter.
    SmartCase,
    /// Terms are regular expressions, case-sensitive.
    Regexp,
}

/// Built-in strategy backed by the `regex` crate.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    mode: RegexMode,
}

impl RegexFilter {
    /// Creates the strategy for `mode`.
    #[must_use]
    pub const fn new(mode: RegexMode) -> Self {
        Self { mode }
    }

    /// The four built-ins in registration order.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        [
            RegexMode::IgnoreCase,
            RegexMode::CaseSensitive,
            RegexMode::SmartCase,
            RegexMode::Regexp,
        ]
        .into_iter()
        .map(Self::new)
        .collect()
    }

    fn compile(&self, query: &str) -> Result<Vec<Regex>> {
        let case_insensitive = match self.mode {
            RegexMode::IgnoreCase => true,
            RegexMode::CaseSensitive | RegexMode::Regexp => false,
            RegexMode::SmartCase => !query.chars().any(char::is_uppercase),
        };

        terms(query)
            .into_iter()
            .map(|term| {
                let pattern = match self.mode {
                    RegexMode::Regexp => term.to_string(),
                    _ => regex::escape(term),
                };
                RegexBuilder::new(&pattern)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map_err(|e| LinesiftError::InvalidQuery(e.to_string()))
            })
            .collect()
    }
}

impl QueryFilterer for RegexFilter {
    fn name(&self) -> &str {
        match self.mode {
            RegexMode::IgnoreCase => IGNORE_CASE,
            RegexMode::CaseSensitive => CASE_SENSITIVE,
            RegexMode::SmartCase => SMART_CASE,
            RegexMode::Regexp => REGEXP,
        }
    }

    fn filter(&self, query: &str, lines: Vec<Arc<RawLine>>) -> Result<MatchIter> {
        let patterns = self.compile(query)?;
        Ok(Box::new(lines.into_iter().filter_map(move |raw| {
            match_all(&patterns, &raw).map(|ranges| Ok::<_, LinesiftError>(MatchedLine::new(raw, ranges)))
        })))
    }
}

/// Returns the union of match ranges when every pattern matches.
fn match_all(patterns: &[Regex], raw: &RawLine) -> Option<Vec<(usize, usize)>> {
    let text = raw.display();
    let mut ranges = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        for m in pattern.find_iter(text) {
            matched = true;
            ranges.push((m.start(), m.end()));
        }
        if !matched {
            return None;
        }
    }
    Some(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(texts: &[&str]) -> Vec<Arc<RawLine>> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Arc::new(RawLine::new(i as u64, *t, false)))
            .collect()
    }

    fn run(mode: RegexMode, query: &str, texts: &[&str]) -> Vec<String> {
        RegexFilter::new(mode)
            .filter(query, lines(texts))
            .unwrap()
            .map(|m| m.unwrap().raw().display().to_string())
            .collect()
    }

    #[test]
    fn ignore_case_keeps_source_order() {
        assert_eq!(
            run(RegexMode::IgnoreCase, "apple", &["apple", "banana", "Apple Pie"]),
            vec!["apple", "Apple Pie"]
        );
    }

    #[test]
    fn case_sensitive() {
        assert_eq!(
            run(RegexMode::CaseSensitive, "apple", &["apple", "banana", "Apple Pie"]),
            vec!["apple"]
        );
    }

    #[test]
    fn smart_case_switches_on_uppercase() {
        let texts = ["apple", "Apple Pie"];
        assert_eq!(run(RegexMode::SmartCase, "apple", &texts), vec!["apple", "Apple Pie"]);
        assert_eq!(run(RegexMode::SmartCase, "Apple", &texts), vec!["Apple Pie"]);
    }

    #[test]
    fn every_term_must_match() {
        assert_eq!(
            run(RegexMode::IgnoreCase, "src rs", &["src/main.rs", "src/lib.go", "tests/a.rs"]),
            vec!["src/main.rs"]
        );
    }

    #[test]
    fn substring_modes_escape_metacharacters() {
        assert_eq!(run(RegexMode::IgnoreCase, "a.c", &["abc", "a.c"]), vec!["a.c"]);
        assert_eq!(run(RegexMode::Regexp, "a.c", &["abc", "a.c"]), vec!["abc", "a.c"]);
    }

    #[test]
    fn highlight_ranges_cover_every_term() {
        let matched: Vec<MatchedLine> = RegexFilter::new(RegexMode::IgnoreCase)
            .filter("foo bar", lines(&["bar foo foo"]))
            .unwrap()
            .map(|m| m.unwrap())
            .collect();
        assert_eq!(matched[0].ranges(), &[(0, 3), (4, 7), (8, 11)]);
    }

    #[test]
    fn invalid_regexp_is_reported() {
        let err = RegexFilter::new(RegexMode::Regexp)
            .filter("(unclosed", lines(&["x"]))
            .err()
            .unwrap();
        assert!(matches!(err, LinesiftError::InvalidQuery(_)));
    }
}
