//! Pluggable matching strategies, their registry and query dispatch.
//!
//! A strategy implements [`QueryFilterer`]: given a query and a snapshot of
//! candidate lines it returns a lazy, finite sequence of matched lines. The
//! executor never special-cases a strategy; external commands sit behind the
//! same trait as the in-process matchers.
//!
//! # Modules
//!
//! - [`builtin`]: substring and regular-expression strategies
//! - [`fuzzy`]: Skim-style fuzzy strategy
//! - [`external`]: strategy delegating to an external process
//! - [`set`]: ordered registry with a "current" entry
//! - [`debounce`]: single-flight timer that rate-limits query dispatch
//! - [`executor`]: runs one strategy to completion with early abandonment

pub mod builtin;
pub mod debounce;
pub mod executor;
pub mod external;
pub mod fuzzy;
pub mod set;

pub use builtin::{RegexFilter, RegexMode};
pub use debounce::Debouncer;
pub use executor::execute;
pub use external::ExternalCmdFilter;
pub use fuzzy::FuzzyFilter;
pub use set::FilterSet;

use crate::domain::{MatchedLine, RawLine, Result};
use std::fmt;
use std::sync::Arc;

/// Registered name of the case-insensitive substring strategy.
pub const IGNORE_CASE: &str = "IgnoreCase";
/// Registered name of the case-sensitive substring strategy.
pub const CASE_SENSITIVE: &str = "CaseSensitive";
/// Registered name of the smart-case substring strategy.
pub const SMART_CASE: &str = "SmartCase";
/// Registered name of the regular-expression strategy.
pub const REGEXP: &str = "Regexp";
/// Registered name of the fuzzy strategy.
pub const FUZZY: &str = "Fuzzy";

/// Lazy, non-restartable sequence of matches produced by one filter run.
///
/// Items are `Err` only when a strategy fails part-way (an external process
/// dying on a later batch, for instance).
pub type MatchIter = Box<dyn Iterator<Item = Result<MatchedLine>>>;

/// A named matching strategy.
pub trait QueryFilterer: Send + Sync + fmt::Debug {
    /// Unique registry name.
    fn name(&self) -> &str;

    /// Matches `query` against `lines`.
    ///
    /// Implementations document their ranking; unless stated otherwise the
    /// relative order of `lines` is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error when the query cannot be compiled for this strategy.
    fn filter(&self, query: &str, lines: Vec<Arc<RawLine>>) -> Result<MatchIter>;
}

/// Splits a query into whitespace-separated terms.
pub(crate) fn terms(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}
