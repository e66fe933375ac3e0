//! Ordered filter registry with a "current" entry.

use super::{FuzzyFilter, QueryFilterer, RegexFilter};
use crate::domain::{LinesiftError, Result};
use std::sync::Arc;

/// Registered strategies in registration order plus the index of the current
/// one.
///
/// A set built with [`FilterSet::with_builtins`] is never empty, so
/// [`FilterSet::current`] always has something to return.
#[derive(Debug, Clone)]
pub struct FilterSet {
    filters: Vec<Arc<dyn QueryFilterer>>,
    current: usize,
}

impl FilterSet {
    /// A registry holding the built-in strategies, `IgnoreCase` current.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut filters: Vec<Arc<dyn QueryFilterer>> = RegexFilter::builtins()
            .into_iter()
            .map(|f| Arc::new(f) as Arc<dyn QueryFilterer>)
            .collect();
        filters.push(Arc::new(FuzzyFilter));
        Self {
            filters,
            current: 0,
        }
    }

    /// Registers a strategy at the end of the rotation.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::DuplicateFilter`] if the name is taken.
    pub fn add(&mut self, filter: Arc<dyn QueryFilterer>) -> Result<()> {
        if self.position(filter.name()).is_some() {
            return Err(LinesiftError::DuplicateFilter(filter.name().to_string()));
        }
        tracing::debug!(filter = %filter.name(), "registered filter");
        self.filters.push(filter);
        Ok(())
    }

    /// Advances "current" to the next strategy, wrapping around.
    pub fn rotate(&mut self) {
        self.current = (self.current + 1) % self.filters.len();
        tracing::debug!(filter = %self.filters[self.current].name(), "rotated filter");
    }

    /// Makes the named strategy current.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::UnknownFilter`] if no such name is registered;
    /// the current strategy is left unchanged.
    pub fn set_current_by_name(&mut self, name: &str) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| LinesiftError::UnknownFilter(name.to_string()))?;
        self.current = index;
        Ok(())
    }

    /// The active strategy.
    #[must_use]
    pub fn current(&self) -> Arc<dyn QueryFilterer> {
        Arc::clone(&self.filters[self.current])
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// `false` for any set built by [`FilterSet::with_builtins`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Registered names in rotation order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.name().to_string()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.filters.iter().position(|f| f.name() == name)
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::with_builtins()
    }
}
