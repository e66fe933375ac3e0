//! Message types carried by the event bus.

use std::time::Duration;

/// Cursor and scroll movements requested by input dispatch and applied by
/// the view loop, which knows the page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingRequest {
    /// Move the cursor one row up, wrapping to the last row.
    ToLineAbove,
    /// Move the cursor one row down, wrapping to the first row.
    ToLineBelow,
    /// Move the cursor one page up.
    ToPrevPage,
    /// Move the cursor one page down.
    ToNextPage,
    /// Scroll the visible columns left.
    ToScrollLeft,
    /// Scroll the visible columns right.
    ToScrollRight,
}

/// Transient text shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMsg {
    /// Message text.
    pub text: String,
    /// When set, the renderer clears the message after this long.
    pub clear_after: Option<Duration>,
}

impl StatusMsg {
    /// A message that stays until replaced.
    #[must_use]
    pub fn sticky(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            clear_after: None,
        }
    }

    /// A message cleared after `delay`.
    #[must_use]
    pub fn transient(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            clear_after: Some(delay),
        }
    }
}
