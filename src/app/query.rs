//! Query text and caret editing state.
//!
//! The query is kept as a `Vec<char>` so the caret counts characters, not
//! bytes. Every mutator leaves `caret <= len`.

/// The live query, the saved query and the caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    query: Vec<char>,
    saved: Vec<char>,
    caret: usize,
}

impl QueryState {
    /// An empty query with the caret at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The query as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.query.iter().collect()
    }

    /// `true` when the query reads exactly `text`.
    #[must_use]
    pub fn is_text(&self, text: &str) -> bool {
        self.query.iter().copied().eq(text.chars())
    }

    /// The saved query as a string.
    #[must_use]
    pub fn saved_text(&self) -> String {
        self.saved.iter().collect()
    }

    /// Query length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.query.len()
    }

    /// `true` when the query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Caret position in characters.
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Replaces the query and puts the caret at its end.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.chars().collect();
        self.caret = self.query.len();
    }

    /// Moves the caret to `pos`, clamped to the query.
    pub fn set_caret(&mut self, pos: usize) {
        self.caret = pos.min(self.query.len());
    }

    /// Moves the caret by `offset` characters, clamped to the query.
    pub fn move_caret(&mut self, offset: isize) {
        let target = self.caret.saturating_add_signed(offset);
        self.set_caret(target);
    }

    /// Inserts `ch` at the caret and advances past it.
    pub fn insert_char(&mut self, ch: char) {
        self.query.insert(self.caret, ch);
        self.caret += 1;
    }

    /// Deletes the character before the caret. Returns `true` if the query
    /// changed.
    pub fn delete_backward_char(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        self.query.remove(self.caret);
        true
    }

    /// Deletes the character under the caret.
    pub fn delete_forward_char(&mut self) -> bool {
        if self.caret >= self.query.len() {
            return false;
        }
        self.query.remove(self.caret);
        true
    }

    /// Deletes the word before the caret, along with any whitespace between
    /// it and the caret.
    pub fn delete_backward_word(&mut self) -> bool {
        let end = self.caret;
        let mut start = end;
        while start > 0 && self.query[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.query[start - 1].is_whitespace() {
            start -= 1;
        }
        if start == end {
            return false;
        }
        self.query.drain(start..end);
        self.caret = start;
        true
    }

    /// Deletes from the caret to the end of the query.
    pub fn kill_end_of_line(&mut self) -> bool {
        if self.caret >= self.query.len() {
            return false;
        }
        self.query.truncate(self.caret);
        true
    }

    /// Deletes from the start of the query to the caret.
    pub fn kill_beginning_of_line(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.query.drain(..self.caret);
        self.caret = 0;
        true
    }

    /// Swaps between the live and saved query.
    ///
    /// A non-empty query is stashed and cleared; an empty one is replaced by
    /// whatever was stashed. Returns `true` if the live query changed.
    pub fn toggle_saved(&mut self) -> bool {
        let changed = if self.query.is_empty() {
            if self.saved.is_empty() {
                false
            } else {
                self.query = std::mem::take(&mut self.saved);
                true
            }
        } else {
            self.saved = std::mem::take(&mut self.query);
            true
        };
        self.caret = self.query.len();
        changed
    }
}
