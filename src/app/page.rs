//! Cursor and page geometry over the active sequence.

use crate::hub::PagingRequest;

/// Derived pagination for the current cursor row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page holding the cursor; 0 when there are no rows.
    pub page: usize,
    /// Row index of the first row on `page`.
    pub offset: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Rows in the active sequence.
    pub total: usize,
    /// Number of pages.
    pub max_page: usize,
}

/// Cursor row and column plus the last known page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    line: usize,
    col: usize,
    per_page: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Cursor {
    /// A cursor on `line`, one row per page until the view reports its height.
    #[must_use]
    pub const fn new(line: usize) -> Self {
        Self {
            line,
            col: 0,
            per_page: 1,
        }
    }

    /// Current row.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Horizontal scroll offset in columns.
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    /// Records the number of rows the view can show.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
    }

    /// Pulls the cursor back inside `[0, total)`.
    pub fn clamp(&mut self, total: usize) {
        self.line = self.line.min(total.saturating_sub(1));
    }

    /// Applies a movement over `total` rows. Line moves wrap around; page
    /// moves stop at either end. `scroll_step` is the column delta for
    /// horizontal scrolls.
    pub fn apply(&mut self, request: PagingRequest, total: usize, scroll_step: usize) {
        if total == 0 {
            self.line = 0;
        } else {
            let last = total - 1;
            self.line = match request {
                PagingRequest::ToLineAbove if self.line == 0 => last,
                PagingRequest::ToLineAbove => (self.line - 1).min(last),
                PagingRequest::ToLineBelow if self.line >= last => 0,
                PagingRequest::ToLineBelow => self.line + 1,
                PagingRequest::ToPrevPage => self.line.saturating_sub(self.per_page),
                PagingRequest::ToNextPage => (self.line + self.per_page).min(last),
                PagingRequest::ToScrollLeft | PagingRequest::ToScrollRight => self.line.min(last),
            };
        }

        match request {
            PagingRequest::ToScrollLeft => self.col = self.col.saturating_sub(scroll_step),
            PagingRequest::ToScrollRight => self.col += scroll_step,
            _ => {}
        }
    }

    /// Page geometry for `total` rows.
    #[must_use]
    pub fn page_info(&self, total: usize) -> PageInfo {
        if total == 0 {
            return PageInfo {
                per_page: self.per_page,
                ..PageInfo::default()
            };
        }
        let line = self.line.min(total - 1);
        let page = line / self.per_page + 1;
        PageInfo {
            page,
            offset: (page - 1) * self.per_page,
            per_page: self.per_page,
            total,
            max_page: total.div_ceil(self.per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_moves_wrap() {
        let mut cursor = Cursor::new(0);
        cursor.apply(PagingRequest::ToLineAbove, 4, 0);
        assert_eq!(cursor.line(), 3);
        cursor.apply(PagingRequest::ToLineBelow, 4, 0);
        assert_eq!(cursor.line(), 0);
    }

    #[test]
    fn page_moves_stop_at_the_ends() {
        let mut cursor = Cursor::new(2);
        cursor.set_per_page(10);
        cursor.apply(PagingRequest::ToNextPage, 15, 0);
        assert_eq!(cursor.line(), 12);
        cursor.apply(PagingRequest::ToNextPage, 15, 0);
        assert_eq!(cursor.line(), 14);
        cursor.apply(PagingRequest::ToPrevPage, 15, 0);
        assert_eq!(cursor.line(), 4);
        cursor.apply(PagingRequest::ToPrevPage, 15, 0);
        assert_eq!(cursor.line(), 0);
    }

    #[test]
    fn page_info_tracks_cursor() {
        let mut cursor = Cursor::new(23);
        cursor.set_per_page(10);
        assert_eq!(
            cursor.page_info(25),
            PageInfo {
                page: 3,
                offset: 20,
                per_page: 10,
                total: 25,
                max_page: 3,
            }
        );
        assert_eq!(cursor.page_info(0).page, 0);
    }

    #[test]
    fn horizontal_scroll() {
        let mut cursor = Cursor::new(0);
        cursor.apply(PagingRequest::ToScrollRight, 1, 8);
        cursor.apply(PagingRequest::ToScrollRight, 1, 8);
        assert_eq!(cursor.col(), 16);
        cursor.apply(PagingRequest::ToScrollLeft, 1, 20);
        assert_eq!(cursor.col(), 0);
    }
}
