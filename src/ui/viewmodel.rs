//! View model types representing renderable UI state.
//!
//! A [`ScreenModel`] is a read-only snapshot of the coordinator computed right
//! before painting. Computing it only goes through `Ctx` accessors, so the
//! renderer never holds a coordinator lock while it writes to the terminal.
//!
//! Rows are kept in page order; where each one lands on screen is up to the
//! [`Layout`](super::Layout).

use crate::app::{Ctx, PageInfo};
use crate::domain::MatchRange;

/// Rows taken by the prompt and status lines.
pub const CHROME_ROWS: usize = 2;

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenModel {
    /// The prompt line.
    pub prompt: PromptLine,
    /// Result rows on the current page, nearest the prompt first.
    pub rows: Vec<RowModel>,
    /// Horizontal scroll offset in characters.
    pub col: usize,
}

/// Prompt line contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLine {
    /// Prompt text, e.g. `QUERY>`.
    pub prompt: String,
    /// Current query.
    pub query: String,
    /// Caret position in characters.
    pub caret: usize,
    /// Name of the current filter.
    pub filter: String,
    /// Page geometry of the active sequence.
    pub page: PageInfo,
    /// `true` while range mode is active.
    pub range_mode: bool,
}

/// One visible result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowModel {
    /// Display text.
    pub text: String,
    /// Byte ranges of `text` to highlight.
    pub ranges: Vec<MatchRange>,
    /// Row is under the cursor.
    pub is_cursor: bool,
    /// Row is selected, individually or by the live range.
    pub is_selected: bool,
}

impl PromptLine {
    /// Reads the prompt state from `ctx`.
    #[must_use]
    pub fn compute(ctx: &Ctx) -> Self {
        let (query, caret) = ctx.with_query(|q| (q.text(), q.caret()));
        Self {
            prompt: ctx.prompt().to_string(),
            query,
            caret,
            filter: ctx.current_filter().name().to_string(),
            page: ctx.page_info(),
            range_mode: ctx.is_range_mode(),
        }
    }

    /// Right-aligned indicator, e.g. `IgnoreCase [2/7]`.
    #[must_use]
    pub fn indicator(&self) -> String {
        let range = if self.range_mode { " (range)" } else { "" };
        format!(
            "{}{range} [{}/{}]",
            self.filter, self.page.page, self.page.max_page
        )
    }
}

impl ScreenModel {
    /// Snapshots `ctx` for a terminal `height` rows tall.
    ///
    /// Also records the page height on the coordinator so paging requests
    /// move by what is actually visible.
    #[must_use]
    pub fn compute(ctx: &Ctx, height: usize) -> Self {
        ctx.set_per_page(height.saturating_sub(CHROME_ROWS));
        let prompt = PromptLine::compute(ctx);
        let buffer = ctx.current_line_buffer();
        let cursor = ctx.current_line();
        let page = prompt.page;

        let end = (page.offset + page.per_page).min(buffer.size());
        let rows = (page.offset..end)
            .filter_map(|row| {
                let line = buffer.line_at(row).ok()?;
                Some(RowModel {
                    text: line.display().to_string(),
                    ranges: line.ranges().to_vec(),
                    is_cursor: row == cursor.min(page.total.saturating_sub(1)),
                    is_selected: ctx.is_row_selected(row),
                })
            })
            .collect();

        Self {
            prompt,
            rows,
            col: ctx.current_col(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CtxOptions;
    use crate::filter::FilterSet;
    use pretty_assertions::assert_eq;

    #[test]
    fn pages_follow_the_cursor() {
        let ctx = Ctx::new(CtxOptions::default(), FilterSet::with_builtins());
        for i in 0..10 {
            ctx.add_raw_line(format!("line {i}"));
        }
        ctx.set_current_line(5);
        ctx.selection_add(4);

        let vm = ScreenModel::compute(&ctx, 6);
        assert_eq!(vm.prompt.page.page, 2);
        let texts: Vec<&str> = vm.rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["line 4", "line 5", "line 6", "line 7"]);
        assert!(vm.rows[0].is_selected);
        assert!(vm.rows[1].is_cursor);
        assert_eq!(vm.prompt.indicator(), "IgnoreCase [2/3]");
    }
}
