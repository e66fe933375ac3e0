//! Input event handling and state transitions.
//!
//! This module translates user input into calls against the [`Ctx`] contract.
//! It never publishes on the bus itself: every side effect is returned as an
//! [`Action`] and executed once the mutating accessors have returned.
//!
//! # Event Types
//!
//! - **Query editing**: `Char`, `Backspace`, `Delete`, `DeleteBackwardWord`,
//!   `KillEndOfLine`, `KillBeginningOfLine`, `ToggleQuery`
//! - **Caret**: `CaretLeft`, `CaretRight`, `CaretStart`, `CaretEnd`
//! - **Navigation**: `SelectUp`, `SelectDown`, `PageUp`, `PageDown`,
//!   `ScrollLeft`, `ScrollRight`
//! - **Selection**: `ToggleSelection`, `ToggleSelectionAndSelectNext`,
//!   `SelectAll`, `SelectNone`, `InvertSelection`, `ToggleRangeMode`,
//!   `CancelRangeMode`
//! - **Session**: `RotateFilter`, `Finish`, `Cancel`, `Refresh`, `Resize`
//!
//! # Range Mode
//!
//! `ToggleRangeMode` anchors range mode at the cursor; toggling it again
//! adds every row between the anchor and the cursor to the selection.
//! `CancelRangeMode` leaves range mode and discards the span.
//!
//! # Example
//!
//! ```rust
//! use linesift::app::{handle_event, Action, Ctx, CtxOptions, Event};
//! use linesift::filter::FilterSet;
//!
//! let ctx = Ctx::new(CtxOptions::default(), FilterSet::with_builtins());
//! let actions = handle_event(&ctx, &Event::Char('a'))?;
//! assert!(matches!(actions[0], Action::DrawPrompt));
//! assert_eq!(ctx.query_string(), "a");
//! # Ok::<(), linesift::LinesiftError>(())
//! ```

use super::{Action, Ctx};
use crate::domain::{LinesiftError, Result};
use crate::hub::{PagingRequest, StatusMsg};
use std::sync::Arc;
use std::time::Duration;

/// How long the "filter changed" notice stays on the status line.
const FILTER_STATUS_DELAY: Duration = Duration::from_secs(2);

/// User-level input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Inserts a character at the caret.
    Char(char),
    /// Deletes the character before the caret.
    Backspace,
    /// Deletes the character under the caret.
    Delete,
    /// Deletes the word before the caret.
    DeleteBackwardWord,
    /// Moves the caret one character left.
    CaretLeft,
    /// Moves the caret one character right.
    CaretRight,
    /// Moves the caret to the start of the query.
    CaretStart,
    /// Moves the caret to the end of the query.
    CaretEnd,
    /// Deletes from the caret to the end of the query.
    KillEndOfLine,
    /// Deletes from the start of the query to the caret.
    KillBeginningOfLine,
    /// Moves the cursor up one row (wraps).
    SelectUp,
    /// Moves the cursor down one row (wraps).
    SelectDown,
    /// Moves the cursor up one page.
    PageUp,
    /// Moves the cursor down one page.
    PageDown,
    /// Scrolls the result rows left.
    ScrollLeft,
    /// Scrolls the result rows right.
    ScrollRight,
    /// Switches to the next registered filter.
    RotateFilter,
    /// Flips the selection of the cursor row.
    ToggleSelection,
    /// Flips the selection of the cursor row and moves down.
    ToggleSelectionAndSelectNext,
    /// Selects every row of the active sequence.
    SelectAll,
    /// Clears the selection.
    SelectNone,
    /// Flips every row of the active sequence.
    InvertSelection,
    /// Enters range mode, or leaves it keeping the span.
    ToggleRangeMode,
    /// Leaves range mode discarding the span.
    CancelRangeMode,
    /// Swaps the live query with the saved one.
    ToggleQuery,
    /// Emits the picked lines and exits.
    Finish,
    /// Exits without output.
    Cancel,
    /// Repaints the screen.
    Refresh,
    /// The terminal was resized.
    Resize,
}

/// Applies `event` to `ctx` and returns the side effects to execute.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for events whose
/// accessors can fail.
#[allow(clippy::too_many_lines)]
pub fn handle_event(ctx: &Arc<Ctx>, event: &Event) -> Result<Vec<Action>> {
    let _span = tracing::debug_span!("handle_event", event = ?event).entered();

    let actions = match *event {
        Event::Char(ch) => {
            ctx.with_query(|q| q.insert_char(ch));
            edited(true)
        }
        Event::Backspace => edited(ctx.with_query(|q| q.delete_backward_char())),
        Event::Delete => edited(ctx.with_query(|q| q.delete_forward_char())),
        Event::DeleteBackwardWord => edited(ctx.with_query(|q| q.delete_backward_word())),
        Event::KillEndOfLine => edited(ctx.with_query(|q| q.kill_end_of_line())),
        Event::KillBeginningOfLine => edited(ctx.with_query(|q| q.kill_beginning_of_line())),
        Event::ToggleQuery => edited(ctx.with_query(|q| q.toggle_saved())),

        Event::CaretLeft => {
            ctx.with_query(|q| q.move_caret(-1));
            vec![Action::DrawPrompt]
        }
        Event::CaretRight => {
            ctx.with_query(|q| q.move_caret(1));
            vec![Action::DrawPrompt]
        }
        Event::CaretStart => {
            ctx.with_query(|q| q.set_caret(0));
            vec![Action::DrawPrompt]
        }
        Event::CaretEnd => {
            ctx.with_query(|q| q.set_caret(usize::MAX));
            vec![Action::DrawPrompt]
        }

        Event::SelectUp => vec![Action::Paging(PagingRequest::ToLineAbove)],
        Event::SelectDown => vec![Action::Paging(PagingRequest::ToLineBelow)],
        Event::PageUp => vec![Action::Paging(PagingRequest::ToPrevPage)],
        Event::PageDown => vec![Action::Paging(PagingRequest::ToNextPage)],
        Event::ScrollLeft => vec![Action::Paging(PagingRequest::ToScrollLeft)],
        Event::ScrollRight => vec![Action::Paging(PagingRequest::ToScrollRight)],

        Event::RotateFilter => {
            let name = ctx.rotate_filter();
            tracing::debug!(filter = %name, "filter rotated");
            let mut actions = vec![
                Action::Status(StatusMsg::transient(
                    format!("Filter: {name}"),
                    FILTER_STATUS_DELAY,
                )),
                Action::DrawPrompt,
            ];
            if ctx.query_len() > 0 {
                actions.push(Action::ExecQuery);
            }
            actions
        }

        Event::ToggleSelection => {
            ctx.selection_toggle(ctx.current_line());
            vec![Action::Draw]
        }
        Event::ToggleSelectionAndSelectNext => {
            ctx.selection_toggle(ctx.current_line());
            vec![Action::Paging(PagingRequest::ToLineBelow)]
        }
        Event::SelectAll => {
            ctx.select_all();
            vec![Action::Draw]
        }
        Event::SelectNone => {
            ctx.selection_clear();
            vec![Action::Draw]
        }
        Event::InvertSelection => {
            ctx.invert_selection();
            vec![Action::Draw]
        }
        Event::ToggleRangeMode => {
            if ctx.is_range_mode() {
                ctx.end_range_mode(true);
            } else {
                ctx.start_range_mode();
            }
            vec![Action::Draw]
        }
        Event::CancelRangeMode => {
            ctx.end_range_mode(false);
            vec![Action::Draw]
        }

        Event::Finish => {
            let lines = ctx.selected_output();
            tracing::debug!(count = lines.len(), "finish requested");
            vec![Action::Exit(Ok(lines))]
        }
        Event::Cancel => vec![Action::Exit(Err(LinesiftError::Canceled))],
        Event::Refresh | Event::Resize => vec![Action::Draw],
    };

    Ok(actions)
}

/// Actions for a query edit: nothing if the query did not change.
fn edited(changed: bool) -> Vec<Action> {
    if changed {
        vec![Action::DrawPrompt, Action::ExecQuery]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CtxOptions;
    use crate::filter::{FilterSet, CASE_SENSITIVE};
    use pretty_assertions::assert_eq;

    fn ctx(lines: &[&str]) -> Arc<Ctx> {
        let ctx = Ctx::new(CtxOptions::default(), FilterSet::with_builtins());
        for line in lines {
            ctx.add_raw_line(*line);
        }
        ctx
    }

    #[test]
    fn typing_edits_query_and_requests_dispatch() {
        let ctx = ctx(&[]);
        for ch in "abc".chars() {
            handle_event(&ctx, &Event::Char(ch)).unwrap();
        }
        handle_event(&ctx, &Event::CaretLeft).unwrap();
        let actions = handle_event(&ctx, &Event::Backspace).unwrap();
        assert_eq!(ctx.query_string(), "ac");
        assert_eq!(ctx.caret_pos(), 1);
        assert!(matches!(actions[..], [Action::DrawPrompt, Action::ExecQuery]));
    }

    #[test]
    fn noop_edit_produces_no_actions() {
        let ctx = ctx(&[]);
        assert!(handle_event(&ctx, &Event::Backspace).unwrap().is_empty());
        assert!(handle_event(&ctx, &Event::KillEndOfLine).unwrap().is_empty());
    }

    #[test]
    fn rotate_reports_new_filter() {
        let ctx = ctx(&[]);
        let actions = handle_event(&ctx, &Event::RotateFilter).unwrap();
        assert!(matches!(
            &actions[0],
            Action::Status(msg) if msg.text == format!("Filter: {CASE_SENSITIVE}")
        ));
        assert!(!actions.iter().any(|a| matches!(a, Action::ExecQuery)));
    }

    #[test]
    fn toggle_range_mode_materializes_span() {
        let ctx = ctx(&["0", "1", "2", "3", "4", "5", "6"]);
        ctx.set_current_line(2);
        handle_event(&ctx, &Event::ToggleRangeMode).unwrap();
        ctx.set_current_line(5);
        handle_event(&ctx, &Event::ToggleRangeMode).unwrap();
        assert!(!ctx.is_range_mode());
        assert_eq!(ctx.selection_len(), 4);
        for row in 2..=5 {
            assert!(ctx.selection_contains(row));
        }
    }

    #[test]
    fn finish_and_cancel_exit() {
        let ctx = ctx(&["only"]);
        let finish = handle_event(&ctx, &Event::Finish).unwrap();
        assert!(matches!(&finish[..], [Action::Exit(Ok(lines))] if lines == &["only"]));
        let cancel = handle_event(&ctx, &Event::Cancel).unwrap();
        assert!(matches!(&cancel[..], [Action::Exit(Err(LinesiftError::Canceled))]));
    }
}
