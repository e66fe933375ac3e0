//! Side effects produced by the input handler.
//!
//! [`handle_event`](super::handle_event) only mutates the coordinator; every
//! publish and every shutdown request it wants is returned as an [`Action`]
//! and carried out by [`execute_actions`] after the mutating accessors have
//! returned. That keeps the "hint after mutation" ordering in one place.

use super::Ctx;
use crate::domain::Result;
use crate::hub::{PagingRequest, StatusMsg};
use std::sync::Arc;

/// Commands executed by the input loop after an event is handled.
#[derive(Debug)]
pub enum Action {
    /// Publish a full redraw hint.
    Draw,

    /// Publish a prompt-only redraw hint.
    DrawPrompt,

    /// Run the debounced dispatch protocol for the current query.
    ///
    /// Falls back to a redraw when the protocol reports a no-op, so the
    /// prompt still reflects the edit.
    ExecQuery,

    /// Forward a cursor movement to the view, which owns page geometry.
    Paging(PagingRequest),

    /// Show a status-line message.
    Status(StatusMsg),

    /// End the session: `Ok` carries the lines to emit, `Err` the reason.
    Exit(Result<Vec<String>>),
}

/// Carries out `actions` in order.
pub fn execute_actions(ctx: &Arc<Ctx>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::Draw => {
                ctx.hub().send_draw();
            }
            Action::DrawPrompt => {
                ctx.hub().send_draw_prompt();
            }
            Action::ExecQuery => {
                if !ctx.exec_query() {
                    ctx.hub().send_draw();
                }
            }
            Action::Paging(request) => {
                ctx.hub().send_paging(request);
            }
            Action::Status(msg) => {
                ctx.hub().send_status(msg);
            }
            Action::Exit(Ok(lines)) => ctx.finish_with(lines),
            Action::Exit(Err(err)) => ctx.exit_with(err),
        }
    }
}
