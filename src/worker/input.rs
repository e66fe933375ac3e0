//! Terminal input loop.
//!
//! `crossterm` reads block, so the loop polls with a short timeout and checks
//! stop between polls.

use super::keymap::Keymap;
use crate::app::{execute_actions, handle_event, Ctx};
use crate::domain::LinesiftError;
use crate::hub::StatusMsg;
use crossterm::event;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on how long stop can go unnoticed.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reads key events, maps them through `keymap`, runs the handler and
/// executes its actions until stop.
pub fn input_loop(ctx: Arc<Ctx>, keymap: &Keymap) {
    let hub = ctx.hub();
    while !hub.is_stopped() {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                ctx.exit_with(LinesiftError::Io(e));
                break;
            }
        }

        let raw = match event::read() {
            Ok(raw) => raw,
            Err(e) => {
                ctx.exit_with(LinesiftError::Io(e));
                break;
            }
        };

        let Some(input) = keymap.map_event(&raw) else {
            tracing::trace!(event = ?raw, "unbound terminal event");
            continue;
        };

        match handle_event(&ctx, &input) {
            Ok(actions) => execute_actions(&ctx, actions),
            Err(e) => {
                tracing::warn!(event = ?input, error = %e, "event handling failed");
                hub.send_status(StatusMsg::sticky(e.to_string()));
            }
        }
    }
}
