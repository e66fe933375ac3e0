//! Turns line-store notifications into draw hints.
//!
//! Appends and replays arrive one notification per line. Bursts are folded
//! into at most one draw hint per [`DRAW_INTERVAL`]; the trailing edge of a
//! burst is always flushed so the last line is never left unpainted.

use crate::app::Ctx;
use crossbeam_channel::select;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Minimum spacing between draw hints caused by ingestion.
pub const DRAW_INTERVAL: Duration = Duration::from_millis(1);

/// Drains the store's notification channel until stop.
pub fn watcher_loop(ctx: Arc<Ctx>) {
    let notifications = ctx.raw_buffer().subscribe();
    let hub = ctx.hub();
    let mut last_draw: Option<Instant> = None;
    let mut pending = false;

    loop {
        let wait = if pending { DRAW_INTERVAL } else { Duration::from_secs(3600) };
        select! {
            recv(hub.stop_rx()) -> _ => break,
            recv(notifications) -> msg => {
                if msg.is_err() {
                    break;
                }
                if last_draw.map_or(true, |at| at.elapsed() > DRAW_INTERVAL) {
                    hub.send_draw();
                    last_draw = Some(Instant::now());
                    pending = false;
                } else {
                    pending = true;
                }
            }
            default(wait) => {
                if pending {
                    hub.send_draw();
                    last_draw = Some(Instant::now());
                    pending = false;
                }
            }
        }
    }
}
