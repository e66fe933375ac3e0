//! Filter executor loop.

use crate::app::Ctx;
use crate::buffer::FilteredBuffer;
use crate::filter;
use crate::hub::StatusMsg;
use crossbeam_channel::select;
use std::sync::Arc;
use std::time::Duration;

/// How long a filter failure stays on the status line.
const ERROR_STATUS_DELAY: Duration = Duration::from_secs(5);

/// Waits for dispatched queries and runs each with the current strategy.
pub fn filter_loop(ctx: Arc<Ctx>) {
    let hub = ctx.hub();
    loop {
        select! {
            recv(hub.stop_rx()) -> _ => break,
            recv(hub.query_rx()) -> msg => match msg {
                Ok(query) => run_query(&ctx, &query),
                Err(_) => break,
            },
        }
    }
}

/// Runs one query and swaps its result in.
///
/// A run is abandoned when a newer query is already queued or stop fires.
/// A result whose query is no longer the current one (edited or cleared in
/// the meantime) is dropped. Failures show a status message and an empty
/// result.
pub fn run_query(ctx: &Ctx, query: &str) {
    if query.is_empty() {
        return;
    }
    let hub = ctx.hub();
    let strategy = ctx.current_filter();
    let lines = ctx.raw_buffer().snapshot();

    let outcome = filter::execute(strategy.as_ref(), query, lines, || {
        !hub.query_rx().is_empty() || hub.is_stopped()
    });

    match outcome {
        Ok(Some(result)) => {
            if ctx.swap_in_result(result) {
                hub.send_draw();
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(filter = %strategy.name(), query = %query, error = %e, "filter failed");
            if ctx.swap_in_result(FilteredBuffer::no_matches(query)) {
                hub.send_draw();
                hub.send_status(StatusMsg::transient(e.to_string(), ERROR_STATUS_DELAY));
            }
        }
    }
}
