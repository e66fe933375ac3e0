//! OS termination signals.
//!
//! SIGINT and SIGTERM record [`LinesiftError::Signal`](crate::domain::LinesiftError::Signal) and broadcast stop.
//! A helper thread closes the signal iterator once stop fires from anywhere
//! else, so the loop never outlives the session.

use crate::app::Ctx;
use std::sync::Arc;

#[cfg(unix)]
pub fn signal_loop(ctx: Arc<Ctx>) {
    use crate::domain::LinesiftError;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use std::thread;

    let mut signals = match Signals::new([SIGINT, SIGTERM]) {
        Ok(signals) => signals,
        Err(e) => {
            ctx.exit_with(LinesiftError::Internal(format!("cannot install signal handler: {e}")));
            return;
        }
    };

    let handle = signals.handle();
    let stop = ctx.hub().stop_rx().clone();
    let closer = thread::Builder::new()
        .name("linesift-signal-close".into())
        .spawn(move || {
            let _ = stop.recv();
            handle.close();
        });
    if let Err(e) = closer {
        ctx.exit_with(LinesiftError::Internal(format!("cannot start signal watcher: {e}")));
        return;
    }

    if let Some(signo) = signals.forever().next() {
        tracing::warn!(signal = signo, "termination signal received");
        ctx.exit_with(LinesiftError::Signal(signo));
    }
}

/// No signal source on this platform; waits for stop.
#[cfg(not(unix))]
pub fn signal_loop(ctx: Arc<Ctx>) {
    let _ = ctx.hub().stop_rx().recv();
}
