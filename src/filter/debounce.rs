//! Single-flight timer that rate-limits query dispatch.
//!
//! At most one timer is armed per [`Debouncer`]. Arming while a timer is in
//! flight is a no-op: the pending timer is neither rescheduled nor extended.
//! The fire callback is expected to read whatever state is current when it
//! runs, so edits made during the window are still picked up. The armed
//! marker is cleared only after the callback returns.

use crossbeam_channel::{select, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// Rate limiter for filter dispatch.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    armed: Arc<Mutex<bool>>,
}

impl Debouncer {
    /// Creates a debouncer with the given window.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            armed: Arc::new(Mutex::new(false)),
        }
    }

    /// `true` when the window is zero and callers should dispatch directly.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    /// `true` while a timer is in flight.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        *self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arms the timer unless one is already in flight.
    ///
    /// After the window elapses `fire` runs on the timer thread, inside the
    /// caller's tracing span. If `stop` fires first, `fire` is dropped without
    /// running. Returns `true` if this call armed the timer.
    pub fn arm<F>(&self, stop: &Receiver<()>, fire: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
            if *armed {
                return false;
            }
            *armed = true;
        }

        let armed = Arc::clone(&self.armed);
        let stop = stop.clone();
        let delay = self.delay;
        let span = tracing::Span::current();

        let spawned = thread::Builder::new()
            .name("linesift-debounce".into())
            .spawn(move || {
                let _entered = span.enter();
                select! {
                    recv(crossbeam_channel::after(delay)) -> _ => fire(),
                    recv(stop) -> _ => tracing::debug!("debounce timer canceled by stop"),
                }
                *armed.lock().unwrap_or_else(PoisonError::into_inner) = false;
            });

        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to start debounce timer");
            *self.armed.lock().unwrap_or_else(PoisonError::into_inner) = false;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn second_arm_in_window_is_a_noop() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let (_stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let (tx, rx) = crossbeam_channel::unbounded();

        let t1 = tx.clone();
        assert!(debouncer.arm(&stop_rx, move || t1.send(1).unwrap()));
        let t2 = tx.clone();
        assert!(!debouncer.arm(&stop_rx, move || t2.send(2).unwrap()));

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 1);
        assert!(rx.recv_timeout(Duration::from_millis(150)).is_err());

        let deadline = Instant::now() + Duration::from_secs(2);
        while debouncer.is_armed() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!debouncer.is_armed());
        assert!(debouncer.arm(&stop_rx, move || tx.send(3).unwrap()));
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 3);
    }

    #[test]
    fn stop_cancels_a_pending_timer() {
        let debouncer = Debouncer::new(Duration::from_secs(30));
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let (tx, rx) = crossbeam_channel::unbounded::<()>();

        assert!(debouncer.arm(&stop_rx, move || tx.send(()).unwrap()));
        drop(stop_tx);

        // The callback (and its sender) is dropped without firing.
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
    }
}
