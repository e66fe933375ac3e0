//! Join counter and terminal-error slot for the running loops.
//!
//! Every long-running loop holds a [`JoinToken`] for as long as it runs; the
//! token releases its slot on drop, so a loop that returns early or panics
//! still lets [`Lifecycle::wait_done`] finish. The first error recorded wins
//! and later ones are logged and discarded.

use crate::domain::LinesiftError;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Coarse shutdown phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No stop has been requested.
    Running,
    /// Stop was broadcast and loops are still winding down.
    StopRequested,
    /// Stop was broadcast and every loop has finished.
    Drained,
}

#[derive(Debug, Default)]
struct Shared {
    running: Mutex<usize>,
    drained: Condvar,
}

/// Tracks running loops and the error that ended the session.
#[derive(Debug, Default)]
pub struct Lifecycle {
    shared: Arc<Shared>,
    error: Mutex<Option<LinesiftError>>,
}

/// A registered loop's slot in the join counter.
#[derive(Debug)]
#[must_use = "the loop is deregistered as soon as the token is dropped"]
pub struct JoinToken {
    shared: Arc<Shared>,
}

impl Drop for JoinToken {
    fn drop(&mut self) {
        let mut running = self
            .shared
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *running = running.saturating_sub(1);
        if *running == 0 {
            self.shared.drained.notify_all();
        }
    }
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a running loop.
    pub fn register(&self) -> JoinToken {
        *self
            .shared
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        JoinToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of loops still registered.
    #[must_use]
    pub fn running(&self) -> usize {
        *self
            .shared
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until every registered loop has released its token.
    pub fn wait_done(&self) {
        let running = self
            .shared
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _running = self
            .shared
            .drained
            .wait_while(running, |n| *n > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Stores `err` unless an earlier error is already recorded. Returns
    /// `true` if this error was kept.
    pub fn record_error(&self, err: LinesiftError) -> bool {
        let mut slot = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(first) = slot.as_ref() {
            tracing::debug!(first = %first, dropped = %err, "terminal error already recorded");
            return false;
        }
        tracing::debug!(error = %err, "recorded terminal error");
        *slot = Some(err);
        true
    }

    /// Removes and returns the recorded error.
    pub fn take_error(&self) -> Option<LinesiftError> {
        self.error.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// The phase given whether stop has been broadcast.
    #[must_use]
    pub fn state(&self, stopped: bool) -> LifecycleState {
        match (stopped, self.running()) {
            (false, _) => LifecycleState::Running,
            (true, 0) => LifecycleState::Drained,
            (true, _) => LifecycleState::StopRequested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn first_error_wins() {
        let lifecycle = Lifecycle::new();
        assert!(lifecycle.record_error(LinesiftError::Signal(2)));
        assert!(!lifecycle.record_error(LinesiftError::Internal("late".into())));
        assert!(matches!(lifecycle.take_error(), Some(LinesiftError::Signal(2))));
        assert!(lifecycle.take_error().is_none());
    }

    #[test]
    fn wait_done_returns_once_tokens_drop() {
        let lifecycle = Arc::new(Lifecycle::new());
        let tokens: Vec<JoinToken> = (0..3).map(|_| lifecycle.register()).collect();
        assert_eq!(lifecycle.running(), 3);
        assert_eq!(lifecycle.state(true), LifecycleState::StopRequested);

        let (tx, rx) = crossbeam_channel::bounded(1);
        let waiter = {
            let lifecycle = Arc::clone(&lifecycle);
            thread::spawn(move || {
                lifecycle.wait_done();
                tx.send(()).unwrap();
            })
        };

        for token in tokens {
            assert!(rx.try_recv().is_err());
            drop(token);
        }
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        waiter.join().unwrap();
        assert_eq!(lifecycle.state(true), LifecycleState::Drained);
        assert_eq!(lifecycle.state(false), LifecycleState::Running);
    }
}
