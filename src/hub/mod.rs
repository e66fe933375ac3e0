//! Event bus decoupling producers from consumers.
//!
//! The [`Hub`] is a fixed set of typed one-way channels. Each receiving side
//! is consumed by exactly one long-running loop:
//!
//! | Channel   | Producer(s)                        | Consumer      | Depth       |
//! |-----------|------------------------------------|---------------|-------------|
//! | draw      | filter loop, watcher, input        | view loop     | 1 (coalesced) |
//! | prompt    | input dispatch                     | view loop     | 1 (coalesced) |
//! | status    | filter loop, input dispatch        | view loop     | `buffer_size` |
//! | query     | state coordinator / debounce timer | filter loop   | `buffer_size` |
//! | paging    | input dispatch                     | view loop     | `buffer_size` |
//! | stop      | lifecycle                          | every loop    | broadcast   |
//!
//! Draw and prompt publishes are hints: publishing while one is already
//! pending collapses into the pending one. Queued channels block the
//! publisher only while the buffer is full, and never past a stop.
//!
//! Stop is broadcast by dropping the only sender, which disconnects the
//! channel for every clone of the receiver at once.

pub mod messages;

pub use messages::{PagingRequest, StatusMsg};

use crossbeam_channel::{select, Receiver, Sender, TryRecvError, TrySendError};
use std::sync::{Mutex, PoisonError};

/// Default queue depth for the non-coalescing channels.
pub const DEFAULT_BUFFER_SIZE: usize = 5;

/// Typed publish/subscribe channels shared by every loop.
#[derive(Debug)]
pub struct Hub {
    draw_tx: Sender<()>,
    draw_rx: Receiver<()>,
    prompt_tx: Sender<()>,
    prompt_rx: Receiver<()>,
    status_tx: Sender<StatusMsg>,
    status_rx: Receiver<StatusMsg>,
    query_tx: Sender<String>,
    query_rx: Receiver<String>,
    paging_tx: Sender<PagingRequest>,
    paging_rx: Receiver<PagingRequest>,
    stop_tx: Mutex<Option<Sender<()>>>,
    stop_rx: Receiver<()>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl Hub {
    /// Creates a hub whose queued channels hold `buffer_size` messages.
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let depth = buffer_size.max(1);
        let (draw_tx, draw_rx) = crossbeam_channel::bounded(1);
        let (prompt_tx, prompt_rx) = crossbeam_channel::bounded(1);
        let (status_tx, status_rx) = crossbeam_channel::bounded(depth);
        let (query_tx, query_rx) = crossbeam_channel::bounded(depth);
        let (paging_tx, paging_rx) = crossbeam_channel::bounded(depth);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(0);
        Self {
            draw_tx,
            draw_rx,
            prompt_tx,
            prompt_rx,
            status_tx,
            status_rx,
            query_tx,
            query_rx,
            paging_tx,
            paging_rx,
            stop_tx: Mutex::new(Some(stop_tx)),
            stop_rx,
        }
    }

    /// Requests a full redraw. Returns `false` when a redraw was already
    /// pending and this request collapsed into it.
    pub fn send_draw(&self) -> bool {
        Self::hint(&self.draw_tx)
    }

    /// Requests a redraw of the prompt line only.
    pub fn send_draw_prompt(&self) -> bool {
        Self::hint(&self.prompt_tx)
    }

    /// Publishes a status-line message.
    pub fn send_status(&self, msg: StatusMsg) -> bool {
        self.publish(&self.status_tx, msg)
    }

    /// Dispatches a query to the filter loop.
    pub fn send_query(&self, query: String) -> bool {
        tracing::debug!(query = %query, "dispatching query");
        self.publish(&self.query_tx, query)
    }

    /// Publishes a cursor movement.
    pub fn send_paging(&self, request: PagingRequest) -> bool {
        self.publish(&self.paging_tx, request)
    }

    /// Broadcasts the stop signal. Only the first call has an effect; it
    /// returns `true`, every later call returns `false`.
    pub fn stop(&self) -> bool {
        let sender = self
            .stop_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let first = sender.is_some();
        drop(sender);
        if first {
            tracing::debug!("stop broadcast");
        }
        first
    }

    /// Returns `true` once [`Hub::stop`] has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self.stop_rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Draw hints.
    #[must_use]
    pub const fn draw_rx(&self) -> &Receiver<()> {
        &self.draw_rx
    }

    /// Prompt redraw hints.
    #[must_use]
    pub const fn prompt_rx(&self) -> &Receiver<()> {
        &self.prompt_rx
    }

    /// Status messages.
    #[must_use]
    pub const fn status_rx(&self) -> &Receiver<StatusMsg> {
        &self.status_rx
    }

    /// Dispatched queries.
    #[must_use]
    pub const fn query_rx(&self) -> &Receiver<String> {
        &self.query_rx
    }

    /// Paging requests.
    #[must_use]
    pub const fn paging_rx(&self) -> &Receiver<PagingRequest> {
        &self.paging_rx
    }

    /// The stop signal; becomes ready (disconnected) once stop is broadcast.
    #[must_use]
    pub const fn stop_rx(&self) -> &Receiver<()> {
        &self.stop_rx
    }

    fn hint(tx: &Sender<()>) -> bool {
        match tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(()) | TrySendError::Disconnected(())) => false,
        }
    }

    /// Sends on a queued channel, waiting for room but giving up on stop.
    fn publish<T>(&self, tx: &Sender<T>, msg: T) -> bool {
        if self.is_stopped() {
            return false;
        }
        select! {
            send(tx, msg) -> res => res.is_ok(),
            recv(self.stop_rx) -> _ => false,
        }
    }
}
