//! The shared state coordinator.
//!
//! [`Ctx`] is the one object every loop holds (behind an `Arc`). Its state is
//! split into independently locked groups so typing never contends with a
//! filter swap or a redraw:
//!
//! | Group      | Lock                                  |
//! |------------|---------------------------------------|
//! | query      | `Mutex<QueryState>`                   |
//! | selection  | `Mutex<Selection>`                    |
//! | cursor     | `Mutex<Cursor>`                       |
//! | active     | `RwLock<Option<Arc<FilteredBuffer>>>` |
//! | filters    | `Mutex<FilterSet>`                    |
//!
//! Accessors take at most one of these locks at a time and release it before
//! returning, so nothing is held across a publish or a filter run. The one
//! exception is [`Ctx::swap_in_result`], which holds query then active, always
//! in that order. Callers publish draw hints only after the mutating accessor
//! has returned.

use super::lifecycle::{Lifecycle, LifecycleState};
use super::page::{Cursor, PageInfo};
use super::query::QueryState;
use super::selection::Selection;
use crate::buffer::{FilteredBuffer, LineBuffer, RawLineBuffer};
use crate::domain::{LinesiftError, RawLine, Result};
use crate::filter::{Debouncer, FilterSet, QueryFilterer};
use crate::hub::{Hub, PagingRequest, DEFAULT_BUFFER_SIZE};
use crossbeam_channel::{Receiver, Sender};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

/// Default debounce window for query dispatch.
pub const DEFAULT_QUERY_EXECUTION_DELAY: Duration = Duration::from_millis(50);

/// Default prompt text.
pub const DEFAULT_PROMPT: &str = "QUERY>";

/// Startup inputs the coordinator treats as immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtxOptions {
    /// Debounce window; zero dispatches every edit immediately.
    pub query_execution_delay: Duration,
    /// Line store capacity; `0` is unbounded.
    pub buffer_size: usize,
    /// Queue depth of the bus's non-coalescing channels.
    pub hub_buffer_size: usize,
    /// Split lines on NUL into display and output parts.
    pub enable_sep: bool,
    /// Row the cursor starts on.
    pub initial_index: usize,
    /// Prompt shown before the query.
    pub prompt: String,
}

impl Default for CtxOptions {
    fn default() -> Self {
        Self {
            query_execution_delay: DEFAULT_QUERY_EXECUTION_DELAY,
            buffer_size: 0,
            hub_buffer_size: DEFAULT_BUFFER_SIZE,
            enable_sep: false,
            initial_index: 0,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// Shared state for one interactive session.
#[derive(Debug)]
pub struct Ctx {
    options: CtxOptions,
    hub: Hub,
    query: Mutex<QueryState>,
    selection: Mutex<Selection>,
    cursor: Mutex<Cursor>,
    raw: Arc<RawLineBuffer>,
    active: RwLock<Option<Arc<FilteredBuffer>>>,
    filters: Mutex<FilterSet>,
    debouncer: Debouncer,
    lifecycle: Lifecycle,
    result: Mutex<Option<Vec<String>>>,
    ready_tx: Mutex<Option<Sender<()>>>,
    ready_rx: Receiver<()>,
}

impl Ctx {
    /// Creates a coordinator with an empty store and query.
    #[must_use]
    pub fn new(options: CtxOptions, filters: FilterSet) -> Arc<Self> {
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(0);
        Arc::new(Self {
            hub: Hub::new(options.hub_buffer_size),
            query: Mutex::new(QueryState::new()),
            selection: Mutex::new(Selection::new()),
            cursor: Mutex::new(Cursor::new(options.initial_index)),
            raw: Arc::new(RawLineBuffer::new(options.buffer_size, options.enable_sep)),
            active: RwLock::new(None),
            filters: Mutex::new(filters),
            debouncer: Debouncer::new(options.query_execution_delay),
            lifecycle: Lifecycle::new(),
            result: Mutex::new(None),
            ready_tx: Mutex::new(Some(ready_tx)),
            ready_rx,
            options,
        })
    }

    #[must_use]
    pub const fn options(&self) -> &CtxOptions {
        &self.options
    }

    #[must_use]
    pub const fn hub(&self) -> &Hub {
        &self.hub
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.options.prompt
    }

    // ---- query ---------------------------------------------------------

    /// Runs `f` with the query state locked.
    ///
    /// `f` must not block or publish; the lock is released when it returns.
    pub fn with_query<R>(&self, f: impl FnOnce(&mut QueryState) -> R) -> R {
        f(&mut self.query.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn query_string(&self) -> String {
        self.with_query(|q| q.text())
    }

    #[must_use]
    pub fn query_len(&self) -> usize {
        self.with_query(|q| q.len())
    }

    #[must_use]
    pub fn caret_pos(&self) -> usize {
        self.with_query(|q| q.caret())
    }

    /// Replaces the query and moves the caret to its end.
    pub fn set_query(&self, query: &str) {
        self.with_query(|q| q.set_query(query));
    }

    /// Turns the current query into a filter dispatch.
    ///
    /// - Empty query: if a filtered view is active, the full store becomes
    ///   active again (replayed) and `true` is returned; otherwise `false`.
    /// - Zero delay: the query is dispatched right away.
    /// - Otherwise the shared timer is armed unless it already is. When it
    ///   fires it dispatches whatever query is current at that moment, so
    ///   edits made inside the window are not lost and never postpone it.
    pub fn exec_query(self: &Arc<Self>) -> bool {
        let query = self.query_string();
        if query.is_empty() {
            if self.is_filtering() {
                self.reset_active_line_buffer();
                return true;
            }
            return false;
        }

        if self.debouncer.is_immediate() {
            self.hub.send_query(query);
            return true;
        }

        let ctx = Arc::clone(self);
        let armed = self.debouncer.arm(self.hub.stop_rx(), move || {
            let query = ctx.query_string();
            tracing::debug!(query = %query, "debounce timer fired");
            ctx.hub.send_query(query);
        });
        if !armed {
            tracing::trace!("query dispatch already pending");
        }
        true
    }

    // ---- filters -------------------------------------------------------

    fn filters(&self) -> std::sync::MutexGuard<'_, FilterSet> {
        self.filters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The strategy new queries run with.
    #[must_use]
    pub fn current_filter(&self) -> Arc<dyn QueryFilterer> {
        self.filters().current()
    }

    /// Advances to the next strategy and returns its name.
    pub fn rotate_filter(&self) -> String {
        let mut filters = self.filters();
        filters.rotate();
        filters.current().name().to_string()
    }

    /// Makes the named strategy current.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::UnknownFilter`] if no such strategy exists.
    pub fn set_current_filter_by_name(&self, name: &str) -> Result<()> {
        self.filters().set_current_by_name(name)
    }

    /// Registers another strategy.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::DuplicateFilter`] if the name is taken.
    pub fn add_filter(&self, filter: Arc<dyn QueryFilterer>) -> Result<()> {
        self.filters().add(filter)
    }

    #[must_use]
    pub fn filter_names(&self) -> Vec<String> {
        self.filters().names()
    }

    // ---- buffers -------------------------------------------------------

    /// The line store.
    #[must_use]
    pub const fn raw_buffer(&self) -> &Arc<RawLineBuffer> {
        &self.raw
    }

    /// Ingests one line from the reader.
    pub fn add_raw_line(&self, text: impl Into<String>) -> Arc<RawLine> {
        self.raw.append(text)
    }

    /// `true` while a filter result is the active sequence.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The active viewable sequence: the latest filter result, or the store.
    #[must_use]
    pub fn current_line_buffer(&self) -> Arc<dyn LineBuffer> {
        let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(filtered) => Arc::clone(filtered) as Arc<dyn LineBuffer>,
            None => Arc::clone(&self.raw) as Arc<dyn LineBuffer>,
        }
    }

    /// Makes `buffer` the active sequence if it was computed for the query
    /// that is current right now. Returns `false` and drops it otherwise.
    ///
    /// The query lock is held across the swap, so an edit or a clear lands
    /// either before the check (and the result is dropped) or after the swap.
    pub fn swap_in_result(&self, buffer: FilteredBuffer) -> bool {
        let total = buffer.size();
        {
            let query = self.query.lock().unwrap_or_else(PoisonError::into_inner);
            if !query.is_text(buffer.query()) {
                tracing::debug!(result = %buffer.query(), "dropping stale filter result");
                return false;
            }
            tracing::debug!(query = %buffer.query(), total, "swapping active sequence");
            *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(buffer));
        }
        self.with_cursor(|c| c.clamp(total));
        true
    }

    /// Makes the full store active again and replays it to the watcher.
    pub fn reset_active_line_buffer(&self) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = None;
        let total = self.raw.size();
        self.with_cursor(|c| c.clamp(total));
        self.raw.replay();
    }

    // ---- cursor --------------------------------------------------------

    fn with_cursor<R>(&self, f: impl FnOnce(&mut Cursor) -> R) -> R {
        f(&mut self.cursor.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Row under the cursor.
    #[must_use]
    pub fn current_line(&self) -> usize {
        self.with_cursor(|c| c.line())
    }

    pub fn set_current_line(&self, line: usize) {
        self.with_cursor(|c| c.set_line(line));
    }

    /// Horizontal scroll offset.
    #[must_use]
    pub fn current_col(&self) -> usize {
        self.with_cursor(|c| c.col())
    }

    /// Records how many rows the view can show.
    pub fn set_per_page(&self, per_page: usize) {
        self.with_cursor(|c| c.set_per_page(per_page));
    }

    /// Applies a cursor movement against the active sequence.
    pub fn apply_paging(&self, request: PagingRequest, scroll_step: usize) {
        let total = self.current_line_buffer().size();
        self.with_cursor(|c| c.apply(request, total, scroll_step));
    }

    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        let total = self.current_line_buffer().size();
        self.with_cursor(|c| c.page_info(total))
    }

    // ---- selection -----------------------------------------------------

    fn with_selection<R>(&self, f: impl FnOnce(&mut Selection) -> R) -> R {
        f(&mut self.selection.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn resolve(&self, row: usize) -> Option<Arc<RawLine>> {
        self.current_line_buffer()
            .line_at(row)
            .ok()
            .map(|line| Arc::clone(line.raw()))
    }

    /// Selects the line at `row` of the active sequence. Out-of-range rows
    /// are ignored.
    pub fn selection_add(&self, row: usize) {
        if let Some(line) = self.resolve(row) {
            self.with_selection(|s| s.add(line));
        }
    }

    /// Deselects the line at `row`. Out-of-range rows are ignored.
    pub fn selection_remove(&self, row: usize) {
        if let Some(line) = self.resolve(row) {
            self.with_selection(|s| s.remove(line.id()));
        }
    }

    /// Flips the line at `row`. Returns `true` if it is now selected.
    pub fn selection_toggle(&self, row: usize) -> bool {
        let Some(line) = self.resolve(row) else {
            return false;
        };
        self.with_selection(|s| {
            if s.contains(line.id()) {
                s.remove(line.id());
                false
            } else {
                s.add(line)
            }
        })
    }

    /// Drops every selection and leaves range mode.
    pub fn selection_clear(&self) {
        self.with_selection(Selection::clear);
    }

    /// `true` if the line at `row` is individually selected.
    #[must_use]
    pub fn selection_contains(&self, row: usize) -> bool {
        self.resolve(row)
            .is_some_and(|line| self.with_selection(|s| s.contains(line.id())))
    }

    #[must_use]
    pub fn selection_len(&self) -> usize {
        self.with_selection(|s| s.len())
    }

    /// Selects every row of the active sequence.
    pub fn select_all(&self) {
        let lines = self.rows();
        self.with_selection(|s| {
            for line in lines {
                s.add(line);
            }
        });
    }

    /// Flips every row of the active sequence.
    pub fn invert_selection(&self) {
        let lines = self.rows();
        self.with_selection(|s| {
            for line in lines {
                if s.contains(line.id()) {
                    s.remove(line.id());
                } else {
                    s.add(line);
                }
            }
        });
    }

    fn rows(&self) -> Vec<Arc<RawLine>> {
        let buffer = self.current_line_buffer();
        (0..buffer.size())
            .filter_map(|row| buffer.line_at(row).ok())
            .map(|line| Arc::clone(line.raw()))
            .collect()
    }

    /// Anchors range mode at the cursor row.
    pub fn start_range_mode(&self) {
        let row = self.current_line();
        tracing::debug!(anchor = row, "entering range mode");
        self.with_selection(|s| s.set_range_start(Some(row)));
    }

    #[must_use]
    pub fn is_range_mode(&self) -> bool {
        self.with_selection(|s| s.is_range_mode())
    }

    #[must_use]
    pub fn range_start(&self) -> Option<usize> {
        self.with_selection(|s| s.range_start())
    }

    /// Leaves range mode. With `keep`, every row between the anchor and the
    /// cursor is added to the selection first.
    pub fn end_range_mode(&self, keep: bool) {
        let cursor = self.current_line();
        let Some(anchor) = self.with_selection(|s| {
            let anchor = s.range_start();
            s.set_range_start(None);
            anchor
        }) else {
            return;
        };
        if !keep {
            return;
        }
        let lines = self.range_rows(anchor, cursor);
        tracing::debug!(anchor, cursor, count = lines.len(), "materialized range");
        self.with_selection(|s| {
            for line in lines {
                s.add(line);
            }
        });
    }

    fn range_rows(&self, anchor: usize, cursor: usize) -> Vec<Arc<RawLine>> {
        let (lo, hi) = if anchor <= cursor { (anchor, cursor) } else { (cursor, anchor) };
        let buffer = self.current_line_buffer();
        (lo..=hi)
            .filter_map(|row| buffer.line_at(row).ok())
            .map(|line| Arc::clone(line.raw()))
            .collect()
    }

    /// `true` if `row` is selected individually or by the live range.
    #[must_use]
    pub fn is_row_selected(&self, row: usize) -> bool {
        let cursor = self.current_line();
        if self.with_selection(|s| s.in_range(row, cursor)) {
            return true;
        }
        self.selection_contains(row)
    }

    /// Output texts for the picked lines in ingestion order: the selection
    /// plus the live range, or the cursor line when both are empty.
    #[must_use]
    pub fn selected_output(&self) -> Vec<String> {
        let cursor = self.current_line();
        let (mut picked, anchor): (BTreeMap<u64, Arc<RawLine>>, _) = self.with_selection(|s| {
            let picked = s.iter().map(|l| (l.id(), Arc::clone(l))).collect();
            (picked, s.range_start())
        });
        if let Some(anchor) = anchor {
            for line in self.range_rows(anchor, cursor) {
                picked.insert(line.id(), line);
            }
        }
        if picked.is_empty() {
            if let Some(line) = self.resolve(cursor) {
                picked.insert(line.id(), line);
            }
        }
        picked.values().map(|l| l.output().to_string()).collect()
    }

    // ---- lifecycle -----------------------------------------------------

    /// Runs `body` on a new named thread registered with the join counter.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::Internal`] if the thread cannot be started.
    pub fn spawn_loop<F>(self: &Arc<Self>, name: &str, body: F) -> Result<()>
    where
        F: FnOnce(Arc<Self>) + Send + 'static,
    {
        let token = self.lifecycle.register();
        let ctx = Arc::clone(self);
        let span = tracing::debug_span!("loop", name = %name);
        thread::Builder::new()
            .name(format!("linesift-{name}"))
            .spawn(move || {
                let _token = token;
                let _entered = span.enter();
                tracing::debug!("loop started");
                body(ctx);
                tracing::debug!("loop finished");
            })
            .map(|_| ())
            .map_err(|e| LinesiftError::Internal(format!("cannot start {name} loop: {e}")))
    }

    /// Blocks until every loop started with [`Ctx::spawn_loop`] has returned.
    pub fn wait_done(&self) {
        self.lifecycle.wait_done();
    }

    /// Records `err` (first one wins) and broadcasts stop.
    pub fn exit_with(&self, err: LinesiftError) {
        if err.is_fatal() {
            tracing::warn!(error = %err, "exiting with error");
        }
        self.lifecycle.record_error(err);
        self.hub.stop();
    }

    /// Stores the lines to emit and broadcasts stop.
    pub fn finish_with(&self, lines: Vec<String>) {
        tracing::debug!(count = lines.len(), "finishing with result");
        *self.result.lock().unwrap_or_else(PoisonError::into_inner) = Some(lines);
        self.hub.stop();
    }

    /// Requests a clean stop without a result.
    pub fn stop(&self) {
        self.hub.stop();
    }

    /// Takes the recorded terminal error, if any.
    pub fn take_error(&self) -> Option<LinesiftError> {
        self.lifecycle.take_error()
    }

    /// Takes the lines stored by [`Ctx::finish_with`].
    pub fn take_result(&self) -> Option<Vec<String>> {
        self.result.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state(self.hub.is_stopped())
    }

    /// Signals that the first line (or end of input) has arrived. Only the
    /// first call has an effect.
    pub fn mark_input_ready(&self) {
        if self
            .ready_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            tracing::debug!("input ready");
        }
    }

    /// Becomes ready (disconnected) once input is ready.
    #[must_use]
    pub const fn input_ready_rx(&self) -> &Receiver<()> {
        &self.ready_rx
    }
}
