//! Linesift: an interactive incremental line filter for the terminal.
//!
//! Linesift reads lines from a file or a pipe, lets the user type a query,
//! re-filters as they type and prints the picked lines to standard output:
//! - Incremental filtering with debounced query dispatch
//! - Built-in substring, smart-case, regex and fuzzy strategies
//! - User-defined strategies backed by external commands
//! - Multi-selection, including contiguous range selection
//! - Bounded line store for endless streams

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs): CLI, rc file, logging, exit code │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Shared state
//! │  - State coordinator (Ctx)                          │  ← Input handling
//! │  - Event handling / action dispatching              │
//! │  - Lifecycle join counter                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Worker Layer  │   │ Event Bus     │
//! │ (ui/)         │   │ (worker/)     │   │ (hub/)        │
//! │ - View loop   │   │ - Reader      │   │ - Draw hints  │
//! │ - Rendering   │   │ - Filter runs │   │ - Queries     │
//! │ - Theming     │   │ - Signals/keys│   │ - Stop signal │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Engine & Domain Layers                             │
//! │  - Line store and filter results (buffer/)          │
//! │  - Strategies, registry, debounce (filter/)         │
//! │  - Line model and errors (domain/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Observability                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Rotating log file (observability/)               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Shared state coordinator, input handler and session runner
//! - [`buffer`]: Bounded line store and filter result sequences
//! - [`cli`]: Command-line flags
//! - [`config`]: rc file loading and startup resolution
//! - [`domain`]: Line model and errors
//! - [`filter`]: Matching strategies, registry, executor and debounce
//! - [`hub`]: Event bus between the loops
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: Logging to a rotating file
//! - [`ui`]: Terminal rendering with theme support
//! - [`worker`]: Reader, filter, watcher, signal and input loops
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/linesift/config.toml
//! query_execution_delay_ms = 50
//! initial_filter = "SmartCase"
//! theme = "linesift-light"
//!
//! [custom_filter.grep]
//! cmd = "grep"
//! args = ["$QUERY"]
//! buffer_threshold = 500
//! ```
//!
//! # Session Flow
//!
//! 1. **Startup** (`main.rs`):
//!    - Parse flags, load the rc file, initialize logging
//!    - Resolve filters and theme; failures abort before the terminal is used
//!
//! 2. **Ingestion**:
//!    - The reader loop appends lines to the store
//!    - The watcher loop turns appends into draw hints
//!
//! 3. **Filtering**:
//!    - Query edits arm the debounce timer
//!    - When it fires, the current query goes to the filter loop
//!    - The result replaces the active sequence and a redraw follows
//!
//! 4. **Exit**:
//!    - `Enter` stores the picked lines and broadcasts stop
//!    - Every loop returns, the terminal is restored, lines are printed
//!
//! # Examples
//!
//! ## Driving the coordinator without a terminal
//!
//! ```rust
//! use linesift::app::{Ctx, CtxOptions};
//! use linesift::buffer::LineBuffer;
//! use linesift::filter::FilterSet;
//! use linesift::worker::run_query;
//!
//! let ctx = Ctx::new(CtxOptions::default(), FilterSet::with_builtins());
//! for line in ["apple", "banana", "Apple Pie"] {
//!     ctx.add_raw_line(line);
//! }
//!
//! ctx.set_query("apple");
//! run_query(&ctx, "apple");
//! assert_eq!(ctx.current_line_buffer().size(), 2);
//! ```

pub mod app;
pub mod buffer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod filter;
pub mod hub;
pub mod infrastructure;
pub mod observability;
pub mod ui;
pub mod worker;

pub use app::{handle_event, run, Action, Ctx, CtxOptions, Event, InputSource, Session};
pub use config::Config;
pub use domain::{LinesiftError, Result};
pub use ui::{Layout, Theme};
pub use worker::Keymap;
