//! Application layer coordinating state, events, and actions.
//!
//! This module holds the shared state coordinator and everything that mutates
//! it: query editing, selection, cursor paging, the lifecycle join counter,
//! and the input handler. It sits between the runtime loops (`worker`, `ui`)
//! and the domain/filter/buffer layers.
//!
//! # Architecture
//!
//! ```text
//! Key → Event → handle_event → Ctx accessors → Actions → Hub → view / filter loops
//!                                   ↑                               │
//!                                   └──────── filter results ───────┘
//! ```
//!
//! # Modules
//!
//! - [`ctx`]: The shared coordinator with per-concern locks
//! - [`query`]: Query text and caret editing
//! - [`selection`]: Selected lines and the range-mode anchor
//! - [`page`]: Cursor row/column and page geometry
//! - [`lifecycle`]: Join counter and terminal-error slot
//! - [`handler`]: Input events and their state transitions
//! - [`actions`]: Side effects returned by the handler
//! - [`runner`]: Wires the loops together for one session

pub mod actions;
pub mod ctx;
pub mod handler;
pub mod lifecycle;
pub mod page;
pub mod query;
pub mod runner;
pub mod selection;

pub use actions::{execute_actions, Action};
pub use ctx::{Ctx, CtxOptions, DEFAULT_PROMPT, DEFAULT_QUERY_EXECUTION_DELAY};
pub use handler::{handle_event, Event};
pub use lifecycle::{JoinToken, Lifecycle, LifecycleState};
pub use page::{Cursor, PageInfo};
pub use query::QueryState;
pub use runner::{run, InputSource, Session};
pub use selection::Selection;
