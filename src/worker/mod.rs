//! Long-running loops driving a session.
//!
//! Each loop runs on its own thread, registered with the coordinator's join
//! counter via [`Ctx::spawn_loop`](crate::app::Ctx::spawn_loop), and includes
//! the bus's stop signal in every wait.
//!
//! - `reader`: ingests the input source into the line store
//! - `filter`: runs dispatched queries and swaps the active sequence
//! - `watcher`: turns store notifications into draw hints
//! - `signal`: turns SIGINT/SIGTERM into an exit with error
//! - `input`: reads terminal keys and runs the input handler
//! - `keymap`: default key bindings and rc-file overrides

pub mod filter;
pub mod input;
pub mod keymap;
pub mod reader;
pub mod signal;
pub mod watcher;

pub use filter::{filter_loop, run_query};
pub use input::input_loop;
pub use keymap::Keymap;
pub use reader::reader_loop;
pub use signal::signal_loop;
pub use watcher::watcher_loop;
