//! Terminal user interface.
//!
//! The view loop is the only writer to the terminal. It turns bus hints into
//! frames:
//!
//! ```text
//! Ctx → ScreenModel::compute → ScreenModel → renderer::render → crossterm commands
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Snapshot of the coordinator for one frame
//! - [`renderer`]: Paints a snapshot with `crossterm`
//! - [`layout`]: Top-down and bottom-up screen arrangements
//! - [`helpers`]: Horizontal scroll, clipping and match highlighting
//! - [`theme`]: Color schemes and hex-to-terminal color conversion
//! - [`terminal`]: Raw mode, alternate screen and the tty writer
//! - [`view`]: The view loop

pub mod helpers;
pub mod layout;
pub mod renderer;
pub mod terminal;
pub mod theme;
pub mod view;
pub mod viewmodel;

pub use layout::Layout;
pub use renderer::{render, Size};
pub use terminal::{open_tty, TerminalGuard};
pub use theme::Theme;
pub use view::{view_loop, ViewStyle};
pub use viewmodel::{PromptLine, RowModel, ScreenModel};
