//! Dual-pane comparison viewer
//!
//! Two independently scrollable panes (original on the left, masked on the
//! right) separated by a draggable divider:
//! - Mouse drag on the divider or `<` `>` `=` to resize
//! - `c` or the header button copies the focused pane's raw text
//! - `s` / `1`..`9` switch sample scenarios

pub mod app;
pub mod event;
pub mod terminal;
pub mod text;
pub mod ui;

pub use app::{App, AppSettings, LoadTarget};
pub use terminal::run;
