//! Event handlers and rendering for [`App`](crate::tui::app::App)
//!
//! Each file adds an `impl App` block for one concern.

mod keyboard;
mod mouse;
mod rendering;
mod scrollbar;
mod themes;
