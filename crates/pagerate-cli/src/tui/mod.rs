//! Terminal user interface for the pagerate viewer

pub mod app;
pub mod components;
pub mod handlers;
pub mod popups;
pub mod state;
pub mod themes;
pub mod utils;

// Re-exports
pub use app::App;
