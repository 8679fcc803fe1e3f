//! pagerate core - page visibility tracking and page rating flows
//!
//! This crate provides the pieces the `pagerate` viewer is built from:
//! - Document model and the built-in sample report
//! - Scroll tracking with debounced visibility and snap navigation
//! - Rating records, quality vocabularies and presentation modes
//! - The rating flow state machine
//! - Namespaced JSON storage over SQLite or memory

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod document;
pub mod paths;
pub mod rating;
pub mod scroll;
pub mod storage;

// Re-exports for convenience
pub use config::AppConfig;
pub use diagnostics::Diagnostic;
pub use document::{Document, Page};
pub use rating::{
    FlowState, PresentationMode, Rating, RatingFlowController, RatingRecord, RatingTarget,
};
pub use scroll::{PageSection, PageVisibility, ScrollTracker};
pub use storage::{Database, RatingStateStore};
