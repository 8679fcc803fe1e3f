//! Page visibility tracking and snap navigation

mod tracker;
mod visibility;

pub use tracker::ScrollTracker;
pub use visibility::{compute_visibility, PageSection, PageVisibility};
