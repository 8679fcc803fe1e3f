//! Rating surfaces
//!
//! Follows the usual popup layout: title + separator + content + footer,
//! rounded borders, theme-aware colors.

pub mod common;
pub mod feedback;
pub mod sidebar;
pub mod wizard;
