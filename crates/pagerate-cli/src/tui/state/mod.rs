//! App State Components

mod document;
mod layout;

pub use document::{DocumentLayout, LayoutLine, LineKind, PAGE_MARGIN, THUMB_DOWN, THUMB_UP};
pub use layout::{LayoutState, ThumbHit};
