//! Layout State - cached layout rectangles
//!
//! Updated each frame during rendering, used for mouse hit testing.

use ratatui::layout::{Position, Rect};

use pagerate_core::Rating;

/// A clickable thumb drawn somewhere on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbHit {
    pub area: Rect,
    /// `None` for the wizard's report-level thumbs
    pub page_id: Option<String>,
    pub rating: Rating,
}

#[derive(Debug, Default)]
pub struct LayoutState {
    /// Scrolling page pane
    pub page_area: Option<Rect>,
    /// Page pane scrollbar track
    pub page_scrollbar_area: Option<Rect>,
    /// Page indicator dots, with the page index each one jumps to
    pub dots: Vec<(Rect, usize)>,
    /// Thumbs drawn in the page pane and the sidebar
    pub thumbs: Vec<ThumbHit>,
    /// Sidebar page rows (click to navigate)
    pub sidebar_rows: Vec<(Rect, usize)>,
    /// Rating popup, wizard panel or sidebar module
    pub panel_area: Option<Rect>,
    /// Quality pills with their index in the visible vocabulary
    pub pills: Vec<(Rect, usize)>,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget per-frame hit areas before a redraw
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn dot_at(&self, pos: Position) -> Option<usize> {
        self.dots
            .iter()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, index)| *index)
    }

    pub fn thumb_at(&self, pos: Position) -> Option<&ThumbHit> {
        self.thumbs.iter().find(|hit| hit.area.contains(pos))
    }

    pub fn sidebar_row_at(&self, pos: Position) -> Option<usize> {
        self.sidebar_rows
            .iter()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, index)| *index)
    }

    pub fn pill_at(&self, pos: Position) -> Option<usize> {
        self.pills
            .iter()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, index)| *index)
    }

    pub fn in_page_area(&self, pos: Position) -> bool {
        self.page_area.is_some_and(|area| area.contains(pos))
    }
}
