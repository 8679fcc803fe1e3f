//! Scrollbar handling
//!
//! Clicking or dragging on the page scrollbar jumps to that position.

use std::time::Instant;

use crate::tui::app::App;

impl App {
    /// Jump to the offset under `y`. Returns true when `y` hit the track.
    pub fn handle_scrollbar_drag(&mut self, y: u16, now: Instant) -> bool {
        let Some(area) = self.layout.page_scrollbar_area else {
            return false;
        };
        if y < area.y || y >= area.y + area.height || area.height == 0 {
            return false;
        }

        let relative_y = (y - area.y) as f64;
        let ratio = relative_y / area.height.saturating_sub(1).max(1) as f64;
        let target = ratio.clamp(0.0, 1.0) * self.tracker.max_offset();
        self.tracker.scroll_by(target - self.tracker.offset(), now);
        true
    }
}
