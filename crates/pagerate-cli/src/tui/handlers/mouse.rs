//! Mouse event handling
//!
//! Wheel snapping in the page pane and clicks on dots, thumbs, sidebar rows
//! and pills. Hit areas come from the last rendered frame.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::tui::app::App;

/// Rows reported per wheel notch
const WHEEL_DELTA: f64 = 3.0;

impl App {
    /// Handle mouse events for scrolling and clicking
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        let now = Instant::now();
        match mouse.kind {
            MouseEventKind::ScrollDown if self.layout.in_page_area(pos) => {
                self.tracker.on_wheel(WHEEL_DELTA, now);
            }
            MouseEventKind::ScrollUp if self.layout.in_page_area(pos) => {
                self.tracker.on_wheel(-WHEEL_DELTA, now);
            }
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(pos, now),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.handle_scrollbar_drag(pos.y, now);
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, pos: Position, now: Instant) {
        if let Some(hit) = self.layout.thumb_at(pos).cloned() {
            match hit.page_id {
                Some(page_id) => self.rate_page(&page_id, hit.rating),
                None => {
                    if let Err(e) = self.controller.select_overall(hit.rating) {
                        tracing::debug!("Ignored click: {}", e);
                    }
                }
            }
            return;
        }

        if let Some(index) = self.layout.pill_at(pos) {
            if let Err(e) = self.controller.toggle_quality_at(index) {
                tracing::debug!("Ignored click: {}", e);
            }
            return;
        }

        if let Some(index) = self
            .layout
            .dot_at(pos)
            .or_else(|| self.layout.sidebar_row_at(pos))
        {
            self.tracker.scroll_to_page(index, now);
            return;
        }

        self.handle_scrollbar_drag(pos.y, now);
    }
}
