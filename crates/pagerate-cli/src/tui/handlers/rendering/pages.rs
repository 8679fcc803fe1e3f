//! Page pane rendering
//!
//! Draws the visible rows of the document layout, the per-page thumb row,
//! the page dots and the scrollbar.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    Frame,
};

use pagerate_core::Rating;

use crate::tui::app::App;
use crate::tui::components::{render_page_indicator, render_page_scrollbar};
use crate::tui::state::{LineKind, ThumbHit, PAGE_MARGIN, THUMB_DOWN, THUMB_UP};
use crate::tui::themes::Theme;

/// Dot column plus scrollbar
const GUTTER_WIDTH: u16 = 3;

impl App {
    pub(super) fn render_pages(&mut self, f: &mut Frame, area: Rect) {
        let theme = self.theme;
        if area.width <= GUTTER_WIDTH || area.height == 0 {
            return;
        }
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(area);
        let (text_area, dots_area, scrollbar_area) = (chunks[0], chunks[1], chunks[2]);

        if self.viewport != (text_area.width, text_area.height) {
            self.relayout(text_area.width, text_area.height);
        }

        self.layout.page_area = Some(text_area);
        self.layout.page_scrollbar_area = Some(scrollbar_area);

        let offset = self.tracker.offset_rows();
        let x = text_area.x + PAGE_MARGIN as u16;
        let text_width = text_area.width.saturating_sub(PAGE_MARGIN as u16 * 2) as usize;

        let buf = f.buffer_mut();
        for y in text_area.y..text_area.y + text_area.height {
            for cx in text_area.x..text_area.x + text_area.width {
                if let Some(cell) = buf.cell_mut((cx, y)) {
                    cell.set_bg(theme.page_bg_color);
                }
            }
        }

        let lines = self.doc_layout.visible(offset, text_area.height as usize);
        for (row, line) in lines.iter().enumerate() {
            let y = text_area.y + row as u16;
            match line.kind {
                LineKind::Heading => {
                    buf.set_stringn(
                        x,
                        y,
                        &line.text,
                        text_width,
                        Style::default()
                            .fg(theme.title_color)
                            .add_modifier(Modifier::BOLD),
                    );
                }
                LineKind::Rule => {
                    buf.set_stringn(x, y, &line.text, text_width, Style::default().fg(theme.border_color));
                }
                LineKind::Body => {
                    buf.set_stringn(x, y, &line.text, text_width, Style::default().fg(theme.text_color));
                }
                LineKind::Blank => {}
                LineKind::Thumbs => {
                    let Some(page) = self.document.page(line.page_index) else {
                        continue;
                    };
                    let mark = self.controller.mark(&page.id);
                    buf.set_string(x, y, &line.text, Style::default().fg(theme.dim_color));
                    for (rating, (label, column)) in [(Rating::Up, THUMB_UP), (Rating::Down, THUMB_DOWN)] {
                        let thumb_x = x + column as u16;
                        let width = unicode_width::UnicodeWidthStr::width(label) as u16;
                        if thumb_x + width > text_area.x + text_area.width {
                            break;
                        }
                        draw_thumb(buf, thumb_x, y, label, rating, mark == Some(rating), theme);
                        self.layout.thumbs.push(ThumbHit {
                            area: Rect::new(thumb_x, y, width, 1),
                            page_id: Some(page.id.clone()),
                            rating,
                        });
                    }
                }
            }
        }

        let marks: Vec<Option<Rating>> = self
            .document
            .pages
            .iter()
            .map(|p| self.controller.mark(&p.id))
            .collect();
        render_page_indicator(
            f,
            dots_area,
            &marks,
            self.tracker.active_index(),
            theme,
            &mut self.layout,
        );
        render_page_scrollbar(
            f,
            scrollbar_area,
            offset,
            self.doc_layout.total_rows(),
            text_area.height as usize,
            theme,
        );
    }
}

fn draw_thumb(
    buf: &mut Buffer,
    x: u16,
    y: u16,
    label: &str,
    rating: Rating,
    selected: bool,
    theme: &Theme,
) {
    let color = if rating.is_positive() {
        theme.positive_color
    } else {
        theme.negative_color
    };
    let style = if selected {
        Style::default()
            .fg(theme.bg_color)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    buf.set_string(x, y, label, style);
}
