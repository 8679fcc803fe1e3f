//! Page indicator dots
//!
//! A vertical column of dots at the right edge of the page pane: the active
//! page is filled, rated pages are tinted by their thumb. Clicking a dot
//! jumps to its page.

use ratatui::{layout::Rect, style::Style, Frame};

use pagerate_core::Rating;

use crate::tui::state::LayoutState;
use crate::tui::themes::Theme;

pub fn render_page_indicator(
    f: &mut Frame,
    area: Rect,
    marks: &[Option<Rating>],
    active: Option<usize>,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    let total = marks.len() as u16;
    if total == 0 || area.height == 0 || area.width == 0 {
        return;
    }

    // Dots are spaced one row apart when there is room
    let spacing = if total * 2 <= area.height { 2 } else { 1 };
    let used = (total - 1) * spacing + 1;
    let top = area.y + area.height.saturating_sub(used) / 2;

    let buf = f.buffer_mut();
    for (index, mark) in marks.iter().enumerate() {
        let y = top + index as u16 * spacing;
        if y >= area.y + area.height {
            break;
        }
        let is_active = active == Some(index);
        let symbol = if is_active { "●" } else { "○" };
        let color = match mark {
            Some(Rating::Up) => theme.positive_color,
            Some(Rating::Down) => theme.negative_color,
            None if is_active => theme.accent_color,
            None => theme.dim_color,
        };

        buf.set_string(area.x, y, symbol, Style::default().fg(color));
        layout.dots.push((Rect::new(area.x, y, 1, 1), index));
    }
}
