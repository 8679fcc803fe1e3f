//! Scrollbar rendering
//!
//! 1-char wide, filled track with a solid thumb: ░ (track) and █ (thumb).

use ratatui::{buffer::Buffer, layout::Rect, style::Color, Frame};

use crate::tui::themes::Theme;

pub fn render_scrollbar(
    buf: &mut Buffer,
    area: Rect,
    offset: usize,
    total: usize,
    visible: usize,
    thumb_color: Color,
    track_color: Color,
) {
    // Clear first so no stale glyphs remain when the bar disappears
    for y in 0..area.height {
        if let Some(cell) = buf.cell_mut((area.x, area.y + y)) {
            cell.set_char(' ');
            cell.set_fg(Color::Reset);
        }
    }

    if total <= visible || area.height == 0 {
        return;
    }

    let height = area.height as usize;

    // Thumb is at least 2 rows so it stays visible on long documents
    let thumb_size = ((visible as f32 / total as f32) * height as f32)
        .max(2.0)
        .min(height as f32)
        .round() as usize;

    let max_offset = total.saturating_sub(visible);
    let thumb_pos = if max_offset > 0 {
        ((offset.min(max_offset) as f32 / max_offset as f32)
            * (height.saturating_sub(thumb_size)) as f32)
            .round() as usize
    } else {
        0
    };

    for y in 0..height {
        let is_thumb = y >= thumb_pos && y < thumb_pos + thumb_size;
        let (ch, color) = if is_thumb {
            ('█', thumb_color)
        } else {
            ('░', track_color)
        };

        if let Some(cell) = buf.cell_mut((area.x, area.y + y as u16)) {
            cell.set_char(ch).set_fg(color);
        }
    }
}

/// Scrollbar for the page pane; offset 0 is the top of the document
pub fn render_page_scrollbar(
    f: &mut Frame,
    area: Rect,
    offset: usize,
    total_rows: usize,
    visible_rows: usize,
    theme: &Theme,
) {
    render_scrollbar(
        f.buffer_mut(),
        area,
        offset,
        total_rows,
        visible_rows,
        theme.accent_color,
        theme.scrollbar_bg_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(buf: &Buffer, x: u16, height: u16) -> String {
        (0..height)
            .map(|y| buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_no_bar_when_content_fits() {
        let area = Rect::new(0, 0, 1, 5);
        let mut buf = Buffer::empty(area);
        render_scrollbar(&mut buf, area, 0, 5, 10, Color::White, Color::Gray);
        assert_eq!(column(&buf, 0, 5), "     ");
    }

    #[test]
    fn test_thumb_at_bottom_when_scrolled_to_end() {
        let area = Rect::new(0, 0, 1, 10);
        let mut buf = Buffer::empty(area);
        render_scrollbar(&mut buf, area, 80, 100, 20, Color::White, Color::Gray);
        assert!(column(&buf, 0, 10).ends_with("██"));
    }
}
