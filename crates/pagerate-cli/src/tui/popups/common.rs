//! Pieces shared by the rating popup, the wizard and the sidebar

use ratatui::{
    buffer::Buffer,
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupSize {
    /// "Thank you" card
    Confirmation,
    /// Quality pills plus comment box
    Form,
}

impl PopupSize {
    /// Columns x rows, borders included
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            PopupSize::Confirmation => (46, 9),
            PopupSize::Form => (64, 22),
        }
    }
}

/// Where a popup landed: the bordered card and the space inside its border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupFrame {
    pub outer: Rect,
    pub inner: Rect,
}

/// Centered card of `size`, shrunk so a margin of page stays visible
pub fn popup_rect(size: PopupSize, area: Rect) -> Rect {
    let (width, height) = size.dimensions();
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Blank out the page under the card and draw its rounded border
pub fn open_popup(f: &mut Frame, area: Rect, size: PopupSize, theme: &Theme) -> PopupFrame {
    let outer = popup_rect(size, area);
    let card = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_color))
        .style(Style::default().bg(theme.bg_color));
    let inner = card.inner(outer);

    f.render_widget(Clear, outer);
    f.render_widget(card, outer);
    PopupFrame { outer, inner }
}

/// Blank line, bold title, then a rule at least as wide as the title
pub fn heading(title: &str, theme: &Theme) -> Vec<Line<'static>> {
    let rule = "─".repeat(title.width().max(16));
    vec![
        Line::default(),
        Line::styled(
            title.to_string(),
            Style::default()
                .fg(theme.title_color)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(rule, Style::default().fg(theme.border_color)),
    ]
}

/// `area` minus `columns` on the left and right
pub fn inset(area: Rect, columns: u16) -> Rect {
    area.inner(Margin::new(columns, 0))
}

/// Free-text comment field, at most four rows tall. Returns rows used.
pub fn render_comment_box(
    f: &mut Frame,
    area: Rect,
    label: &str,
    text: &str,
    focused: bool,
    theme: &Theme,
) -> u16 {
    if area.height < 3 {
        return 0;
    }
    let frame_color = if focused {
        theme.accent_color
    } else {
        theme.border_color
    };
    let dim = Style::default().fg(theme.dim_color);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(frame_color))
        .title(Line::styled(format!(" {} ", label), dim));
    if !text.is_empty() {
        let count = format!(" {} ", text.chars().count());
        block = block.title(Line::styled(count, dim).right_aligned());
    }

    let body = match (text.is_empty(), focused) {
        (true, false) => Line::styled("Tab to add a comment (optional)", dim),
        (_, true) => Line::from(vec![
            Span::styled(text.to_string(), Style::default().fg(theme.text_color)),
            Span::styled("▏", Style::default().fg(theme.accent_color)),
        ]),
        (false, false) => Line::styled(text.to_string(), Style::default().fg(theme.text_color)),
    };

    let rows = area.height.min(4);
    f.render_widget(
        Paragraph::new(body).block(block).wrap(Wrap { trim: false }),
        Rect { height: rows, ..area },
    );
    rows
}

/// One dim line of key hints, centered in `area`
pub fn render_hint(buf: &mut Buffer, area: Rect, text: &str, theme: &Theme) {
    if area.is_empty() {
        return;
    }
    let hint = truncate_ellipsis(text, area.width as usize);
    let left = area.width.saturating_sub(hint.width() as u16) / 2;
    buf.set_string(area.x + left, area.y, hint, Style::default().fg(theme.dim_color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::themes::THEME_REGISTRY;

    #[test]
    fn test_popup_is_centered_with_page_margin() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = popup_rect(PopupSize::Form, area);
        assert_eq!(rect, Rect::new(18, 9, 64, 22));

        // A short terminal keeps one row of page above and below
        let small = Rect::new(0, 0, 50, 12);
        let rect = popup_rect(PopupSize::Form, small);
        assert_eq!((rect.width, rect.height), (46, 10));
        assert_eq!((rect.x, rect.y), (2, 1));
    }

    #[test]
    fn test_heading_rule_covers_title() {
        let theme = THEME_REGISTRY.get_or_default("");
        let lines = heading("How was this page overall?", theme);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].width(), "How was this page overall?".len());

        let short = heading("Thanks", theme);
        assert_eq!(short[2].width(), 16);
    }

    #[test]
    fn test_inset_trims_columns_only() {
        let area = Rect::new(10, 5, 40, 8);
        assert_eq!(inset(area, 2), Rect::new(12, 5, 36, 8));
    }

    #[test]
    fn test_hint_is_centered() {
        let theme = THEME_REGISTRY.get_or_default("");
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);

        render_hint(&mut buf, area, "Esc close", theme);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert_eq!(row, "     Esc close      ");
    }
}
