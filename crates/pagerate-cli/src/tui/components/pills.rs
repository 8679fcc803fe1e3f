//! Quality pill grid shared by the popup, wizard and sidebar

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use pagerate_core::rating::QualitySelection;
use pagerate_core::Rating;

use crate::tui::state::LayoutState;
use crate::tui::themes::Theme;

/// Label drawn for pill `index`; the first nine get a number key
pub fn pill_label(index: usize, tag: &str) -> String {
    if index < 9 {
        format!(" {} {} ", index + 1, tag)
    } else {
        format!(" {} ", tag)
    }
}

/// Flow pills left to right, wrapping at the area edge. Returns rows used.
pub fn render_pills(
    buf: &mut Buffer,
    area: Rect,
    selection: &QualitySelection,
    rating: Rating,
    theme: &Theme,
    layout: &mut LayoutState,
) -> u16 {
    if area.width == 0 || area.height == 0 {
        return 0;
    }

    let selected_color = if rating.is_positive() {
        theme.positive_color
    } else {
        theme.negative_color
    };

    let mut x = area.x;
    let mut y = area.y;
    for (index, tag) in selection.vocabulary().tags().iter().enumerate() {
        let label = pill_label(index, tag);
        let width = (label.width() as u16).min(area.width);

        if x > area.x && x + width > area.x + area.width {
            x = area.x;
            y += 2;
        }
        if y >= area.y + area.height {
            break;
        }

        let style = if selection.is_index_selected(index) {
            Style::default()
                .bg(selected_color)
                .fg(theme.bg_color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(theme.border_color).fg(theme.text_color)
        };

        buf.set_stringn(x, y, &label, width as usize, style);
        layout.pills.push((Rect::new(x, y, width, 1), index));
        x += width + 1;
    }

    y - area.y + 1
}

/// Rows needed to draw every pill at `width`
pub fn pill_rows(selection: &QualitySelection, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let mut x = 0u16;
    let mut rows = 1u16;
    for (index, tag) in selection.vocabulary().tags().iter().enumerate() {
        let w = (pill_label(index, tag).width() as u16).min(width);
        if x > 0 && x + w > width {
            x = 0;
            rows += 2;
        }
        x += w + 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagerate_core::rating::{Vocabulary, VocabularyScope};

    #[test]
    fn test_labels_number_first_nine() {
        assert_eq!(pill_label(0, "Clear"), " 1 Clear ");
        assert_eq!(pill_label(9, "Tenth"), " Tenth ");
    }

    #[test]
    fn test_pills_wrap_and_register_hit_areas() {
        let theme = crate::tui::themes::THEME_REGISTRY.get_or_default("pagerate");
        let selection = QualitySelection::new(VocabularyScope::Report.vocabulary(Rating::Up));
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let mut layout = LayoutState::new();

        let rows = render_pills(&mut buf, area, &selection, Rating::Up, theme, &mut layout);

        assert_eq!(layout.pills.len(), 8);
        assert_eq!(rows, pill_rows(&selection, 40));
        assert!(rows > 1);
    }

    #[test]
    fn test_single_row_when_wide() {
        let selection = QualitySelection::new(Vocabulary::new(&["A", "B"]));
        assert_eq!(pill_rows(&selection, 80), 1);
    }
}
