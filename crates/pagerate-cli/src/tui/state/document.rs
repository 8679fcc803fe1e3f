//! Document layout - pages wrapped into rows
//!
//! The layout is rebuilt whenever the pane width changes. Each page becomes a
//! block of rows (heading, rule, wrapped body, thumb row, gap) and one
//! [`PageSection`] for the scroll tracker.

use pagerate_core::{Document, PageSection};

use crate::tui::utils::wrap_text;

/// Left margin inside the page pane
pub const PAGE_MARGIN: usize = 2;

/// Label in front of the per-page thumbs
pub const THUMB_LABEL: &str = "Rate this page";

/// Thumb buttons as drawn, with their column offset from the margin
pub const THUMB_UP: (&str, usize) = ("▲ Up", THUMB_LABEL.len() + 3);
pub const THUMB_DOWN: (&str, usize) = ("▼ Down", THUMB_LABEL.len() + 10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Rule,
    Body,
    Blank,
    Thumbs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine {
    pub page_index: usize,
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    width: u16,
    lines: Vec<LayoutLine>,
    sections: Vec<PageSection>,
}

impl DocumentLayout {
    pub fn build(document: &Document, width: u16) -> Self {
        let text_width = (width as usize).saturating_sub(PAGE_MARGIN * 2).max(8);
        let total = document.len();
        let mut lines = Vec::new();
        let mut sections = Vec::with_capacity(total);

        for (index, page) in document.pages.iter().enumerate() {
            let start = lines.len();
            let mut push = |kind: LineKind, text: String| {
                lines.push(LayoutLine {
                    page_index: index,
                    kind,
                    text,
                })
            };

            push(
                LineKind::Heading,
                format!("Page {} of {} · {}", page.id, total, page.title),
            );
            push(LineKind::Rule, "─".repeat(text_width));
            push(LineKind::Blank, String::new());
            for row in wrap_text(&page.body, text_width) {
                let kind = if row.is_empty() {
                    LineKind::Blank
                } else {
                    LineKind::Body
                };
                push(kind, row);
            }
            push(LineKind::Blank, String::new());
            push(LineKind::Thumbs, THUMB_LABEL.to_string());
            push(LineKind::Blank, String::new());
            push(LineKind::Blank, String::new());

            sections.push(PageSection::new(
                page.id.clone(),
                start as f64,
                (lines.len() - start) as f64,
            ));
        }

        Self {
            width,
            lines,
            sections,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn lines(&self) -> &[LayoutLine] {
        &self.lines
    }

    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    pub fn total_rows(&self) -> usize {
        self.lines.len()
    }

    /// Rows visible from `offset` in a pane of `height` rows
    pub fn visible(&self, offset: usize, height: usize) -> &[LayoutLine] {
        let start = offset.min(self.lines.len());
        let end = (start + height).min(self.lines.len());
        &self.lines[start..end]
    }
}
