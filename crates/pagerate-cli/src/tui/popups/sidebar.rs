//! Inline rating sidebar
//!
//! A column to the right of the page pane listing every page with its thumbs
//! and the overall progress. Rating a page swaps the list for a detailed
//! feedback module until it is submitted or dismissed.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use pagerate_core::{Document, FlowState, Rating, RatingFlowController, RatingTarget};

use super::common::{render_comment_box, render_hint};
use crate::tui::app::PanelFocus;
use crate::tui::components::{pill_rows, render_pills};
use crate::tui::state::{LayoutState, ThumbHit};
use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

pub const SIDEBAR_WIDTH: u16 = 36;

const PROGRESS_BAR_WIDTH: u16 = 20;

#[allow(clippy::too_many_arguments)]
pub fn render(
    f: &mut Frame,
    area: Rect,
    controller: &RatingFlowController,
    document: &Document,
    active_page: Option<usize>,
    focus: PanelFocus,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.border_color))
        .style(Style::default().bg(theme.bg_color));
    let inner = block.inner(area);
    f.render_widget(block, area);
    layout.panel_area = Some(area);

    let content = Rect::new(
        inner.x + 1,
        inner.y + 1,
        inner.width.saturating_sub(2),
        inner.height.saturating_sub(1),
    );
    if content.height < 4 || content.width < 12 {
        return;
    }

    let header_rows = render_header(f, content, controller, document, theme);
    let body = Rect::new(
        content.x,
        content.y + header_rows,
        content.width,
        content.height.saturating_sub(header_rows),
    );

    match controller.state() {
        FlowState::CollectingQualities {
            target: RatingTarget::Page(page_id),
            rating,
        } => render_module(f, body, controller, document, page_id, *rating, focus, theme, layout),
        FlowState::Submitted { persisted, .. } => {
            let mut lines = vec![Line::from(Span::styled(
                controller.confirmation().unwrap_or_default(),
                Style::default()
                    .fg(theme.success_color)
                    .add_modifier(Modifier::BOLD),
            ))];
            if !persisted {
                lines.push(Line::from(Span::styled(
                    "Saved for this session only",
                    Style::default().fg(theme.warning_color),
                )));
            }
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);
            render_hint(
                f.buffer_mut(),
                Rect::new(body.x, body.y + body.height.saturating_sub(1), body.width, 1),
                "Esc close",
                theme,
            );
        }
        _ => render_page_list(f, body, controller, document, active_page, theme, layout),
    }
}

/// Title, progress text and bar. Returns rows used.
fn render_header(
    f: &mut Frame,
    area: Rect,
    controller: &RatingFlowController,
    document: &Document,
    theme: &Theme,
) -> u16 {
    let progress = controller.progress(document.len());
    let filled = if progress.total == 0 {
        0
    } else {
        (progress.rated as u16 * PROGRESS_BAR_WIDTH) / progress.total as u16
    };
    let bar_width = PROGRESS_BAR_WIDTH.min(area.width);
    let filled = filled.min(bar_width);

    let lines = vec![
        Line::from(Span::styled(
            "Rate pages",
            Style::default()
                .fg(theme.title_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            progress.to_string(),
            Style::default().fg(theme.dim_color),
        )),
        Line::from(vec![
            Span::styled(
                "█".repeat(filled as usize),
                Style::default().fg(theme.accent_color),
            ),
            Span::styled(
                "░".repeat((bar_width - filled) as usize),
                Style::default().fg(theme.scrollbar_bg_color),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), Rect::new(area.x, area.y, area.width, 3));
    4
}

fn render_page_list(
    f: &mut Frame,
    area: Rect,
    controller: &RatingFlowController,
    document: &Document,
    active_page: Option<usize>,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    // Title on the left, "▲ ▼" on the right
    let thumbs_width = 4;
    let title_width = area.width.saturating_sub(thumbs_width + 1) as usize;
    let bottom = area.y + area.height;

    let buf = f.buffer_mut();
    for (index, page) in document.pages.iter().enumerate() {
        let y = area.y + index as u16;
        if y >= bottom {
            break;
        }
        let is_active = active_page == Some(index);
        let marker = if is_active { "› " } else { "  " };
        let label = truncate_ellipsis(
            &format!("{}{}. {}", marker, page.id, page.title),
            title_width,
        );
        let style = if is_active {
            Style::default()
                .fg(theme.accent_color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_color)
        };
        buf.set_string(area.x, y, &label, style);
        layout
            .sidebar_rows
            .push((Rect::new(area.x, y, title_width as u16, 1), index));

        let mark = controller.mark(&page.id);
        let thumbs_x = area.x + area.width.saturating_sub(thumbs_width);
        for (offset, rating, glyph, color) in [
            (0, Rating::Up, "▲", theme.positive_color),
            (2, Rating::Down, "▼", theme.negative_color),
        ] {
            let style = if mark == Some(rating) {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim_color)
            };
            let x = thumbs_x + offset;
            buf.set_string(x, y, glyph, style);
            layout.thumbs.push(ThumbHit {
                area: Rect::new(x, y, 1, 1),
                page_id: Some(page.id.clone()),
                rating,
            });
        }
    }

    render_hint(
        buf,
        Rect::new(area.x, bottom.saturating_sub(1), area.width, 1),
        "u/d rate the page in view",
        theme,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_module(
    f: &mut Frame,
    area: Rect,
    controller: &RatingFlowController,
    document: &Document,
    page_id: &str,
    rating: Rating,
    focus: PanelFocus,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    let (Some(prompt), Some(selection)) = (controller.prompt(), controller.selection()) else {
        return;
    };
    let bottom = area.y + area.height;
    let mut y = area.y;

    let page_title = document
        .index_of(page_id)
        .and_then(|i| document.page(i))
        .map(|p| p.title.as_str())
        .unwrap_or("");
    let header = vec![
        Line::from(Span::styled(
            truncate_ellipsis(&format!("Page {} · {}", page_id, page_title), area.width as usize),
            Style::default().fg(theme.dim_color),
        )),
        Line::from(Span::styled(
            prompt.title,
            Style::default()
                .fg(theme.text_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            prompt.subtitle,
            Style::default().fg(theme.dim_color),
        )),
    ];
    f.render_widget(
        Paragraph::new(header).wrap(Wrap { trim: true }),
        Rect::new(area.x, y, area.width, 3.min(area.height)),
    );
    y += 4;

    let rows = pill_rows(selection, area.width);
    if y + rows <= bottom {
        render_pills(
            f.buffer_mut(),
            Rect::new(area.x, y, area.width, rows),
            selection,
            rating,
            theme,
            layout,
        );
        y += rows + 1;
    }

    if y + 3 < bottom {
        render_comment_box(
            f,
            Rect::new(area.x, y, area.width, bottom - y - 1),
            "Details",
            controller.comment(),
            focus == PanelFocus::Comment,
            theme,
        );
    }

    render_hint(
        f.buffer_mut(),
        Rect::new(area.x, bottom.saturating_sub(1), area.width, 1),
        "↵ submit · s skip · Esc back",
        theme,
    );
}
