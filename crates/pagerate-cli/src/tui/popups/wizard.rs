//! Wizard panel
//!
//! Docked under the page pane. Step one rates the whole report, step two
//! collects optional per-page ratings while the reader scrolls.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pagerate_core::rating::QualitySelection;
use pagerate_core::{Document, FlowState, Rating, RatingFlowController, RatingTarget};

use super::common::{inset, render_comment_box, render_hint};
use crate::tui::app::PanelFocus;
use crate::tui::components::{pill_rows, render_pills};
use crate::tui::state::{LayoutState, ThumbHit};
use crate::tui::themes::Theme;

/// Rows the panel wants for the current state, or 0 when hidden
pub fn panel_height(controller: &RatingFlowController, width: u16) -> u16 {
    let inner_width = width.saturating_sub(4);
    let pills = |selection: Option<&QualitySelection>| {
        selection.map(|s| pill_rows(s, inner_width) + 1).unwrap_or(2)
    };
    match controller.state() {
        FlowState::Idle => 0,
        FlowState::CollectingRating => 7,
        FlowState::CollectingQualities { .. } => 10 + pills(controller.selection()) + 4,
        FlowState::CollectingPageRatings => 9 + pills(controller.selection()) + 4,
        FlowState::Submitted { .. } => 6,
    }
}

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
    if area.height < 3 {
        return;
    }
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border_color))
        .style(Style::default().bg(theme.bg_color));
    let inner = block.inner(area);
    f.render_widget(block, area);
    layout.panel_area = Some(area);

    let content = inset(inner, 2);
    match controller.state() {
        FlowState::CollectingRating => render_step_one(f, content, controller, None, focus, theme, layout),
        FlowState::CollectingQualities {
            target: RatingTarget::Report,
            rating,
        } => render_step_one(f, content, controller, Some(*rating), focus, theme, layout),
        FlowState::CollectingPageRatings => {
            render_step_two(f, content, controller, document, active_page, focus, theme, layout)
        }
        FlowState::Submitted { persisted, .. } => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    controller.confirmation().unwrap_or_default(),
                    Style::default()
                        .fg(theme.success_color)
                        .add_modifier(Modifier::BOLD),
                )),
            ];
            if !persisted {
                lines.push(Line::from(Span::styled(
                    "Saved for this session only",
                    Style::default().fg(theme.warning_color),
                )));
            }
            f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), content);
        }
        _ => {}
    }
}

fn step_header(step: u8, title: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("Step {} of 2  ", step),
            Style::default().fg(theme.dim_color),
        ),
        Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.title_color)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Draw "▲ Up  ▼ Down" thumbs, highlighting `selected`
fn render_thumbs(
    buf: &mut Buffer,
    x: u16,
    y: u16,
    page_id: Option<&str>,
    selected: Option<Rating>,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    let mut cx = x;
    for (rating, label) in [(Rating::Up, " ▲ Up (u) "), (Rating::Down, " ▼ Down (d) ")] {
        let color = if rating.is_positive() {
            theme.positive_color
        } else {
            theme.negative_color
        };
        let style = if selected == Some(rating) {
            Style::default()
                .bg(color)
                .fg(theme.bg_color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).bg(theme.border_color)
        };
        let width = unicode_width::UnicodeWidthStr::width(label) as u16;
        buf.set_string(cx, y, label, style);
        layout.thumbs.push(ThumbHit {
            area: Rect::new(cx, y, width, 1),
            page_id: page_id.map(str::to_string),
            rating,
        });
        cx += width + 2;
    }
}

#[allow(clippy::too_many_arguments)]
fn render_step_one(
    f: &mut Frame,
    area: Rect,
    controller: &RatingFlowController,
    rating: Option<Rating>,
    focus: PanelFocus,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    let bottom = area.y + area.height;
    let mut y = area.y;

    f.render_widget(
        Paragraph::new(vec![
            step_header(1, "Rate this report", theme),
            Line::from(Span::styled(
                "How useful was this report overall?",
                Style::default().fg(theme.dim_color),
            )),
        ]),
        Rect::new(area.x, y, area.width, 2.min(area.height)),
    );
    y += 3;
    if y >= bottom {
        return;
    }

    render_thumbs(f.buffer_mut(), area.x, y, None, rating, theme, layout);
    y += 2;

    let (Some(rating), Some(prompt), Some(selection)) =
        (rating, controller.prompt(), controller.selection())
    else {
        render_hint(
            f.buffer_mut(),
            Rect::new(area.x, bottom.saturating_sub(1), area.width, 1),
            "u/d rate · Esc cancel",
            theme,
        );
        return;
    };

    if y + 2 <= bottom {
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(prompt.title, Style::default().fg(theme.text_color)),
                Span::styled(
                    format!("  {}", prompt.subtitle),
                    Style::default().fg(theme.dim_color),
                ),
            ])),
            Rect::new(area.x, y, area.width, 1),
        );
        y += 2;
    }

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
            "Comments",
            controller.comment(),
            focus == PanelFocus::Comment,
            theme,
        );
    }

    render_hint(
        f.buffer_mut(),
        Rect::new(area.x, bottom.saturating_sub(1), area.width, 1),
        "↵ next · Tab comment · Esc cancel",
        theme,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_step_two(
    f: &mut Frame,
    area: Rect,
    controller: &RatingFlowController,
    document: &Document,
    active_page: Option<usize>,
    focus: PanelFocus,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    let bottom = area.y + area.height;
    let mut y = area.y;

    let mut subtitle = Vec::new();
    if let Some(overall) = controller.overall_rating() {
        let (glyph, color) = match overall {
            Rating::Up => ("▲", theme.positive_color),
            Rating::Down => ("▼", theme.negative_color),
        };
        subtitle.push(Span::styled("Report ", Style::default().fg(theme.dim_color)));
        subtitle.push(Span::styled(glyph, Style::default().fg(color)));
        subtitle.push(Span::styled(" · ", Style::default().fg(theme.dim_color)));
    }
    subtitle.push(Span::styled(
        "Scroll to a page and press u or d",
        Style::default().fg(theme.dim_color),
    ));
    f.render_widget(
        Paragraph::new(vec![
            step_header(2, "Rate individual pages (optional)", theme),
            Line::from(subtitle),
        ]),
        Rect::new(area.x, y, area.width, 2.min(area.height)),
    );
    y += 3;
    if y >= bottom {
        return;
    }

    // One chip per page: number plus its thumb, the page in view underlined
    let mut spans = Vec::new();
    for (index, page) in document.pages.iter().enumerate() {
        let (glyph, color) = match controller.mark(&page.id) {
            Some(Rating::Up) => ("▲", theme.positive_color),
            Some(Rating::Down) => ("▼", theme.negative_color),
            None => ("·", theme.dim_color),
        };
        let mut style = Style::default().fg(color);
        if active_page == Some(index) {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!("{} {}", page.id, glyph), style));
        spans.push(Span::raw("   "));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(area.x, y, area.width, 1),
    );
    y += 2;

    if let Some((page_id, page)) = controller.focused_page_draft() {
        let label = format!("Page {}:", page_id);
        f.buffer_mut().set_string(
            area.x,
            y,
            &label,
            Style::default().fg(theme.text_color),
        );
        y += 1;
        let rows = pill_rows(&page.selection, area.width);
        if y + rows <= bottom {
            render_pills(
                f.buffer_mut(),
                Rect::new(area.x, y, area.width, rows),
                &page.selection,
                page.rating,
                theme,
                layout,
            );
            y += rows + 1;
        }
    } else {
        y += 2;
    }

    if y + 3 < bottom {
        render_comment_box(
            f,
            Rect::new(area.x, y, area.width, bottom - y - 1),
            "Comments about specific pages",
            controller.comment(),
            focus == PanelFocus::Comment,
            theme,
        );
    }

    render_hint(
        f.buffer_mut(),
        Rect::new(area.x, bottom.saturating_sub(1), area.width, 1),
        "↵ submit · Tab comment · Esc skip",
        theme,
    );
}
