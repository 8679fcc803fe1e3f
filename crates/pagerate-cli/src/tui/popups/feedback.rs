//! Popup rating form
//!
//! Opens over the page pane when a page is rated in popup mode and turns into
//! a short confirmation after submit.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use pagerate_core::{Document, FlowState, Rating, RatingFlowController, RatingTarget};

use super::common::{heading, inset, open_popup, render_comment_box, render_hint, PopupSize};
use crate::tui::app::PanelFocus;
use crate::tui::components::{pill_rows, render_pills};
use crate::tui::state::LayoutState;
use crate::tui::themes::Theme;

pub fn render(
    f: &mut Frame,
    area: Rect,
    controller: &RatingFlowController,
    document: &Document,
    focus: PanelFocus,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    match controller.state() {
        FlowState::CollectingQualities {
            target: RatingTarget::Page(page_id),
            rating,
        } => render_form(
            f, area, controller, document, page_id, *rating, focus, theme, layout,
        ),
        FlowState::Submitted { persisted, .. } => {
            let message = controller.confirmation().unwrap_or_default();
            render_confirmation(f, area, &message, *persisted, theme, layout);
        }
        _ => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn render_form(
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
    let popup = open_popup(f, area, PopupSize::Form, theme);
    layout.panel_area = Some(popup.outer);

    let content = inset(popup.inner, 2);
    let mut y = content.y;
    let bottom = content.y + content.height;

    let mut header = heading(prompt.title, theme);
    header.push(Line::from(Span::styled(
        prompt.subtitle,
        Style::default().fg(theme.dim_color),
    )));
    let page_title = document
        .index_of(page_id)
        .and_then(|i| document.page(i))
        .map(|p| p.title.as_str())
        .unwrap_or("");
    header.push(Line::from(Span::styled(
        format!("Page {} · {}", page_id, page_title),
        Style::default().fg(theme.dim_color),
    )));
    let header_height = header.len() as u16;
    f.render_widget(
        Paragraph::new(header).alignment(Alignment::Center),
        Rect::new(content.x, y, content.width, header_height.min(bottom - y)),
    );
    y += header_height + 1;

    let rows = pill_rows(selection, content.width);
    if y + rows <= bottom {
        render_pills(
            f.buffer_mut(),
            Rect::new(content.x, y, content.width, rows),
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
            Rect::new(content.x, y, content.width, bottom - y - 1),
            "Additional comments",
            controller.comment(),
            focus == PanelFocus::Comment,
            theme,
        );
    }

    render_hint(
        f.buffer_mut(),
        Rect::new(content.x, bottom.saturating_sub(1), content.width, 1),
        "↵ submit · s skip · Tab comment · Esc cancel",
        theme,
    );
}

fn render_confirmation(
    f: &mut Frame,
    area: Rect,
    message: &str,
    persisted: bool,
    theme: &Theme,
    layout: &mut LayoutState,
) {
    let popup = open_popup(f, area, PopupSize::Confirmation, theme);
    layout.panel_area = Some(popup.outer);

    let mut lines = heading("Thank you!", theme);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(theme.success_color),
    )));
    if !persisted {
        lines.push(Line::from(Span::styled(
            "Saved for this session only",
            Style::default().fg(theme.warning_color),
        )));
    }

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), popup.inner);
}
