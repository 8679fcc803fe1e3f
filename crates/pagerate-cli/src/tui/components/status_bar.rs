//! Status bar component - bottom bar with document, mode, page and shortcuts

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use pagerate_core::rating::Progress;
use pagerate_core::{FlowState, PresentationMode};

use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

/// What the status bar shows
pub struct StatusInfo<'a> {
    pub title: &'a str,
    pub mode: PresentationMode,
    pub page: Option<(usize, usize)>,
    pub progress: Option<Progress>,
    pub state: &'a FlowState,
    /// Ratings are being kept in memory after a storage failure
    pub degraded: bool,
}

pub fn render_status_bar(f: &mut Frame, area: Rect, theme: &Theme, info: &StatusInfo<'_>) {
    let bg = Paragraph::new("").style(Style::default().bg(theme.status_bar_bg_color));
    f.render_widget(bg, area);

    let title = truncate_ellipsis(info.title, 28);
    let sep = || Span::styled(" │ ", Style::default().fg(theme.dim_color));

    let mut left_spans = vec![
        Span::raw(" "),
        Span::styled(title.clone(), Style::default().fg(theme.text_color)),
        sep(),
        Span::styled(info.mode.as_str(), Style::default().fg(theme.accent_color)),
    ];
    let mut left_width = 1 + title.width() + 3 + info.mode.as_str().width();

    if let Some((current, total)) = info.page {
        let text = format!("page {}/{}", current, total);
        left_width += 3 + text.width();
        left_spans.push(sep());
        left_spans.push(Span::styled(text, Style::default().fg(theme.dim_color)));
    }

    if let Some(progress) = info.progress {
        let text = progress.to_string();
        left_width += 3 + text.width();
        left_spans.push(sep());
        left_spans.push(Span::styled(text, Style::default().fg(theme.dim_color)));
    }

    if info.degraded {
        let text = "unsaved";
        left_width += 3 + text.width();
        left_spans.push(sep());
        left_spans.push(Span::styled(text, Style::default().fg(theme.warning_color)));
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(left_width as u16), Constraint::Fill(1)])
        .split(area);

    f.render_widget(Paragraph::new(Line::from(left_spans)), chunks[0]);

    let commands = commands_for(info.mode, info.state);
    let spans = build_commands_for_width(&commands, chunks[1].width as usize, theme);
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        chunks[1],
    );
}

/// Shortcuts for the current state, highest priority first
fn commands_for(mode: PresentationMode, state: &FlowState) -> Vec<(&'static str, &'static str)> {
    match state {
        FlowState::Idle => {
            let mut commands = vec![(" q ", "quit "), (" u/d ", "rate page ")];
            if mode == PresentationMode::Wizard {
                commands.push((" r ", "rate report "));
            }
            commands.push((" ↑↓ ", "pages "));
            commands.push((" j/k ", "scroll "));
            commands.push((" t ", "theme "));
            commands
        }
        FlowState::CollectingRating => vec![(" Esc ", "cancel "), (" u/d ", "rate report ")],
        FlowState::CollectingQualities { .. } => vec![
            (" ↵ ", "submit "),
            (" Esc ", "cancel "),
            (" 1-9 ", "toggle "),
            (" Tab ", "comment "),
            (" s ", "skip "),
        ],
        FlowState::CollectingPageRatings => vec![
            (" ↵ ", "submit "),
            (" Esc ", "skip "),
            (" u/d ", "rate page "),
            (" 1-9 ", "toggle "),
            (" Tab ", "comment "),
        ],
        FlowState::Submitted { .. } => vec![(" Esc ", "close "), (" q ", "quit ")],
    }
}

/// Build command spans that fit in `width`, dropping lowest priority first
fn build_commands_for_width<'a>(
    commands: &[(&'a str, &'a str)],
    width: usize,
    theme: &Theme,
) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut used_width = 0;

    for &(key, desc) in commands {
        let cmd_width = key.width() + desc.width() + 1;
        if used_width + cmd_width > width {
            break;
        }
        spans.push(Span::styled(
            key,
            Style::default().bg(theme.border_color).fg(theme.text_color),
        ));
        spans.push(Span::styled(desc, Style::default().fg(theme.dim_color)));
        spans.push(Span::raw(" "));
        used_width += cmd_width;
    }

    spans
}
