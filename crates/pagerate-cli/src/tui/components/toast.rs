//! Toast notifications
//!
//! Short messages stacked over the top-right of the page pane for storage
//! warnings, mode hints and confirmations that have no panel of their own.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

const MAX_TOASTS: usize = 3;

const LIFETIME: Duration = Duration::from_secs(4);

/// Preferred card width; narrower panes shrink it down to `MIN_WIDTH`
const CARD_WIDTH: u16 = 45;
const MIN_WIDTH: u16 = 20;

/// Border, message row, border
const CARD_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    /// Unsaved ratings and other recoverable store problems
    Warning,
}

impl Tone {
    fn accent(self, theme: &Theme) -> Color {
        match self {
            Tone::Success => theme.success_color,
            Tone::Info => theme.accent_color,
            Tone::Warning => theme.warning_color,
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Info => "i",
            Tone::Warning => "!",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub tone: Tone,
    pub shown_at: Instant,
    pub lifetime: Duration,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_tone(Tone::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_tone(Tone::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_tone(Tone::Warning, message)
    }

    fn with_tone(tone: Tone, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone,
            shown_at: Instant::now(),
            lifetime: LIFETIME,
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.lifetime
    }

    /// Share of the lifetime still left at `now`, 1.0 down to 0.0
    fn remaining_at(&self, now: Instant) -> f32 {
        let spent = now.saturating_duration_since(self.shown_at).as_secs_f32();
        (1.0 - spent / self.lifetime.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Oldest first; at most `MAX_TOASTS` entries
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A message already on screen restarts its countdown instead of stacking
    pub fn push(&mut self, toast: Toast) {
        if let Some(existing) = self.toasts.iter_mut().find(|t| t.message == toast.message) {
            existing.shown_at = toast.shown_at;
            return;
        }
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(toast);
    }

    /// Drop expired toasts. True when something disappeared.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired_at(now));
        self.toasts.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Newest first
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().rev()
    }
}

/// Stack toasts down the right edge of `area`, newest on top
pub fn render_toasts(buf: &mut Buffer, area: Rect, queue: &ToastQueue, theme: &Theme) {
    let width = CARD_WIDTH.min(area.width.saturating_sub(2));
    if queue.is_empty() || width < MIN_WIDTH {
        return;
    }

    let now = Instant::now();
    let x = area.right().saturating_sub(width + 1);
    let mut y = area.y + 1;
    for toast in queue.visible() {
        if y + CARD_HEIGHT > area.bottom() {
            break;
        }
        draw_card(buf, Rect::new(x, y, width, CARD_HEIGHT), toast, now, theme);
        y += CARD_HEIGHT;
    }
}

fn draw_card(buf: &mut Buffer, card: Rect, toast: &Toast, now: Instant, theme: &Theme) {
    let accent = toast.tone.accent(theme);

    Clear.render(card, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(theme.bg_color));
    let inner = block.inner(card);
    block.render(card, buf);

    // Glyph, a space and the message, inset one column each side
    let room = inner.width.saturating_sub(4) as usize;
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(toast.tone.glyph(), Style::default().fg(accent)),
        Span::raw(" "),
        Span::styled(
            truncate_ellipsis(&toast.message, room),
            Style::default().fg(theme.text_color),
        ),
    ]);
    Paragraph::new(line).render(inner, buf);

    draw_countdown(buf, card, toast.remaining_at(now), accent, theme);
}

/// Bottom border drains from right to left as the toast ages
fn draw_countdown(buf: &mut Buffer, card: Rect, remaining: f32, accent: Color, theme: &Theme) {
    let row = card.bottom().saturating_sub(1);
    let span = card.width.saturating_sub(2);
    let filled = (span as f32 * remaining).round() as u16;

    for i in 0..span {
        let (symbol, color) = if i < filled {
            ("━", accent)
        } else {
            ("─", theme.dim_color)
        };
        if let Some(cell) = buf.cell_mut((card.x + 1 + i, row)) {
            cell.set_symbol(symbol).set_fg(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::themes::THEME_REGISTRY;

    #[test]
    fn test_repeated_message_restarts_countdown() {
        let mut queue = ToastQueue::new();
        let first = Toast::info("Saved");
        let shown = first.shown_at;
        queue.push(first);

        let mut again = Toast::info("Saved");
        again.shown_at = shown + Duration::from_secs(3);
        queue.push(again);

        assert_eq!(queue.len(), 1);
        assert!(!queue.tick(shown + LIFETIME));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_oldest_toast_is_evicted() {
        let mut queue = ToastQueue::new();
        for i in 0..4 {
            queue.push(Toast::info(format!("message {}", i)));
        }
        assert_eq!(queue.len(), MAX_TOASTS);
        let newest_first: Vec<_> = queue.visible().map(|t| t.message.as_str()).collect();
        assert_eq!(newest_first, vec!["message 3", "message 2", "message 1"]);
    }

    #[test]
    fn test_tick_removes_expired() {
        let mut queue = ToastQueue::new();
        let toast = Toast::warning("Could not save");
        let shown = toast.shown_at;
        queue.push(toast);

        assert!(!queue.tick(shown + Duration::from_secs(1)));
        assert!(queue.tick(shown + LIFETIME));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_countdown_drains_with_age() {
        let toast = Toast::info("Theme: Dark");
        assert_eq!(toast.remaining_at(toast.shown_at), 1.0);
        assert_eq!(toast.remaining_at(toast.shown_at + LIFETIME * 2), 0.0);

        let half = toast.remaining_at(toast.shown_at + LIFETIME / 2);
        assert!((half - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_card_shows_glyph_and_message() {
        let theme = THEME_REGISTRY.get_or_default("");
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        let mut queue = ToastQueue::new();
        queue.push(Toast::warning("Ratings not saved"));

        render_toasts(&mut buf, area, &queue, theme);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 2)].symbol().to_string())
            .collect();
        assert!(row.contains("! Ratings not saved"), "{:?}", row);
    }

    #[test]
    fn test_narrow_pane_skips_toasts() {
        let theme = THEME_REGISTRY.get_or_default("");
        let area = Rect::new(0, 0, 15, 10);
        let mut buf = Buffer::empty(area);
        let mut queue = ToastQueue::new();
        queue.push(Toast::info("hidden"));

        render_toasts(&mut buf, area, &queue, theme);
        assert_eq!(buf, Buffer::empty(area));
    }
}
