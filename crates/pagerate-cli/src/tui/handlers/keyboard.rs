//! Keyboard event handlers
//!
//! Typing into an open comment field comes first, then flow keys, then
//! page navigation.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use pagerate_core::rating::FlowError;
use pagerate_core::{FlowState, PresentationMode, Rating};

use crate::tui::app::{App, PanelFocus};
use crate::tui::components::Toast;

/// Rows moved by j/k and the arrow keys with Ctrl
const LINE_STEP: f64 = 1.0;

impl App {
    /// Main keyboard event dispatcher
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        let is_press =
            key_event.kind == KeyEventKind::Press || key_event.kind == KeyEventKind::Repeat;
        if !is_press {
            return;
        }
        let code = key_event.code;
        let modifiers = key_event.modifiers;
        let now = Instant::now();

        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        if self.focus == PanelFocus::Comment && self.accepts_comment() {
            self.handle_comment_key(code, modifiers, now);
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                let result = self.controller.escape(now);
                self.flow_result(result);
            }
            KeyCode::Enter => self.submit(now),
            KeyCode::Char('s') if self.controller.state().is_open() => {
                let result = self.controller.skip(now);
                self.flow_result(result);
            }
            KeyCode::Tab if self.accepts_comment() => self.focus = PanelFocus::Comment,
            KeyCode::Char('u') => self.rate_visible_page(Rating::Up),
            KeyCode::Char('d') => self.rate_visible_page(Rating::Down),
            KeyCode::Char('r') => self.begin_wizard(),
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let result = self.controller.toggle_quality_at(index).map(|_| ());
                self.flow_result(result);
            }
            _ => self.handle_navigation_key(code, modifiers, now),
        }
    }

    /// Bracketed paste goes to the comment field when it has focus
    pub fn handle_paste(&mut self, text: &str) {
        if self.focus != PanelFocus::Comment || !self.accepts_comment() {
            return;
        }
        for c in text.chars().filter(|c| !c.is_control()) {
            if self.controller.push_comment_char(c).is_err() {
                break;
            }
        }
    }

    fn handle_comment_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
        let result = match code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => {
                self.focus = PanelFocus::Pills;
                Ok(())
            }
            KeyCode::Enter => {
                self.submit(now);
                Ok(())
            }
            KeyCode::Backspace => self.controller.pop_comment_char(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.controller.push_comment_char(c)
            }
            _ => Ok(()),
        };
        self.flow_result(result);
    }

    fn handle_navigation_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
        // The popup is modal while the form is open
        if self.mode == PresentationMode::Popup
            && matches!(self.controller.state(), FlowState::CollectingQualities { .. })
        {
            return;
        }

        match code {
            KeyCode::Down | KeyCode::PageDown => {
                self.tracker.next_page(now);
            }
            KeyCode::Up | KeyCode::PageUp => {
                self.tracker.prev_page(now);
            }
            KeyCode::Char(' ') if modifiers.contains(KeyModifiers::SHIFT) => {
                self.tracker.prev_page(now);
            }
            KeyCode::Char(' ') => {
                self.tracker.next_page(now);
            }
            KeyCode::Home => {
                self.tracker.first_page(now);
            }
            KeyCode::End => {
                self.tracker.last_page(now);
            }
            KeyCode::Char('j') => self.tracker.scroll_by(LINE_STEP, now),
            KeyCode::Char('k') => self.tracker.scroll_by(-LINE_STEP, now),
            _ => {}
        }
    }

    /// Whether the open step has a comment field
    fn accepts_comment(&self) -> bool {
        matches!(
            self.controller.state(),
            FlowState::CollectingQualities { .. } | FlowState::CollectingPageRatings
        )
    }

    fn submit(&mut self, now: Instant) {
        let result = self.controller.submit(now);
        if result.is_ok() {
            self.focus = PanelFocus::Pills;
        }
        self.flow_result(result);
    }

    /// Thumb on the page currently in view
    pub fn rate_visible_page(&mut self, rating: Rating) {
        let Some(page_id) = self.tracker.active_page_id().map(str::to_string) else {
            return;
        };
        self.rate_page(&page_id, rating);
    }

    pub fn rate_page(&mut self, page_id: &str, rating: Rating) {
        let result = self.controller.select_rating(page_id, rating);
        if result.is_ok() {
            self.focus = PanelFocus::Pills;
        }
        self.flow_result(result);
    }

    fn begin_wizard(&mut self) {
        if self.mode != PresentationMode::Wizard {
            self.show_toast(Toast::info("Start with --mode wizard to rate the whole report"));
            return;
        }
        if self.controller.state().is_open() {
            return;
        }
        let result = self.controller.begin();
        self.flow_result(result);
    }

    /// Keys that do not apply to the current state are ignored
    fn flow_result(&mut self, result: Result<(), FlowError>) {
        if let Err(e) = result {
            tracing::debug!("Ignored key: {}", e);
        }
        if !self.accepts_comment() {
            self.focus = PanelFocus::Pills;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use pagerate_core::{AppConfig, Document, RatingStateStore};

    fn app(mode: PresentationMode) -> App {
        let config = AppConfig {
            mode,
            ..AppConfig::default()
        };
        let mut app = App::new(&config, Document::sample(), RatingStateStore::in_memory());
        app.relayout(80, 20);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_popup_rating_from_keys() {
        let mut app = app(PresentationMode::Popup);

        press(&mut app, KeyCode::Char('u'));
        assert!(matches!(
            app.controller.state(),
            FlowState::CollectingQualities { rating: Rating::Up, .. }
        ));

        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, PanelFocus::Comment);
        type_text(&mut app, "qa");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.controller.comment(), "q");

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.controller.state(), FlowState::Submitted { .. }));
        assert_eq!(app.focus, PanelFocus::Pills);
        assert_eq!(app.controller.mark("1"), Some(Rating::Up));
    }

    #[test]
    fn test_typing_q_in_comment_does_not_quit() {
        let mut app = app(PresentationMode::Inline);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "quite");
        assert!(!app.should_quit);
        assert_eq!(app.controller.comment(), "quite");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, PanelFocus::Pills);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_cancels_without_writing() {
        let mut app = app(PresentationMode::Popup);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Esc);
        assert!(app.controller.state().is_idle());
        assert_eq!(app.controller.mark("1"), None);
        assert_eq!(app.controller.store().count("pageFeedback"), 0);
    }

    #[test]
    fn test_popup_blocks_navigation_while_open() {
        let mut app = app(PresentationMode::Popup);

        press(&mut app, KeyCode::Char('u'));
        press(&mut app, KeyCode::Down);
        assert!(!app.tracker.is_animating());

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Down);
        assert!(app.tracker.is_animating());
    }

    #[test]
    fn test_wizard_keys_walk_both_steps() {
        let mut app = app(PresentationMode::Wizard);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.controller.state(), &FlowState::CollectingRating);
        press(&mut app, KeyCode::Char('u'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.controller.state(), &FlowState::CollectingPageRatings);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.controller.mark("1"), Some(Rating::Down));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.controller.state(), FlowState::Submitted { .. }));
        assert_eq!(app.controller.sessions().len(), 1);
    }

    #[test]
    fn test_r_outside_wizard_shows_hint() {
        let mut app = app(PresentationMode::Inline);
        press(&mut app, KeyCode::Char('r'));
        assert!(app.controller.state().is_idle());
        assert_eq!(app.toasts.len(), 1);
    }

    fn seeded_app(mode: PresentationMode) -> App {
        let mut store = RatingStateStore::in_memory();
        store
            .put(
                mode.namespace(),
                "2",
                &pagerate_core::RatingRecord::new("2", Rating::Down),
            )
            .unwrap();
        let config = AppConfig {
            mode,
            clear_on_start: true,
            ..AppConfig::default()
        };
        App::new(&config, Document::sample(), store)
    }

    #[test]
    fn test_clear_on_start_wipes_sidebar_only() {
        let app = seeded_app(PresentationMode::Inline);
        assert_eq!(app.controller.store().count(PresentationMode::Inline.namespace()), 0);
        assert_eq!(app.controller.mark("2"), None);

        let app = seeded_app(PresentationMode::Popup);
        assert_eq!(app.controller.store().count(PresentationMode::Popup.namespace()), 1);
    }
}
