//! Main TUI application
//!
//! Core application state and event loop.
//! Handler implementations are in the handlers/ module.

use anyhow::Result;
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, EventStream, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};

use pagerate_core::diagnostics::{self, DiagnosticReceiver};
use pagerate_core::{
    AppConfig, Document, PresentationMode, RatingFlowController, RatingStateStore, ScrollTracker,
};

use crate::tui::components::{Toast, ToastQueue};
use crate::tui::state::{DocumentLayout, LayoutState};
use crate::tui::themes::{Theme, THEME_REGISTRY};

/// Which part of an open rating form receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelFocus {
    #[default]
    Pills,
    Comment,
}

/// Main application state
pub struct App {
    pub document: Document,
    pub doc_layout: DocumentLayout,
    pub mode: PresentationMode,
    pub theme: &'static Theme,
    pub theme_name: String,

    pub tracker: ScrollTracker,
    pub controller: RatingFlowController,
    diagnostics: DiagnosticReceiver,

    pub toasts: ToastQueue,
    pub layout: LayoutState,
    pub focus: PanelFocus,
    /// Page pane size the tracker was last laid out for
    pub viewport: (u16, u16),

    pub should_quit: bool,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(config: &AppConfig, document: Document, store: RatingStateStore) -> Self {
        let (tx, rx) = diagnostics::channel();
        let mode = config.mode;
        let store = store.with_diagnostics(tx);
        let mut controller = RatingFlowController::new(mode, store)
            .with_reset_delay(config.flow.reset_delay(mode));

        // Only the sidebar is wiped; popup and wizard history is kept
        if config.clear_on_start && mode == PresentationMode::Inline {
            controller.clear_all();
        }

        tracing::info!(
            "Opened \"{}\" ({} pages) in {} mode",
            document.title,
            document.len(),
            mode
        );

        let theme = THEME_REGISTRY.get_or_default(&config.theme);
        Self {
            document,
            doc_layout: DocumentLayout::default(),
            mode,
            theme,
            theme_name: theme.name.clone(),
            tracker: ScrollTracker::new(&config.scroll),
            controller,
            diagnostics: rx,
            toasts: ToastQueue::new(),
            layout: LayoutState::new(),
            focus: PanelFocus::default(),
            viewport: (0, 0),
            should_quit: false,
            needs_redraw: true,
        }
    }

    pub fn show_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
        self.needs_redraw = true;
    }

    /// Surface store problems as warning toasts
    pub fn poll_diagnostics(&mut self) {
        while let Ok(diagnostic) = self.diagnostics.try_recv() {
            tracing::warn!(namespace = diagnostic.namespace(), "{}", diagnostic);
            self.show_toast(Toast::warning(diagnostic.to_string()));
        }
    }

    /// Advance timers: scroll animation, debounced visibility, flow reset
    pub fn tick(&mut self, now: Instant) {
        if self.tracker.poll(now).is_some() {
            self.needs_redraw = true;
        }
        if self.tracker.is_animating() {
            self.needs_redraw = true;
        }
        if self.controller.tick(now) {
            self.focus = PanelFocus::Pills;
            self.needs_redraw = true;
        }
        self.poll_diagnostics();
        if self.toasts.tick(now) {
            self.needs_redraw = true;
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            PopKeyboardEnhancementFlags,
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;
        result
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        loop {
            self.tick(Instant::now());

            // Only render if something changed
            if self.needs_redraw {
                terminal.draw(|f| self.ui(f))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased; // Prefer events over timeout when both are ready

                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            Event::Key(key) => {
                                self.handle_key(key);
                                self.needs_redraw = true;
                            }
                            Event::Mouse(mouse) => {
                                self.handle_mouse_event(mouse);
                                self.needs_redraw = true;
                            }
                            Event::Paste(text) => {
                                self.handle_paste(&text);
                                self.needs_redraw = true;
                            }
                            Event::Resize(_, _) => {
                                self.needs_redraw = true;
                            }
                            _ => {}
                        }
                    }
                }
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            if self.should_quit {
                tracing::info!("Quitting");
                break;
            }
        }
        Ok(())
    }
}
