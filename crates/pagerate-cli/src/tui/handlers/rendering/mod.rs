//! UI rendering coordinator
//!
//! Splits the screen for the active presentation mode and dispatches to the
//! page pane, the rating surfaces and the status bar.

mod pages;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

use pagerate_core::PresentationMode;

use crate::tui::app::App;
use crate::tui::components::{render_status_bar, render_toasts, StatusInfo};
use crate::tui::popups::{feedback, sidebar, wizard};
use crate::tui::state::DocumentLayout;

/// Page pane rows kept when the wizard panel is docked
const MIN_PAGE_ROWS: u16 = 6;

impl App {
    /// Rebuild the document layout for a page pane of `width` x `height`
    pub fn relayout(&mut self, width: u16, height: u16) {
        if self.doc_layout.width() != width || self.doc_layout.total_rows() == 0 {
            self.doc_layout = DocumentLayout::build(&self.document, width);
        }
        self.viewport = (width, height);
        self.tracker
            .set_layout(self.doc_layout.sections().to_vec(), height as f64);
        tracing::debug!(
            "Laid out {} rows for {}x{}",
            self.doc_layout.total_rows(),
            width,
            height
        );
    }

    /// Main UI rendering dispatcher
    pub fn ui(&mut self, f: &mut Frame) {
        let theme = self.theme;
        let area = f.area();
        f.render_widget(Block::default().style(Style::default().bg(theme.bg_color)), area);
        self.layout.reset();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1)])
            .split(area);
        let (main_area, status_area) = (chunks[0], chunks[1]);

        let (pages_area, panel_area) = self.split_main(main_area);
        self.render_pages(f, pages_area);

        let active = self.tracker.active_index();
        if let Some(panel_area) = panel_area {
            match self.mode {
                PresentationMode::Inline => sidebar::render(
                    f,
                    panel_area,
                    &self.controller,
                    &self.document,
                    active,
                    self.focus,
                    theme,
                    &mut self.layout,
                ),
                PresentationMode::Wizard => wizard::render(
                    f,
                    panel_area,
                    &self.controller,
                    &self.document,
                    active,
                    self.focus,
                    theme,
                    &mut self.layout,
                ),
                PresentationMode::Popup => {}
            }
        }
        if self.mode == PresentationMode::Popup && self.controller.state().is_open() {
            feedback::render(
                f,
                pages_area,
                &self.controller,
                &self.document,
                self.focus,
                theme,
                &mut self.layout,
            );
        }

        let info = StatusInfo {
            title: &self.document.title,
            mode: self.mode,
            page: active.map(|i| (i + 1, self.document.len())),
            progress: (self.mode != PresentationMode::Popup)
                .then(|| self.controller.progress(self.document.len())),
            state: self.controller.state(),
            degraded: self.controller.store().is_degraded(self.mode.namespace()),
        };
        render_status_bar(f, status_area, theme, &info);

        render_toasts(f.buffer_mut(), area, &self.toasts, theme);
    }

    /// Page pane and the mode's docked panel, if any
    fn split_main(&self, area: Rect) -> (Rect, Option<Rect>) {
        match self.mode {
            PresentationMode::Popup => (area, None),
            PresentationMode::Inline => {
                let width = sidebar::SIDEBAR_WIDTH.min(area.width / 2);
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Fill(1), Constraint::Length(width)])
                    .split(area);
                (chunks[0], Some(chunks[1]))
            }
            PresentationMode::Wizard => {
                let wanted = wizard::panel_height(&self.controller, area.width);
                if wanted == 0 {
                    return (area, None);
                }
                let height = wanted.min(area.height.saturating_sub(MIN_PAGE_ROWS));
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Fill(1), Constraint::Length(height)])
                    .split(area);
                (chunks[0], Some(chunks[1]))
            }
        }
    }
}
