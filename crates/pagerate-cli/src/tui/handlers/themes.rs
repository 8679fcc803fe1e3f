//! Theme switching

use crate::tui::app::App;
use crate::tui::components::Toast;
use crate::tui::themes::THEME_REGISTRY;

impl App {
    pub fn set_theme(&mut self, name: &str) {
        self.theme = THEME_REGISTRY.get_or_default(name);
        self.theme_name = self.theme.name.clone();
        tracing::debug!("Theme set to {}", self.theme_name);
    }

    /// Step to the next built-in theme
    pub fn cycle_theme(&mut self) {
        let themes = THEME_REGISTRY.list();
        let Some(current) = themes.iter().position(|(name, _)| **name == self.theme_name) else {
            self.set_theme(crate::tui::themes::DEFAULT_THEME);
            return;
        };
        let next = themes[(current + 1) % themes.len()].0.clone();
        self.set_theme(&next);
        let display = self.theme.display_name.clone();
        self.show_toast(Toast::info(format!("Theme: {}", display)));
    }
}
