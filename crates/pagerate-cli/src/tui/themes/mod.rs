//! Color themes

mod definitions;
mod registry;

use std::sync::LazyLock;

use ratatui::style::Color;

pub use registry::ThemeRegistry;

/// Global registry of built-in themes
pub static THEME_REGISTRY: LazyLock<ThemeRegistry> = LazyLock::new(ThemeRegistry::new);

/// Name of the theme used when none (or an unknown one) is requested
pub const DEFAULT_THEME: &str = "pagerate";

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub display_name: String,

    pub bg_color: Color,
    pub page_bg_color: Color,
    pub text_color: Color,
    pub dim_color: Color,
    pub title_color: Color,
    pub accent_color: Color,
    pub border_color: Color,
    pub status_bar_bg_color: Color,
    pub scrollbar_bg_color: Color,

    pub success_color: Color,
    pub warning_color: Color,
    pub error_color: Color,

    /// Thumbs up and positive pills
    pub positive_color: Color,
    /// Thumbs down and negative pills
    pub negative_color: Color,
}
