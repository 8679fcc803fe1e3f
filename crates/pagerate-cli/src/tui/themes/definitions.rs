//! Built-in theme definitions

use ratatui::style::Color;

use super::Theme;

/// Default theme: dark slate with teal accents
pub fn pagerate() -> Theme {
    Theme {
        name: "pagerate".to_string(),
        display_name: "Pagerate".to_string(),
        bg_color: Color::Rgb(22, 26, 33),
        page_bg_color: Color::Rgb(30, 35, 44),
        text_color: Color::Rgb(220, 224, 230),
        dim_color: Color::Rgb(118, 127, 141),
        title_color: Color::Rgb(120, 214, 198),
        accent_color: Color::Rgb(90, 190, 175),
        border_color: Color::Rgb(64, 72, 86),
        status_bar_bg_color: Color::Rgb(17, 20, 26),
        scrollbar_bg_color: Color::Rgb(44, 50, 61),
        success_color: Color::Rgb(126, 206, 128),
        warning_color: Color::Rgb(232, 190, 100),
        error_color: Color::Rgb(236, 110, 110),
        positive_color: Color::Rgb(126, 206, 128),
        negative_color: Color::Rgb(236, 120, 110),
    }
}

/// Light theme for bright terminals
pub fn paper() -> Theme {
    Theme {
        name: "paper".to_string(),
        display_name: "Paper".to_string(),
        bg_color: Color::Rgb(244, 241, 234),
        page_bg_color: Color::Rgb(255, 253, 248),
        text_color: Color::Rgb(40, 40, 46),
        dim_color: Color::Rgb(128, 124, 116),
        title_color: Color::Rgb(34, 88, 150),
        accent_color: Color::Rgb(46, 110, 180),
        border_color: Color::Rgb(200, 194, 182),
        status_bar_bg_color: Color::Rgb(228, 223, 212),
        scrollbar_bg_color: Color::Rgb(222, 216, 204),
        success_color: Color::Rgb(46, 140, 72),
        warning_color: Color::Rgb(178, 120, 20),
        error_color: Color::Rgb(190, 50, 50),
        positive_color: Color::Rgb(46, 140, 72),
        negative_color: Color::Rgb(190, 60, 50),
    }
}

/// Uses the terminal's own palette
pub fn terminal() -> Theme {
    Theme {
        name: "terminal".to_string(),
        display_name: "Terminal".to_string(),
        bg_color: Color::Reset,
        page_bg_color: Color::Reset,
        text_color: Color::Reset,
        dim_color: Color::DarkGray,
        title_color: Color::Cyan,
        accent_color: Color::Cyan,
        border_color: Color::DarkGray,
        status_bar_bg_color: Color::Reset,
        scrollbar_bg_color: Color::DarkGray,
        success_color: Color::Green,
        warning_color: Color::Yellow,
        error_color: Color::Red,
        positive_color: Color::Green,
        negative_color: Color::Red,
    }
}
