//! Color theme system for trivia.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! trivia renders. Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors only, so it works on any terminal including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

/// All color values used across trivia's screens.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panels
    /// Border of the main panel and of modal overlays.
    pub border_active: Color,
    /// Border of secondary panels.
    pub border_inactive: Color,

    // Text
    pub title: Color,
    pub text: Color,
    pub muted: Color,
    /// Cursor row on menus and the answer list.
    pub highlight: Color,

    // Answers
    pub answer_correct: Color,
    pub answer_incorrect: Color,

    // Countdown and progress
    pub timer_normal: Color,
    /// Clock color once little time is left.
    pub timer_warning: Color,
    pub progress: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Screen-name badge at the left of the status bar.
    pub status_screen: Color,
    /// Error line (e.g. a failed fetch).
    pub notice: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            title: Color::Cyan,
            text: Color::Reset,
            muted: Color::DarkGray,
            highlight: Color::Yellow,

            answer_correct: Color::Green,
            answer_incorrect: Color::Red,

            timer_normal: Color::White,
            timer_warning: Color::Red,
            progress: Color::Blue,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_screen: Color::Cyan,
            notice: Color::LightRed,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let maroon = Color::Rgb(235, 160, 172); // #eba0ac

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            title: lavender,
            text,
            muted: overlay1,
            highlight: yellow,

            answer_correct: green,
            answer_incorrect: red,

            timer_normal: text,
            timer_warning: peach,
            progress: blue,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_screen: lavender,
            notice: maroon,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                log::warn!("unknown theme '{other}', falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
