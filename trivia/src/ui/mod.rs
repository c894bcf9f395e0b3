//! UI rendering for trivia.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout helpers live in `layout.rs`; each screen
//! has its own renderer.

mod layout;
pub mod help;
pub mod keybindings;
mod menu;
mod quiz;
mod results;

use ratatui::Frame;

use crate::app::{AppState, Mode, Screen};
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Renders one complete frame: current screen, status bar, then overlays.
///
/// Called exactly once per `AppEvent::Render`. Rendering never mutates state.
pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let [body, status_bar] = compute_layout(frame);

    match state.screen {
        Screen::Home => menu::render_home(frame, body, theme),
        Screen::Subject => menu::render_subjects(frame, body, state, theme),
        Screen::Level => menu::render_levels(frame, body, state, theme),
        Screen::Quiz => quiz::render_quiz(frame, body, state, theme),
        Screen::Results => results::render_results(frame, body, state, theme),
    }

    render_status_bar(frame, status_bar, state, theme);

    if state.is_loading() {
        menu::render_loading_overlay(frame, state, theme);
    }
    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
