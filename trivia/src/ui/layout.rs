//! Screen layout helpers for trivia.
//!
//! Pure layout arithmetic and shared chrome (panel borders, status bar). Called
//! inside `terminal.draw()` on every render, so each frame gets a fresh layout
//! that reflects the current terminal size.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Screen};
use crate::theme::Theme;

/// Returns `[body, status_bar]` for the current frame.
///
/// The body is centred horizontally and capped at 80 columns so questions
/// stay readable on wide terminals.
pub fn compute_layout(frame: &Frame) -> [Rect; 2] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let [_, body, _] = main_area.layout(&Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(80),
        Constraint::Fill(1),
    ]));

    [body, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// The main panel of a screen gets a thick border in `border_active`; secondary
/// panels get a plain border in `border_inactive`.
pub fn panel_block<'a>(title: &'a str, is_main: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_main {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_main { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(Span::styled(title, Style::default().fg(theme.title)))
        .border_type(border_type)
        .border_style(border_style)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Left: screen badge. Then either the pending notice (in `theme.notice`) or
/// the key hints for the current screen.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let badge = Span::styled(
        format!(" {} ", state.screen.label()),
        Style::default().fg(theme.status_screen).add_modifier(Modifier::BOLD),
    );

    let rest = match &state.notice {
        Some(notice) => Span::styled(format!(" {notice}"), Style::default().fg(theme.notice)),
        None => Span::raw(format!(" {}", key_hints(state))),
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![badge, rest]))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

fn key_hints(state: &AppState) -> &'static str {
    if state.is_loading() {
        return "Esc cancel  q quit";
    }
    match state.screen {
        Screen::Home => "Enter start  ? help  q quit",
        Screen::Subject => "↑/↓ 1-3 choose  Enter select  Esc home  ? help  q quit",
        Screen::Level => "↑/↓ 1-3 choose  Enter start  Esc back  ? help  q quit",
        Screen::Quiz => {
            let answered = state.runner.session().is_some_and(|s| s.is_answered());
            if answered {
                "Enter/n next  Esc home  ? help  q quit"
            } else {
                "1-4 a-d answer  ↑/↓ Enter  Esc home  ? help  q quit"
            }
        }
        Screen::Results => "Enter/r play again  h home  ? help  q quit",
    }
}
