//! Help overlay renderer for trivia.
//!
//! Draws a centred modal over the current screen. `Clear` erases the area
//! first so the overlay is opaque within the same `terminal.draw()` call.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled down by `help_scroll` rows.
///
/// Skipped on terminals narrower than 40 columns, where the modal would have
/// no usable width.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Menus"),
        Line::from("  ↑ / ↓, k / j   Move the cursor"),
        Line::from("  1 - 3          Choose an entry directly"),
        Line::from("  Enter          Confirm"),
        Line::from("  Esc            Back"),
        Line::from(""),
        Line::from("Quiz"),
        Line::from("  1 - 4, a - d   Answer"),
        Line::from("  ↑ / ↓, Enter   Move to an answer and submit it"),
        Line::from("  Enter / n      Next question (after answering)"),
        Line::from("  Esc            Give up and return home"),
        Line::from(""),
        Line::from("Results"),
        Line::from("  Enter / r      Play again"),
        Line::from("  h / Esc        Home"),
        Line::from(""),
        Line::from("Time per level: easy 2:00, medium 1:30, hard 1:00."),
        Line::from("The quiz ends when the clock runs out."),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?              Open / close this help"),
        Line::from("  q              Quit"),
    ])
}
