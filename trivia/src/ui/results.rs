//! Results screen renderer.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::Paragraph,
};
use trivia_core::machine::FinishReason;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Shows the final score. The percentage is `state.shown_percent`, which
/// climbs towards the real value on logic ticks.
pub fn render_results(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(outcome) = state.runner.outcome() else {
        return;
    };
    let session = outcome.session();

    frame.render_widget(panel_block(" Results ", true, theme), area);

    let mut lines = vec![Line::from("")];
    if outcome.reason() == FinishReason::Expired {
        lines.push(Line::styled(
            "Time's up!",
            Style::default().fg(theme.timer_warning).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(""));
    }
    lines.extend([
        Line::styled(
            format!("You answered {} of {} correctly", outcome.score(), outcome.total()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("{} · {}", session.subject().label(), session.difficulty()),
            Style::default().fg(theme.muted),
        ),
        Line::from(""),
        Line::styled(
            format!("{}%", state.shown_percent),
            Style::default().fg(theme.progress).add_modifier(Modifier::BOLD),
        ),
    ]);

    let settled = state.shown_percent == outcome.percent();
    if settled && state.celebrate() {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "Congratulations! Great score!",
            Style::default().fg(theme.answer_correct).add_modifier(Modifier::BOLD),
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Enter to play again · h for home",
        Style::default().fg(theme.muted),
    ));

    frame.render_widget(Paragraph::new(Text::from(lines)).centered(), inner_rect(area));
}
