//! Quiz screen renderer.
//!
//! Layout, top to bottom: header (subject, level, clock), progress gauge,
//! question prompt, answer list. Once the current question is answered the
//! chosen answer is marked and the correct one revealed.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use trivia_core::machine::Session;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

const ANSWER_KEYS: [char; 4] = ['a', 'b', 'c', 'd'];

pub fn render_quiz(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(session) = state.runner.session() else {
        return;
    };

    let [header, gauge, prompt, answers] = area.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(6),
    ]));

    render_header(frame, header, session, theme);
    render_progress(frame, gauge, session, theme);
    render_prompt(frame, prompt, session, theme);
    render_answers(frame, answers, session, state.answer_cursor, theme);
}

fn render_header(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let [left, right] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]));

    let title = Line::from(vec![
        Span::styled(
            session.subject().label(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", session.difficulty()), Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), left);

    let clock_style = if session.is_running_low() {
        Style::default().fg(theme.timer_warning).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.timer_normal)
    };
    frame.render_widget(
        Paragraph::new(Line::styled(format!("⏱ {}", session.clock()), clock_style)).right_aligned(),
        right,
    );
}

fn render_progress(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let reached = (session.current_index() + 1).min(session.len());
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.progress))
        .ratio(session.progress().clamp(0.0, 1.0))
        .label(format!("{reached}/{}", session.len()));
    frame.render_widget(gauge, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let title = format!(" Question {} ", session.current_index() + 1);
    frame.render_widget(panel_block(&title, true, theme), area);

    let prompt = session.current_question().map_or("", |q| q.prompt());
    frame.render_widget(
        Paragraph::new(prompt)
            .style(Style::default().fg(theme.text))
            .wrap(Wrap { trim: true }),
        inner_rect(area),
    );
}

fn render_answers(frame: &mut Frame, area: Rect, session: &Session, cursor: usize, theme: &Theme) {
    let Some(question) = session.current_question() else {
        return;
    };
    let selected = session.selected();
    let correct = question.correct_index();

    let items: Vec<ListItem> = question
        .answers()
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            let key = ANSWER_KEYS.get(i).copied().unwrap_or(' ');
            let (marker, style) = match selected {
                None => (" ", Style::default().fg(theme.text)),
                Some(_) if i == correct => {
                    ("✓", Style::default().fg(theme.answer_correct).add_modifier(Modifier::BOLD))
                }
                Some(chosen) if i == chosen => ("✗", Style::default().fg(theme.answer_incorrect)),
                Some(_) => (" ", Style::default().fg(theme.muted)),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} {key}) "), Style::default().fg(theme.muted)),
                Span::styled(answer.text.clone(), style),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(panel_block(" Answers ", false, theme));
    let mut list_state = ListState::default();
    if selected.is_none() {
        list = list
            .highlight_symbol("> ")
            .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD));
        list_state.select(Some(cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
