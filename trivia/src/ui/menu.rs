//! Home, subject and level screens, plus the loading overlay.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use trivia_core::types::{Difficulty, Subject};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_home(frame: &mut Frame, area: Rect, theme: &Theme) {
    frame.render_widget(panel_block(" Trivia ", true, theme), area);

    let text = Text::from(vec![
        Line::from(""),
        Line::styled(
            "Web Development Trivia",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled("Ten questions against the clock.", Style::default().fg(theme.text)),
        Line::styled(
            "Pick a subject and a level. Harder levels give you less time.",
            Style::default().fg(theme.muted),
        ),
        Line::from(""),
        Line::styled("Press Enter to start", Style::default().fg(theme.highlight)),
    ]);

    frame.render_widget(
        Paragraph::new(text).centered().wrap(Wrap { trim: true }),
        inner_rect(area),
    );
}

pub fn render_subjects(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let items = Subject::ALL.iter().enumerate().map(|(i, subject)| {
        menu_item(i, subject.label(), None, theme)
    });
    render_menu(frame, area, " Choose a subject ", items, state.subject_cursor, theme);
}

pub fn render_levels(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let title = format!(" {}: choose a level ", state.subject.label());
    let items = Difficulty::ALL.iter().enumerate().map(|(i, level)| {
        let detail = format!("{} s", level.time_budget_secs());
        menu_item(i, &capitalize(level.as_str()), Some(detail), theme)
    });
    render_menu(frame, area, &title, items, state.level_cursor, theme);
}

fn render_menu<'a>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: impl Iterator<Item = ListItem<'a>>,
    cursor: usize,
    theme: &Theme,
) {
    // Three entries plus borders.
    let [list_area] = area.layout(&Layout::vertical([Constraint::Length(5)]));
    let list = List::new(items)
        .block(panel_block(title, true, theme))
        .highlight_symbol("> ")
        .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD));

    let mut list_state = ListState::default().with_selected(Some(cursor));
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

fn menu_item(index: usize, label: &str, detail: Option<String>, theme: &Theme) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(format!("{}. ", index + 1), Style::default().fg(theme.muted)),
        Span::styled(label.to_owned(), Style::default().fg(theme.text)),
    ];
    if let Some(detail) = detail {
        spans.push(Span::styled(format!("  ({detail})"), Style::default().fg(theme.muted)));
    }
    ListItem::new(Line::from(spans))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Small modal shown while questions are being fetched.
pub fn render_loading_overlay(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = frame.area().centered(Constraint::Length(40), Constraint::Length(5));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Loading ")
        .border_style(Style::default().fg(theme.border_active));
    let text = Text::from(vec![
        Line::styled(
            format!("Fetching {} questions…", state.subject.label()),
            Style::default().fg(theme.text),
        ),
        Line::styled("Esc to cancel", Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(text).centered().block(block), area);
}
