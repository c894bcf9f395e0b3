//! Keybinding dispatcher for trivia.
//!
//! Translates crossterm `KeyEvent`s into `AppState` calls and returns a
//! `KeyAction` telling the event loop whether to continue or quit. Dispatch
//! branches first on `state.mode`, then on the current screen.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{AppState, Mode, Screen};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode and screen.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    // While fetching, only cancel and quit do anything.
    if state.is_loading() {
        return match key.code {
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Esc => {
                state.cancel_loading();
                KeyAction::Continue
            }
            _ => KeyAction::Continue,
        };
    }

    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            return KeyAction::Continue;
        }
        _ => {}
    }

    match state.screen {
        Screen::Home => handle_home(key, state),
        Screen::Subject => handle_subject(key, state),
        Screen::Level => handle_level(key, state),
        Screen::Quiz => handle_quiz(key, state),
        Screen::Results => handle_results(key, state),
    }
    KeyAction::Continue
}

/// Shared cursor movement for menus and the answer list.
///
/// Returns `true` when the key was consumed.
fn handle_cursor_key(key: KeyEvent, state: &mut AppState) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => state.move_cursor(1),
        _ => return false,
    }
    true
}

/// Maps `'1'..='9'` to a zero-based index.
fn digit_index(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize - 1),
        _ => None,
    }
}

fn handle_home(key: KeyEvent, state: &mut AppState) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
        state.open_subjects();
    }
}

fn handle_subject(key: KeyEvent, state: &mut AppState) {
    if handle_cursor_key(key, state) {
        return;
    }
    match key.code {
        KeyCode::Enter => state.choose_subject(None),
        KeyCode::Esc => state.go_home(),
        code => {
            if let Some(index) = digit_index(code) {
                state.choose_subject(Some(index));
            }
        }
    }
}

fn handle_level(key: KeyEvent, state: &mut AppState) {
    if handle_cursor_key(key, state) {
        return;
    }
    match key.code {
        KeyCode::Enter => state.choose_level(None),
        KeyCode::Esc => {
            state.notice = None;
            state.screen = Screen::Subject;
        }
        code => {
            if let Some(index) = digit_index(code) {
                state.choose_level(Some(index));
            }
        }
    }
}

fn handle_quiz(key: KeyEvent, state: &mut AppState) {
    let answered = state.runner.session().is_some_and(|s| s.is_answered());

    if answered {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') => state.next_question(),
            KeyCode::Esc => state.go_home(),
            _ => {}
        }
        return;
    }

    if handle_cursor_key(key, state) {
        return;
    }
    match key.code {
        KeyCode::Enter => state.answer_selected(),
        KeyCode::Esc => state.go_home(),
        KeyCode::Char(c @ 'a'..='d') => state.answer(c as usize - 'a' as usize),
        code => {
            if let Some(index) = digit_index(code) {
                state.answer(index);
            }
        }
    }
}

fn handle_results(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('r') => state.play_again(),
        KeyCode::Char('h') | KeyCode::Esc => state.go_home(),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// `?`, `Esc` or `q` dismisses the overlay; `j`/`k`/`g`/`G` scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use trivia_core::machine::Phase;
    use trivia_core::types::{Answer, Difficulty, Question, Subject};

    use crate::fetch::FetchRequest;

    fn press(state: &mut AppState, code: KeyCode) -> KeyAction {
        handle_key(KeyEvent::new(code, KeyModifiers::NONE), state)
    }

    fn state() -> (AppState, UnboundedReceiver<FetchRequest>) {
        let (events, _) = mpsc::unbounded_channel();
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        (AppState::new(events).with_fetcher(fetch_tx), fetch_rx)
    }

    fn questions() -> Vec<Question> {
        (0..3)
            .map(|i| {
                Question::new(
                    format!("q{i}"),
                    vec![
                        Answer::correct("yes"),
                        Answer::incorrect("no"),
                        Answer::incorrect("maybe"),
                        Answer::incorrect("never"),
                    ],
                )
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn menus_lead_to_a_fetch() {
        let (mut state, mut rx) = state();
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.screen, Screen::Subject);

        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.subject, Subject::JavaScript);
        assert_eq!(state.screen, Screen::Level);

        press(&mut state, KeyCode::Char('2'));
        let job = rx.try_recv().unwrap();
        assert_eq!(job.difficulty, Difficulty::Medium);
        assert!(state.is_loading());
    }

    #[tokio::test]
    async fn loading_gates_everything_but_cancel_and_quit() {
        let (mut state, mut rx) = state();
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('1'));
        press(&mut state, KeyCode::Char('1'));
        let _ = rx.try_recv().unwrap();

        press(&mut state, KeyCode::Char('?'));
        assert_eq!(state.mode, Mode::Normal);
        press(&mut state, KeyCode::Char('3'));
        assert!(rx.try_recv().is_err());

        press(&mut state, KeyCode::Esc);
        assert!(!state.is_loading());
        assert_eq!(press(&mut state, KeyCode::Char('q')), KeyAction::Quit);
    }

    #[tokio::test]
    async fn quiz_keys_answer_then_advance() {
        let (mut state, mut rx) = state();
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('1'));
        press(&mut state, KeyCode::Char('1'));
        let job = rx.try_recv().unwrap();
        state.apply_fetch(job.request, Ok(questions()));
        assert_eq!(state.screen, Screen::Quiz);

        // Letter key answers; a second answer is ignored.
        let correct = state.runner.session().unwrap().current_question().unwrap().correct_index();
        let letter = (b'a' + correct as u8) as char;
        press(&mut state, KeyCode::Char(letter));
        press(&mut state, KeyCode::Char('a'));
        assert_eq!(state.runner.session().unwrap().score(), 1);

        press(&mut state, KeyCode::Char('n'));
        assert_eq!(state.runner.session().unwrap().current_index(), 1);

        // Cursor plus Enter answers the highlighted entry.
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.runner.session().unwrap().selected(), Some(1));
        press(&mut state, KeyCode::Enter);

        press(&mut state, KeyCode::Char('4'));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.screen, Screen::Results);
        assert_eq!(state.runner.phase(), Phase::Finished);

        press(&mut state, KeyCode::Char('h'));
        assert_eq!(state.screen, Screen::Home);
    }

    #[tokio::test]
    async fn help_overlay_swallows_keys() {
        let (mut state, _rx) = state();
        press(&mut state, KeyCode::Char('?'));
        assert_eq!(state.mode, Mode::HelpOverlay);

        press(&mut state, KeyCode::Char('j'));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.help_scroll, 1);
        assert_eq!(state.screen, Screen::Home);

        assert_eq!(press(&mut state, KeyCode::Char('q')), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
    }
}
