//! trivia: timed web-development quiz in the terminal.
//!
//! Entry point for the `trivia` binary. Wires together configuration
//! (`config`), file logging (`logging`), the terminal lifecycle (`tui`), the
//! unified event bus (`event`), the background question fetcher (`fetch`),
//! application state (`app`) and rendering (`ui`).
//!
//! # Startup sequence
//!
//! 1. Load config and install the file logger. Both are soft failures reported
//!    on stderr, which is still the real terminal at this point.
//! 2. `install_panic_hook()` so a panic restores the terminal first.
//! 3. `register_sigterm()`, polled in the event loop.
//! 4. `init_tui()` enters the alternate screen and raw mode.
//! 5. Event channel, `spawn_event_task()`, then the fetch worker.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs. `?`
//! is used only before `init_tui()` and in the Render arm, whose error breaks
//! out through the same path.

mod app;
mod config;
mod event;
mod fetch;
mod logging;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::time::Duration;

use trivia_core::provider::OpenTdbProvider;

use crate::app::AppState;
use crate::event::AppEvent;
use crate::ui::keybindings::{KeyAction, handle_key};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = config::Config::load();
    let log_path = logging::log_path();
    if let Err(e) = logging::init(&log_path) {
        eprintln!("trivia: logging disabled ({}): {e}", log_path.display());
    }
    let theme = theme::Theme::from_name(&config.theme);
    let provider = OpenTdbProvider::new(config.provider_config());

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;
    log::info!("trivia started");

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let fetch_tx = fetch::spawn_fetch_worker(provider, handler.tx.clone());
    let mut state = AppState::new(handler.tx.clone()).with_fetcher(fetch_tx);
    let mut rx = handler.rx;

    let result = run(&mut terminal, &mut state, &theme, &mut rx, &term_flag).await;

    tui::restore_tui()?;
    log::info!("trivia stopped");
    result
}

/// The event loop. Returns on quit, SIGTERM, channel close or a draw error.
async fn run(
    terminal: &mut tui::Tui,
    state: &mut AppState,
    theme: &theme::Theme,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    term_flag: &std::sync::atomic::AtomicBool,
) -> std::io::Result<()> {
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when the
            // channel is quiet.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        terminal.draw(|frame| ui::render(frame, state, theme))?;
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Tick) => state.on_tick(),
                    Some(AppEvent::Countdown(step)) => state.handle_countdown(step),
                    Some(AppEvent::QuestionsFetched { request, result }) => {
                        state.apply_fetch(request, result);
                    }
                    // ratatui picks up the new size on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }
    Ok(())
}
