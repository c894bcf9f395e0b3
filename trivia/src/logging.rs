//! File logging.
//!
//! The terminal belongs to the TUI, so `env_logger` writes to
//! `$XDG_STATE_HOME/trivia/trivia.log` (fallback `~/.local/state/trivia/`).
//! Filtering follows `RUST_LOG`, defaulting to `info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::config::xdg_dir;

/// Default location of the log file.
pub fn log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("trivia").join("trivia.log")
}

/// Installs the global logger, appending to the file at `path`.
///
/// # Errors
///
/// Returns `Err` if the directory or file cannot be created, or a logger is
/// already installed.
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(std::io::Error::other)
}
