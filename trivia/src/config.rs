//! User configuration for trivia.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/trivia/config.toml`
//! (fallback `~/.config/trivia/config.toml`). Every key is optional. A missing
//! file means defaults; an unreadable or invalid file also means defaults,
//! with a message on stderr since the terminal is not initialised yet.
//!
//! ```toml
//! theme = "dark"
//!
//! [provider]
//! url = "https://opentdb.com/api.php"
//! timeout_secs = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use trivia_core::provider::{ProviderConfig, DEFAULT_TIMEOUT, DEFAULT_URL};

/// Theme used when the config does not name one.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub provider: ProviderSection,
}

impl Default for Config {
    fn default() -> Self {
        Self { theme: DEFAULT_THEME.to_owned(), provider: ProviderSection::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self { url: DEFAULT_URL.to_owned(), timeout_secs: DEFAULT_TIMEOUT.as_secs() }
    }
}

impl Config {
    /// Loads the config from the standard location.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Loads the config at `path`. Never fails; see the module docs.
    pub fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                eprintln!("trivia: cannot read {}: {e}", path.display());
                return Self::default();
            }
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("trivia: config parse error in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Provider settings for `trivia_core`. A zero timeout falls back to the default.
    pub fn provider_config(&self) -> ProviderConfig {
        let timeout = match self.provider.timeout_secs {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        ProviderConfig { url: self.provider.url.clone(), timeout }
    }
}

/// Returns the path to the trivia config file.
///
/// Prefers `$XDG_CONFIG_HOME/trivia/config.toml`; falls back to
/// `~/.config/trivia/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("trivia").join("config.toml")
}

/// Resolves an XDG base directory from `var`, or `$HOME/<fallback>`.
pub fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
        assert_eq!(config.provider_config().url, DEFAULT_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let (_dir, path) = write_config("theme = \"dark\"\n");
        let config = Config::load_from(&path);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.provider, ProviderSection::default());
    }

    #[test]
    fn provider_section_is_applied() {
        let (_dir, path) = write_config(
            "[provider]\nurl = \"http://localhost:8080/api.php\"\ntimeout_secs = 3\n",
        );
        let provider = Config::load_from(&path).provider_config();
        assert_eq!(provider.url, "http://localhost:8080/api.php");
        assert_eq!(provider.timeout, Duration::from_secs(3));
    }

    #[test]
    fn zero_timeout_uses_default() {
        let (_dir, path) = write_config("[provider]\ntimeout_secs = 0\n");
        assert_eq!(Config::load_from(&path).provider_config().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn invalid_file_gives_defaults() {
        let (_dir, path) = write_config("theme = [not toml");
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
