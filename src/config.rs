//! Client configuration.
//!
//! Read once at startup from `config.json` in the platform config directory.
//! The client never writes it back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::typing::DEFAULT_QUIET_PERIOD;
use crate::validation::MAX_NICKNAME_LEN;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub theme: Theme,
    /// Prefills the nickname field on the landing screen.
    pub nickname: String,
    pub typing_quiet_period_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            nickname: String::new(),
            typing_quiet_period_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
        }
    }
}

impl ClientConfig {
    pub fn typing_quiet_period(&self) -> Duration {
        Duration::from_millis(self.typing_quiet_period_ms)
    }

    /// Nickname prefill, cut to what the form accepts.
    pub fn initial_nickname(&self) -> String {
        self.nickname.chars().take(MAX_NICKNAME_LEN).collect()
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "partychat", "party-chat").map(|p| p.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.typing_quiet_period(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"theme": "light", "nickname": "alice"}}"#).unwrap();

        let config = ClientConfig::load_from(file.path());
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.nickname, "alice");
        assert_eq!(config.typing_quiet_period_ms, 2000);
    }

    #[test]
    fn test_malformed_or_missing_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert_eq!(ClientConfig::load_from(file.path()), ClientConfig::default());

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ClientConfig::load_from(&dir.path().join("absent.json")),
            ClientConfig::default()
        );
    }

    #[test]
    fn test_initial_nickname_is_truncated() {
        let config = ClientConfig {
            nickname: "x".repeat(40),
            ..Default::default()
        };
        assert_eq!(config.initial_nickname().chars().count(), MAX_NICKNAME_LEN);
    }

    #[test]
    fn test_config_path_names_app() {
        if let Some(path) = config_path() {
            assert!(path.ends_with("config.json"));
        }
    }
}
