// Client configuration: built-in defaults, an optional config.json in the
// user's config directory, then environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "FLASHCARDS_API_URL";
const CONFIG_DIR_NAME: &str = "flashcards-cli";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the flashcard server.
    pub api_url: String,
    /// Initial difficulty selector value.
    pub difficulty: String,
    /// Initial card count input.
    pub num_cards: u32,
    /// ANSI styling for rendered output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            difficulty: "medium".to_string(),
            num_cards: 5,
            color: true,
        }
    }
}

impl Config {
    /// Default location: `<config_dir>/flashcards-cli/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Read the config file at `path`. A missing or malformed file yields
    /// the defaults.
    pub fn load_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(config) => {
                    debug!(path = %path.display(), "Config loaded");
                    config
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
        }
    }

    /// Apply environment overrides given a lookup function, so callers can
    /// pass `std::env::var` or a fixed map in tests.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if lookup("NO_COLOR").is_some() {
            self.color = false;
        }
        self
    }

    /// Defaults, then the config file, then the process environment.
    pub fn load() -> Self {
        Self::load_file(&Self::default_path()).apply_env(|k| std::env::var(k).ok())
    }
}
