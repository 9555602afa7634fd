//! Configuration loading and parsing.
//!
//! Parses `tiledash.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [runtime]
//! redraw_interval_ms = 250
//!
//! [logging]
//! file = "tiledash.log"
//!
//! [keys]
//! focus_next = "Tab"
//! focus_previous = "Backtab"
//! quit = "q"
//! ```
//!
//! Every table and field is optional. Unknown fields are ignored so older
//! binaries accept newer files. A file that fails to parse is reported at
//! `warn` and replaced by the defaults; a missing file is not an error.
//! Key names use the event display names (`"KeyEnter"`, `"Tab"`, `"q"`,
//! `"F5"`); an unknown name falls back to that binding's default.

use anyhow::Result;
use core_events::Key;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const FILE_NAME: &str = "tiledash.toml";
pub const MIN_REDRAW_INTERVAL_MS: u64 = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    #[serde(default = "RuntimeConfig::default_redraw_interval_ms")]
    pub redraw_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            redraw_interval_ms: Self::default_redraw_interval_ms(),
        }
    }
}

impl RuntimeConfig {
    const fn default_redraw_interval_ms() -> u64 {
        250
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
        }
    }
}

impl LoggingConfig {
    fn default_file() -> PathBuf {
        PathBuf::from("tiledash.log")
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct KeysConfig {
    #[serde(default)]
    pub focus_next: Option<String>,
    #[serde(default)]
    pub focus_previous: Option<String>,
    #[serde(default)]
    pub quit: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

/// Key bindings after name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub focus_next: Key,
    pub focus_previous: Key,
    pub quit: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            focus_next: Key::Tab,
            focus_previous: Key::Backtab,
            quit: Key::Char('q'),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file contents as read
    pub path: Option<PathBuf>,
    pub file: ConfigFile,
}

/// `tiledash.toml` in the working directory if present, else the per-user
/// config directory (`$XDG_CONFIG_HOME/tiledash`, `%APPDATA%\tiledash`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("tiledash").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

fn resolve_key(field: &'static str, name: Option<&str>, default: Key) -> Key {
    let Some(name) = name else {
        return default;
    };
    match name.parse::<Key>() {
        Ok(key) => key,
        Err(e) => {
            warn!(target: "config", field, name, error = %e, "unknown_key_name");
            default
        }
    }
}

impl Config {
    /// Redraw period, clamped to at least `MIN_REDRAW_INTERVAL_MS`.
    pub fn redraw_interval(&self) -> Duration {
        let raw = self.file.runtime.redraw_interval_ms;
        let clamped = raw.max(MIN_REDRAW_INTERVAL_MS);
        if clamped != raw {
            info!(target: "config", raw, clamped, "redraw_interval_clamped");
        }
        Duration::from_millis(clamped)
    }

    pub fn log_file(&self) -> &PathBuf {
        &self.file.logging.file
    }

    pub fn key_bindings(&self) -> KeyBindings {
        let defaults = KeyBindings::default();
        let keys = &self.file.keys;
        KeyBindings {
            focus_next: resolve_key("focus_next", keys.focus_next.as_deref(), defaults.focus_next),
            focus_previous: resolve_key(
                "focus_previous",
                keys.focus_previous.as_deref(),
                defaults.focus_previous,
            ),
            quit: resolve_key("quit", keys.quit.as_deref(), defaults.quit),
        }
    }

    /// Override the redraw interval from the command line.
    pub fn with_redraw_ms(mut self, ms: Option<u64>) -> Self {
        if let Some(ms) = ms {
            self.file.runtime.redraw_interval_ms = ms;
        }
        self
    }
}
