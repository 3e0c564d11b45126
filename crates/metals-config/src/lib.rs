//! Configuration for the Metals debug integration.
//!
//! Configuration is a small TOML document:
//!
//! ```toml
//! [logging]
//! level = "debug"
//! json = false
//! file = "/tmp/metals-dap.log"
//!
//! [debug]
//! save_before_debug = true
//! focus_debug_console = true
//! ```
//!
//! Every key is optional; missing sections fall back to defaults.

mod logging;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use logging::init_tracing;

/// Environment variable consulted when no `--config` path is given.
pub const CONFIG_ENV_VAR: &str = "METALS_DAP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetalsConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub debug: DebugSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Either a simple level (`info`, `debug`, ...) or a full
    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. stdout is reserved for the DAP stream.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to this file as well. If it cannot be opened, file logging
    /// is skipped and the other sinks stay active.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" | "none" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Effective filter: the configured level, with `RUST_LOG` directives
    /// appended when set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        match env_directives {
            Some(env_directives) => {
                let config_directives = Self::normalize_level_directives(&self.level);
                tracing_subscriber::EnvFilter::try_new(format!("{config_directives},{env_directives}"))
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

/// Knobs for the run/debug discovery flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSettings {
    /// Save all dirty editors before asking the language server for a debug session.
    #[serde(default = "default_true")]
    pub save_before_debug: bool,

    /// Reveal the debug console once a session has been started.
    #[serde(default = "default_true")]
    pub focus_debug_console: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            save_before_debug: true,
            focus_debug_console: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The `Display` impl includes a source snippet; keep only the message.
        ConfigError::Toml(sanitize_toml_error_message(err.message()))
    }
}

fn sanitize_toml_error_message(message: &str) -> String {
    static QUOTED: OnceLock<regex::Regex> = OnceLock::new();
    static SINGLE_QUOTED: OnceLock<regex::Regex> = OnceLock::new();

    let quoted = QUOTED.get_or_init(|| regex::Regex::new(r#""(?:\\.|[^"\\])*""#).expect("valid regex"));
    let single_quoted =
        SINGLE_QUOTED.get_or_init(|| regex::Regex::new(r"'(?:\\.|[^'\\])*'").expect("valid regex"));

    let out = quoted.replace_all(message, r#""<redacted>""#);
    single_quoted.replace_all(&out, "'<redacted>'").into_owned()
}

impl MetalsConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    /// Resolve the config from an explicit path, then `METALS_DAP_CONFIG`,
    /// then defaults. A file that fails to load is reported on stderr (logging
    /// is not up yet) and replaced by defaults.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Self {
        let path = cli_path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!(
                    "metals-dap: failed to load config from {}: {err}; continuing with defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }
}
