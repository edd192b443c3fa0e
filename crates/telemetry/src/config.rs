//! Logger configuration resolved from the environment.

use serde::Serialize;
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::format::OutputFormat;
use crate::level::LogLevel;

/// Environment variable overriding the threshold.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
/// Environment variable selecting production mode when set to `production`.
pub const APP_ENV_VAR: &str = "APP_ENV";
/// Disables ANSI colours when set to a non-empty value.
pub const NO_COLOR_VAR: &str = "NO_COLOR";

/// Threshold and rendering settings shared by a logger and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::for_mode(false)
    }
}

impl LoggerConfig {
    /// Defaults for production (`info`, JSON) or development (`debug`, coloured text).
    pub fn for_mode(production: bool) -> Self {
        if production {
            Self {
                min_level: LogLevel::Info,
                format: OutputFormat::Json,
                color: false,
            }
        } else {
            Self {
                min_level: LogLevel::Debug,
                format: OutputFormat::Pretty,
                color: true,
            }
        }
    }

    /// Resolve from the process environment, ignoring an invalid `LOG_LEVEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from the process environment, rejecting an invalid `LOG_LEVEL`.
    pub fn try_from_env() -> ConfigResult<Self> {
        Self::try_from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for variable access. An invalid `LOG_LEVEL` falls
    /// back to the mode default and is reported through `tracing`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, ignored) = Self::from_lookup_reporting(lookup);
        if let Some(e) = ignored {
            warn!("Ignoring {}: {}, using {}", LOG_LEVEL_VAR, e, config.min_level);
        }
        config
    }

    /// Like [`LoggerConfig::from_lookup`], but hands back the ignored error so
    /// the caller can report it once an output exists.
    pub fn from_lookup_reporting<F>(lookup: F) -> (Self, Option<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::mode_defaults(&lookup);
        let mut ignored = None;
        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            match raw.parse() {
                Ok(level) => config.min_level = level,
                Err(e) => ignored = Some(e),
            }
        }
        (config, ignored)
    }

    /// Resolve using `lookup` for variable access.
    pub fn try_from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::mode_defaults(&lookup);
        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            config.min_level = raw.parse()?;
        }
        Ok(config)
    }

    fn mode_defaults<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let production = lookup(APP_ENV_VAR)
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let mut config = Self::for_mode(production);
        if lookup(NO_COLOR_VAR).is_some_and(|v| !v.is_empty()) {
            config.color = false;
        }
        config
    }

    pub fn with_min_level(mut self, min_level: LogLevel) -> Self {
        self.min_level = min_level;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}
