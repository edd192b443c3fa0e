//! Error types for logger configuration.

/// Error type for logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0:?} (expected one of debug, info, warn, error)")]
    InvalidLevel(String),
}

/// Result type for logger configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;
