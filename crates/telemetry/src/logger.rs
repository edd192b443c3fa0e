//! Namespaced logger.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{LoggerConfig, LOG_LEVEL_VAR};
use crate::entry::{ErrorRecord, LogContext, LogEntry};
use crate::error::ConfigError;
use crate::format::render;
use crate::level::{should_log, LogLevel};
use crate::sink::{LogSink, StdoutSink};

/// Logger with an optional colon-delimited namespace.
///
/// Cloning is cheap: the configuration and sink are shared. A logger never
/// changes after construction; [`Logger::child`] returns a new value.
#[derive(Clone)]
pub struct Logger {
    namespace: Option<String>,
    config: Arc<LoggerConfig>,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Create a root logger without a namespace.
    ///
    /// # Arguments
    /// * `config` - Threshold and rendering settings
    /// * `sink` - Destination for rendered lines
    pub fn new(config: LoggerConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            namespace: None,
            config: Arc::new(config),
            sink,
        }
    }

    /// Create a root logger writing to standard output.
    pub fn stdout(config: LoggerConfig) -> Self {
        Self::new(config, Arc::new(StdoutSink))
    }

    /// Create a root logger from variables read through `lookup`.
    ///
    /// An invalid `LOG_LEVEL` is ignored and reported as one warn line through
    /// the new logger itself.
    pub fn from_lookup<F>(lookup: F, sink: Arc<dyn LogSink>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, ignored) = LoggerConfig::from_lookup_reporting(lookup);
        let logger = Self::new(config, sink);
        if let Some(e) = ignored {
            logger.warn_ignored_config(&e);
        }
        logger
    }

    /// Create a root logger from the process environment.
    pub fn from_env(sink: Arc<dyn LogSink>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), sink)
    }

    fn warn_ignored_config(&self, err: &ConfigError) {
        let mut ctx = LogContext::new();
        ctx.insert("variable".to_string(), Value::from(LOG_LEVEL_VAR));
        ctx.insert("fallback".to_string(), Value::from(self.config.min_level.as_str()));
        self.child("config").warn(&err.to_string(), Some(&ctx));
    }

    /// Derive a logger whose namespace is `parent:ns`, or `ns` at the root.
    pub fn child(&self, ns: &str) -> Logger {
        let namespace = match self.namespace.as_deref() {
            Some(parent) if !parent.is_empty() => format!("{parent}:{ns}"),
            _ => ns.to_string(),
        };
        Logger {
            namespace: Some(namespace),
            config: Arc::clone(&self.config),
            sink: Arc::clone(&self.sink),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Whether a call at `level` would produce output.
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        should_log(level, self.config.min_level)
    }

    pub fn debug(&self, message: &str, context: Option<&LogContext>) {
        self.log(LogLevel::Debug, message, context, None);
    }

    pub fn info(&self, message: &str, context: Option<&LogContext>) {
        self.log(LogLevel::Info, message, context, None);
    }

    pub fn warn(&self, message: &str, context: Option<&LogContext>) {
        self.log(LogLevel::Warn, message, context, None);
    }

    pub fn error(&self, message: &str, error: Option<&ErrorRecord>, context: Option<&LogContext>) {
        self.log(LogLevel::Error, message, context, error);
    }

    /// Emit one entry at `level`. Calls below the threshold return before
    /// anything is built.
    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        context: Option<&LogContext>,
        error: Option<&ErrorRecord>,
    ) {
        if !self.is_enabled(level) {
            return;
        }

        let message = match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("[{ns}] {message}"),
            _ => message.to_string(),
        };
        let entry = LogEntry::new(level, message, context, error);
        let line = render(&entry, self.config.format, self.config.color);
        self.sink.write_entry(&line);
    }
}
