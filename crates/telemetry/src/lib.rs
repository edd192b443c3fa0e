//! Structured logging for the meetbot services.
//!
//! Route handlers and scripts share one process-wide [`logger()`] and derive
//! namespaced loggers from it with [`Logger::child`]. Tests and embedders can
//! build their own [`Logger`] from an explicit [`LoggerConfig`] and sink.

pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod layer;
pub mod level;
pub mod logger;
pub mod sink;

use std::sync::{Arc, OnceLock};

pub use config::LoggerConfig;
pub use entry::{ErrorRecord, LogContext, LogEntry};
pub use error::{ConfigError, ConfigResult};
pub use format::OutputFormat;
pub use layer::{init_logging, LoggerLayer};
pub use level::{should_log, LogLevel};
pub use logger::Logger;
pub use sink::{FileSink, LogSink, MemorySink, StdoutSink};

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide unnamespaced logger.
///
/// Built from the environment on first use and never reconfigured. An invalid
/// `LOG_LEVEL` is reported through it as a warn line.
pub fn logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| Logger::from_env(Arc::new(StdoutSink)))
}
