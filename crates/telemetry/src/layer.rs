//! Bridge from `tracing` events into a [`Logger`].

use std::fmt;

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::entry::{ErrorRecord, LogContext};
use crate::level::LogLevel;
use crate::logger::Logger;

/// `tracing` layer that writes every event through a [`Logger`].
///
/// The event target becomes a child namespace, the `message` field becomes the
/// message and the remaining fields become the context.
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

fn map_level(level: &Level) -> LogLevel {
    if *level == Level::ERROR {
        LogLevel::Error
    } else if *level == Level::WARN {
        LogLevel::Warn
    } else if *level == Level::INFO {
        LogLevel::Info
    } else {
        LogLevel::Debug
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    context: LogContext,
    error: Option<ErrorRecord>,
}

impl EventVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.context.insert(field.name().to_string(), value);
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // Non-finite floats become null.
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if self.error.is_none() {
            self.error = Some(ErrorRecord::from_error(value));
        } else {
            self.insert(field, Value::from(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.insert(field, Value::from(format!("{value:?}")));
        }
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = map_level(metadata.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_default();
        self.logger.child(metadata.target()).log(
            level,
            &message,
            Some(&visitor.context),
            visitor.error.as_ref(),
        );
    }
}

/// Install a global `tracing` subscriber that routes events into `logger`.
///
/// `RUST_LOG` directives are honoured when present; otherwise the logger's own
/// threshold is used as the filter.
pub fn init_logging(logger: &Logger) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logger.config().min_level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(LoggerLayer::new(logger.clone()))
        .try_init()?;

    Ok(())
}
