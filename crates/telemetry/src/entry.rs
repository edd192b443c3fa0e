//! Log entries and the values attached to them.

use std::backtrace::BacktraceStatus;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::level::LogLevel;

/// Structured metadata attached to a single log call.
///
/// Values are `serde_json::Value`, so every shape (string, number, boolean,
/// null, sequence, nested mapping) serialises without failure.
pub type LogContext = serde_json::Map<String, serde_json::Value>;

/// Structured error record carried by an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stack: Option<String>,
}

impl ErrorRecord {
    pub fn new(name: impl Into<String>, message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack,
        }
    }

    /// Record a Rust error value. `name` is the error's type name without its
    /// module path; no stack is attached.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self {
            name: short_type_name(std::any::type_name::<E>()).to_string(),
            message: err.to_string(),
            stack: None,
        }
    }

    /// Record an `anyhow::Error`, keeping its backtrace only if one was captured.
    ///
    /// `name` is the root cause's type name when it is one of the common std or
    /// `chrono` parse errors, else `"Error"`.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let backtrace = err.backtrace();
        let stack = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self {
            name: root_cause_name(err).to_string(),
            message: err.to_string(),
            stack,
        }
    }
}

fn root_cause_name(err: &anyhow::Error) -> &'static str {
    let root = err.root_cause();
    macro_rules! known {
        ($($ty:ty),* $(,)?) => {
            $(
                if root.is::<$ty>() {
                    return short_type_name(std::any::type_name::<$ty>());
                }
            )*
        };
    }
    known!(
        std::num::ParseIntError,
        std::num::ParseFloatError,
        std::num::TryFromIntError,
        std::str::Utf8Error,
        std::string::FromUtf8Error,
        std::str::ParseBoolError,
        chrono::ParseError,
    );
    "Error"
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).trim()
}

/// A single log record, built per call and dropped after it is written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry<'a> {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a LogContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a ErrorRecord>,
}

impl<'a> LogEntry<'a> {
    /// Build an entry stamped with the current time.
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        context: Option<&'a LogContext>,
        error: Option<&'a ErrorRecord>,
    ) -> Self {
        Self::at(Utc::now(), level, message, context, error)
    }

    /// Build an entry stamped with `timestamp`.
    ///
    /// An empty context is dropped, so `{}` and no context produce the same entry.
    pub fn at(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        context: Option<&'a LogContext>,
        error: Option<&'a ErrorRecord>,
    ) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            message: message.into(),
            context: context.filter(|ctx| !ctx.is_empty()),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_timestamp_is_iso8601_millis() {
        let entry = LogEntry::at(fixed_time(), LogLevel::Info, "hello", None, None);
        assert_eq!(entry.timestamp, "2026-10-18T09:30:00.000Z");
    }

    #[test]
    fn test_empty_context_is_dropped() {
        let empty = LogContext::new();
        let entry = LogEntry::at(fixed_time(), LogLevel::Info, "x", Some(&empty), None);
        assert!(entry.context.is_none());

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("context").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_non_empty_context_is_kept() {
        let mut ctx = LogContext::new();
        ctx.insert("userId".to_string(), json!("u_123"));
        ctx.insert("attempt".to_string(), json!(2));
        let entry = LogEntry::at(fixed_time(), LogLevel::Warn, "retry", Some(&ctx), None);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["context"], json!({"userId": "u_123", "attempt": 2}));
        assert_eq!(value["level"], json!("warn"));
    }

    #[test]
    fn test_error_record_passthrough() {
        let err = ErrorRecord::new("TypeError", "boom", Some("at handler (route.ts:12)".to_string()));
        let entry = LogEntry::at(fixed_time(), LogLevel::Error, "failed", None, Some(&err));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value["error"],
            json!({"name": "TypeError", "message": "boom", "stack": "at handler (route.ts:12)"})
        );
    }

    #[test]
    fn test_missing_stack_is_not_synthesized() {
        let err = ErrorRecord::new("Error", "no trace", None);
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, json!({"name": "Error", "message": "no trace"}));
    }

    #[test]
    fn test_from_error_uses_short_type_name() {
        let err = "abc".parse::<u32>().unwrap_err();
        let record = ErrorRecord::from_error(&err);
        assert_eq!(record.name, "ParseIntError");
        assert_eq!(record.message, err.to_string());
        assert!(record.stack.is_none());
    }

    #[test]
    fn test_from_anyhow_keeps_outer_message() {
        let err = anyhow::anyhow!("calendar token expired");
        let record = ErrorRecord::from_anyhow(&err);
        assert_eq!(record.name, "Error");
        assert_eq!(record.message, "calendar token expired");
    }

    #[test]
    fn test_from_anyhow_names_known_root_cause() {
        let parse_err = "abc".parse::<u32>().unwrap_err();
        let err = anyhow::Error::new(parse_err).context("reading retry count");
        let record = ErrorRecord::from_anyhow(&err);
        assert_eq!(record.name, "ParseIntError");
        assert_eq!(record.message, "reading retry count");

        let bad_time = chrono::DateTime::parse_from_rfc3339("yesterday").unwrap_err();
        assert_eq!(ErrorRecord::from_anyhow(&anyhow::Error::new(bad_time)).name, "ParseError");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("std::io::error::Error"), "Error");
        assert_eq!(short_type_name("my_crate::Wrapper<alloc::string::String>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
