//! Rendering of log entries as JSON lines or human-readable text.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::entry::LogEntry;
use crate::level::LogLevel;

const RESET: &str = "\x1b[0m";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line (production).
    Json,
    /// Level-tagged, optionally coloured text (development).
    Pretty,
}

fn color_code(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "\x1b[36m",
        LogLevel::Info => "\x1b[32m",
        LogLevel::Warn => "\x1b[33m",
        LogLevel::Error => "\x1b[31m",
    }
}

/// Render `entry` without a trailing newline. Never fails.
pub fn render(entry: &LogEntry<'_>, format: OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Json => render_json(entry),
        OutputFormat::Pretty => render_pretty(entry, color),
    }
}

/// Serialise the entry as a single-line JSON object.
///
/// Contexts hold `serde_json::Value`, so the fallback is not reachable with
/// current types.
pub fn render_json(entry: &LogEntry<'_>) -> String {
    match serde_json::to_string(entry) {
        Ok(line) => line,
        Err(e) => fallback_json(entry, &e.to_string()),
    }
}

/// Minimal record emitted when the full entry cannot be serialised.
pub fn fallback_json(entry: &LogEntry<'_>, reason: &str) -> String {
    json!({
        "timestamp": entry.timestamp,
        "level": entry.level,
        "message": entry.message,
        "serializationError": reason,
    })
    .to_string()
}

/// Render `[TAG] message {context}` followed by error lines, if any.
pub fn render_pretty(entry: &LogEntry<'_>, color: bool) -> String {
    let mut out = String::with_capacity(entry.message.len() + 32);
    if color {
        let _ = write!(out, "{}[{}]{} ", color_code(entry.level), entry.level.tag(), RESET);
    } else {
        let _ = write!(out, "[{}] ", entry.level.tag());
    }
    out.push_str(&entry.message);

    if let Some(ctx) = entry.context {
        out.push(' ');
        // Unreachable for `Value` maps.
        match serde_json::to_string(ctx) {
            Ok(s) => out.push_str(&s),
            Err(_) => {
                let _ = write!(out, "{ctx:?}");
            }
        }
    }

    if let Some(err) = entry.error {
        let _ = write!(out, "\n  {}: {}", err.name, err.message);
        if let Some(stack) = err.stack.as_deref().filter(|s| !s.is_empty()) {
            out.push('\n');
            out.push_str(stack);
        }
    }

    out
}
