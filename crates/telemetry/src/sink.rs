//! Output sinks for rendered log lines.
//!
//! Every sink writes one rendered entry with a single `write_all` while holding
//! its lock, so lines from concurrent callers never interleave.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Destination for rendered log entries. Writes are infallible to the caller.
pub trait LogSink: Send + Sync {
    /// Write one rendered entry followed by a newline.
    fn write_entry(&self, rendered: &str);
}

fn line_bytes(rendered: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(rendered.len() + 1);
    buf.extend_from_slice(rendered.as_bytes());
    buf.push(b'\n');
    buf
}

/// Writes to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_entry(&self, rendered: &str) {
        let mut out = io::stdout().lock();
        let _ = out.write_all(&line_bytes(rendered));
        let _ = out.flush();
    }
}

/// Appends to a file, creating it if missing.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` in append mode.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn write_entry(&self, rendered: &str) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = file.write_all(&line_bytes(rendered));
    }
}

/// Keeps lines in memory. Useful for asserting on log output.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn write_entry(&self, rendered: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rendered.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_lines() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.write_entry("one");
        sink.write_entry("two");
        assert_eq!(sink.lines(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_file_sink_appends_newline_terminated_lines() {
        let path = std::env::temp_dir().join(format!("meetbot-sink-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let sink = FileSink::open(&path).unwrap();
            sink.write_entry("{\"level\":\"info\"}");
        }
        {
            let sink = FileSink::open(&path).unwrap();
            sink.write_entry("[WARN] second");
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\"level\":\"info\"}\n[WARN] second\n");
        let _ = std::fs::remove_file(&path);
    }
}
