//! Rolling Logger
//!
//! A `tracing` subscriber that keeps the most recent formatted lines in a
//! bounded in-memory ring buffer. On wasm every line is also echoed to the
//! browser console.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log capacity must be at least one line")]
    ZeroCapacity,
    #[error("a global logger is already installed")]
    AlreadyInitialized,
}

/// Wall-clock timestamps as `HH:MM:SS.mmm`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoTime;

impl FormatTime for ChronoTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Shared ring of formatted lines
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Result<Self, LoggerError> {
        if capacity == 0 {
            return Err(LoggerError::ZeroCapacity);
        }
        Ok(Self { lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))), capacity })
    }

    fn push(&self, line: String) {
        // A poisoned lock only means another writer panicked mid-push
        let mut lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Collects one event's output and commits it on drop
pub struct LineWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl io::Write for LineWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.pending);
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
            self.buffer.push(line.to_string());
        }
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter { buffer: self.clone(), pending: Vec::new() }
    }
}

/// Read side of an installed logger
#[derive(Debug, Clone)]
pub struct LogHandle {
    buffer: LogBuffer,
}

impl LogHandle {
    /// Oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.buffer.lines()
    }

    pub fn clear(&self) {
        self.buffer.clear();
    }
}

/// Subscriber writing into `buffer`, not installed anywhere
pub fn build_subscriber(buffer: LogBuffer, max_level: Level) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_writer(buffer)
        .with_timer(ChronoTime)
        .with_ansi(false)
        .with_max_level(max_level)
        .finish()
}

/// Install the global subscriber. Debug builds keep debug lines too.
pub fn init_logger(app_name: &str, capacity: usize) -> Result<LogHandle, LoggerError> {
    let buffer = LogBuffer::new(capacity)?;
    let level = if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(build_subscriber(buffer.clone(), level))
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    tracing::info!(app = app_name, capacity, "logger ready");
    Ok(LogHandle { buffer })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_lines_are_evicted() {
        let buffer = LogBuffer::new(2).unwrap();
        tracing::subscriber::with_default(build_subscriber(buffer.clone(), Level::INFO), || {
            tracing::info!("first");
            tracing::info!("second");
            tracing::info!("third");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("second"));
        assert!(lines[1].ends_with("third"));
    }

    #[test]
    fn test_level_filter_and_fields() {
        let buffer = LogBuffer::new(10).unwrap();
        tracing::subscriber::with_default(build_subscriber(buffer.clone(), Level::INFO), || {
            tracing::debug!("hidden");
            tracing::warn!(id = "t1", "update failed");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("id=\"t1\""));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(LogBuffer::new(0), Err(LoggerError::ZeroCapacity)));
    }
}
