//! In-memory log capture for the terminal front end.
//!
//! A raw terminal cannot show `fmt` output, so the TUI installs a
//! [`LogCollector`] layer instead and renders the captured entries in its
//! Logs panel through a [`LogReader`].

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// A single captured log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Seconds since the collector was created.
    pub elapsed_secs: f64,
    pub level: Level,
    /// Target module path.
    pub target: String,
    pub message: String,
    /// Remaining structured fields rendered as `key=value` pairs.
    pub fields: String,
}

#[derive(Debug)]
struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    start_time: Instant,
}

impl LogBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            start_time: Instant::now(),
        }
    }

    fn push(&mut self, level: Level, target: String, visitor: FieldVisitor) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            elapsed_secs: self.start_time.elapsed().as_secs_f64(),
            level,
            target,
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// A `tracing` layer that keeps the most recent events in a bounded buffer.
#[derive(Debug, Clone)]
pub struct LogCollector {
    buffer: Arc<Mutex<LogBuffer>>,
}

impl LogCollector {
    /// Create a collector that keeps at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(LogBuffer::new(capacity.max(1)))),
        }
    }

    pub fn reader(&self) -> LogReader {
        LogReader {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        if let Ok(mut buf) = self.buffer.lock() {
            buf.push(*metadata.level(), metadata.target().to_string(), visitor);
        }
    }
}

/// A read handle for the log buffer.
#[derive(Debug, Clone)]
pub struct LogReader {
    buffer: Arc<Mutex<LogBuffer>>,
}

impl LogReader {
    /// Snapshot of all captured entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer
            .lock()
            .map(|buf| buf.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().map(|buf| buf.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits an event into its `message` and the remaining fields.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: String,
}

impl FieldVisitor {
    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}
