//! Event sinks: the timestamped mutation journal and an in-memory capture.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};

use mirrorsync_core::{EventKind, SyncEvent};

/// Timestamp layout of journal lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Receives every mutation the synchronizer performs.
pub trait EventSink {
    /// Record one event. Must not fail the mutation it describes.
    fn record(&mut self, event: &SyncEvent);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn record(&mut self, event: &SyncEvent) {
        (**self).record(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn record(&mut self, event: &SyncEvent) {
        (**self).record(event);
    }
}

/// Format a journal line: `<yyyy-MM-dd HH:mm:ss> - <message>`.
pub fn format_entry(timestamp: NaiveDateTime, message: &str) -> String {
    format!("{} - {}", timestamp.format(TIMESTAMP_FORMAT), message)
}

/// Append-only text journal, echoed to stdout.
///
/// The file is opened (and created if missing) for each line and closed
/// again right away. Write failures are reported through tracing and
/// counted; they never propagate.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    echo: bool,
    write_failures: u64,
}

impl Journal {
    /// Create a journal appending to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            echo: true,
            write_failures: 0,
        }
    }

    /// Enable or disable echoing lines to stdout.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Number of lines that could not be written to the file.
    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }

    /// Write one timestamped line.
    pub fn write_line(&mut self, message: &str) {
        let entry = format_entry(Local::now().naive_local(), message);

        if self.echo {
            println!("{entry}");
        }

        if let Err(err) = self.append(&entry) {
            self.write_failures += 1;
            tracing::warn!(path = %self.path.display(), "Error writing to log file: {err}");
        }
    }

    fn append(&self, entry: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{entry}")
    }
}

impl EventSink for Journal {
    fn record(&mut self, event: &SyncEvent) {
        self.write_line(&event.to_string());
    }
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Vec<SyncEvent>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[SyncEvent] {
        &self.events
    }

    /// Journal messages of the recorded events.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Count recorded events of one kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// Remove and return all recorded events.
    pub fn take(&mut self) -> Vec<SyncEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &SyncEvent) {
        self.events.push(event.clone());
    }
}
