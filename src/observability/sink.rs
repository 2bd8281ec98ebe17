//! Log sinks and the bridge into `tracing-subscriber`.
//!
//! # Data Flow
//! ```text
//! fmt layer (formatted event bytes)
//!     → SinkMakeWriter / SinkWriter
//!     → LogSink (RotatingWriter | ConsoleSink | FanOut of both)
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

use crate::observability::rotating::{RotatingWriter, WriteError};
use crate::observability::severity::Severity;

/// Accepts a leveled, already formatted event.
pub trait LogSink: Send + Sync {
    fn write_event(&self, severity: Severity, payload: &[u8]) -> Result<usize, WriteError>;
}

impl LogSink for RotatingWriter {
    fn write_event(&self, _severity: Severity, payload: &[u8]) -> Result<usize, WriteError> {
        self.write(payload)
    }
}

/// Mirrors events to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_event(&self, _severity: Severity, payload: &[u8]) -> Result<usize, WriteError> {
        let mut out = io::stdout().lock();
        out.write_all(payload).map_err(WriteError::Console)?;
        Ok(payload.len())
    }
}

/// Writes every event to all inner sinks.
///
/// Each sink is attempted regardless of the others' outcome; the first
/// failure is returned once all have been tried.
#[derive(Clone, Default)]
pub struct FanOut {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanOut {
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

impl LogSink for FanOut {
    fn write_event(&self, severity: Severity, payload: &[u8]) -> Result<usize, WriteError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write_event(severity, payload) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(payload.len()),
        }
    }
}

/// `MakeWriter` handing formatted events of one severity to a sink.
#[derive(Clone)]
pub struct SinkMakeWriter {
    sink: Arc<dyn LogSink>,
    severity: Severity,
}

impl SinkMakeWriter {
    pub fn new(sink: Arc<dyn LogSink>, severity: Severity) -> Self {
        Self { sink, severity }
    }
}

impl<'a> MakeWriter<'a> for SinkMakeWriter {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            sink: self.sink.as_ref(),
            severity: self.severity,
        }
    }
}

/// Per-event writer. A failed sink write degrades to stderr so logging
/// never fails the caller.
pub struct SinkWriter<'a> {
    sink: &'a dyn LogSink,
    severity: Severity,
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Err(e) = self.sink.write_event(self.severity, buf) {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "log sink failed ({e}); event follows");
            let _ = err.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
