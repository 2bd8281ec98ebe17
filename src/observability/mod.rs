//! Observability subsystem: the log-sink pipeline.
//!
//! # Data Flow
//! ```text
//! tracing event
//!     → logging.rs (one level core per severity, per-layer filter)
//!     → sink.rs (MakeWriter bridge, console mirror, fan-out)
//!     → rotating.rs (directory/YYYY-MM-DD/<level>.log, append, close)
//!     → retention.rs (expired dated directories removed before each write)
//! ```
//!
//! # Design Decisions
//! - A level core accepts only its own severity unless threshold routing is configured
//! - No file handle is held between writes
//! - Retention runs synchronously on the write path, not on a timer
//! - Sink failures degrade to stderr; logging never fails a request

pub mod logging;
pub mod retention;
pub mod rotating;
pub mod severity;
pub mod sink;

pub use logging::{Encoder, Logger, LoggerSettings};
pub use rotating::{RotatingWriter, RotatingWriterConfig, WriteError, DAILY_LAYOUT};
pub use severity::{LevelRouting, Severity};
pub use sink::{ConsoleSink, FanOut, LogSink, SinkMakeWriter};
