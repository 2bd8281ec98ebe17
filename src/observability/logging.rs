//! Structured logger assembly.
//!
//! Builds one level core per configured severity: a `fmt` layer writing
//! through a [`RotatingWriter`] (optionally teed to the console) behind a
//! per-layer filter. All cores share one `Registry`, wrapped in a
//! [`Logger`] value owned by the application context.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Dispatch;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::schema::LoggingConfig;
use crate::error::AppError;
use crate::observability::rotating::{RotatingWriter, RotatingWriterConfig, WriteError};
use crate::observability::severity::{LevelRouting, Severity};
use crate::observability::sink::{ConsoleSink, FanOut, LogSink, SinkMakeWriter};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Event encoding for every level core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoder {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable single line.
    Console,
}

/// Inputs of a logger assembly.
#[derive(Debug, Clone)]
pub struct LoggerSettings {
    pub levels: Vec<Severity>,
    pub encoder: Encoder,
    pub directory: PathBuf,
    pub retention_days: u32,
    pub mirror_to_console: bool,
    pub show_caller: bool,
    pub routing: LevelRouting,
}

impl From<&LoggingConfig> for LoggerSettings {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            levels: config.level.and_above(),
            encoder: config.encoder,
            directory: PathBuf::from(&config.directory),
            retention_days: config.retention_days,
            mirror_to_console: config.log_in_console,
            show_caller: config.show_caller,
            routing: config.routing,
        }
    }
}

/// Process logger. Cheap to clone; every clone feeds the same cores.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    directory: Option<PathBuf>,
}

impl Logger {
    /// Assemble a file-backed logger.
    ///
    /// Creates the root log directory first; failure to do so fails the
    /// whole assembly before any writer exists.
    pub fn assemble(settings: &LoggerSettings) -> Result<Self, WriteError> {
        let directory = std::path::absolute(&settings.directory).map_err(|source| {
            WriteError::CreateDir {
                path: settings.directory.clone(),
                source,
            }
        })?;
        fs::create_dir_all(&directory).map_err(|source| WriteError::CreateDir {
            path: directory.clone(),
            source,
        })?;

        let cores: Vec<BoxedLayer> = settings
            .levels
            .iter()
            .map(|&level| {
                let writer: Arc<dyn LogSink> = Arc::new(RotatingWriter::new(
                    RotatingWriterConfig::daily(&directory, level, settings.retention_days),
                ));
                let sink: Arc<dyn LogSink> = if settings.mirror_to_console {
                    Arc::new(FanOut::new(vec![writer, Arc::new(ConsoleSink)]))
                } else {
                    writer
                };
                level_core(level, sink, settings)
            })
            .collect();

        let subscriber = Registry::default().with(cores);
        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            directory: Some(directory),
        })
    }

    /// Console-only logger used when file logging is disabled.
    pub fn console() -> Self {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("openapi_runtime=info,tower_http=info"));
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer());
        Self {
            dispatch: Dispatch::new(subscriber),
            directory: None,
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Absolute log root, if file-backed.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Run `f` with this logger as the current default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Install as the process-wide default. Succeeds at most once per process.
    pub fn install(&self) -> Result<(), AppError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|_| AppError::configuration("a process logger is already installed"))
    }
}

fn level_core(level: Severity, sink: Arc<dyn LogSink>, settings: &LoggerSettings) -> BoxedLayer {
    let routing = settings.routing;
    let accepts = filter_fn(move |meta| routing.accepts(level, meta));
    let layer = fmt::layer()
        .with_writer(SinkMakeWriter::new(sink, level))
        .with_ansi(false)
        .with_file(settings.show_caller)
        .with_line_number(settings.show_caller);

    match settings.encoder {
        Encoder::Json => layer.json().with_filter(accepts).boxed(),
        Encoder::Console => layer.with_filter(accepts).boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(dir: &Path) -> LoggerSettings {
        LoggerSettings {
            levels: vec![Severity::Info, Severity::Warn, Severity::Error],
            encoder: Encoder::Console,
            directory: dir.to_path_buf(),
            retention_days: 0,
            mirror_to_console: false,
            show_caller: false,
            routing: LevelRouting::Exact,
        }
    }

    #[test]
    fn assembly_creates_root_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("logs");

        let logger = Logger::assemble(&settings(&root)).unwrap();

        assert!(root.is_dir());
        assert_eq!(logger.directory(), Some(root.as_path()));
    }

    #[test]
    fn assembly_fails_when_root_cannot_be_created() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, "").unwrap();

        let err = Logger::assemble(&settings(&blocker.join("logs"))).err().unwrap();

        assert!(matches!(err, WriteError::CreateDir { .. }));
    }

    #[test]
    fn settings_from_config_enable_level_and_above() {
        let config = LoggingConfig {
            level: Severity::Error,
            ..LoggingConfig::default()
        };
        let s = LoggerSettings::from(&config);
        assert_eq!(s.levels.first(), Some(&Severity::Error));
        assert_eq!(s.levels.last(), Some(&Severity::Fatal));
    }
}
