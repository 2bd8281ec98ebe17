//! Rotating, level-partitioned log file writer.
//!
//! Every write resolves `directory/[date]/[segments...]/<level>.log`, creates
//! the parent directories, runs retention cleanup, then opens the file in
//! append mode, writes and closes it. No file handle outlives a write call,
//! so date rollover needs no timer and external log shippers may move files
//! freely.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::observability::retention::purge_expired;
use crate::observability::severity::Severity;

/// Daily date segment, `YYYY-MM-DD`.
pub const DAILY_LAYOUT: &str = "%Y-%m-%d";

/// A log write failure, naming the step that failed.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("creating log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("retention cleanup under {path}: {source}")]
    Retention {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("opening log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing to console: {0}")]
    Console(#[source] std::io::Error),
}

/// Settings for one [`RotatingWriter`].
#[derive(Debug, Clone)]
pub struct RotatingWriterConfig {
    /// Root output directory.
    pub directory: PathBuf,
    /// Severity this writer is bound to; also the file stem.
    pub level: Severity,
    /// `chrono` format for the date segment. `None` disables date partitioning.
    pub date_layout: Option<String>,
    /// Extra path segments between the date segment and the level file.
    pub segments: Vec<String>,
    /// Days a sub-directory is kept. `0` disables cleanup.
    pub retention_days: u32,
}

impl RotatingWriterConfig {
    /// Daily-partitioned writer for `level` under `directory`.
    pub fn daily(directory: impl Into<PathBuf>, level: Severity, retention_days: u32) -> Self {
        Self {
            directory: directory.into(),
            level,
            date_layout: Some(DAILY_LAYOUT.to_string()),
            segments: Vec::new(),
            retention_days,
        }
    }
}

/// Write sink bound to one severity level.
///
/// Writes are serialized by a per-writer lock held for the whole call,
/// including path resolution and cleanup. Writers for different levels
/// never share a lock or a file.
#[derive(Debug)]
pub struct RotatingWriter {
    config: RotatingWriterConfig,
    lock: Mutex<()>,
}

impl RotatingWriter {
    pub fn new(config: RotatingWriterConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn level(&self) -> Severity {
        self.config.level
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Path a write at `now` lands in.
    pub fn resolve_path(&self, now: DateTime<Local>) -> PathBuf {
        let mut path = self.config.directory.clone();
        if let Some(layout) = &self.config.date_layout {
            if !layout.is_empty() {
                path.push(now.format(layout).to_string());
            }
        }
        for segment in &self.config.segments {
            path.push(segment);
        }
        path.push(format!("{}.log", self.config.level));
        path
    }

    /// Append `payload` to the current file. Returns the number of bytes written.
    pub fn write(&self, payload: &[u8]) -> Result<usize, WriteError> {
        self.write_at(payload, Local::now())
    }

    pub(crate) fn write_at(&self, payload: &[u8], now: DateTime<Local>) -> Result<usize, WriteError> {
        // A poisoned lock only means another writer panicked mid-call; the
        // guarded state is `()`, so carry on.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let path = self.resolve_path(now);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        purge_expired(
            &self.config.directory,
            self.config.retention_days,
            SystemTime::from(now),
        )
        .map_err(|source| WriteError::Retention {
            path: self.config.directory.clone(),
            source,
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| WriteError::Open {
                path: path.clone(),
                source,
            })?;
        file.write_all(payload)
            .map_err(|source| WriteError::Write { path, source })?;
        Ok(payload.len())
    }
}
