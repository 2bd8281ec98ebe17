//! Crate-level error taxonomy.
//!
//! # Variants
//! - `Configuration`: missing or invalid required settings (fatal, never retried)
//! - `Filesystem`: a rotating log write failed at a named step
//! - `Bind`: the listener could not be started
//! - `ShutdownTimeout`: the grace period elapsed before the listener drained
//! - `Config` / `Delegated`: errors from external collaborators, passed through unchanged

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::observability::WriteError;

/// Boxed error returned by opaque collaborators (database factory and friends).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the runtime.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required setting missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Log directory creation, retention cleanup, or file write failed.
    #[error(transparent)]
    Filesystem(#[from] WriteError),

    /// Listener could not bind its address.
    #[error("failed to bind listener on {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The serve loop ended with an error after a successful bind.
    #[error("listener terminated: {0}")]
    Listener(#[source] std::io::Error),

    /// Graceful shutdown did not finish within the grace period.
    #[error("shutdown did not complete within {grace:?}; in-flight requests abandoned")]
    ShutdownTimeout { grace: Duration },

    /// The OS signal handler could not be installed.
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    /// Configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Opaque collaborator error.
    #[error(transparent)]
    Delegated(BoxError),
}

impl AppError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    /// Whether this error is a configuration problem.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::Configuration(_))
    }
}
