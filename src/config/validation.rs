//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges of enabled sections
//! - Reject unknown database kinds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Disabled sections are not checked

use std::fmt;

use crate::config::schema::AppConfig;
use crate::database::DatabaseKind;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check an already parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |field, message: String| errors.push(ValidationError { field, message });

    if config.logging.enabled && config.logging.directory.trim().is_empty() {
        fail("logging.directory", "must not be empty when logging is enabled".into());
    }

    if config.listener.enabled {
        if config.listener.address.trim().is_empty() {
            fail("listener.address", "must not be empty when the listener is enabled".into());
        } else if let Err(e) = config.listener.socket_addr() {
            fail("listener.address", e);
        }
        if config.listener.request_timeout_secs == 0 {
            fail("listener.request_timeout_secs", "must be greater than zero".into());
        }
    }

    let kind = config.database.kind.trim();
    if !kind.is_empty() && kind.parse::<DatabaseKind>().is_err() {
        fail("database.use", format!("unknown database kind {kind:?}"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
