//! Severity levels and their mapping onto `tracing` metadata.
//!
//! `tracing` has no levels above `ERROR`, so `dpanic`, `panic` and `fatal`
//! are `ERROR` events whose target is the severity name:
//!
//! ```ignore
//! tracing::error!(target: "fatal", "database unreachable");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{Level, Metadata};

/// A named log verbosity tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    #[serde(rename = "dpanic")]
    DPanic,
    Panic,
    Fatal,
}

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
        Severity::Fatal,
    ];

    /// Label used in config files and as the log file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::DPanic => "dpanic",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        }
    }

    /// The `tracing` level events of this severity are emitted at.
    pub fn tracing_level(&self) -> Level {
        match self {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warn => Level::WARN,
            _ => Level::ERROR,
        }
    }

    /// Every severity from `self` up to `fatal`.
    pub fn and_above(self) -> Vec<Severity> {
        Self::ALL.iter().copied().filter(|s| *s >= self).collect()
    }

    /// Classify an event. `TRACE` events have no severity.
    pub fn of(meta: &Metadata<'_>) -> Option<Severity> {
        let level = *meta.level();
        if level == Level::TRACE {
            None
        } else if level == Level::DEBUG {
            Some(Severity::Debug)
        } else if level == Level::INFO {
            Some(Severity::Info)
        } else if level == Level::WARN {
            Some(Severity::Warn)
        } else {
            Some(match meta.target() {
                "dpanic" => Severity::DPanic,
                "panic" => Severity::Panic,
                "fatal" => Severity::Fatal,
                _ => Severity::Error,
            })
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised severity label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity level: {0}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|sev| sev.as_str() == lower)
            .ok_or(ParseSeverityError(s.to_string()))
    }
}

/// How a level core decides which events it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelRouting {
    /// A core accepts only events of exactly its own severity.
    #[default]
    Exact,
    /// A core accepts every event at or above its own severity.
    Threshold,
}

impl LevelRouting {
    /// Whether the core for `core` accepts an event with metadata `meta`.
    pub fn accepts(&self, core: Severity, meta: &Metadata<'_>) -> bool {
        match (Severity::of(meta), self) {
            (None, _) => false,
            (Some(sev), LevelRouting::Exact) => sev == core,
            (Some(sev), LevelRouting::Threshold) => sev >= core,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("dpanic".parse::<Severity>().unwrap(), Severity::DPanic);
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn and_above_ends_at_fatal() {
        assert_eq!(
            Severity::Error.and_above(),
            vec![Severity::Error, Severity::DPanic, Severity::Panic, Severity::Fatal]
        );
        assert_eq!(Severity::Fatal.and_above(), vec![Severity::Fatal]);
        assert_eq!(Severity::Debug.and_above().len(), 7);
    }

    #[test]
    fn escalated_severities_share_the_error_level() {
        assert_eq!(Severity::Fatal.tracing_level(), Level::ERROR);
        assert_eq!(Severity::Panic.tracing_level(), Level::ERROR);
        assert_eq!(Severity::Warn.tracing_level(), Level::WARN);
    }
}
