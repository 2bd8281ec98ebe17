//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the runtime.
//! All types derive Serde traits for deserialization from config files.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::observability::{Encoder, LevelRouting, Severity};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// File logging settings.
    pub logging: LoggingConfig,

    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// Relational database settings.
    pub database: DatabaseConfig,

    /// OS service registration settings.
    pub service: ServiceConfig,
}

/// File logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable the file-backed logger. When off, logs go to the console.
    pub enabled: bool,

    /// Root directory for log files (made absolute at startup).
    pub directory: String,

    /// Lowest severity to enable; every severity up to `fatal` gets a core.
    pub level: Severity,

    /// Days a dated log directory is kept (0 = forever).
    pub retention_days: u32,

    /// Mirror every file event to stdout.
    pub log_in_console: bool,

    /// Attach file and line of the call site.
    pub show_caller: bool,

    /// Event encoding (json, console).
    pub encoder: Encoder,

    /// Level routing (exact, threshold).
    pub routing: LevelRouting,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: "log".to_string(),
            level: Severity::Info,
            retention_days: 7,
            log_in_console: false,
            show_caller: false,
            encoder: Encoder::Json,
            routing: LevelRouting::Exact,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Enable the HTTP listener.
    pub enabled: bool,

    /// Listen address: a bare port ("8080") or "host:port".
    pub address: String,

    /// Shutdown grace period in seconds.
    #[serde(alias = "waitfor")]
    pub wait_for_secs: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: "8080".to_string(),
            wait_for_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

impl ListenerConfig {
    /// Resolve the configured address. A bare port binds all interfaces.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let raw = self.address.trim();
        let raw = raw.strip_prefix(':').unwrap_or(raw);
        if let Ok(port) = raw.parse::<u16>() {
            return Ok(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port)));
        }
        raw.parse::<SocketAddr>()
            .map_err(|e| format!("invalid listen address {:?}: {}", self.address, e))
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.wait_for_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database selection and endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Kind to open ("mysql", "mssql", "sqlserver"); empty disables the database.
    #[serde(rename = "use")]
    pub kind: String,

    pub mysql: SqlEndpoint,

    pub mssql: SqlEndpoint,
}

/// Connection settings shared by all SQL dialects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SqlEndpoint {
    /// Server host.
    pub path: String,
    pub port: String,
    /// Extra driver query parameters.
    pub config: String,
    pub dbname: String,
    pub username: String,
    pub password: String,
    /// Table name prefix.
    pub prefix: String,
    /// Use singular table names.
    pub singular: bool,
    /// Storage engine hint (MySQL).
    pub engine: String,
    pub max_idle_conns: u32,
    pub max_open_conns: u32,
    /// ORM log verbosity (silent, error, warn, info).
    pub log_mode: String,
}

impl Default for SqlEndpoint {
    fn default() -> Self {
        Self {
            path: "127.0.0.1".to_string(),
            port: String::new(),
            config: String::new(),
            dbname: String::new(),
            username: String::new(),
            password: String::new(),
            prefix: String::new(),
            singular: false,
            engine: "InnoDB".to_string(),
            max_idle_conns: 10,
            max_open_conns: 100,
            log_mode: "error".to_string(),
        }
    }
}

/// OS service registration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(alias = "display-name")]
    pub display_name: String,
    pub description: String,
}
