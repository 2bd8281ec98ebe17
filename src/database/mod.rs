//! Relational database collaborator.
//!
//! The runtime only selects a dialect, validates the endpoint and renders a
//! DSN; opening the connection pool is left to a [`ConnectionFactory`]
//! supplied by the application. The returned handle is opaque.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::schema::{DatabaseConfig, SqlEndpoint};
use crate::error::{AppError, BoxError};

/// Opaque database handle produced by a factory.
pub type Database = Arc<dyn Any + Send + Sync>;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKind {
    MySql,
    SqlServer,
}

impl FromStr for DatabaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(DatabaseKind::MySql),
            "mssql" | "sqlserver" => Ok(DatabaseKind::SqlServer),
            other => Err(format!("unknown database kind: {other}")),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::MySql => f.write_str("mysql"),
            DatabaseKind::SqlServer => f.write_str("sqlserver"),
        }
    }
}

impl DatabaseKind {
    /// Render the driver connection string for `endpoint`.
    pub fn dsn(&self, endpoint: &SqlEndpoint) -> String {
        match self {
            DatabaseKind::MySql => {
                let mut dsn = format!(
                    "{}:{}@tcp({}:{})/{}",
                    endpoint.username, endpoint.password, endpoint.path, endpoint.port, endpoint.dbname
                );
                if !endpoint.config.is_empty() {
                    dsn.push('?');
                    dsn.push_str(&endpoint.config);
                }
                dsn
            }
            DatabaseKind::SqlServer => format!(
                "sqlserver://{}:{}@{}:{}?database={}&encrypt=disable",
                endpoint.username, endpoint.password, endpoint.path, endpoint.port, endpoint.dbname
            ),
        }
    }

    /// Endpoint section of `config` used by this kind.
    pub fn endpoint<'a>(&self, config: &'a DatabaseConfig) -> &'a SqlEndpoint {
        match self {
            DatabaseKind::MySql => &config.mysql,
            DatabaseKind::SqlServer => &config.mssql,
        }
    }
}

/// Opens a database connection for a dialect.
pub trait ConnectionFactory {
    fn connect(&self, kind: DatabaseKind, endpoint: &SqlEndpoint, dsn: &str) -> Result<Database, BoxError>;
}

impl<F> ConnectionFactory for F
where
    F: Fn(DatabaseKind, &SqlEndpoint, &str) -> Result<Database, BoxError>,
{
    fn connect(&self, kind: DatabaseKind, endpoint: &SqlEndpoint, dsn: &str) -> Result<Database, BoxError> {
        self(kind, endpoint, dsn)
    }
}

/// Open the configured database, if any.
///
/// An empty or unrecognised kind yields `Ok(None)`. An endpoint without a
/// database name is a configuration error. Factory errors pass through.
pub fn open(config: &DatabaseConfig, factory: &dyn ConnectionFactory) -> Result<Option<Database>, AppError> {
    let kind = match config.kind.parse::<DatabaseKind>() {
        Ok(kind) => kind,
        Err(_) => return Ok(None),
    };
    let endpoint = kind.endpoint(config);
    if endpoint.dbname.trim().is_empty() {
        return Err(AppError::configuration(format!("{kind}: dbname is empty")));
    }

    let dsn = kind.dsn(endpoint);
    let db = factory
        .connect(kind, endpoint, &dsn)
        .map_err(AppError::Delegated)?;
    tracing::info!(kind = %kind, host = %endpoint.path, dbname = %endpoint.dbname, "database opened");
    Ok(Some(db))
}
