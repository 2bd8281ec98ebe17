//! HTTP service runtime library.
//!
//! Loads configuration, wires a level-partitioned rotating file logger,
//! optionally opens a database through an application-supplied factory,
//! serves an axum `Router`, and shuts down within a grace period on signal.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use app::AppContext;
pub use config::schema::AppConfig;
pub use error::{AppError, BoxError};
pub use lifecycle::{LifecycleOrchestrator, LifecycleState, ServiceAdapter};
pub use observability::{Logger, RotatingWriter, Severity};
