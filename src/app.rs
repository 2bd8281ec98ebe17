//! Application context.
//!
//! One value built at startup holding the configuration, the logger, the
//! optional database handle and the request handler. Components borrow it;
//! nothing is looked up globally.

use std::sync::Arc;

use axum::Router;

use crate::config::AppConfig;
use crate::database::{self, ConnectionFactory, Database};
use crate::error::AppError;
use crate::http::{default_router, with_middleware};
use crate::lifecycle::{LifecycleOrchestrator, ServiceAdapter};
use crate::observability::{Logger, LoggerSettings};

pub struct AppContext {
    config: AppConfig,
    logger: Logger,
    database: Option<Database>,
    handler: Option<Router>,
}

impl AppContext {
    /// Build the context and its logger.
    ///
    /// File logging is assembled when `logging.enabled` is set; otherwise
    /// the console logger is used.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let logger = if config.logging.enabled {
            Logger::assemble(&LoggerSettings::from(&config.logging))?
        } else {
            Logger::console()
        };
        Ok(Self {
            config,
            logger,
            database: None,
            handler: None,
        })
    }

    /// Open the configured database through `factory`.
    pub fn with_database(mut self, factory: &dyn ConnectionFactory) -> Result<Self, AppError> {
        self.database = self.logger.in_scope(|| database::open(&self.config.database, factory))?;
        Ok(self)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn set_handler(&mut self, handler: Router) {
        self.handler = Some(handler);
    }

    /// Serve the built-in `/` and `/time` routes.
    pub fn set_default_handler(&mut self) {
        self.handler = Some(default_router());
    }

    /// The opaque database handle downcast to the factory's type.
    pub fn database<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.database.clone()?.downcast::<T>().ok()
    }

    pub fn require_database(&self) -> Result<&Database, AppError> {
        self.database
            .as_ref()
            .ok_or_else(|| AppError::configuration("database is not configured"))
    }

    pub fn debug(&self, msg: &str) {
        self.logger.in_scope(|| tracing::debug!("{msg}"));
    }

    pub fn info(&self, msg: &str) {
        self.logger.in_scope(|| tracing::info!("{msg}"));
    }

    pub fn warn(&self, msg: &str) {
        self.logger.in_scope(|| tracing::warn!("{msg}"));
    }

    pub fn error(&self, msg: &str) {
        self.logger.in_scope(|| tracing::error!("{msg}"));
    }

    /// Orchestrator for the configured listener, handler wrapped in middleware.
    pub fn orchestrator(&self) -> LifecycleOrchestrator {
        let handler = self
            .handler
            .clone()
            .map(|router| with_middleware(router, &self.config.listener));
        LifecycleOrchestrator::new(self.config.listener.clone(), handler)
    }

    /// Service adapter around a fresh orchestrator.
    pub fn service(&self) -> Result<ServiceAdapter, AppError> {
        ServiceAdapter::new(self.config.service.clone(), self.orchestrator())
    }

    /// Foreground run until the interrupt signal.
    pub async fn run(&self) -> Result<(), AppError> {
        self.orchestrator().run_until_interrupt().await
    }
}
