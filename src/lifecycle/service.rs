//! OS service integration.
//!
//! The adapter drives the same orchestrator `start`/`stop` as a foreground
//! run. The difference is who triggers the stop: the service manager sends
//! SIGTERM instead of a user pressing Ctrl+C.

use std::net::SocketAddr;
use std::path::Path;

use crate::config::{AppConfig, ServiceConfig};
use crate::error::AppError;
use crate::lifecycle::orchestrator::LifecycleOrchestrator;
use crate::lifecycle::signals;
use crate::lifecycle::state::LifecycleState;

/// Runs a [`LifecycleOrchestrator`] under an OS service manager.
pub struct ServiceAdapter {
    service: ServiceConfig,
    orchestrator: LifecycleOrchestrator,
}

impl ServiceAdapter {
    /// Wrap `orchestrator`. The service needs a non-empty name.
    pub fn new(service: ServiceConfig, orchestrator: LifecycleOrchestrator) -> Result<Self, AppError> {
        if service.name.trim().is_empty() {
            return Err(AppError::configuration("service name is empty"));
        }
        Ok(Self {
            service,
            orchestrator,
        })
    }

    pub fn name(&self) -> &str {
        &self.service.name
    }

    pub fn state(&self) -> LifecycleState {
        self.orchestrator.state()
    }

    /// Called by the service manager on start.
    pub async fn start(&mut self) -> Result<SocketAddr, AppError> {
        let addr = self.orchestrator.start().await?;
        tracing::info!(service = %self.service.name, address = %addr, "service started");
        Ok(addr)
    }

    /// Called by the service manager on stop.
    pub async fn stop(&mut self) -> Result<(), AppError> {
        let grace = self.orchestrator.grace_period();
        match self.orchestrator.stop(grace).await {
            Ok(()) => {
                tracing::info!(service = %self.service.name, "service stopped");
                Ok(())
            }
            Err(e @ AppError::ShutdownTimeout { .. }) => {
                tracing::warn!(service = %self.service.name, grace = ?grace, "shutdown deadline elapsed");
                Err(e)
            }
            Err(e) => {
                tracing::error!(service = %self.service.name, error = %e, "service stop failed");
                Err(e)
            }
        }
    }

    /// Serve until the service manager asks to stop.
    pub async fn run(&mut self) -> Result<(), AppError> {
        self.start().await?;
        self.orchestrator.wait_for(signals::terminate()).await?;
        self.stop().await
    }

    /// Render the unit for `config` without assembling a logger or binding.
    pub fn unit_for(config: &AppConfig, binary: &Path, config_path: &Path) -> Result<String, AppError> {
        let orchestrator = LifecycleOrchestrator::new(config.listener.clone(), None);
        let adapter = Self::new(config.service.clone(), orchestrator)?;
        Ok(adapter.systemd_unit(binary, config_path))
    }

    /// systemd unit registering this binary in service mode.
    pub fn systemd_unit(&self, binary: &Path, config_path: &Path) -> String {
        systemd_unit(&self.service, binary, config_path, self.orchestrator.grace_period().as_secs())
    }
}

/// Render a systemd unit for `service`.
///
/// The stop timeout leaves the manager a few seconds past the grace period
/// before it escalates to SIGKILL.
pub fn systemd_unit(service: &ServiceConfig, binary: &Path, config_path: &Path, grace_secs: u64) -> String {
    let description = [&service.description, &service.display_name, &service.name]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .map(String::as_str)
        .unwrap_or("openapi-runtime");

    format!(
        r#"[Unit]
Description={description}
After=network-online.target
Wants=network-online.target

[Service]
Type=simple
ExecStart={binary} service --config {config}
Restart=on-failure
KillSignal=SIGTERM
TimeoutStopSec={timeout}
SyslogIdentifier={name}

[Install]
WantedBy=multi-user.target
"#,
        description = description,
        binary = binary.display(),
        config = config_path.display(),
        timeout = grace_secs + 5,
        name = service.name,
    )
}
