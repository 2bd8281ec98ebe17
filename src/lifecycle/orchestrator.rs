//! Listener lifecycle orchestration.
//!
//! # Responsibilities
//! - Validate listener settings and bind before serving (bind errors surface to the caller)
//! - Serve on a background task so `start` never blocks
//! - Wait for a stop signal (the only suspension point of a run)
//! - Drain within a grace period, abandoning whatever is left when it elapses

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};

use crate::config::ListenerConfig;
use crate::error::AppError;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::lifecycle::state::LifecycleState;

struct RunningListener {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<io::Result<()>>,
}

enum Woken {
    Signal(io::Result<()>),
    Exited(Result<io::Result<()>, JoinError>),
}

/// Owns the HTTP listener for one run of the process.
pub struct LifecycleOrchestrator {
    config: ListenerConfig,
    handler: Option<Router>,
    state: LifecycleState,
    running: Option<RunningListener>,
}

impl LifecycleOrchestrator {
    pub fn new(config: ListenerConfig, handler: Option<Router>) -> Self {
        Self {
            config,
            handler,
            state: LifecycleState::Idle,
            running: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Address actually bound, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    /// Configured shutdown grace period.
    pub fn grace_period(&self) -> Duration {
        self.config.grace_period()
    }

    /// Bind the listener and start serving in the background.
    ///
    /// Configuration problems (disabled listener, empty or invalid address,
    /// missing handler) and bind failures leave the orchestrator Idle.
    pub async fn start(&mut self) -> Result<SocketAddr, AppError> {
        if self.state != LifecycleState::Idle {
            return Err(AppError::configuration(format!(
                "listener cannot be started from state {}",
                self.state
            )));
        }
        if !self.config.enabled {
            return Err(AppError::configuration("listener is disabled"));
        }
        if self.config.address.trim().is_empty() {
            return Err(AppError::configuration("listen address is empty"));
        }
        let handler = self
            .handler
            .clone()
            .ok_or_else(|| AppError::configuration("request handler is not set"))?;
        let address = self.config.socket_addr().map_err(AppError::Configuration)?;

        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| AppError::Bind { address, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| AppError::Bind { address, source })?;

        let shutdown = Shutdown::new();
        let stop = shutdown.notified();
        let task = tokio::spawn(async move {
            axum::serve(listener, handler.into_make_service_with_connect_info::<SocketAddr>())
                .with_graceful_shutdown(stop)
                .await
        });

        self.running = Some(RunningListener {
            local_addr,
            shutdown,
            task,
        });
        self.state = LifecycleState::Running;
        tracing::info!(address = %local_addr, "listener started");
        Ok(local_addr)
    }

    /// Stop accepting connections and drain within `grace`.
    ///
    /// On expiry the serve task is aborted and `ShutdownTimeout` is
    /// returned. Either way the orchestrator ends Stopped.
    pub async fn stop(&mut self, grace: Duration) -> Result<(), AppError> {
        let Some(mut running) = self.running.take() else {
            return Err(AppError::configuration(format!(
                "listener cannot be stopped from state {}",
                self.state
            )));
        };

        self.state = LifecycleState::Draining;
        tracing::info!(grace = ?grace, "draining listener");
        running.shutdown.trigger();

        let outcome = tokio::time::timeout(grace, &mut running.task).await;
        self.state = LifecycleState::Stopped;
        match outcome {
            Ok(exit) => {
                exit_result(exit)?;
                tracing::info!("listener stopped");
                Ok(())
            }
            Err(_) => {
                running.task.abort();
                Err(AppError::ShutdownTimeout { grace })
            }
        }
    }

    /// Wait until `signal` resolves or the serve loop ends on its own.
    ///
    /// Returns `Ok` when the signal fired. A serve loop that ended first, or
    /// a signal that failed, is reported as an error and leaves the
    /// orchestrator Stopped.
    pub async fn wait_for<F>(&mut self, signal: F) -> Result<(), AppError>
    where
        F: Future<Output = io::Result<()>>,
    {
        let woken = {
            let running = self
                .running
                .as_mut()
                .ok_or_else(|| AppError::configuration("listener is not running"))?;
            tokio::select! {
                res = signal => Woken::Signal(res),
                res = &mut running.task => Woken::Exited(res),
            }
        };

        match woken {
            Woken::Signal(Ok(())) => Ok(()),
            Woken::Signal(Err(e)) => {
                tracing::error!(error = %e, "stop signal failed; stopping listener");
                let _ = self.stop(self.grace_period()).await;
                Err(AppError::Signal(e))
            }
            Woken::Exited(exit) => {
                self.running = None;
                self.state = LifecycleState::Stopped;
                exit_result(exit)?;
                Err(AppError::Listener(io::Error::other("listener exited before shutdown was requested")))
            }
        }
    }

    /// Start, block until `signal`, then stop with the configured grace period.
    pub async fn run_until<F>(&mut self, signal: F) -> Result<(), AppError>
    where
        F: Future<Output = io::Result<()>>,
    {
        self.start().await?;
        self.wait_for(signal).await?;
        self.stop(self.grace_period()).await
    }

    /// Foreground run: serve until the interrupt signal.
    pub async fn run_until_interrupt(&mut self) -> Result<(), AppError> {
        self.run_until(signals::interrupt()).await
    }
}

fn exit_result(exit: Result<io::Result<()>, JoinError>) -> Result<(), AppError> {
    match exit {
        Ok(res) => res.map_err(AppError::Listener),
        Err(e) => Err(AppError::Listener(io::Error::other(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    fn local(address: &str) -> ListenerConfig {
        ListenerConfig {
            address: address.to_string(),
            ..ListenerConfig::default()
        }
    }

    fn hello() -> Router {
        Router::new().route("/", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn empty_address_stays_idle() {
        let mut orch = LifecycleOrchestrator::new(local(""), Some(hello()));

        let err = orch.start().await.unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(orch.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn missing_handler_is_configuration_error() {
        let mut orch = LifecycleOrchestrator::new(local("127.0.0.1:0"), None);
        assert!(orch.start().await.unwrap_err().is_configuration());
        assert_eq!(orch.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn disabled_listener_is_configuration_error() {
        let mut config = local("127.0.0.1:0");
        config.enabled = false;
        let mut orch = LifecycleOrchestrator::new(config, Some(hello()));
        assert!(orch.start().await.unwrap_err().is_configuration());
    }

    #[tokio::test]
    async fn occupied_port_is_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();
        let mut orch = LifecycleOrchestrator::new(local(&addr.to_string()), Some(hello()));

        let err = orch.start().await.unwrap_err();

        assert!(matches!(err, AppError::Bind { .. }));
        assert_eq!(orch.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn idle_listener_stops_cleanly() {
        let mut orch = LifecycleOrchestrator::new(local("127.0.0.1:0"), Some(hello()));
        orch.start().await.unwrap();
        assert_eq!(orch.state(), LifecycleState::Running);

        orch.stop(Duration::from_secs(1)).await.unwrap();

        assert_eq!(orch.state(), LifecycleState::Stopped);
        assert!(orch.start().await.is_err());
    }

    #[tokio::test]
    async fn stop_before_start_is_rejected() {
        let mut orch = LifecycleOrchestrator::new(local("127.0.0.1:0"), Some(hello()));
        assert!(orch.stop(Duration::from_millis(10)).await.is_err());
        assert_eq!(orch.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn run_until_returns_after_signal() {
        let mut orch = LifecycleOrchestrator::new(local("127.0.0.1:0"), Some(hello()));
        let signal = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        };

        orch.run_until(signal).await.unwrap();

        assert_eq!(orch.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn failed_signal_stops_the_listener() {
        let mut orch = LifecycleOrchestrator::new(local("127.0.0.1:0"), Some(hello()));
        let addr = orch.start().await.unwrap();

        let err = orch
            .wait_for(async { Err(io::Error::other("signal handler unavailable")) })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Signal(_)));
        assert_eq!(orch.state(), LifecycleState::Stopped);
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
