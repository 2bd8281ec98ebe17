//! OS signal handling.
//!
//! - Foreground runs stop on the interrupt signal (Ctrl+C / SIGINT).
//! - Service runs also stop on SIGTERM, which is what service managers send.

use std::io;

/// Wait for the interrupt signal.
pub async fn interrupt() -> io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt signal received");
    Ok(())
}

/// Wait for SIGTERM or the interrupt signal.
#[cfg(unix)]
pub async fn terminate() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = term.recv() => {
            tracing::info!("terminate signal received");
            Ok(())
        }
        res = interrupt() => res,
    }
}

/// Wait for the interrupt signal.
#[cfg(not(unix))]
pub async fn terminate() -> io::Result<()> {
    interrupt().await
}
