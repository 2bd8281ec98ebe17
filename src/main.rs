//! `openapi-runtime` binary.
//!
//! ```text
//! openapi-runtime run --config app.toml       foreground, stops on Ctrl+C
//! openapi-runtime service --config app.toml   under a service manager, stops on SIGTERM
//! openapi-runtime unit --config app.toml      print a systemd unit
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use openapi_runtime::config::{load_config, ConfigWatcher};
use openapi_runtime::{AppContext, AppError, ServiceAdapter};

#[derive(Parser)]
#[command(name = "openapi-runtime")]
#[command(about = "Bootstrap and serve an HTTP API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve in the foreground until interrupted
    Run {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Serve under an OS service manager
    Service {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Print a systemd unit for service mode
    Unit {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        /// Binary path for ExecStart (defaults to this executable)
        #[arg(short, long)]
        binary: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::ShutdownTimeout { .. }) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("openapi-runtime: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Run { config } => {
            let ctx = bootstrap(&config)?;
            let _watcher = watch(&config);
            if let Err(e) = ctx.run().await {
                if let AppError::ShutdownTimeout { grace } = &e {
                    tracing::warn!(grace = ?grace, "shutdown deadline elapsed");
                }
                return Err(e);
            }
            tracing::info!("shutdown complete");
            Ok(())
        }
        Commands::Service { config } => {
            let ctx = bootstrap(&config)?;
            let _watcher = watch(&config);
            ctx.service()?.run().await?;
            tracing::info!("shutdown complete");
            Ok(())
        }
        Commands::Unit { config, binary } => {
            let app_config = load_config(&config)?;
            let binary = match binary {
                Some(path) => path,
                None => std::env::current_exe().map_err(|e| AppError::Delegated(Box::new(e)))?,
            };
            let config = std::path::absolute(&config).map_err(|e| AppError::Delegated(Box::new(e)))?;
            print!("{}", ServiceAdapter::unit_for(&app_config, &binary, &config)?);
            Ok(())
        }
    }
}

fn bootstrap(path: &Path) -> Result<AppContext, AppError> {
    let mut ctx = AppContext::new(load_config(path)?)?;
    ctx.logger().install()?;
    ctx.set_default_handler();

    let config = ctx.config();
    tracing::info!(
        address = %config.listener.address,
        grace_secs = config.listener.wait_for_secs,
        file_logging = config.logging.enabled,
        "configuration loaded"
    );
    Ok(ctx)
}

/// Report on-disk config changes; applying them needs a restart.
fn watch(path: &Path) -> Option<notify::RecommendedWatcher> {
    let (watcher, mut updates) = ConfigWatcher::new(path);
    let handle = match watcher.run() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(error = %e, "config watcher unavailable");
            return None;
        }
    };
    tokio::spawn(async move {
        while updates.recv().await.is_some() {
            tracing::warn!("configuration changed on disk; restart to apply");
        }
    });
    Some(handle)
}
