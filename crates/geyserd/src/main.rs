//! Geyser Daemon - supervises a Geyser-Standalone server and keeps it
//! up to date.

use std::sync::Arc;

use anyhow::Result;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, Level};

use geyserd::config::Config;
use geyserd::permissions;
use geyserd::shutdown::Shutdown;
use geyserd::supervisor::Supervisor;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Geyser Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(Config::from_env());

    if let Err(e) = permissions::check_write_access(config.data.root()) {
        permissions::report_permission_failure(config.data.root(), &e);
        std::process::exit(1);
    }
    info!("Permissions are correct.");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone())?;

    let mut supervisor = Supervisor::new(config, shutdown);
    supervisor.run().await;

    info!("Geyser Daemon exiting");
    Ok(())
}

/// Forward SIGTERM and SIGINT into the shutdown flag so every wait in
/// the supervision loop wakes immediately.
fn spawn_signal_listener(shutdown: Arc<Shutdown>) -> Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        info!("Shutdown signal ({}) received. Notifying main loop...", name);
        shutdown.trigger();
    });
    Ok(())
}
