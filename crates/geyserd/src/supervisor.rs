//! The supervision loop.
//!
//! One sequential worker drives everything: when the server is down it
//! runs the update checks and starts it; while the server runs it waits
//! out the check interval, re-checks, and stops the server when an
//! update landed so the next iteration restarts it against the new
//! jars. Every wait is interruptible by the shutdown signal, and the
//! loop itself only ever exits because of it.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::server::ServerProcess;
use crate::shutdown::Shutdown;
use crate::updater::Updater;

pub struct Supervisor {
    config: Arc<Config>,
    shutdown: Arc<Shutdown>,
    server: ServerProcess,
    updater: Updater,
}

impl Supervisor {
    pub fn new(config: Arc<Config>, shutdown: Arc<Shutdown>) -> Self {
        Self {
            server: ServerProcess::new(config.clone()),
            updater: Updater::new(config.clone()),
            config,
            shutdown,
        }
    }

    /// Run until shutdown, then stop the server unconditionally. The
    /// child must never outlive the supervisor.
    pub async fn run(&mut self) {
        while !self.shutdown.is_triggered() {
            if let Err(e) = self.cycle().await {
                error!("Error in supervision loop, retrying shortly: {:#}", e);
                self.shutdown.sleep(self.config.retry_delay).await;
            }
        }

        info!("Supervision loop finished. Performing final shutdown...");
        self.server.stop().await;
    }

    /// One iteration of the check/start/wait/restart cycle.
    async fn cycle(&mut self) -> Result<()> {
        if !self.server.is_running() {
            info!("Server not running. Performing checks before startup...");
            self.updater.run_checks().await;
            // Start even when nothing was updated: on first run the
            // check above is what installs the jar.
            self.server.start()?;
        }

        if self.server.is_running() {
            if let Some(pid) = self.server.pid() {
                info!(
                    "Server is running (PID {}). Waiting {:?} or shutdown signal...",
                    pid, self.config.check_interval
                );
            }
            if self.shutdown.sleep(self.config.check_interval).await {
                return Ok(());
            }

            if self.server.is_running() && self.updater.run_checks().await {
                info!("Updates found and installed. Restarting server to apply changes...");
                // The next iteration's not-running branch restarts it,
                // re-verifying update state on the way.
                self.server.stop().await;
            }
        } else {
            warn!("Server is not running, will retry after a short delay.");
            self.shutdown.sleep(self.config.retry_delay).await;
        }

        Ok(())
    }
}
