//! Managed server process lifecycle.
//!
//! Exactly one child process exists at any time, owned here. Liveness
//! is polled, never event-driven: a handle whose process has exited
//! counts as "no process" on the next observation.

use std::sync::Arc;

use anyhow::{Context, Result};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::config::Config;

pub struct ServerProcess {
    config: Arc<Config>,
    child: Option<Child>,
}

impl ServerProcess {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            child: None,
        }
    }

    /// Spawn the server. Valid only when no live child is held.
    ///
    /// A missing jar or an OS spawn failure leaves the state unchanged;
    /// the caller decides whether to retry.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            anyhow::bail!("Server is already running");
        }

        let jar = self.config.data.standalone_jar();
        if !jar.exists() {
            anyhow::bail!("{} not found, cannot start server", jar.display());
        }

        info!("Starting Geyser-Standalone server...");
        let child = Command::new(&self.config.server_program)
            .args(&self.config.server_args)
            .current_dir(self.config.data.root())
            .kill_on_drop(true)
            .spawn()
            .context("Failed to spawn server process")?;

        if let Some(pid) = child.id() {
            info!("Server started (PID {})", pid);
        }
        self.child = Some(child);
        Ok(())
    }

    /// Whether the child exists and has not exited. An exited child is
    /// reaped and the handle cleared.
    pub fn is_running(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                info!("Server process exited with {}", status);
                self.child = None;
                false
            }
            Err(e) => {
                warn!("Failed to poll server process: {}", e);
                self.child = None;
                false
            }
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|c| c.id())
    }

    /// Graceful-then-forced stop. A no-op when nothing is running, so
    /// repeated calls are harmless.
    pub async fn stop(&mut self) {
        if !self.is_running() {
            debug!("Server is not running");
            return;
        }
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Some(pid) = child.id() {
            info!("Stopping Geyser-Standalone server (PID {})...", pid);
            if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                warn!("Failed to send SIGTERM: {}", e);
            }
        }

        match tokio::time::timeout(self.config.stop_grace, child.wait()).await {
            Ok(Ok(status)) => info!("Server stopped gracefully ({})", status),
            Ok(Err(e)) => warn!("Failed to wait for server exit: {}", e),
            Err(_) => {
                warn!(
                    "Server did not stop within {:?}. Forcing shutdown...",
                    self.config.stop_grace
                );
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill server process: {}", e);
                }
            }
        }
    }
}
