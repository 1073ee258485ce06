//! Process-wide shutdown signal.
//!
//! Write-once flag set by the first SIGTERM/SIGINT, observed by every
//! wait in the supervision loop. `sleep` is the interruptible wait
//! primitive: it returns early, reporting `true`, the moment the flag
//! is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

pub struct Shutdown {
    triggered: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            triggered: AtomicBool::new(false),
            notify: Notify::new(),
        })
    }

    /// Set the flag and wake every pending `sleep`. Only the first call
    /// does anything; the flag never resets.
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` or until shutdown is triggered, whichever
    /// comes first. Returns `true` if shutdown fired.
    pub async fn sleep(&self, duration: Duration) -> bool {
        // Register interest before checking the flag so a trigger
        // between the check and the select cannot be missed.
        let notified = self.notify.notified();
        if self.is_triggered() {
            return true;
        }
        tokio::select! {
            _ = notified => true,
            _ = tokio::time::sleep(duration) => self.is_triggered(),
        }
    }
}
