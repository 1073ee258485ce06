//! Geyser Daemon - self-healing supervisor for a Geyser-Standalone server
//!
//! Keeps the server process running, checks upstream release sources on
//! a fixed cadence, installs verified updates, and restarts the server
//! to apply them.

pub mod config;
pub mod download;
pub mod permissions;
pub mod server;
pub mod shutdown;
pub mod supervisor;
pub mod updater;

#[cfg(test)]
pub(crate) mod testutil;
