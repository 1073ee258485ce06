//! Persisted version record.
//!
//! A small JSON object mapping artifact keys to the last successfully
//! installed version. The file on disk is the single source of truth:
//! it is re-read before every check and rewritten after every install,
//! so the record survives restarts and never goes stale in memory.
//!
//! A missing or unreadable file is never an error — it just means
//! "nothing installed yet", and every artifact compares as older than
//! anything remote.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Record key for the Geyser-Standalone server jar.
pub const KEY_GEYSER_STANDALONE: &str = "geyser_standalone";

/// Record key for the GeyserConnect extension.
pub const KEY_GEYSER_CONNECT: &str = "geyser_connect";

/// Record key for the MCXboxBroadcast extension.
pub const KEY_MCXBOX_BROADCAST: &str = "mcxbox_broadcast";

/// Installed version identifier for one artifact.
///
/// The Geyser download API numbers builds; the MCXboxBroadcast GitHub
/// releases use opaque tags. Tags are compared only for equality,
/// builds by magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionId {
    Build(u64),
    Tag(String),
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionId::Build(build) => write!(f, "build {}", build),
            VersionId::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

/// Read/write access to the version record file.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the full record from disk.
    ///
    /// Absent file yields an empty map. A malformed file is logged and
    /// also yields an empty map, so a corrupted record heals itself on
    /// the next successful install.
    pub fn load(&self) -> BTreeMap<String, VersionId> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("version record {} is corrupted, starting fresh: {}", self.path.display(), e);
                BTreeMap::new()
            }
        }
    }

    /// Last installed build number for `key`, or 0 if never installed.
    pub fn build(&self, key: &str) -> u64 {
        match self.load().get(key) {
            Some(VersionId::Build(build)) => *build,
            _ => 0,
        }
    }

    /// Last installed tag for `key`, or `"0"` if never installed.
    pub fn tag(&self, key: &str) -> String {
        match self.load().get(key) {
            Some(VersionId::Tag(tag)) => tag.clone(),
            _ => "0".to_string(),
        }
    }

    /// Record a newly installed version under `key`.
    ///
    /// Read-modify-write of the whole file, pretty-printed.
    pub fn record(&self, key: &str, version: VersionId) -> Result<()> {
        let mut record = self.load();
        record.insert(key.to_string(), version);
        let json = serde_json::to_string_pretty(&record)
            .context("Failed to serialize version record")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
