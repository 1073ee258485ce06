//! Data directory layout for the managed server.
//!
//! Everything geyserd touches lives under one writable root (the
//! container mount): the server jar, the two extension jars, and the
//! persisted version record.

use std::path::{Path, PathBuf};

/// Default root inside the container.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Environment variable overriding the data directory root.
pub const DATA_DIR_ENV: &str = "GEYSER_DATA_DIR";

/// The writable directory holding the server jar, extensions, and
/// version record.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the data directory from `GEYSER_DATA_DIR`, falling back
    /// to `/data`.
    pub fn from_env() -> Self {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_DATA_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The managed server jar.
    pub fn standalone_jar(&self) -> PathBuf {
        self.root.join("Geyser-Standalone.jar")
    }

    /// GeyserConnect extension jar.
    pub fn connect_jar(&self) -> PathBuf {
        self.root.join("extensions").join("GeyserConnect.jar")
    }

    /// MCXboxBroadcast extension jar.
    pub fn broadcast_jar(&self) -> PathBuf {
        self.root
            .join("extensions")
            .join("MCXboxBroadcastExtension.jar")
    }

    /// Persisted version record.
    pub fn version_file(&self) -> PathBuf {
        self.root.join("version.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted() {
        let data = DataDir::new("/srv/geyser");
        assert_eq!(
            data.standalone_jar(),
            PathBuf::from("/srv/geyser/Geyser-Standalone.jar")
        );
        assert_eq!(
            data.connect_jar(),
            PathBuf::from("/srv/geyser/extensions/GeyserConnect.jar")
        );
        assert_eq!(
            data.broadcast_jar(),
            PathBuf::from("/srv/geyser/extensions/MCXboxBroadcastExtension.jar")
        );
        assert_eq!(data.version_file(), PathBuf::from("/srv/geyser/version.json"));
    }
}
