//! Startup write-access check.
//!
//! Without write access to the data directory nothing else can work,
//! so this is the one condition fatal to the whole program.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::error;

const MARKER_NAME: &str = ".permission_test";

/// Write and delete a marker file to confirm the data directory is
/// writable.
pub fn check_write_access(dir: &Path) -> Result<()> {
    let marker = dir.join(MARKER_NAME);
    fs::write(&marker, "test")
        .with_context(|| format!("Cannot write to {}", dir.display()))?;
    fs::remove_file(&marker)
        .with_context(|| format!("Cannot delete marker in {}", dir.display()))?;
    Ok(())
}

/// Log the mount/ownership diagnostic for a failed permission check.
pub fn report_permission_failure(dir: &Path, err: &anyhow::Error) {
    error!("------------------------------------------------------------");
    error!("Permission denied: cannot write to {}: {:#}", dir.display(), err);
    error!("Please ensure the mounted host directory has the correct permissions.");
    error!("Example: 'sudo chown -R 1000:1000 ./your-data-directory'");
    error!("------------------------------------------------------------");
}
