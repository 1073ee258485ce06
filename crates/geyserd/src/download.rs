//! Download-verify-promote for release artifacts.
//!
//! Payloads are streamed into a temporary file next to the destination
//! and only renamed over it once the SHA-256 digest matches, so the
//! server can never be started against a half-written or corrupt jar.
//! The temporary file is removed on every exit path.

use std::path::{Path, PathBuf};

use geyser_common::ReleaseClient;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] anyhow::Error),
    #[error("network error while streaming: {0}")]
    Stream(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("checksum mismatch: expected {expected}, actual {actual}")]
    DigestMismatch { expected: String, actual: String },
}

impl DownloadError {
    /// A mismatch means the payload arrived intact but wrong, which may
    /// indicate a corrupt or tampered upstream release.
    pub fn is_digest_mismatch(&self) -> bool {
        matches!(self, DownloadError::DigestMismatch { .. })
    }
}

/// Download `url` into `destination`, verifying its SHA-256 digest
/// (hex, case-insensitive) before the atomic promote.
pub async fn download_and_verify(
    client: &ReleaseClient,
    url: &str,
    destination: &Path,
    expected_sha256: &str,
) -> Result<(), DownloadError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp = temp_path(destination);
    let outcome = stream_and_verify(client, url, &temp, expected_sha256).await;
    let outcome = match outcome {
        Ok(()) => fs::rename(&temp, destination)
            .await
            .map_err(DownloadError::from),
        Err(e) => Err(e),
    };

    // The temp file must never outlive the operation, whatever happened.
    let _ = fs::remove_file(&temp).await;

    if outcome.is_ok() {
        info!("Successfully updated {}", destination.display());
    }
    outcome
}

fn temp_path(destination: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp", destination.display()))
}

async fn stream_and_verify(
    client: &ReleaseClient,
    url: &str,
    temp: &Path,
    expected_sha256: &str,
) -> Result<(), DownloadError> {
    info!("Downloading {}", url);
    let mut response = client.get_stream(url).await?;

    let mut file = fs::File::create(temp).await?;
    let mut hasher = Sha256::new();
    while let Some(chunk) = response.chunk().await? {
        hasher.update(&chunk);
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    drop(file);

    let actual = hex::encode(hasher.finalize());
    if !actual.eq_ignore_ascii_case(expected_sha256) {
        return Err(DownloadError::DigestMismatch {
            expected: expected_sha256.to_string(),
            actual,
        });
    }
    debug!("Checksum verified for {}", url);
    Ok(())
}
