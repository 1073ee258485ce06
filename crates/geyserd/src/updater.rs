//! Per-artifact update checks.
//!
//! Three artifacts are tracked: the Geyser-Standalone server jar and
//! the GeyserConnect extension (build-numbered, served by the Geyser
//! download API) and the MCXboxBroadcast extension (tag-versioned
//! GitHub releases). The two build-numbered artifacts share one checker
//! parameterized by a descriptor; tags are compared only for
//! inequality since GitHub tags carry no ordering.
//!
//! A check never fails upward: any error is logged and reported as
//! "no update this cycle". The version record is written only after a
//! download has been verified and promoted, so a failed cycle leaves
//! no partial state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use geyser_common::version_store::{
    KEY_GEYSER_CONNECT, KEY_GEYSER_STANDALONE, KEY_MCXBOX_BROADCAST,
};
use geyser_common::{GeyserBuild, GitHubRelease, ReleaseClient, VersionId, VersionStore};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::download::{self, DownloadError};

/// Release asset installed for the tag-versioned extension.
const BROADCAST_ASSET_NAME: &str = "MCXboxBroadcastExtension.jar";

/// One build-numbered artifact on the Geyser download API.
struct BuildArtifact {
    /// Human name for log lines.
    name: &'static str,
    /// Project slug in the download API.
    project: &'static str,
    /// Key within the build's download listing.
    download: &'static str,
    /// Version record key.
    record_key: &'static str,
    destination: PathBuf,
}

pub struct Updater {
    config: Arc<Config>,
    client: ReleaseClient,
    store: VersionStore,
}

impl Updater {
    pub fn new(config: Arc<Config>) -> Self {
        let store = VersionStore::new(config.data.version_file());
        Self {
            config,
            client: ReleaseClient::new(),
            store,
        }
    }

    fn build_artifacts(&self) -> [BuildArtifact; 2] {
        [
            BuildArtifact {
                name: "Geyser-Standalone",
                project: "geyser",
                download: "standalone",
                record_key: KEY_GEYSER_STANDALONE,
                destination: self.config.data.standalone_jar(),
            },
            BuildArtifact {
                name: "GeyserConnect",
                project: "geyserconnect",
                download: "geyserconnect",
                record_key: KEY_GEYSER_CONNECT,
                destination: self.config.data.connect_jar(),
            },
        ]
    }

    /// Run every checker once, sequentially. Individual failures are
    /// absorbed; returns whether anything was installed.
    pub async fn run_checks(&self) -> bool {
        info!("Starting update check cycle");
        let mut updated = false;
        for artifact in &self.build_artifacts() {
            updated |= self.check_build_artifact(artifact).await;
        }
        updated |= self.check_broadcast().await;

        if updated {
            info!("Updates were installed.");
        } else {
            info!("No new updates found.");
        }
        updated
    }

    async fn check_build_artifact(&self, artifact: &BuildArtifact) -> bool {
        match self.try_build_artifact(artifact).await {
            Ok(updated) => updated,
            Err(e) => {
                log_check_failure(artifact.name, &e);
                false
            }
        }
    }

    async fn try_build_artifact(&self, artifact: &BuildArtifact) -> Result<bool> {
        debug!("Checking for {} updates...", artifact.name);
        let local = self.store.build(artifact.record_key);

        let url = self.config.project_api_url(artifact.project);
        let remote: GeyserBuild = self.client.get_json(&url).await?;

        if remote.build <= local {
            debug!("{} is up to date (build {})", artifact.name, local);
            return Ok(false);
        }

        info!(
            "New {} version found: build {}",
            artifact.name, remote.build
        );
        let Some(sha256) = remote.sha256(artifact.download) else {
            warn!(
                "Build {} of {} lists no '{}' download, skipping",
                remote.build, artifact.project, artifact.download
            );
            return Ok(false);
        };
        let url = self.config.project_download_url(
            artifact.project,
            &remote.version,
            remote.build,
            artifact.download,
        );
        download::download_and_verify(&self.client, &url, &artifact.destination, sha256).await?;
        self.store
            .record(artifact.record_key, VersionId::Build(remote.build))?;
        Ok(true)
    }

    async fn check_broadcast(&self) -> bool {
        match self.try_broadcast().await {
            Ok(updated) => updated,
            Err(e) => {
                log_check_failure("MCXboxBroadcast", &e);
                false
            }
        }
    }

    async fn try_broadcast(&self) -> Result<bool> {
        debug!("Checking for MCXboxBroadcast updates...");
        let local = self.store.tag(KEY_MCXBOX_BROADCAST);

        let remote: GitHubRelease = self
            .client
            .get_json(&self.config.broadcast_api_url)
            .await?;

        if remote.tag_name == local {
            debug!("MCXboxBroadcast is up to date (version {})", local);
            return Ok(false);
        }

        info!("New MCXboxBroadcast version found: {}", remote.tag_name);
        let Some(asset) = remote.find_asset(BROADCAST_ASSET_NAME) else {
            warn!(
                "Release {} has no {} asset, skipping",
                remote.tag_name, BROADCAST_ASSET_NAME
            );
            return Ok(false);
        };
        let Some(sha256) = asset.sha256() else {
            warn!(
                "Asset {} in release {} carries no digest, skipping",
                asset.name, remote.tag_name
            );
            return Ok(false);
        };

        download::download_and_verify(
            &self.client,
            &asset.browser_download_url,
            &self.config.data.broadcast_jar(),
            sha256,
        )
        .await?;
        self.store
            .record(KEY_MCXBOX_BROADCAST, VersionId::Tag(remote.tag_name.clone()))?;
        Ok(true)
    }
}

/// Fetch problems are routine; a rejected download means the payload
/// arrived but did not match its published digest, which deserves more
/// attention.
fn log_check_failure(name: &str, err: &anyhow::Error) {
    match err.downcast_ref::<DownloadError>() {
        Some(e) if e.is_digest_mismatch() => {
            error!("Update for {} rejected: {}", name, e);
        }
        _ => warn!("Update check for {} failed: {:#}", name, err),
    }
}
