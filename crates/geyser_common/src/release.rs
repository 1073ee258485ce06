//! Remote release metadata and the HTTP client wrapper.
//!
//! Two upstream shapes are consumed: the Geyser download API
//! (build-numbered projects) and the GitHub releases API (tagged
//! MCXboxBroadcast releases). Only the fields named here are relied on;
//! everything else in the responses is ignored.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Timeout for JSON metadata requests.
const METADATA_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for a whole artifact transfer.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Latest-build response from the Geyser download API.
///
/// `GET {base}/v2/projects/{project}/versions/latest/builds/latest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeyserBuild {
    pub version: String,
    pub build: u64,
    #[serde(default)]
    pub downloads: HashMap<String, GeyserDownload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeyserDownload {
    pub sha256: String,
}

impl GeyserBuild {
    /// Expected checksum for one download key, if the API listed it.
    pub fn sha256(&self, key: &str) -> Option<&str> {
        self.downloads.get(key).map(|d| d.sha256.as_str())
    }
}

/// GitHub release information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    /// `"sha256:<hex>"` as reported by the releases API.
    pub digest: Option<String>,
}

impl GitHubRelease {
    /// Find an asset by exact file name.
    pub fn find_asset(&self, name: &str) -> Option<&GitHubAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

impl GitHubAsset {
    /// Hex digest with the `sha256:` scheme prefix stripped.
    pub fn sha256(&self) -> Option<&str> {
        self.digest
            .as_deref()
            .map(|d| d.strip_prefix("sha256:").unwrap_or(d))
    }
}

/// HTTP client for release metadata and artifact payloads.
pub struct ReleaseClient {
    client: reqwest::Client,
}

impl ReleaseClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(format!("geyserd/{}", env!("CARGO_PKG_VERSION")))
                .timeout(METADATA_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Fetch and parse a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned {}", url, response.status());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// Open a streaming download. The whole transfer is bounded by the
    /// download timeout; callers consume the body chunk by chunk.
    pub async fn get_stream(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Download of {} returned {}", url, response.status());
        }

        Ok(response)
    }
}

impl Default for ReleaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_geyser_build_response() {
        let json = r#"{
            "build": 712,
            "version": "2.4.2",
            "time": "2025-01-01T00:00:00Z",
            "downloads": {
                "standalone": { "name": "Geyser-Standalone.jar", "sha256": "abc123" }
            }
        }"#;
        let build: GeyserBuild = serde_json::from_str(json).unwrap();
        assert_eq!(build.build, 712);
        assert_eq!(build.version, "2.4.2");
        assert_eq!(build.sha256("standalone"), Some("abc123"));
        assert_eq!(build.sha256("spigot"), None);
    }

    #[test]
    fn parses_github_release_response() {
        let json = r#"{
            "tag_name": "v1.1.3",
            "prerelease": false,
            "assets": [
                {
                    "name": "MCXboxBroadcastExtension.jar",
                    "browser_download_url": "https://example.invalid/ext.jar",
                    "digest": "sha256:deadbeef"
                },
                {
                    "name": "MCXboxBroadcastStandalone.jar",
                    "browser_download_url": "https://example.invalid/standalone.jar",
                    "digest": null
                }
            ]
        }"#;
        let release: GitHubRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v1.1.3");

        let asset = release.find_asset("MCXboxBroadcastExtension.jar").unwrap();
        assert_eq!(asset.sha256(), Some("deadbeef"));

        let bare = release.find_asset("MCXboxBroadcastStandalone.jar").unwrap();
        assert_eq!(bare.sha256(), None);
        assert!(release.find_asset("missing.jar").is_none());
    }

    #[test]
    fn digest_without_scheme_passes_through() {
        let asset = GitHubAsset {
            name: "x.jar".into(),
            browser_download_url: "https://example.invalid/x.jar".into(),
            digest: Some("cafebabe".into()),
        };
        assert_eq!(asset.sha256(), Some("cafebabe"));
    }
}
