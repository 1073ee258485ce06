//! Runtime configuration for the daemon.
//!
//! Endpoint URLs and wait durations live here rather than as scattered
//! constants so tests can point the updater at a local listener and
//! shrink the timers.

use std::time::Duration;

use geyser_common::DataDir;

/// Base URL of the Geyser download API.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://download.geysermc.org";

/// GitHub latest-release endpoint for the MCXboxBroadcast extension.
pub const DEFAULT_BROADCAST_API_URL: &str =
    "https://api.github.com/repos/MCXboxBroadcast/Broadcaster/releases/latest";

#[derive(Debug, Clone)]
pub struct Config {
    /// Writable directory holding the server jar, extensions, and
    /// version record.
    pub data: DataDir,
    /// Base URL for Geyser download API metadata and payloads.
    pub download_base: String,
    /// Latest-release endpoint for the tag-versioned extension.
    pub broadcast_api_url: String,
    /// Program used to run the server.
    pub server_program: String,
    /// Arguments passed to the server program.
    pub server_args: Vec<String>,
    /// How long to wait between update checks while the server runs.
    pub check_interval: Duration,
    /// How long to wait before retrying after a failed start or crash.
    pub retry_delay: Duration,
    /// How long the server gets to exit after SIGTERM before SIGKILL.
    pub stop_grace: Duration,
}

impl Config {
    pub fn new(data: DataDir) -> Self {
        let jar = data.standalone_jar();
        Self {
            data,
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            broadcast_api_url: DEFAULT_BROADCAST_API_URL.to_string(),
            server_program: "java".to_string(),
            server_args: vec![
                "-Xms128M".to_string(),
                "-Xmx1024M".to_string(),
                "-jar".to_string(),
                jar.display().to_string(),
            ],
            check_interval: Duration::from_secs(900),
            retry_delay: Duration::from_secs(30),
            stop_grace: Duration::from_secs(8),
        }
    }

    /// Configuration from the environment (data dir override only).
    pub fn from_env() -> Self {
        Self::new(DataDir::from_env())
    }

    /// Latest-build metadata endpoint for one Geyser download API
    /// project.
    pub fn project_api_url(&self, project: &str) -> String {
        format!(
            "{}/v2/projects/{}/versions/latest/builds/latest",
            self.download_base, project
        )
    }

    /// Payload URL for one build of a Geyser download API project.
    pub fn project_download_url(
        &self,
        project: &str,
        version: &str,
        build: u64,
        download: &str,
    ) -> String {
        format!(
            "{}/v2/projects/{}/versions/{}/builds/{}/downloads/{}",
            self.download_base, project, version, build, download
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_command_targets_the_jar() {
        let config = Config::new(DataDir::new("/data"));
        assert_eq!(config.server_program, "java");
        assert_eq!(
            config.server_args.last().unwrap(),
            "/data/Geyser-Standalone.jar"
        );
    }

    #[test]
    fn api_urls() {
        let mut config = Config::new(DataDir::new("/data"));
        config.download_base = "http://127.0.0.1:8080".to_string();
        assert_eq!(
            config.project_api_url("geyser"),
            "http://127.0.0.1:8080/v2/projects/geyser/versions/latest/builds/latest"
        );
        assert_eq!(
            config.project_download_url("geyser", "2.4.2", 712, "standalone"),
            "http://127.0.0.1:8080/v2/projects/geyser/versions/2.4.2/builds/712/downloads/standalone"
        );
    }
}
