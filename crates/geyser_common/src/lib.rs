//! Geyser Common - Shared types for the geyserd supervisor
//!
//! Data directory layout, the persisted version record, and the remote
//! release metadata consumed by the update checkers.

pub mod paths;
pub mod release;
pub mod version_store;

pub use paths::DataDir;
pub use release::{GeyserBuild, GitHubAsset, GitHubRelease, ReleaseClient};
pub use version_store::{VersionId, VersionStore};
