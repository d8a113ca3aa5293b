// src/config.rs

//! Configuration for the remote-artifact database backend.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configures a [`GitHubArtifactDatabase`](crate::db::GitHubArtifactDatabase):
/// which repository's CI artifact to read and where to cache it locally.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GitHubArtifactConfig {
    /// Owner of the repository whose workflow publishes the example artifact.
    pub owner: String,
    /// Name of the repository.
    pub repo: String,
    /// Name of the workflow artifact to look for.
    #[serde(default = "default_artifact_name")]
    pub artifact_name: String,
    /// How long a locally cached artifact stays fresh before a newer one is
    /// fetched. Accepts humantime strings like "1day" or "30m".
    #[serde(default = "default_cache_timeout", with = "humantime_serde")]
    pub cache_timeout: Duration,
    /// Overrides the local cache directory. Defaults to
    /// `.exempla/github-artifacts/<owner>/<repo>` under the working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// API token used to list and download artifacts. Falls back to the
    /// `GITHUB_TOKEN` environment variable when unset.
    #[serde(default)]
    pub token: Option<String>,
    /// Base URL of the GitHub API. Only changed for GitHub Enterprise hosts
    /// and for tests that must not reach the real API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl GitHubArtifactConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            artifact_name: default_artifact_name(),
            cache_timeout: default_cache_timeout(),
            path: None,
            token: None,
            api_url: default_api_url(),
        }
    }
}

fn default_artifact_name() -> String {
    "exempla-example-db".to_string()
}

fn default_cache_timeout() -> Duration {
    // One day matches the cadence of a nightly CI artifact.
    Duration::from_secs(24 * 60 * 60)
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
