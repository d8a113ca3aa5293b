// src/db/github.rs

//! Read-oriented backend sourcing its data from a GitHub Actions artifact.
//!
//! The artifact is a zip of a [`DirectoryBasedDatabase`](super::DirectoryBasedDatabase)
//! tree, typically published by a scheduled CI workflow. On first fetch the
//! backend locates the newest usable archive (a cached copy, or one downloaded
//! through the GitHub API), extracts it next to the cache, and serves every
//! later fetch from that snapshot. When no artifact can be produced at all the
//! backend warns once and behaves as empty from then on.
//!
//! Direct mutation is rejected: the data mirrors an immutable remote artifact,
//! so a local write would be silently lost on the next refresh. Wrap the
//! backend in [`ReadOnlyDatabase`](super::ReadOnlyDatabase) to share it with
//! code paths that expect writes to be accepted.

use crate::config::GitHubArtifactConfig;
use crate::db::ExampleDatabase;
use crate::db::directory::fetch_from_tree;
use crate::error::ExemplaError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("exempla/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifecycle of the local snapshot. Set exactly once: after leaving
/// `Uninitialized` an instance never initializes again.
#[derive(Debug)]
enum ArtifactState {
    Uninitialized,
    /// Initialization succeeded; fetches read from this extracted root.
    Ready(PathBuf),
    /// No usable artifact; every fetch yields nothing, silently.
    Disabled,
}

/// Backend reading examples from a repository's CI artifact.
#[derive(Debug)]
pub struct GitHubArtifactDatabase {
    config: GitHubArtifactConfig,
    cache_dir: PathBuf,
    state: Mutex<ArtifactState>,
}

#[derive(Deserialize)]
struct ArtifactListing {
    artifacts: Vec<ArtifactEntry>,
}

#[derive(Deserialize)]
struct ArtifactEntry {
    name: String,
    archive_download_url: String,
    created_at: DateTime<Utc>,
    expired: bool,
}

impl GitHubArtifactDatabase {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::from_config(GitHubArtifactConfig::new(owner, repo))
    }

    pub fn from_config(config: GitHubArtifactConfig) -> Self {
        let cache_dir = config.path.clone().unwrap_or_else(|| {
            PathBuf::from(".exempla")
                .join("github-artifacts")
                .join(&config.owner)
                .join(&config.repo)
        });
        Self {
            config,
            cache_dir,
            state: Mutex::new(ArtifactState::Uninitialized),
        }
    }

    /// Root of the extracted snapshot, once initialization has succeeded.
    /// The same path is returned for the lifetime of the instance.
    pub async fn cached_root(&self) -> Option<PathBuf> {
        match &*self.state.lock().await {
            ArtifactState::Ready(root) => Some(root.clone()),
            _ => None,
        }
    }

    /// True once initialization has failed to find a usable artifact.
    pub async fn is_disabled(&self) -> bool {
        matches!(*self.state.lock().await, ArtifactState::Disabled)
    }

    /// One-shot initialization: pick an artifact, extract it, return the root.
    /// Runs under the state lock, so concurrent first fetches wait rather than
    /// racing to download twice.
    async fn initialize(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir).await?;

        let cached = self.newest_cached_artifact().await;
        let fresh = match &cached {
            Some(path) => artifact_age(path)
                .await
                .is_some_and(|age| age < self.config.cache_timeout),
            None => false,
        };

        let artifact = if fresh {
            cached
        } else {
            match self.download_artifact().await {
                Ok(path) => Some(path),
                Err(e) => {
                    if cached.is_some() {
                        warn!(
                            owner = %self.config.owner,
                            repo = %self.config.repo,
                            error = %e,
                            "could not refresh example artifact; using an expired cached copy"
                        );
                    } else {
                        debug!(error = %e, "example artifact download failed");
                    }
                    cached
                }
            }
        };

        let artifact = artifact.context("no example artifact available")?;
        self.extract(&artifact).await
    }

    /// Newest zip in the cache directory. Archives are named by a UTC
    /// timestamp, so the lexicographically greatest file name wins.
    async fn newest_cached_artifact(&self) -> Option<PathBuf> {
        let mut entries = fs::read_dir(&self.cache_dir).await.ok()?;
        let mut newest: Option<PathBuf> = None;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "zip")
                && newest.as_ref().is_none_or(|n| n.file_name() < path.file_name())
            {
                newest = Some(path);
            }
        }
        newest
    }

    /// Downloads the newest matching workflow artifact into the cache
    /// directory and returns its path. Needs an API token.
    async fn download_artifact(&self) -> Result<PathBuf> {
        let token = self
            .config
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .context("no GitHub token available (set GITHUB_TOKEN or the token config field)")?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;

        let url = format!(
            "{}/repos/{}/{}/actions/artifacts?per_page=100",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo
        );
        let listing: ArtifactListing = client
            .get(&url)
            .bearer_auth(&token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let newest = listing
            .artifacts
            .into_iter()
            .filter(|a| !a.expired && a.name == self.config.artifact_name)
            .max_by_key(|a| a.created_at)
            .with_context(|| {
                format!("repository has no artifact named {:?}", self.config.artifact_name)
            })?;

        let body = client
            .get(&newest.archive_download_url)
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        // Colon-free timestamp: still sorts chronologically, and stays a
        // legal file name on every platform.
        let dest = self
            .cache_dir
            .join(format!("{}.zip", Utc::now().format("%Y-%m-%dT%H-%M-%S%.6f")));
        fs::write(&dest, &body).await?;
        debug!(path = %dest.display(), "downloaded example artifact");
        Ok(dest)
    }

    /// Extracts the archive into a sibling directory named after its stem and
    /// returns that directory. A previously extracted root is reused as-is.
    /// An empty archive is a valid, empty database.
    async fn extract(&self, zip_path: &Path) -> Result<PathBuf> {
        let stem = zip_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .context("artifact path has no file name")?;
        let root = self.cache_dir.join(stem);
        if fs::try_exists(&root).await? {
            return Ok(root);
        }

        let archive_path = zip_path.to_path_buf();
        let extract_to = root.clone();
        task::spawn_blocking(move || -> Result<(), ExemplaError> {
            let file = std::fs::File::open(&archive_path)?;
            let mut archive = zip::ZipArchive::new(file)?;
            std::fs::create_dir_all(&extract_to)?;
            archive.extract(&extract_to)?;
            Ok(())
        })
        .await??;
        Ok(root)
    }
}

#[async_trait]
impl ExampleDatabase for GitHubArtifactDatabase {
    async fn save(&self, _key: &[u8], _value: &[u8]) -> Result<(), ExemplaError> {
        Err(ExemplaError::NotWritable("GitHubArtifactDatabase"))
    }

    async fn fetch(&self, key: &[u8]) -> Vec<Bytes> {
        let root = {
            let mut state = self.state.lock().await;
            match &*state {
                ArtifactState::Disabled => return Vec::new(),
                ArtifactState::Ready(root) => root.clone(),
                ArtifactState::Uninitialized => match self.initialize().await {
                    Ok(root) => {
                        *state = ArtifactState::Ready(root.clone());
                        root
                    }
                    Err(e) => {
                        warn!(
                            owner = %self.config.owner,
                            repo = %self.config.repo,
                            error = %e,
                            "could not locate a usable example artifact; \
                             the GitHub artifact database is disabled"
                        );
                        *state = ArtifactState::Disabled;
                        return Vec::new();
                    }
                },
            }
        };
        fetch_from_tree(&root, key).await
    }

    async fn delete(&self, _key: &[u8], _value: &[u8]) -> Result<(), ExemplaError> {
        Err(ExemplaError::NotWritable("GitHubArtifactDatabase"))
    }

    async fn move_value(
        &self,
        _src: &[u8],
        _dest: &[u8],
        _value: &[u8],
    ) -> Result<(), ExemplaError> {
        Err(ExemplaError::NotWritable("GitHubArtifactDatabase"))
    }
}

/// Age of a cached archive, from its modification time.
async fn artifact_age(path: &Path) -> Option<Duration> {
    let modified = fs::metadata(path).await.ok()?.modified().ok()?;
    modified.elapsed().ok()
}
