// src/db/mod.rs

//! The example database: a pluggable key-to-multivalue store used to remember
//! previously found failing examples between runs.
//!
//! Every backend implements [`ExampleDatabase`]. Keys and values are opaque byte
//! strings; each key maps to an unordered set of distinct values. Wrappers
//! ([`ReadOnlyDatabase`], [`MultiplexedDatabase`]) hold `Arc<dyn ExampleDatabase>`
//! inners, so backends compose arbitrarily (e.g. a multiplexer over a local
//! directory and a read-only remote artifact).

mod directory;
mod github;
mod memory;
mod multiplexed;
mod readonly;

pub use directory::DirectoryBasedDatabase;
pub use github::GitHubArtifactDatabase;
pub use memory::InMemoryDatabase;
pub use multiplexed::MultiplexedDatabase;
pub use readonly::ReadOnlyDatabase;

use crate::error::ExemplaError;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// The capability contract shared by all database variants.
///
/// Absence is never an error: fetching or deleting a missing key or value is an
/// empty result or a no-op. Mutations only fail for usage errors, such as writing
/// to a backend that is not directly writable.
#[async_trait]
pub trait ExampleDatabase: Send + Sync + Debug {
    /// Adds `value` to the set stored under `key`. Saving the same pair twice
    /// leaves the set unchanged.
    async fn save(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError>;

    /// Returns every distinct value currently stored under `key`, in no
    /// particular order. An absent key yields an empty vector. I/O trouble
    /// short of a usage error degrades to "no data" and is logged, not raised.
    async fn fetch(&self, key: &[u8]) -> Vec<Bytes>;

    /// Removes `value` from the set stored under `key` if present.
    async fn delete(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError>;

    /// Deletes `value` under `src` and saves it under `dest` as one logical
    /// operation. With `src == dest` the net effect is a plain save.
    async fn move_value(&self, src: &[u8], dest: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        if src == dest {
            return self.save(src, value).await;
        }
        self.delete(src, value).await?;
        self.save(dest, value).await
    }
}

/// Selects the default backend for an optional on-disk location.
///
/// Without a path the examples live in memory for the lifetime of the process.
/// With a path, a [`DirectoryBasedDatabase`] is rooted there; the directory is
/// created lazily on first save, so a not-yet-existing path is fine. An existing
/// non-directory file at the path is not a supported input.
pub fn choose_database(path: Option<PathBuf>) -> Arc<dyn ExampleDatabase> {
    match path {
        None => Arc::new(InMemoryDatabase::new()),
        Some(path) => {
            if let Ok(meta) = std::fs::metadata(&path)
                && !meta.is_dir()
            {
                warn!(
                    path = %path.display(),
                    "example database path exists but is not a directory"
                );
            }
            Arc::new(DirectoryBasedDatabase::new(path))
        }
    }
}
