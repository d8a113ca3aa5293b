// src/db/directory.rs

//! Backend persisting examples in a filesystem directory.
//!
//! Layout: one subdirectory per key, one file per value, both named by a
//! truncated SHA-256 digest of their content. The layout is stable across
//! instances and processes, so independent instances pointed at the same root
//! coordinate through the filesystem alone. Other processes may mutate the
//! tree at any time; every operation lists and reads fresh and tolerates
//! entries vanishing underneath it.

use crate::db::ExampleDatabase;
use crate::error::ExemplaError;
use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::warn;

/// Suffix of in-flight files, skipped by [`fetch_from_tree`].
const TMP_SUFFIX: &str = ".tmp";

/// Disambiguates temp file names between writers in the same process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stable, collision-resistant name for a key directory or value file:
/// the first 16 hex characters of the content's SHA-256 digest.
pub(crate) fn content_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(16);
    digest
}

/// Reads all values for `key` from a directory tree in the layout described in
/// the module docs. Shared with the remote-artifact backend, which extracts its
/// snapshot into the same layout.
pub(crate) async fn fetch_from_tree(root: &Path, key: &[u8]) -> Vec<Bytes> {
    let key_dir = root.join(content_digest(key));
    let mut entries = match fs::read_dir(&key_dir).await {
        Ok(entries) => entries,
        // Absent key directory means no values were ever saved.
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if entry.file_name().to_string_lossy().ends_with(TMP_SUFFIX) {
            continue;
        }
        match fs::read(entry.path()).await {
            Ok(data) => {
                let value = Bytes::from(data);
                if seen.insert(value.clone()) {
                    values.push(value);
                }
            }
            // Raced with a concurrent delete from another instance; skip.
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "skipping unreadable example file"
                );
            }
        }
    }
    values
}

/// Persists examples under a root directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryBasedDatabase {
    root: PathBuf,
}

impl DirectoryBasedDatabase {
    /// The directory (and any missing parents) is created on first save, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &[u8]) -> PathBuf {
        self.root.join(content_digest(key))
    }

    fn value_path(&self, key: &[u8], value: &[u8]) -> PathBuf {
        self.key_path(key).join(content_digest(value))
    }
}

#[async_trait]
impl ExampleDatabase for DirectoryBasedDatabase {
    async fn save(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        let final_path = self.value_path(key, value);
        let key_dir = self.key_path(key);
        fs::create_dir_all(&key_dir).await?;

        // Write through a temp file and rename into place so a torn write is
        // never observable. The temp name is unique per writer; concurrent
        // saves of the same value each rename their own file onto the shared
        // content-named path, so duplicates collapse without racing on one
        // temp file.
        let tmp_path = key_dir.join(format!(
            "{}.{}.{}{}",
            content_digest(value),
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed),
            TMP_SUFFIX
        ));
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &final_path).await?;
        Ok(())
    }

    async fn fetch(&self, key: &[u8]) -> Vec<Bytes> {
        fetch_from_tree(&self.root, key).await
    }

    async fn delete(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        match fs::remove_file(self.value_path(key, value)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn move_value(&self, src: &[u8], dest: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        if src == dest {
            return self.save(src, value).await;
        }
        // Fast path: rename the value file across key directories. Falls back
        // to delete-then-save when the source file is gone or on another device.
        fs::create_dir_all(self.key_path(dest)).await?;
        match fs::rename(self.value_path(src, value), self.value_path(dest, value)).await {
            Ok(()) => Ok(()),
            Err(_) => {
                self.delete(src, value).await?;
                self.save(dest, value).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_hex() {
        let digest = content_digest(b"foo");
        assert_eq!(digest, content_digest(b"foo"));
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn distinct_content_gets_distinct_names() {
        assert_ne!(content_digest(b"foo"), content_digest(b"bar"));
        assert_ne!(content_digest(b""), content_digest(b"\0"));
    }
}
