// src/db/multiplexed.rs

//! Wrapper fanning out writes to several backends and merging their reads.

use crate::db::ExampleDatabase;
use crate::error::ExemplaError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

/// Mirrors one logical store across two or more physical backends, e.g. a
/// local directory plus a read-only shared remote. Every write goes to every
/// backend; `fetch` returns the deduplicated union of all backends' values.
#[derive(Debug, Clone)]
pub struct MultiplexedDatabase {
    backends: Vec<Arc<dyn ExampleDatabase>>,
}

impl MultiplexedDatabase {
    /// `backends` should contain at least two entries; multiplexing a single
    /// backend is harmless but pointless.
    pub fn new(backends: Vec<Arc<dyn ExampleDatabase>>) -> Self {
        Self { backends }
    }
}

#[async_trait]
impl ExampleDatabase for MultiplexedDatabase {
    async fn save(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        for result in join_all(self.backends.iter().map(|b| b.save(key, value))).await {
            result?;
        }
        Ok(())
    }

    async fn fetch(&self, key: &[u8]) -> Vec<Bytes> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for fetched in join_all(self.backends.iter().map(|b| b.fetch(key))).await {
            for value in fetched {
                if seen.insert(value.clone()) {
                    values.push(value);
                }
            }
        }
        values
    }

    async fn delete(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        for result in join_all(self.backends.iter().map(|b| b.delete(key, value))).await {
            result?;
        }
        Ok(())
    }

    async fn move_value(&self, src: &[u8], dest: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        // Each backend moves independently: delete from src, save under dest.
        for result in join_all(self.backends.iter().map(|b| b.move_value(src, dest, value))).await {
            result?;
        }
        Ok(())
    }
}
