// src/db/memory.rs

//! Process-local backend backed by an in-memory map. Nothing is persisted.

use crate::db::ExampleDatabase;
use crate::error::ExemplaError;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::collections::HashSet;

/// Holds examples only for the lifetime of the process. All operations are
/// O(1) amortized.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    entries: DashMap<Bytes, HashSet<Bytes>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExampleDatabase for InMemoryDatabase {
    async fn save(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        self.entries
            .entry(Bytes::copy_from_slice(key))
            .or_default()
            .insert(Bytes::copy_from_slice(value));
        Ok(())
    }

    async fn fetch(&self, key: &[u8]) -> Vec<Bytes> {
        self.entries
            .get(key)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn delete(&self, key: &[u8], value: &[u8]) -> Result<(), ExemplaError> {
        if let Some(mut values) = self.entries.get_mut(key) {
            values.remove(value);
        }
        Ok(())
    }
}
