// src/db/readonly.rs

//! Wrapper that silences all mutation of an inner backend.

use crate::db::ExampleDatabase;
use crate::error::ExemplaError;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Accepts `save`/`delete`/`move_value` without touching the inner backend;
/// `fetch` passes through. Useful for sharing a backend that a given consumer
/// must not mutate (e.g. a remote artifact) behind the uniform interface.
#[derive(Debug, Clone)]
pub struct ReadOnlyDatabase {
    inner: Arc<dyn ExampleDatabase>,
}

impl ReadOnlyDatabase {
    pub fn new(inner: Arc<dyn ExampleDatabase>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ExampleDatabase for ReadOnlyDatabase {
    async fn save(&self, _key: &[u8], _value: &[u8]) -> Result<(), ExemplaError> {
        Ok(())
    }

    async fn fetch(&self, key: &[u8]) -> Vec<Bytes> {
        self.inner.fetch(key).await
    }

    async fn delete(&self, _key: &[u8], _value: &[u8]) -> Result<(), ExemplaError> {
        Ok(())
    }

    async fn move_value(
        &self,
        _src: &[u8],
        _dest: &[u8],
        _value: &[u8],
    ) -> Result<(), ExemplaError> {
        Ok(())
    }
}
