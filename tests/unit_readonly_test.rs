// tests/unit_readonly_test.rs

#[path = "common/test_helpers.rs"]
mod test_helpers;

use bytes::Bytes;
use exempla::{ExampleDatabase, InMemoryDatabase, ReadOnlyDatabase};
use std::sync::Arc;
use test_helpers::fetch_set;

#[tokio::test]
async fn test_readonly_db_is_not_writable() {
    let inner = Arc::new(InMemoryDatabase::new());
    let wrapped = ReadOnlyDatabase::new(inner.clone());
    inner.save(b"key", b"value").await.unwrap();
    inner.save(b"key", b"value2").await.unwrap();

    wrapped.delete(b"key", b"value").await.unwrap();
    wrapped.move_value(b"key", b"key2", b"value2").await.unwrap();
    wrapped.save(b"key", b"value3").await.unwrap();

    assert_eq!(
        fetch_set(&wrapped, b"key").await,
        [Bytes::from_static(b"value"), Bytes::from_static(b"value2")].into()
    );
    assert!(wrapped.fetch(b"key2").await.is_empty());
}

#[tokio::test]
async fn test_readonly_fetch_passes_through() {
    let inner = Arc::new(InMemoryDatabase::new());
    let wrapped = ReadOnlyDatabase::new(inner.clone());
    assert!(wrapped.fetch(b"key").await.is_empty());
    inner.save(b"key", b"value").await.unwrap();
    assert_eq!(wrapped.fetch(b"key").await, vec![Bytes::from_static(b"value")]);
}
