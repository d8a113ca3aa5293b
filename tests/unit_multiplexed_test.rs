// tests/unit_multiplexed_test.rs

#[path = "common/test_helpers.rs"]
mod test_helpers;

use bytes::Bytes;
use exempla::{ExampleDatabase, InMemoryDatabase, MultiplexedDatabase};
use std::sync::Arc;
use test_helpers::fetch_set;

#[tokio::test]
async fn test_multiplexed_dbs_read_and_write_all() {
    let a = Arc::new(InMemoryDatabase::new());
    let b = Arc::new(InMemoryDatabase::new());
    let multi = MultiplexedDatabase::new(vec![a.clone() as Arc<dyn ExampleDatabase>, b.clone()]);

    a.save(b"a", b"aa").await.unwrap();
    b.save(b"b", b"bb").await.unwrap();
    multi.save(b"c", b"cc").await.unwrap();
    multi.move_value(b"a", b"b", b"aa").await.unwrap();

    let all: [&dyn ExampleDatabase; 3] = [a.as_ref(), b.as_ref(), &multi];
    for db in all {
        assert!(db.fetch(b"a").await.is_empty());
        assert_eq!(db.fetch(b"c").await, vec![Bytes::from_static(b"cc")]);
    }

    let got = multi.fetch(b"b").await;
    assert_eq!(got.len(), 2);
    assert_eq!(
        got.into_iter().collect::<std::collections::HashSet<_>>(),
        [Bytes::from_static(b"aa"), Bytes::from_static(b"bb")].into()
    );

    multi.delete(b"c", b"cc").await.unwrap();
    let all: [&dyn ExampleDatabase; 3] = [a.as_ref(), b.as_ref(), &multi];
    for db in all {
        assert!(db.fetch(b"c").await.is_empty());
    }
}

#[tokio::test]
async fn test_multiplexed_fetch_deduplicates_across_backends() {
    let a = Arc::new(InMemoryDatabase::new());
    let b = Arc::new(InMemoryDatabase::new());
    let multi = MultiplexedDatabase::new(vec![a.clone() as Arc<dyn ExampleDatabase>, b.clone()]);

    a.save(b"k", b"shared").await.unwrap();
    b.save(b"k", b"shared").await.unwrap();
    b.save(b"k", b"only-b").await.unwrap();

    let got = multi.fetch(b"k").await;
    assert_eq!(got.len(), 2);
    assert_eq!(
        fetch_set(&multi, b"k").await,
        [Bytes::from_static(b"shared"), Bytes::from_static(b"only-b")].into()
    );
}
