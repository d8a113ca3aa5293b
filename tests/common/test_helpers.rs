// tests/common/test_helpers.rs

//! Test helpers shared across the database test suites.

#![allow(dead_code)]

use bytes::Bytes;
use exempla::ExampleDatabase;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer};

/// Sets up minimal tracing for tests (ignore error if already initialized).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_test_writer()
        .try_init();
}

/// Fetches a key's values as a set; value order is not guaranteed.
pub async fn fetch_set(db: &dyn ExampleDatabase, key: &[u8]) -> HashSet<Bytes> {
    db.fetch(key).await.into_iter().collect()
}

/// Layer counting warn-level events, for asserting how often a code path
/// warns. Attach with `tracing::subscriber::set_default` so the count only
/// covers the current test.
#[derive(Default, Clone)]
pub struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}
