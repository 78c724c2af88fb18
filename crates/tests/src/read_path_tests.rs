//! Cache read-path semantics, independent of the refresh schedule.

use crate::mock_infrastructure::FailingKv;
use chainpulse_core::{
    cache::{CacheError, MemoryKv, MetricsCache, THROUGHPUT_KEY},
    types::BlockMetric,
};
use chainpulse_core::cache::KvStore;
use std::sync::Arc;

/// A never-refreshed cache reads as a miss, which callers must treat
/// differently from an empty snapshot.
#[tokio::test]
async fn test_never_refreshed_is_miss_not_empty() {
    let cache = MetricsCache::new(Arc::new(MemoryKv::new()));

    let err = cache.read().await.expect_err("nothing was ever written");

    assert!(matches!(err, CacheError::Miss));
}

/// An empty snapshot written by a refresh is a valid read result.
#[tokio::test]
async fn test_written_empty_snapshot_reads_back_empty() {
    let cache = MetricsCache::new(Arc::new(MemoryKv::new()));

    cache.write(&[]).await.expect("empty write succeeds");

    assert!(cache.read().await.expect("empty snapshot is valid").is_empty());
}

/// A corrupt stored value is reported, never passed off as an empty
/// snapshot.
#[tokio::test]
async fn test_corrupt_stored_value_surfaces_decode_error() {
    let kv = Arc::new(MemoryKv::new());
    kv.set(THROUGHPUT_KEY, r#"{"Id": "oops"}"#.to_string()).await.unwrap();
    let cache = MetricsCache::new(kv);

    let err = cache.read().await.expect_err("value is not a snapshot array");

    assert!(matches!(err, CacheError::Decode(_)));
}

/// Transport failures are distinct from misses.
#[tokio::test]
async fn test_unreachable_cache_is_unavailable_not_miss() {
    let cache = MetricsCache::new(Arc::new(FailingKv));

    let err = cache.read().await.expect_err("transport is down");

    assert!(matches!(err, CacheError::Unavailable(_)));
}

/// The decoded snapshot carries no timestamps; they are aggregator-only and
/// never persisted.
#[tokio::test]
async fn test_round_trip_drops_timestamps() {
    let cache = MetricsCache::new(Arc::new(MemoryKv::new()));
    let snapshot =
        vec![BlockMetric { id: 7, tx_count: 2, payload_len: 64, timestamp: 1_700_000_000 }];

    cache.write(&snapshot).await.unwrap();
    let read_back = cache.read().await.unwrap();

    assert_eq!(read_back[0].id, 7);
    assert_eq!(read_back[0].timestamp, 0);
}
