//! End-to-end Load → Store → Broadcast scenarios over mock infrastructure.

use crate::mock_infrastructure::{descending_blocks, FailingKv, MockBlockSource};
use chainpulse_core::{
    broadcast::{BroadcastHub, TpsPublisher},
    cache::{MemoryKv, MetricsCache},
    refresh::{RefreshError, Refresher},
    types::BlockMetric,
};
use std::sync::Arc;

fn pipeline(
    source: Arc<MockBlockSource>,
    kv_fails: bool,
) -> (Refresher, MetricsCache, BroadcastHub) {
    let cache = if kv_fails {
        MetricsCache::new(Arc::new(FailingKv))
    } else {
        MetricsCache::new(Arc::new(MemoryKv::new()))
    };
    let hub = BroadcastHub::new(16);
    let refresher =
        Refresher::new(source, cache.clone(), TpsPublisher::new(hub.clone()));
    (refresher, cache, hub)
}

/// Scenario: two blocks in the store; one cycle caches both, newest first,
/// and the cache read reproduces them exactly.
#[tokio::test]
async fn test_cycle_caches_store_contents_in_order() {
    let blocks = vec![
        BlockMetric { id: 5, tx_count: 3, payload_len: 120, timestamp: 50 },
        BlockMetric { id: 4, tx_count: 1, payload_len: 80, timestamp: 40 },
    ];
    let source = Arc::new(MockBlockSource::new(blocks.clone()));
    let (refresher, cache, _hub) = pipeline(source, false);

    refresher.run_cycle(30).await.expect("healthy cycle");

    let cached = cache.read().await.expect("snapshot present");
    assert_eq!(cached, blocks);
    assert_eq!(cached[0].id, 5, "newest block first");
}

#[tokio::test]
async fn test_cycle_respects_snapshot_window() {
    let source = Arc::new(MockBlockSource::new(descending_blocks(50)));
    let (refresher, cache, _hub) = pipeline(source, false);

    refresher.run_cycle(30).await.expect("healthy cycle");

    let cached = cache.read().await.expect("snapshot present");
    assert_eq!(cached.len(), 30);
    assert!(
        cached.windows(2).all(|pair| pair[0].id > pair[1].id),
        "snapshot must stay strictly descending"
    );
}

/// Scenario: the store has no recent blocks; the cycle still caches and
/// broadcasts an empty update.
#[tokio::test]
async fn test_empty_store_broadcasts_empty_update() {
    let source = Arc::new(MockBlockSource::new(vec![]));
    let (refresher, cache, hub) = pipeline(source, false);
    let mut rx = hub.subscribe();

    refresher.run_cycle(30).await.expect("healthy cycle");

    assert!(cache.read().await.expect("snapshot present").is_empty());
    let frame = rx.recv().await.expect("empty update delivered");
    assert_eq!(&*frame, r#"{"channel":"block_tpslist","data":[]}"#);
}

/// Scenario: cache unreachable. Broadcast still runs on the loaded data and
/// the cycle reports only the store-stage error.
#[tokio::test]
async fn test_store_failure_degrades_to_broadcast_only() {
    let source = Arc::new(MockBlockSource::new(descending_blocks(3)));
    let (refresher, _cache, hub) = pipeline(source, true);
    let mut rx = hub.subscribe();

    let err = refresher.run_cycle(30).await.expect_err("store stage fails");

    assert!(matches!(err, RefreshError::Store(_)));
    assert_eq!(err.stage(), "store");

    let frame = rx.recv().await.expect("subscribers still get fresh values");
    let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(parsed["data"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["data"][0]["block_id"], 3);
}

/// Scenario: store outage. The cycle aborts at Load, nothing is broadcast,
/// and the previous snapshot survives for readers.
#[tokio::test]
async fn test_load_failure_keeps_previous_snapshot() {
    let source = Arc::new(MockBlockSource::new(descending_blocks(2)));
    let (refresher, cache, hub) = pipeline(source.clone(), false);
    let mut rx = hub.subscribe();

    refresher.run_cycle(30).await.expect("first cycle populates");
    let first = cache.read().await.expect("snapshot present");
    let _ = rx.recv().await.expect("first broadcast");

    source.set_unavailable(true);
    let err = refresher.run_cycle(30).await.expect_err("load stage fails");

    assert!(matches!(err, RefreshError::Load(_)));
    assert_eq!(cache.read().await.expect("stale snapshot survives"), first);
    assert!(rx.try_recv().is_err(), "failed cycle must not broadcast");
}

/// Consecutive cycles replace the snapshot wholesale; subscribers see each
/// update in publish order.
#[tokio::test]
async fn test_cycles_replace_snapshot_wholesale() {
    let source = Arc::new(MockBlockSource::new(descending_blocks(2)));
    let (refresher, cache, hub) = pipeline(source.clone(), false);
    let mut rx = hub.subscribe();

    refresher.run_cycle(30).await.expect("first cycle");
    refresher.run_cycle(1).await.expect("second cycle, narrower window");

    let cached = cache.read().await.expect("snapshot present");
    assert_eq!(cached.len(), 1, "second write replaced the two-block snapshot");
    assert_eq!(source.load_calls(), 2);

    let first: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    let second: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(first["data"].as_array().unwrap().len(), 2);
    assert_eq!(second["data"].as_array().unwrap().len(), 1);
}
