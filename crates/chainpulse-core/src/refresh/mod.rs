//! The Load → Store → Broadcast refresh pipeline and its scheduled driver.
//!
//! Each stage is a barrier for the next, with per-stage failure isolation:
//!
//! - **Load** failure aborts the cycle and leaves the existing cache
//!   untouched, so stale-but-valid reads keep succeeding.
//! - **Store** failure is logged but does not stop Broadcast — live delivery
//!   is the primary value; caching is an optimization for later readers.
//! - **Broadcast** failure is logged and does not affect the store outcome.
//!
//! No stage is retried within a cycle. The driver loop re-invokes the whole
//! pipeline on a fixed schedule, so individual-cycle failures self-heal on
//! the next tick. Concurrent cycles are permitted; the cache resolves them
//! last-write-wins (callers needing strict ordering serialize refreshes
//! externally).

use crate::{
    broadcast::{PublishError, TpsPublisher},
    cache::{CacheError, MetricsCache},
    metrics::record_refresh_cycle,
    store::{BlockSource, StoreError},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// A refresh cycle failure, tagged by the stage that produced it.
///
/// When both Store and Broadcast fail in one cycle, the Store error wins;
/// the Broadcast failure is still logged.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("load stage failed: {0}")]
    Load(#[source] StoreError),

    #[error("store stage failed: {0}")]
    Store(#[source] CacheError),

    #[error("broadcast stage failed: {0}")]
    Broadcast(#[source] PublishError),
}

impl RefreshError {
    /// Stage label used for logging and metrics.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Store(_) => "store",
            Self::Broadcast(_) => "broadcast",
        }
    }
}

/// Orchestrates one refresh cycle over the source, cache, and publisher.
pub struct Refresher {
    source: Arc<dyn BlockSource>,
    cache: MetricsCache,
    publisher: TpsPublisher,
}

impl Refresher {
    #[must_use]
    pub fn new(source: Arc<dyn BlockSource>, cache: MetricsCache, publisher: TpsPublisher) -> Self {
        Self { source, cache, publisher }
    }

    /// Runs one Load → Store → Broadcast cycle over the `limit` most recent
    /// blocks.
    ///
    /// # Errors
    ///
    /// Returns the per-stage [`RefreshError`]; see the module docs for the
    /// isolation policy.
    pub async fn run_cycle(&self, limit: u32) -> Result<(), RefreshError> {
        let snapshot = self.source.load_recent(limit).await.map_err(RefreshError::Load)?;

        let stored = self.cache.write(&snapshot).await;
        if let Err(error) = &stored {
            warn!(%error, "snapshot cache write failed; broadcasting loaded data anyway");
        }

        // Broadcast the snapshot loaded in this cycle, never a cache
        // re-read: a concurrent refresh may have replaced the cache between
        // the store and broadcast stages.
        let published = self.publisher.publish(&snapshot);
        if let Err(error) = &published {
            warn!(%error, "throughput broadcast failed");
        }

        match (stored, published) {
            (Ok(()), Ok(())) => {
                debug!(blocks = snapshot.len(), "refresh cycle complete");
                Ok(())
            }
            (Err(error), _) => Err(RefreshError::Store(error)),
            (Ok(()), Err(error)) => Err(RefreshError::Broadcast(error)),
        }
    }
}

/// Drives [`Refresher::run_cycle`] on a fixed interval until the shutdown
/// broadcast fires.
///
/// Cycle failures are logged and counted, never propagated — the next tick
/// starts from scratch.
pub async fn run_refresh_loop(
    refresher: Arc<Refresher>,
    interval: Duration,
    limit: u32,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    info!(interval_secs = interval.as_secs(), limit, "starting throughput refresh loop");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match refresher.run_cycle(limit).await {
                    Ok(()) => record_refresh_cycle("ok"),
                    Err(error) => {
                        warn!(%error, stage = error.stage(), "refresh cycle failed");
                        record_refresh_cycle(error.stage());
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                debug!("refresh loop received shutdown signal");
                break;
            }
        }
    }

    info!("refresh loop shutdown complete");
}
