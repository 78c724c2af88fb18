//! The fixed-key throughput snapshot cache.

use super::kv::{KvError, KvStore};
use crate::types::BlockMetric;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// The single key the throughput snapshot lives under.
pub const THROUGHPUT_KEY: &str = "block-tpslist";

/// Errors from snapshot cache reads and writes.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The snapshot key has never been written. Expected for callers that
    /// can fall back to the primary store; distinct from an empty snapshot,
    /// which means "refreshed, no recent blocks".
    #[error("snapshot cache has never been populated")]
    Miss,

    /// The key-value transport failed.
    #[error("snapshot cache unavailable: {0}")]
    Unavailable(#[from] KvError),

    /// The snapshot could not be serialized.
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored value could not be parsed back into a snapshot.
    #[error("snapshot decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Read/write access to the cached throughput snapshot.
///
/// Cheap to clone; clones share the underlying store handle.
#[derive(Clone)]
pub struct MetricsCache {
    kv: Arc<dyn KvStore>,
}

impl MetricsCache {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Serializes the snapshot to one JSON value and replaces any prior
    /// value under the fixed key.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Encode`] or [`CacheError::Unavailable`]; the
    /// prior value is untouched on failure.
    pub async fn write(&self, snapshot: &[BlockMetric]) -> Result<(), CacheError> {
        let value = serde_json::to_string(snapshot).map_err(CacheError::Encode)?;
        self.kv.set(THROUGHPUT_KEY, value).await?;
        debug!(blocks = snapshot.len(), "throughput snapshot cached");
        Ok(())
    }

    /// Reads the cached snapshot, preserving its stored order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Miss`] on a never-populated cache,
    /// [`CacheError::Decode`] on a corrupt value, and
    /// [`CacheError::Unavailable`] on transport failures.
    pub async fn read(&self) -> Result<Vec<BlockMetric>, CacheError> {
        let raw = self.kv.get(THROUGHPUT_KEY).await?.ok_or(CacheError::Miss)?;
        serde_json::from_str(&raw).map_err(CacheError::Decode)
    }
}
