//! Core domain records shared by the store, cache, and broadcast layers.

use serde::{Deserialize, Serialize};

/// Throughput statistics for a single chain block.
///
/// Produced by the block metrics source on every refresh cycle and discarded
/// once the snapshot is replaced; instances carry no identity beyond the
/// cycle that produced them.
///
/// The serde layout (`Id`/`Tx`/`Length`) is the persisted snapshot format —
/// changing a rename here changes what sits in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetric {
    /// Monotonically increasing block identifier, unique per chain.
    #[serde(rename = "Id")]
    pub id: u64,

    /// Number of transactions in the block.
    #[serde(rename = "Tx")]
    pub tx_count: u32,

    /// Byte length of the stored block payload.
    #[serde(rename = "Length")]
    pub payload_len: u64,

    /// Unix timestamp (seconds) of the block. Consumed by the throughput
    /// aggregator only; never part of the cached snapshot layout.
    #[serde(skip)]
    pub timestamp: i64,
}

/// Broadcast-facing projection of [`BlockMetric`].
///
/// Derived at publish time and never stored; recomputed from the snapshot on
/// every broadcast so wire order always matches snapshot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMetric {
    pub block_id: u64,
    pub block_size: u64,
    pub tx_count: u64,
}

impl From<&BlockMetric> for WireMetric {
    fn from(metric: &BlockMetric) -> Self {
        Self {
            block_id: metric.id,
            block_size: metric.payload_len,
            tx_count: u64::from(metric.tx_count),
        }
    }
}
