//! Reusable mock implementations of the store and cache boundaries.

use async_trait::async_trait;
use chainpulse_core::{
    cache::{KvError, KvStore},
    store::{BlockSource, StoreError},
    types::BlockMetric,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// [`BlockSource`] over a fixed in-memory block list, newest-first.
///
/// Can be flipped into a failing state to simulate a store outage.
pub struct MockBlockSource {
    blocks: Vec<BlockMetric>,
    unavailable: AtomicBool,
    load_calls: AtomicUsize,
}

impl MockBlockSource {
    #[must_use]
    pub fn new(blocks: Vec<BlockMetric>) -> Self {
        Self { blocks, unavailable: AtomicBool::new(false), load_calls: AtomicUsize::new(0) }
    }

    /// Makes every subsequent load fail, as if the store went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `load_recent` calls that passed the limit check.
    #[must_use]
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn load_recent(&self, limit: u32) -> Result<Vec<BlockMetric>, StoreError> {
        if limit == 0 {
            return Err(StoreError::InvalidLimit);
        }
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Query(sqlx_unavailable()));
        }
        Ok(self.blocks.iter().take(limit as usize).cloned().collect())
    }

    async fn block_id_by_tx_hash(&self, hash: &[u8]) -> Result<Option<u64>, StoreError> {
        // Toy mapping: a one-byte hash addresses a block by position.
        let id = hash
            .first()
            .and_then(|index| self.blocks.get(*index as usize))
            .map(|block| block.id);
        Ok(id)
    }
}

fn sqlx_unavailable() -> sqlx::Error {
    sqlx::Error::PoolClosed
}

/// [`KvStore`] where every operation fails, simulating an unreachable cache
/// service.
#[derive(Debug, Default)]
pub struct FailingKv;

#[async_trait]
impl KvStore for FailingKv {
    async fn get(&self, _key: &str) -> Result<Option<String>, KvError> {
        Err(KvError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), KvError> {
        Err(KvError::Unavailable("connection refused".to_string()))
    }
}

/// Builds a newest-first block list with ids `count..=1`.
#[must_use]
pub fn descending_blocks(count: u32) -> Vec<BlockMetric> {
    (1..=u64::from(count))
        .rev()
        .map(|id| BlockMetric {
            id,
            tx_count: u32::try_from(id % 10).expect("id % 10 fits u32"),
            payload_len: id * 100,
            timestamp: i64::try_from(id).expect("test id fits i64") * 10,
        })
        .collect()
}
