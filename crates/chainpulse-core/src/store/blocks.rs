//! Recent-block metrics queries.

use super::StoreError;
use crate::types::BlockMetric;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

const RECENT_BLOCKS_SQL: &str = r"
SELECT id, tx, length(data)::bigint AS length, time
  FROM block_chain
 ORDER BY id DESC
 LIMIT $1
";

const BLOCK_BY_TX_HASH_SQL: &str = "SELECT block FROM log_transactions WHERE hash = $1";

/// Read-only source of block throughput metrics.
///
/// The trait seam exists so the refresh pipeline and its tests can run
/// against in-memory sources; the production implementation is
/// [`PgBlockSource`].
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Loads the `limit` most recent blocks, newest-first (strictly
    /// descending identifier). Returns at most `limit` entries and must not
    /// mutate state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidLimit`] for `limit == 0` without
    /// querying, [`StoreError::Query`] on store failures, and
    /// [`StoreError::Conversion`] when a row value is out of domain.
    async fn load_recent(&self, limit: u32) -> Result<Vec<BlockMetric>, StoreError>;

    /// Resolves the block identifier a transaction hash was sealed in, or
    /// `None` when the hash is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] on store failures.
    async fn block_id_by_tx_hash(&self, hash: &[u8]) -> Result<Option<u64>, StoreError>;
}

/// Postgres-backed [`BlockSource`] over the ambient pool.
#[derive(Debug, Clone)]
pub struct PgBlockSource {
    pool: PgPool,
}

impl PgBlockSource {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockSource for PgBlockSource {
    async fn load_recent(&self, limit: u32) -> Result<Vec<BlockMetric>, StoreError> {
        if limit == 0 {
            return Err(StoreError::InvalidLimit);
        }

        let rows = sqlx::query(RECENT_BLOCKS_SQL)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        rows.iter().map(metric_from_row).collect()
    }

    async fn block_id_by_tx_hash(&self, hash: &[u8]) -> Result<Option<u64>, StoreError> {
        let row = sqlx::query(BLOCK_BY_TX_HASH_SQL)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        match row {
            None => Ok(None),
            Some(row) => {
                let block: i64 = row.try_get("block").map_err(StoreError::Query)?;
                let block = u64::try_from(block)
                    .map_err(|_| StoreError::Conversion { column: "block", value: block })?;
                Ok(Some(block))
            }
        }
    }
}

fn metric_from_row(row: &PgRow) -> Result<BlockMetric, StoreError> {
    let id: i64 = row.try_get("id").map_err(StoreError::Query)?;
    let tx: i32 = row.try_get("tx").map_err(StoreError::Query)?;
    let length: i64 = row.try_get("length").map_err(StoreError::Query)?;
    let time: i64 = row.try_get("time").map_err(StoreError::Query)?;

    metric_from_parts(id, tx, length, time)
}

/// Converts raw row values to the domain record, rejecting values outside
/// the non-negative domain.
pub(crate) fn metric_from_parts(
    id: i64,
    tx: i32,
    length: i64,
    time: i64,
) -> Result<BlockMetric, StoreError> {
    Ok(BlockMetric {
        id: u64::try_from(id).map_err(|_| StoreError::Conversion { column: "id", value: id })?,
        tx_count: u32::try_from(tx)
            .map_err(|_| StoreError::Conversion { column: "tx", value: i64::from(tx) })?,
        payload_len: u64::try_from(length)
            .map_err(|_| StoreError::Conversion { column: "length", value: length })?,
        timestamp: time,
    })
}
