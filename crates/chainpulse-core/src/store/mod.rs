//! Primary-store access layer.
//!
//! All reads and writes against the relational store go through this module:
//!
//! - [`Store`]: pool owner; ambient connection for single read-only queries,
//!   plus table introspection and transaction acquisition.
//! - [`DbTransaction`]: one logical unit of work with explicit
//!   commit/rollback. Multi-statement work (the destructive
//!   drop-all-tables maintenance operation) lives here.
//! - [`BlockSource`]: the recent-block metrics query behind a trait seam so
//!   the refresh pipeline can be exercised without a database.
//!
//! # Error Handling
//!
//! - `Connection`: the store could not be reached (pool/transaction open)
//! - `Query`: a statement failed after a connection was established
//! - `InvalidLimit`: caller contract violation, rejected before querying
//! - `Conversion`: a row value does not fit the domain type (negative
//!   counts or identifiers)

pub mod blocks;
pub mod transaction;

pub use blocks::{BlockSource, PgBlockSource};
pub use transaction::{DbTransaction, Store};

use thiserror::Error;

/// Errors from the primary-store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the primary store to open a connection or
    /// transaction. Fatal to the current call, not to the process.
    #[error("store connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// A query against the primary store failed.
    #[error("store query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Caller-supplied limit violates the `limit > 0` contract.
    #[error("limit must be greater than zero")]
    InvalidLimit,

    /// A row value did not fit the domain type.
    #[error("column '{column}' value {value} out of range")]
    Conversion { column: &'static str, value: i64 },
}
