//! Pool ownership and the explicit transaction wrapper.

use super::StoreError;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use tracing::{debug, warn};

/// Drops every table in the current schema. Postgres-specific.
const DROP_ALL_TABLES_SQL: &str = r"
DO $$ DECLARE
    r RECORD;
BEGIN
    FOR r IN (SELECT tablename FROM pg_tables WHERE schemaname = current_schema()) LOOP
        EXECUTE 'DROP TABLE IF EXISTS ' || quote_ident(r.tablename) || ' CASCADE';
    END LOOP;
END $$;
";

const HAS_TABLE_OR_VIEW_SQL: &str = r"
SELECT table_name FROM information_schema.tables
 WHERE table_type IN ('BASE TABLE', 'VIEW')
   AND table_schema NOT IN ('pg_catalog', 'information_schema')
   AND table_name = $1
";

/// Owner of the primary-store connection pool.
///
/// Single read-only queries run on the ambient pool; anything
/// multi-statement acquires a [`DbTransaction`] via [`Store::begin`].
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Builds a lazily-connecting pool for the given Postgres URL.
    ///
    /// No connection is attempted until the first query runs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL cannot be parsed.
    pub fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)
            .map_err(StoreError::Connection)?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The ambient connection pool, for single read-only queries.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begins a transaction owning one underlying connection for its
    /// lifetime. The returned [`DbTransaction`] must not be shared across
    /// concurrent callers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if no connection can be acquired.
    pub async fn begin(&self) -> Result<DbTransaction, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::Connection)?;
        Ok(DbTransaction { tx })
    }

    /// Checks whether a user table or view with the given name exists.
    ///
    /// A failed lookup is reported as an error, not as "absent" — callers
    /// that want to treat the two alike must opt in with `unwrap_or(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the introspection query fails.
    pub async fn has_table_or_view(&self, name: &str) -> Result<bool, StoreError> {
        let row = sqlx::query(HAS_TABLE_OR_VIEW_SQL)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)?;
        Ok(row.is_some())
    }
}

/// One logical unit of work against the primary store.
///
/// Exclusively owns its connection until committed or rolled back. Every
/// non-commit exit path should call [`DbTransaction::rollback`]; dropping
/// the value also rolls back through the driver, but without the log line.
pub struct DbTransaction {
    tx: Transaction<'static, Postgres>,
}

impl DbTransaction {
    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the commit fails; the transaction is
    /// gone either way.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(StoreError::Query)
    }

    /// Rolls the transaction back, best-effort.
    ///
    /// Rollback failures are logged and swallowed — this call never surfaces
    /// an error to the caller.
    pub async fn rollback(self) {
        if let Err(error) = self.tx.rollback().await {
            warn!(%error, "transaction rollback failed");
        }
    }

    /// Drops every table in the current schema.
    ///
    /// Irreversible. Never invoked during a normal refresh; the only caller
    /// is the config-gated startup reset path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the statement fails.
    pub async fn drop_all_tables(&mut self) -> Result<(), StoreError> {
        sqlx::query(DROP_ALL_TABLES_SQL)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::Query)?;
        debug!("dropped all tables in current schema");
        Ok(())
    }
}
