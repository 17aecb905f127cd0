//! PostgreSQL implementation of the conditional stock write.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::{SWEET_COLUMNS, SweetRow};
use crate::domain::repositories::{StockLevel, StockStore, WriteOutcome};
use crate::error::AppError;

/// Stock store over the `sweets.version` column.
///
/// The write is one `UPDATE ... WHERE id = $1 AND version = $3`, so it either
/// commits in full or not at all, whatever the isolation level. The
/// `CHECK (quantity >= 0)` constraint backs the non-negative invariant.
pub struct PgStockStore {
    pool: Arc<PgPool>,
}

impl PgStockStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StockRow {
    quantity: i64,
    version: i64,
}

#[async_trait]
impl StockStore for PgStockStore {
    async fn read_quantity(&self, id: i64) -> Result<Option<StockLevel>, AppError> {
        let row = sqlx::query_as::<_, StockRow>(
            "SELECT quantity, version FROM sweets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| StockLevel {
            quantity: r.quantity,
            version: r.version,
        }))
    }

    async fn write_quantity_if_version(
        &self,
        id: i64,
        quantity: i64,
        expected_version: i64,
    ) -> Result<WriteOutcome, AppError> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            r#"
            UPDATE sweets
            SET quantity = $2,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $3
            RETURNING {SWEET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(quantity)
        .bind(expected_version)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(row) = row {
            return Ok(WriteOutcome::Committed(row.into()));
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sweets WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(if exists {
            WriteOutcome::VersionConflict
        } else {
            WriteOutcome::NotFound
        })
    }
}
