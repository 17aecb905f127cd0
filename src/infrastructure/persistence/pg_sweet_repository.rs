//! PostgreSQL implementation of the sweet catalog repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::{SWEET_COLUMNS, SweetRow};
use crate::domain::entities::{NewSweet, Sweet, SweetFilter, SweetPatch};
use crate::domain::repositories::SweetRepository;
use crate::error::AppError;

/// PostgreSQL repository for the sweet catalog.
pub struct PgSweetRepository {
    pool: Arc<PgPool>,
}

impl PgSweetRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Replaces the whole catalog with `sweets` in one transaction.
    ///
    /// If any insert fails nothing is committed and the previous catalog stays
    /// as it was.
    pub async fn replace_catalog(&self, sweets: Vec<NewSweet>) -> Result<Vec<Sweet>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sweets").execute(&mut *tx).await?;

        let insert = format!(
            r#"
            INSERT INTO sweets (name, category, price, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING {SWEET_COLUMNS}
            "#
        );

        let mut created = Vec::with_capacity(sweets.len());
        for new_sweet in sweets {
            let row = sqlx::query_as::<_, SweetRow>(&insert)
                .bind(new_sweet.name)
                .bind(new_sweet.category)
                .bind(new_sweet.price)
                .bind(new_sweet.quantity)
                .fetch_one(&mut *tx)
                .await?;
            created.push(Sweet::from(row));
        }

        tx.commit().await?;

        tracing::info!(count = created.len(), "Catalog replaced");
        Ok(created)
    }
}

#[async_trait]
impl SweetRepository for PgSweetRepository {
    async fn create(&self, new_sweet: NewSweet) -> Result<Sweet, AppError> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            r#"
            INSERT INTO sweets (name, category, price, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING {SWEET_COLUMNS}
            "#
        ))
        .bind(new_sweet.name)
        .bind(new_sweet.category)
        .bind(new_sweet.price)
        .bind(new_sweet.quantity)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Sweet>, AppError> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Sweet::from))
    }

    async fn list(&self) -> Result<Vec<Sweet>, AppError> {
        let rows = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets ORDER BY name ASC, id ASC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Sweet::from).collect())
    }

    async fn search(&self, filter: SweetFilter) -> Result<Vec<Sweet>, AppError> {
        let rows = sqlx::query_as::<_, SweetRow>(&format!(
            r#"
            SELECT {SWEET_COLUMNS}
            FROM sweets
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR category = $2)
              AND ($3::float8 IS NULL OR price >= $3)
              AND ($4::float8 IS NULL OR price <= $4)
            ORDER BY name ASC, id ASC
            "#
        ))
        .bind(filter.name.map(|n| escape_like(&n)))
        .bind(filter.category)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Sweet::from).collect())
    }

    async fn update(&self, id: i64, patch: SweetPatch) -> Result<Option<Sweet>, AppError> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            r#"
            UPDATE sweets
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                price = COALESCE($4, price),
                quantity = COALESCE($5, quantity),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SWEET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.category)
        .bind(patch.price)
        .bind(patch.quantity)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Sweet::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sweets WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sweets")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

/// Escapes `ILIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
