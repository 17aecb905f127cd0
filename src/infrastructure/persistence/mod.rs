//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters. Rows are decoded through `FromRow` structs private to each module.
//!
//! # Repositories
//!
//! - [`PgSweetRepository`] - Catalog storage, search and admin edits
//! - [`PgStockStore`] - Versioned conditional quantity writes
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_stock_store;
pub mod pg_sweet_repository;
pub mod pg_token_repository;

pub use pg_stock_store::PgStockStore;
pub use pg_sweet_repository::PgSweetRepository;
pub use pg_token_repository::PgTokenRepository;

use chrono::{DateTime, Utc};

use crate::domain::entities::Sweet;

/// Column list shared by every query that returns a full sweet.
pub(crate) const SWEET_COLUMNS: &str =
    "id, name, category, price, quantity, version, created_at, updated_at";

/// Database row for the `sweets` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SweetRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SweetRow> for Sweet {
    fn from(r: SweetRow) -> Self {
        Sweet::new(
            r.id,
            r.name,
            r.category,
            r.price,
            r.quantity,
            r.version,
            r.created_at,
            r.updated_at,
        )
    }
}
