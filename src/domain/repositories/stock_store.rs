//! Conditional-write contract for stock quantities.

use crate::domain::entities::Sweet;
use crate::error::AppError;
use async_trait::async_trait;

/// Quantity of a sweet together with the version it was read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub quantity: i64,
    pub version: i64,
}

/// Result of a conditional quantity write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// The write committed; carries the updated record.
    Committed(Sweet),
    /// Another writer changed the row since it was read.
    VersionConflict,
    /// The row no longer exists.
    NotFound,
}

/// Store primitive behind purchases and restocks.
///
/// Implementations must make [`StockStore::write_quantity_if_version`] atomic
/// with respect to every other writer of the same row: it commits only if the
/// stored version still equals `expected_version`, and on commit it bumps the
/// version. A write that is dropped before it completes must leave the row
/// untouched.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStockStore`] - single conditional `UPDATE`
/// - [`crate::infrastructure::memory::InMemorySweetStore`] - compare-and-swap under a lock
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Reads the current quantity and version.
    ///
    /// Returns `Ok(None)` if no sweet has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] when the store times out, and
    /// [`AppError::Internal`] on other failures.
    async fn read_quantity(&self, id: i64) -> Result<Option<StockLevel>, AppError>;

    /// Stores `quantity` only if the row is still at `expected_version`.
    ///
    /// # Errors
    ///
    /// Same as [`StockStore::read_quantity`]. A lost race is not an error; it is
    /// reported as [`WriteOutcome::VersionConflict`].
    async fn write_quantity_if_version(
        &self,
        id: i64,
        quantity: i64,
        expected_version: i64,
    ) -> Result<WriteOutcome, AppError>;
}
