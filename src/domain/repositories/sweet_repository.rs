//! Repository trait for the sweet catalog.

use crate::domain::entities::{NewSweet, Sweet, SweetFilter, SweetPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for catalog management.
///
/// Quantity changes driven by purchases and restocks do not go through this
/// trait; they use the conditional write of [`super::StockStore`]. Admin edits
/// made here still bump the row version so in-flight conditional writes notice.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSweetRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemorySweetStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_sweet.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SweetRepository: Send + Sync {
    /// Creates a new sweet with version 0.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_sweet: NewSweet) -> Result<Sweet, AppError>;

    /// Finds a sweet by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Sweet))` if found
    /// - `Ok(None)` if not found
    async fn find_by_id(&self, id: i64) -> Result<Option<Sweet>, AppError>;

    /// Lists all sweets ordered by name.
    async fn list(&self) -> Result<Vec<Sweet>, AppError>;

    /// Lists sweets matching every criterion of `filter`, ordered by name.
    async fn search(&self, filter: SweetFilter) -> Result<Vec<Sweet>, AppError>;

    /// Applies a partial update and increments the version.
    ///
    /// Returns `Ok(None)` if no sweet has this id.
    async fn update(&self, id: i64, patch: SweetPatch) -> Result<Option<Sweet>, AppError>;

    /// Deletes a sweet.
    ///
    /// Returns `Ok(true)` if a row was removed, `Ok(false)` if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Counts all sweets.
    async fn count(&self) -> Result<i64, AppError>;
}
