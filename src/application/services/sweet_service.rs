//! Catalog management service.

use crate::domain::entities::{NewSweet, Sweet, SweetFilter, SweetPatch};
use crate::domain::repositories::SweetRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Category value that the storefront sends to mean "any category".
pub const ALL_CATEGORIES: &str = "All";

/// Service for browsing and administering the sweet catalog.
///
/// Input shape (lengths, ranges) is validated by the API DTOs; this service
/// enforces existence and the cross-field rules of a search.
pub struct SweetService<R: SweetRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: SweetRepository + ?Sized> SweetService<R> {
    /// Creates a new sweet service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists every sweet ordered by name.
    pub async fn list_sweets(&self) -> Result<Vec<Sweet>, AppError> {
        self.repository.list().await
    }

    /// Retrieves a sweet by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no sweet has this id.
    pub async fn get_sweet(&self, id: i64) -> Result<Sweet, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Searches the catalog.
    ///
    /// Blank names and the `All` category are treated as absent criteria.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `min_price` is greater than `max_price`.
    pub async fn search_sweets(&self, filter: SweetFilter) -> Result<Vec<Sweet>, AppError> {
        let filter = normalize_filter(filter);

        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price)
            && min > max
        {
            return Err(AppError::bad_request(
                "min_price must not exceed max_price",
                json!({ "min_price": min, "max_price": max }),
            ));
        }

        self.repository.search(filter).await
    }

    /// Creates a sweet with its initial stock.
    pub async fn create_sweet(&self, new_sweet: NewSweet) -> Result<Sweet, AppError> {
        let sweet = self.repository.create(new_sweet).await?;
        tracing::info!(sweet_id = sweet.id, name = %sweet.name, "Sweet created");
        Ok(sweet)
    }

    /// Applies an administrative edit.
    ///
    /// An empty patch returns the current record unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no sweet has this id.
    pub async fn update_sweet(&self, id: i64, patch: SweetPatch) -> Result<Sweet, AppError> {
        if patch.is_empty() {
            return self.get_sweet(id).await;
        }

        let sweet = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(sweet_id = id, version = sweet.version, "Sweet updated");
        Ok(sweet)
    }

    /// Deletes a sweet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no sweet has this id.
    pub async fn delete_sweet(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }

        tracing::info!(sweet_id = id, "Sweet deleted");
        Ok(())
    }

    /// Number of sweets in the catalog. Doubles as a store liveness probe.
    pub async fn count_sweets(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Sweet not found", json!({ "id": id }))
}

fn normalize_filter(filter: SweetFilter) -> SweetFilter {
    SweetFilter {
        name: filter
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        category: filter
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != ALL_CATEGORIES),
        min_price: filter.min_price,
        max_price: filter.max_price,
    }
}
