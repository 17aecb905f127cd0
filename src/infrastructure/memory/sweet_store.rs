//! In-memory sweet catalog with versioned stock writes.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewSweet, Sweet, SweetFilter, SweetPatch};
use crate::domain::repositories::{StockLevel, StockStore, SweetRepository, WriteOutcome};
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    sweets: BTreeMap<i64, Sweet>,
}

/// Catalog held in process memory.
///
/// Implements both [`SweetRepository`] and [`StockStore`] over the same map,
/// so admin edits and stock writes see each other's version bumps. The
/// conditional write checks and updates the version under one write lock.
#[derive(Default)]
pub struct InMemorySweetStore {
    inner: RwLock<Inner>,
}

impl InMemorySweetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_by_name(mut sweets: Vec<Sweet>) -> Vec<Sweet> {
        sweets.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        sweets
    }
}

#[async_trait]
impl SweetRepository for InMemorySweetStore {
    async fn create(&self, new_sweet: NewSweet) -> Result<Sweet, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let now = Utc::now();
        let sweet = Sweet::new(
            inner.next_id,
            new_sweet.name,
            new_sweet.category,
            new_sweet.price,
            new_sweet.quantity,
            0,
            now,
            now,
        );
        inner.sweets.insert(sweet.id, sweet.clone());

        Ok(sweet)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Sweet>, AppError> {
        Ok(self.inner.read().await.sweets.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Sweet>, AppError> {
        let sweets = self.inner.read().await.sweets.values().cloned().collect();
        Ok(Self::sorted_by_name(sweets))
    }

    async fn search(&self, filter: SweetFilter) -> Result<Vec<Sweet>, AppError> {
        let sweets = self
            .inner
            .read()
            .await
            .sweets
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        Ok(Self::sorted_by_name(sweets))
    }

    async fn update(&self, id: i64, patch: SweetPatch) -> Result<Option<Sweet>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(sweet) = inner.sweets.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            sweet.name = name;
        }
        if let Some(category) = patch.category {
            sweet.category = category;
        }
        if let Some(price) = patch.price {
            sweet.price = price;
        }
        if let Some(quantity) = patch.quantity {
            sweet.quantity = quantity;
        }
        sweet.version += 1;
        sweet.updated_at = Utc::now();

        Ok(Some(sweet.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.inner.write().await.sweets.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.sweets.len() as i64)
    }
}

#[async_trait]
impl StockStore for InMemorySweetStore {
    async fn read_quantity(&self, id: i64) -> Result<Option<StockLevel>, AppError> {
        Ok(self
            .inner
            .read()
            .await
            .sweets
            .get(&id)
            .map(|s| StockLevel {
                quantity: s.quantity,
                version: s.version,
            }))
    }

    async fn write_quantity_if_version(
        &self,
        id: i64,
        quantity: i64,
        expected_version: i64,
    ) -> Result<WriteOutcome, AppError> {
        let mut inner = self.inner.write().await;
        let Some(sweet) = inner.sweets.get_mut(&id) else {
            return Ok(WriteOutcome::NotFound);
        };

        if sweet.version != expected_version {
            return Ok(WriteOutcome::VersionConflict);
        }

        sweet.quantity = quantity;
        sweet.version += 1;
        sweet.updated_at = Utc::now();

        Ok(WriteOutcome::Committed(sweet.clone()))
    }
}
