//! Purchase and restock with optimistic concurrency.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::Sweet;
use crate::domain::inventory::{InventoryError, StockChange};
use crate::domain::repositories::{StockStore, WriteOutcome};

/// Upper bound on a single backoff delay between attempts.
const MAX_BACKOFF: Duration = Duration::from_millis(250);

/// Bounds for the read-decide-write retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. At least 1.
    pub max_attempts: u32,
    /// Base delay; attempt `n` waits roughly `base * 2^n` before retrying.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delays between attempts; one fewer than `max_attempts`.
    fn backoff(&self) -> impl Iterator<Item = Duration> {
        let factor = u64::try_from(self.base_delay.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);

        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Applies stock changes to sweets without ever driving stock negative.
///
/// Each attempt reads `(quantity, version)`, runs the decision logic, and
/// writes back conditionally on the version. Lost races are retried from a
/// fresh read up to [`RetryPolicy::max_attempts`] times; business failures
/// (`NotFound`, `InvalidQuantity`, `InsufficientStock`) are returned at once.
///
/// The service performs no authorization. Callers gate restocks to admins.
pub struct InventoryService<S: StockStore + ?Sized> {
    store: Arc<S>,
    policy: RetryPolicy,
}

impl<S: StockStore + ?Sized> InventoryService<S> {
    /// Creates a service with the default retry policy.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: Arc<S>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Buys `quantity` units (one if `None`).
    ///
    /// # Errors
    ///
    /// See [`Self::apply_inventory_change`].
    pub async fn purchase(&self, id: i64, quantity: Option<i64>) -> Result<Sweet, InventoryError> {
        self.apply_inventory_change(id, StockChange::purchase(quantity))
            .await
    }

    /// Adds `quantity` units.
    ///
    /// # Errors
    ///
    /// See [`Self::apply_inventory_change`].
    pub async fn restock(&self, id: i64, quantity: i64) -> Result<Sweet, InventoryError> {
        self.apply_inventory_change(id, StockChange::restock(quantity))
            .await
    }

    /// Applies `change` to sweet `id` and returns the committed record.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidQuantity`] before any store access if the
    ///   magnitude is below 1
    /// - [`InventoryError::NotFound`] if the sweet does not exist
    /// - [`InventoryError::InsufficientStock`] if a purchase exceeds stock
    /// - [`InventoryError::TransientConflict`] once every attempt lost its race
    /// - [`InventoryError::Store`] on store failures (not retried)
    pub async fn apply_inventory_change(
        &self,
        id: i64,
        change: StockChange,
    ) -> Result<Sweet, InventoryError> {
        if let Err(e) = change.validate() {
            record_outcome(change, "invalid");
            return Err(e);
        }

        let mut attempt = 0u32;
        let result = RetryIf::spawn(
            self.policy.backoff(),
            || {
                attempt += 1;
                self.try_apply(id, change, attempt)
            },
            InventoryError::is_retryable,
        )
        .await;

        match &result {
            Ok(sweet) => {
                record_outcome(change, "committed");
                tracing::info!(
                    sweet_id = id,
                    operation = change.operation(),
                    amount = change.magnitude(),
                    quantity = sweet.quantity,
                    "Inventory change committed"
                );
            }
            Err(InventoryError::TransientConflict { attempts }) => {
                record_outcome(change, "conflict");
                tracing::warn!(
                    sweet_id = id,
                    operation = change.operation(),
                    attempts,
                    "Gave up after repeated version conflicts"
                );
            }
            Err(InventoryError::InsufficientStock { .. }) => {
                record_outcome(change, "insufficient_stock");
            }
            Err(InventoryError::NotFound { .. }) => record_outcome(change, "not_found"),
            Err(InventoryError::InvalidQuantity { .. }) => record_outcome(change, "invalid"),
            Err(InventoryError::Store(e)) => {
                record_outcome(change, "store_error");
                tracing::error!(sweet_id = id, error = %e, "Stock store failure");
            }
        }

        result
    }

    /// One read-decide-write cycle.
    async fn try_apply(
        &self,
        id: i64,
        change: StockChange,
        attempt: u32,
    ) -> Result<Sweet, InventoryError> {
        let level = self
            .store
            .read_quantity(id)
            .await?
            .ok_or(InventoryError::NotFound { id })?;

        let next = change.apply_to(level.quantity)?;

        match self
            .store
            .write_quantity_if_version(id, next, level.version)
            .await?
        {
            WriteOutcome::Committed(sweet) => Ok(sweet),
            WriteOutcome::NotFound => Err(InventoryError::NotFound { id }),
            WriteOutcome::VersionConflict => {
                metrics::counter!("inventory_conflicts_total", "operation" => change.operation())
                    .increment(1);
                tracing::debug!(
                    sweet_id = id,
                    attempt,
                    expected_version = level.version,
                    "Stock version conflict"
                );
                Err(InventoryError::TransientConflict { attempts: attempt })
            }
        }
    }
}

fn record_outcome(change: StockChange, outcome: &'static str) {
    metrics::counter!(
        "inventory_changes_total",
        "operation" => change.operation(),
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockStockStore, StockLevel};
    use crate::error::AppError;
    use chrono::Utc;
    use mockall::Sequence;
    use serde_json::json;

    fn sweet_with(id: i64, quantity: i64, version: i64) -> Sweet {
        let now = Utc::now();
        Sweet::new(
            id,
            "Ladoo".to_string(),
            "Traditional".to_string(),
            250.0,
            quantity,
            version,
            now,
            now,
        )
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[test]
    fn test_policy_is_kept_and_clamped() {
        let service = InventoryService::new(Arc::new(MockStockStore::new()));
        assert_eq!(service.policy(), RetryPolicy::default());

        let service =
            InventoryService::with_policy(Arc::new(MockStockStore::new()), fast_policy(0));
        assert_eq!(service.policy().max_attempts, 1);
        assert_eq!(service.policy().base_delay, Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_purchase_success() {
        let mut store = MockStockStore::new();

        store.expect_read_quantity().times(1).returning(|_| {
            Ok(Some(StockLevel {
                quantity: 10,
                version: 4,
            }))
        });
        store
            .expect_write_quantity_if_version()
            .withf(|id, quantity, version| *id == 1 && *quantity == 7 && *version == 4)
            .times(1)
            .returning(|id, quantity, _| Ok(WriteOutcome::Committed(sweet_with(id, quantity, 5))));

        let service = InventoryService::new(Arc::new(store));
        let sweet = service.purchase(1, Some(3)).await.unwrap();

        assert_eq!(sweet.quantity, 7);
        assert_eq!(sweet.version, 5);
    }

    #[tokio::test]
    async fn test_purchase_defaults_to_one_unit() {
        let mut store = MockStockStore::new();

        store.expect_read_quantity().returning(|_| {
            Ok(Some(StockLevel {
                quantity: 5,
                version: 0,
            }))
        });
        store
            .expect_write_quantity_if_version()
            .withf(|_, quantity, _| *quantity == 4)
            .times(1)
            .returning(|id, quantity, _| Ok(WriteOutcome::Committed(sweet_with(id, quantity, 1))));

        let service = InventoryService::new(Arc::new(store));
        let sweet = service.purchase(1, None).await.unwrap();

        assert_eq!(sweet.quantity, 4);
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_not_written_or_retried() {
        let mut store = MockStockStore::new();

        store.expect_read_quantity().times(1).returning(|_| {
            Ok(Some(StockLevel {
                quantity: 5,
                version: 2,
            }))
        });
        store.expect_write_quantity_if_version().times(0);

        let service = InventoryService::with_policy(Arc::new(store), fast_policy(5));
        let err = service.purchase(1, Some(10)).await.unwrap_err();

        assert!(matches!(
            err,
            InventoryError::InsufficientStock {
                requested: 10,
                available: 5
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_quantity_never_touches_store() {
        let mut store = MockStockStore::new();
        store.expect_read_quantity().times(0);
        store.expect_write_quantity_if_version().times(0);

        let service = InventoryService::new(Arc::new(store));

        assert!(matches!(
            service.purchase(1, Some(0)).await,
            Err(InventoryError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            service.restock(1, -4).await,
            Err(InventoryError::InvalidQuantity { quantity: -4 })
        ));
    }

    #[tokio::test]
    async fn test_missing_sweet_is_not_found() {
        let mut store = MockStockStore::new();
        store
            .expect_read_quantity()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_write_quantity_if_version().times(0);

        let service = InventoryService::new(Arc::new(store));

        assert!(matches!(
            service.restock(42, 5).await,
            Err(InventoryError::NotFound { id: 42 })
        ));
    }

    #[tokio::test]
    async fn test_conflict_retries_from_fresh_read() {
        let mut store = MockStockStore::new();
        let mut seq = Sequence::new();

        store
            .expect_read_quantity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(Some(StockLevel {
                    quantity: 2,
                    version: 0,
                }))
            });
        store
            .expect_write_quantity_if_version()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(WriteOutcome::VersionConflict));
        // A concurrent buyer took one unit in between.
        store
            .expect_read_quantity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(Some(StockLevel {
                    quantity: 1,
                    version: 1,
                }))
            });
        store
            .expect_write_quantity_if_version()
            .withf(|_, quantity, version| *quantity == 0 && *version == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id, quantity, _| Ok(WriteOutcome::Committed(sweet_with(id, quantity, 2))));

        let service = InventoryService::with_policy(Arc::new(store), fast_policy(5));
        let sweet = service.purchase(1, Some(1)).await.unwrap();

        assert_eq!(sweet.quantity, 0);
    }

    #[tokio::test]
    async fn test_conflict_then_insufficient_stock() {
        let mut store = MockStockStore::new();
        let mut seq = Sequence::new();

        store
            .expect_read_quantity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(Some(StockLevel {
                    quantity: 1,
                    version: 0,
                }))
            });
        store
            .expect_write_quantity_if_version()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(WriteOutcome::VersionConflict));
        store
            .expect_read_quantity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(Some(StockLevel {
                    quantity: 0,
                    version: 1,
                }))
            });

        let service = InventoryService::with_policy(Arc::new(store), fast_policy(5));

        assert!(matches!(
            service.purchase(1, Some(1)).await,
            Err(InventoryError::InsufficientStock {
                requested: 1,
                available: 0
            })
        ));
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_transient_conflict() {
        let mut store = MockStockStore::new();

        store.expect_read_quantity().times(3).returning(|_| {
            Ok(Some(StockLevel {
                quantity: 10,
                version: 0,
            }))
        });
        store
            .expect_write_quantity_if_version()
            .times(3)
            .returning(|_, _, _| Ok(WriteOutcome::VersionConflict));

        let service = InventoryService::with_policy(Arc::new(store), fast_policy(3));

        assert!(matches!(
            service.restock(1, 1).await,
            Err(InventoryError::TransientConflict { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_deleted_between_read_and_write() {
        let mut store = MockStockStore::new();

        store.expect_read_quantity().times(1).returning(|_| {
            Ok(Some(StockLevel {
                quantity: 3,
                version: 0,
            }))
        });
        store
            .expect_write_quantity_if_version()
            .times(1)
            .returning(|_, _, _| Ok(WriteOutcome::NotFound));

        let service = InventoryService::new(Arc::new(store));

        assert!(matches!(
            service.purchase(9, Some(1)).await,
            Err(InventoryError::NotFound { id: 9 })
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_retried() {
        let mut store = MockStockStore::new();

        store.expect_read_quantity().times(1).returning(|_| {
            Err(AppError::unavailable(
                "Database temporarily unavailable",
                json!({}),
            ))
        });

        let service = InventoryService::with_policy(Arc::new(store), fast_policy(5));

        assert!(matches!(
            service.purchase(1, Some(1)).await,
            Err(InventoryError::Store(AppError::ServiceUnavailable { .. }))
        ));
    }

    #[test]
    fn test_policy_backoff_length() {
        assert_eq!(fast_policy(5).backoff().count(), 4);
        assert_eq!(fast_policy(1).backoff().count(), 0);
        assert_eq!(RetryPolicy::new(0, Duration::from_millis(1)).max_attempts, 1);
    }

    #[test]
    fn test_policy_backoff_is_capped() {
        let policy = RetryPolicy::new(20, Duration::from_millis(1000));
        assert!(policy.backoff().all(|d| d <= MAX_BACKOFF));
    }
}
