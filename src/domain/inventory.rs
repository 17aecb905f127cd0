//! Inventory decision logic.
//!
//! Pure rules for changing a sweet's stock quantity. Nothing here performs I/O;
//! the concurrency-safe apply loop lives in
//! [`crate::application::services::InventoryService`].

use thiserror::Error;

use crate::error::AppError;

/// Units bought when a purchase request omits the quantity.
pub const DEFAULT_PURCHASE_QUANTITY: i64 = 1;

/// A requested change to a sweet's stock.
///
/// Magnitudes are carried as given by the caller; [`StockChange::validate`]
/// rejects anything below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    Purchase(i64),
    Restock(i64),
}

/// Failures of an inventory operation.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("sweet {id} not found")]
    NotFound { id: i64 },

    #[error("invalid quantity {quantity} (must be a positive integer)")]
    InvalidQuantity { quantity: i64 },

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("concurrent update conflict after {attempts} attempts")]
    TransientConflict { attempts: u32 },

    #[error("stock store failure: {0}")]
    Store(#[from] AppError),
}

impl InventoryError {
    /// Only lost races are worth retrying; every other outcome is deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InventoryError::TransientConflict { .. })
    }
}

impl StockChange {
    /// Builds a purchase, defaulting to a single unit.
    pub fn purchase(quantity: Option<i64>) -> Self {
        StockChange::Purchase(quantity.unwrap_or(DEFAULT_PURCHASE_QUANTITY))
    }

    pub fn restock(quantity: i64) -> Self {
        StockChange::Restock(quantity)
    }

    /// Interprets a signed delta: positive restocks, negative purchases.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvalidQuantity`] for a zero delta, or for
    /// `i64::MIN`, which has no positive counterpart.
    pub fn from_delta(delta: i64) -> Result<Self, InventoryError> {
        match delta {
            d if d > 0 => Ok(StockChange::Restock(d)),
            d if d < 0 => d
                .checked_neg()
                .map(StockChange::Purchase)
                .ok_or(InventoryError::InvalidQuantity { quantity: d }),
            _ => Err(InventoryError::InvalidQuantity { quantity: 0 }),
        }
    }

    pub fn magnitude(&self) -> i64 {
        match *self {
            StockChange::Purchase(q) | StockChange::Restock(q) => q,
        }
    }

    /// Signed form of the change.
    pub fn delta(&self) -> i64 {
        match *self {
            StockChange::Purchase(q) => -q,
            StockChange::Restock(q) => q,
        }
    }

    /// Label used in logs and metrics.
    pub fn operation(&self) -> &'static str {
        match self {
            StockChange::Purchase(_) => "purchase",
            StockChange::Restock(_) => "restock",
        }
    }

    /// Human-readable status returned to clients after a commit.
    pub fn success_message(&self) -> &'static str {
        match self {
            StockChange::Purchase(_) => "Purchase successful",
            StockChange::Restock(_) => "Restock successful",
        }
    }

    /// Rejects magnitudes below 1. Runs before any store access.
    pub fn validate(&self) -> Result<(), InventoryError> {
        let quantity = self.magnitude();
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity { quantity });
        }
        Ok(())
    }

    /// Decides the quantity that results from applying this change to `current`.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidQuantity`] if the magnitude is below 1, or a
    ///   restock would overflow
    /// - [`InventoryError::InsufficientStock`] if a purchase exceeds `current`
    pub fn apply_to(&self, current: i64) -> Result<i64, InventoryError> {
        self.validate()?;

        match *self {
            StockChange::Purchase(q) => {
                if current < q {
                    return Err(InventoryError::InsufficientStock {
                        requested: q,
                        available: current,
                    });
                }
                Ok(current - q)
            }
            StockChange::Restock(q) => current
                .checked_add(q)
                .ok_or(InventoryError::InvalidQuantity { quantity: q }),
        }
    }
}
