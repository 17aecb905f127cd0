//! DTOs for stock-changing endpoints.

use serde::{Deserialize, Serialize};

use crate::api::dto::sweet::SweetResponse;

/// Request body for `POST /api/sweets/{id}/purchase`.
///
/// An empty object buys a single unit. Sign and range checks happen in the
/// inventory core so the error code is `validation_error` either way.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Request body for `POST /api/sweets/{id}/restock`.
#[derive(Debug, Default, Deserialize)]
pub struct RestockRequest {
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Result of a committed stock change.
#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub message: String,
    pub sweet: SweetResponse,
}
