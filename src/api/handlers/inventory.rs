//! Handlers for purchase and restock.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::inventory::{InventoryResponse, PurchaseRequest, RestockRequest};
use crate::api::extract::ApiJson;
use crate::application::services::Principal;
use crate::domain::inventory::StockChange;
use crate::error::AppError;
use crate::state::AppState;

/// Buys units of a sweet.
///
/// # Endpoint
///
/// `POST /api/sweets/{id}/purchase`
///
/// # Request Body
///
/// ```json
/// { "quantity": 3 }
/// ```
///
/// `{}` or no body at all buys one unit.
///
/// # Errors
///
/// - 400 `insufficient_stock` if fewer units are available than requested
/// - 400 `validation_error` if the quantity is below 1 or not an integer
/// - 404 if the sweet doesn't exist
/// - 409 if concurrent updates kept winning until retries ran out
pub async fn purchase_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Option<ApiJson<PurchaseRequest>>,
) -> Result<Json<InventoryResponse>, AppError> {
    let quantity = payload.and_then(|ApiJson(body)| body.quantity);
    let change = StockChange::purchase(quantity);
    tracing::debug!(
        sweet_id = id,
        caller = %principal.name,
        quantity = change.magnitude(),
        "Purchase requested"
    );

    let sweet = state
        .inventory_service
        .apply_inventory_change(id, change)
        .await?;

    Ok(Json(InventoryResponse {
        message: change.success_message().to_string(),
        sweet: sweet.into(),
    }))
}

/// Adds units to a sweet. Admin only.
///
/// # Endpoint
///
/// `POST /api/sweets/{id}/restock`
///
/// # Request Body
///
/// ```json
/// { "quantity": 25 }
/// ```
///
/// # Errors
///
/// - 400 `validation_error` if the quantity is missing, not an integer or below 1
/// - 404 if the sweet doesn't exist
/// - 409 if concurrent updates kept winning until retries ran out
pub async fn restock_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RestockRequest>,
) -> Result<Json<InventoryResponse>, AppError> {
    let quantity = payload.quantity.ok_or_else(|| {
        AppError::bad_request(
            "Quantity is required",
            json!([{ "field": "quantity", "message": "Quantity is required" }]),
        )
    })?;

    let change = StockChange::restock(quantity);
    let sweet = state
        .inventory_service
        .apply_inventory_change(id, change)
        .await?;

    Ok(Json(InventoryResponse {
        message: change.success_message().to_string(),
        sweet: sweet.into(),
    }))
}
