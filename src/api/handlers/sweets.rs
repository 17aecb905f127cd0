//! Handlers for catalog endpoints (browse, search, create, update, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::sweet::{
    CreateSweetRequest, MessageResponse, SearchParams, SweetResponse, UpdateSweetRequest,
};
use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every sweet ordered by name.
///
/// # Endpoint
///
/// `GET /api/sweets`
pub async fn list_sweets_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<SweetResponse>>, AppError> {
    let sweets = state.sweet_service.list_sweets().await?;
    Ok(Json(sweets.into_iter().map(SweetResponse::from).collect()))
}

/// Searches the catalog.
///
/// # Endpoint
///
/// `GET /api/sweets/search?name=jamun&category=Milk-based&min_price=100&max_price=300`
///
/// All parameters are optional. `name` matches a case-insensitive substring;
/// `category=All` matches every category.
///
/// # Errors
///
/// Returns 400 Bad Request if `min_price` exceeds `max_price`.
pub async fn search_sweets_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SweetResponse>>, AppError> {
    let sweets = state.sweet_service.search_sweets(params.into()).await?;
    Ok(Json(sweets.into_iter().map(SweetResponse::from).collect()))
}

/// Returns a single sweet.
///
/// # Endpoint
///
/// `GET /api/sweets/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the sweet doesn't exist.
pub async fn get_sweet_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SweetResponse>, AppError> {
    let sweet = state.sweet_service.get_sweet(id).await?;
    Ok(Json(sweet.into()))
}

/// Adds a sweet to the catalog. Admin only.
///
/// # Endpoint
///
/// `POST /api/sweets`
///
/// # Request Body
///
/// ```json
/// { "name": "Kaju Katli", "category": "Dry Fruit", "price": 450.0, "quantity": 25 }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
pub async fn create_sweet_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSweetRequest>,
) -> Result<(StatusCode, Json<SweetResponse>), AppError> {
    payload.validate()?;

    let sweet = state.sweet_service.create_sweet(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(sweet.into())))
}

/// Edits a sweet. Admin only.
///
/// # Endpoint
///
/// `PUT /api/sweets/{id}`
///
/// Only provided fields change. Setting `quantity` here bypasses the
/// insufficient-stock guard but still bumps the version, so concurrent
/// purchases re-read before writing.
///
/// # Errors
///
/// Returns 404 Not Found if the sweet doesn't exist.
/// Returns 400 Bad Request if validation fails.
pub async fn update_sweet_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateSweetRequest>,
) -> Result<Json<SweetResponse>, AppError> {
    payload.validate()?;

    let sweet = state.sweet_service.update_sweet(id, payload.into()).await?;

    Ok(Json(sweet.into()))
}

/// Removes a sweet. Admin only.
///
/// # Endpoint
///
/// `DELETE /api/sweets/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the sweet doesn't exist.
pub async fn delete_sweet_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.sweet_service.delete_sweet(id).await?;

    Ok(Json(MessageResponse {
        message: "Sweet deleted successfully".to_string(),
    }))
}
