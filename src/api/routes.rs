//! API route configuration.
//!
//! Every route here requires Bearer token authentication via
//! [`crate::api::middleware::auth`]. Write operations on the catalog and
//! restocks additionally require the `admin` role.

use crate::api::handlers::{
    create_sweet_handler, delete_sweet_handler, get_sweet_handler, list_sweets_handler,
    purchase_handler, restock_handler, search_sweets_handler, update_sweet_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Protected API routes.
///
/// # Endpoints
///
/// - `GET    /sweets`              - List sweets
/// - `POST   /sweets`              - Create a sweet (admin)
/// - `GET    /sweets/search`       - Search by name, category and price range
/// - `GET    /sweets/{id}`         - Get a sweet
/// - `PUT    /sweets/{id}`         - Edit a sweet (admin)
/// - `DELETE /sweets/{id}`         - Delete a sweet (admin)
/// - `POST   /sweets/{id}/purchase` - Buy units
/// - `POST   /sweets/{id}/restock`  - Add units (admin)
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/sweets",
            post(create_sweet_handler)
                .route_layer(middleware::from_fn(auth::require_admin))
                .get(list_sweets_handler),
        )
        .route("/sweets/search", get(search_sweets_handler))
        .route(
            "/sweets/{id}",
            put(update_sweet_handler)
                .delete(delete_sweet_handler)
                .route_layer(middleware::from_fn(auth::require_admin))
                .get(get_sweet_handler),
        )
        .route("/sweets/{id}/purchase", post(purchase_handler))
        .route(
            "/sweets/{id}/restock",
            post(restock_handler).route_layer(middleware::from_fn(auth::require_admin)),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
