//! Bearer token authentication and role gating.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::Principal;
use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the caller's [`Principal`] is inserted into the request
/// extensions for handlers and [`require_admin`].
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token is not found or revoked
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/sweets", get(list_sweets_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let principal = st.auth_service.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Rejects callers whose token does not carry the `admin` role.
///
/// Must run inside [`layer`].
///
/// # Errors
///
/// - `401 Unauthorized` if no principal was attached
/// - `403 Forbidden` for non-admin principals
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let principal = req.extensions().get::<Principal>().ok_or_else(|| {
        AppError::unauthorized("Unauthorized", json!({"reason": "Not authenticated"}))
    })?;

    if !principal.is_admin() {
        tracing::debug!(token_id = principal.token_id, "Admin route denied");
        return Err(AppError::forbidden(
            "Admin access required",
            json!({ "role": principal.role.as_str() }),
        ));
    }

    Ok(next.run(req).await)
}
