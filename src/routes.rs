//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /api/health`  - Health check (public)
//! - `/api/sweets/*`     - Catalog and inventory API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Single allowed origin from `FRONTEND_URL`
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token with admin role gating
//! - **Path normalization** - Trailing slash handling

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::Router;
use tower::Layer;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;

/// Router with every route and the auth layers, but no rate limiting, CORS or
/// tracing.
///
/// Rate limiting keys on the peer address, which in-process test clients do
/// not provide; integration tests drive this router directly.
pub fn api_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes(state.clone())
        .route("/health", get(health_handler));

    Router::new().nest("/api", api_router).with_state(state)
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `config` - supplies rate limits, the proxy flag and the CORS origin
///
/// # Errors
///
/// Returns an error if the rate limit or CORS settings cannot be built.
pub fn app_router(state: AppState, config: &Config) -> anyhow::Result<NormalizePath<Router>> {
    let router = api_router(state);

    let router = if config.behind_proxy {
        router.layer(rate_limit::layer(
            SmartIpKeyExtractor,
            config.rate_limit_per_second,
            config.rate_limit_burst,
        )?)
    } else {
        router.layer(rate_limit::layer(
            PeerIpKeyExtractor,
            config.rate_limit_per_second,
            config.rate_limit_burst,
        )?)
    };

    let router = match config.frontend_url {
        Some(ref origin) => router.layer(cors_layer(origin)?),
        None => router,
    };

    let router = router.layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin).context("FRONTEND_URL is not a valid origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}
