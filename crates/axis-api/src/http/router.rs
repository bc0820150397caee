//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`; `/health` sits at the root.
//! Middleware, outermost first: CORS, HTTP trace, request context. Chat
//! turns and history additionally pass the cookie auth gate.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::http::error::{method_not_allowed, route_not_found};
use crate::http::extractors::auth::require_auth;
use crate::http::extractors::context::request_context;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    let gated = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/chat/history", get(handlers::chat::history))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/chat/models", get(handlers::chat::list_models))
        .merge(gated)
        .method_not_allowed_fallback(method_not_allowed);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::check_health))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS restricted to the configured origins, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                warn!("ignoring wildcard CORS origin; credentials require explicit origins");
                return None;
            }
            HeaderValue::from_str(origin)
                .inspect_err(|e| warn!(%origin, error = %e, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
