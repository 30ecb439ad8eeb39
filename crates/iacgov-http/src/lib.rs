// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-http
//!
//! The HTTP transport: an [`axum`] router exposing `GET /health`,
//! `GET /agents`, `GET /agents/{id}`, `POST /agent`, and `POST /agent/{id}`,
//! with SSE streaming ([`sse::SseEmitter`]), a request-id/logging/rate-limit
//! middleware stack, HMAC-SHA256 webhook signature verification, and
//! graceful shutdown.

mod middleware;
pub mod routes;
mod shutdown;
mod state;
pub mod sse;

pub use shutdown::serve;
pub use state::AppState;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;

/// Default rate limit: 120 requests per minute per process.
const RATE_LIMIT_MAX_REQUESTS: u32 = 120;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Build the full router over shared [`AppState`].
#[must_use]
pub fn build_app(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.max_body_size;
    let rate_limiter = middleware::RateLimiter::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW);

    // The webhook signature check only guards the dispatch endpoints — GET
    // routes carry no body to sign and must stay reachable without one.
    let dispatch_routes = Router::new()
        .route("/agent", post(routes::dispatch_default))
        .route("/agent/{id}", post(routes::dispatch_named))
        .layer(from_fn_with_state(state.clone(), middleware::verify_webhook_signature))
        .layer(RequestBodyLimitLayer::new(max_body_size));

    let discovery_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/agents", get(routes::list_agents))
        .route("/agents/{id}", get(routes::get_agent));

    dispatch_routes
        .merge(discovery_routes)
        .layer(from_fn_with_state(rate_limiter, middleware::rate_limit))
        .layer(from_fn(middleware::request_logger))
        .layer(from_fn(middleware::request_id_middleware))
        .with_state(state)
}
