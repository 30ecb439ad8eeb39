// SPDX-License-Identifier: MIT OR Apache-2.0
//! Middleware stack for the governance host's HTTP API: request-id
//! tagging, request logging, a sliding-window rate limiter, and the
//! GitHub webhook HMAC-SHA256 signature check.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// RequestId middleware
// ---------------------------------------------------------------------------

/// A unique request identifier, available as an Axum extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub Uuid);

/// Generates a [`RequestId`] for each request and sets it on the
/// `X-Request-Id` response header.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let id = RequestId(Uuid::new_v4());
    req.extensions_mut().insert(id);
    let mut resp = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id.0.to_string()) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

/// Logs method, path, status, and duration for every request.
pub async fn request_logger(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let resp = next.run(req).await;

    info!(
        http.method = %method,
        http.path = %path,
        http.status = resp.status().as_u16(),
        http.duration_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    resp
}

// ---------------------------------------------------------------------------
// RateLimiter
// ---------------------------------------------------------------------------

/// In-memory sliding-window rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    /// Allow `max_requests` within a rolling `window`.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { inner: Arc::new(Mutex::new(VecDeque::new())), max_requests, window }
    }

    async fn check(&self) -> Result<(), StatusCode> {
        let now = Instant::now();
        let mut timestamps = self.inner.lock().await;

        while let Some(&front) = timestamps.front() {
            if now.duration_since(front) > self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() as u32 >= self.max_requests {
            return Err(StatusCode::TOO_MANY_REQUESTS);
        }
        timestamps.push_back(now);
        Ok(())
    }
}

/// Axum middleware function form of [`RateLimiter::check`], bound via
/// `axum::middleware::from_fn_with_state`.
pub async fn rate_limit(State(limiter): State<RateLimiter>, req: Request, next: Next) -> Response {
    match limiter.check().await {
        Ok(()) => next.run(req).await,
        Err(status) => (status, "too many requests").into_response(),
    }
}

// ---------------------------------------------------------------------------
// Webhook signature verification
// ---------------------------------------------------------------------------

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Verify `X-Hub-Signature-256: sha256=<hex>` against the configured
/// webhook secret, when one is configured. Requests are rejected with
/// `401 Unauthorized` on mismatch or malformed signature; when no secret
/// is configured the check is a no-op (allowed outside `prod`, where
/// config validation already requires a secret to exist).
pub async fn verify_webhook_signature(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let Some(secret) = state.config.github_webhook_secret.as_deref() else {
        return next.run(req).await;
    };

    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let Some(signature) = signature else {
        warn!("webhook request missing signature header");
        return (StatusCode::UNAUTHORIZED, "missing signature").into_response();
    };

    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, state.config.max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => return (StatusCode::PAYLOAD_TOO_LARGE, "body too large").into_response(),
    };

    if !signature_matches(secret, &bytes, &signature) {
        warn!("webhook signature verification failed");
        return (StatusCode::UNAUTHORIZED, "invalid signature").into_response();
    }

    let req = Request::from_parts(parts, Body::from(bytes));
    next.run(req).await
}

fn signature_matches(secret: &str, body: &[u8], header_value: &str) -> bool {
    let Some(hex_digest) = header_value.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
