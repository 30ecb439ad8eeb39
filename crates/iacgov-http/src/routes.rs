// SPDX-License-Identifier: MIT OR Apache-2.0
//! Route handlers: health, agent discovery, and the SSE dispatch endpoints.

use crate::sse::SseEmitter;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::Stream;
use iacgov_core::{AgentRequest, Message, Reference, Token};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt as _;
use tracing::warn;

const SERVICE_NAME: &str = "iac-gov-host";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `GET /health`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "environment": format!("{:?}", state.config.environment).to_lowercase(),
        "agents": state.dispatcher.registry().list().len(),
    }))
}

/// `GET /agents`.
pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!(state.dispatcher.registry().list()))
}

/// `GET /agents/{id}`.
pub async fn get_agent(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.dispatcher.registry().get(&id) {
        Some(agent) => Json(json!(agent.metadata())).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": format!("unknown agent '{id}'") }))).into_response(),
    }
}

/// Request body accepted by `POST /agent` and `POST /agent/{id}`.
#[derive(Debug, Deserialize)]
pub struct DispatchRequestBody {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub copilot_references: Vec<Reference>,
    #[serde(default)]
    pub streaming: Option<bool>,
}

/// `POST /agent` — dispatches to the registry default (the orchestrator).
pub async fn dispatch_default(
    state: State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    body: Json<DispatchRequestBody>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    dispatch(state, headers, None, body).await
}

/// `POST /agent/{id}` — dispatches to the named agent.
pub async fn dispatch_named(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: axum::http::HeaderMap,
    body: Json<DispatchRequestBody>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    dispatch(state, headers, Some(id), body).await
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    agent_id: Option<String>,
    Json(body): Json<DispatchRequestBody>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let token = headers
        .get("x-github-token")
        .and_then(|v| v.to_str().ok())
        .map(Token::new)
        .unwrap_or_default();

    let mut req = AgentRequest {
        messages: body.messages,
        references: body.copilot_references,
        token,
        ..Default::default()
    };
    iacgov_registry::parse_and_enrich(&mut req);

    let (emitter, rx) = SseEmitter::channel();
    let agent_dispatch_timeout = state.config.agent_timeout;

    tokio::spawn(async move {
        run_dispatch(state, agent_id, req, emitter, agent_dispatch_timeout).await;
    });

    let stream = ReceiverStream::new(rx).map(|event| {
        Ok(Event::default().event(event.name).data(event.data.to_string()))
    });
    Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default())
}

async fn run_dispatch(
    state: Arc<AppState>,
    agent_id: Option<String>,
    req: AgentRequest,
    emitter: SseEmitter,
    agent_dispatch_timeout: Duration,
) {
    use iacgov_core::Emitter as _;

    let result = timeout(
        agent_dispatch_timeout,
        state.dispatcher.dispatch(agent_id.as_deref(), &req, &emitter),
    )
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!(error = %err, "agent dispatch failed");
            emitter.error(&err.to_string()).await;
        }
        Err(_) => {
            warn!(timeout_secs = agent_dispatch_timeout.as_secs(), "agent dispatch timed out");
            emitter.error("agent dispatch timed out").await;
        }
    }

    emitter.done().await;
}
