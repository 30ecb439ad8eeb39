// SPDX-License-Identifier: MIT OR Apache-2.0
//! Method handlers for the stdio JSON-RPC surface: `initialize`,
//! `tools/list`, `tools/call`.

use crate::emitter::BufferEmitter;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use iacgov_core::AgentRequest;
use iacgov_registry::Dispatcher;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

/// Shape of `tools/call`'s `arguments`: the one field of `AgentRequest`
/// this transport's tool surface exposes to callers. Its `JsonSchema` derive
/// is what `tools/list` advertises as each tool's `inputSchema`, rather than
/// a hand-written schema literal drifting out of sync with what
/// `tools_call` actually validates below.
#[derive(Deserialize, JsonSchema)]
struct ToolCallArguments {
    prompt: String,
}

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "iacgov-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Route one decoded request to its handler, returning the response to
/// write back. `id` is taken from the request (`Value::Null` if omitted,
/// matching JSON-RPC notifications getting a best-effort reply here since
/// this transport processes strictly request/response, never fire-and-forget).
pub async fn handle(dispatcher: &Dispatcher, req: JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.unwrap_or(Value::Null);
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::success(id, initialize()),
        "tools/list" => JsonRpcResponse::success(id, tools_list(dispatcher)),
        "tools/call" => match tools_call(dispatcher, req.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err((code, message)) => JsonRpcResponse::failure(id, code, message),
        },
        other => JsonRpcResponse::failure(id, -32601, format!("method not found: {other}")),
    }
}

fn initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
    })
}

fn tools_list(dispatcher: &Dispatcher) -> Value {
    let schema = serde_json::to_value(schemars::schema_for!(ToolCallArguments))
        .expect("ToolCallArguments schema always serializes");
    let tools: Vec<Value> = dispatcher
        .registry()
        .list()
        .into_iter()
        .map(|agent| json!({ "name": agent.id, "description": agent.description, "inputSchema": schema }))
        .collect();
    json!({ "tools": tools })
}

async fn tools_call(dispatcher: &Dispatcher, params: Option<Value>) -> Result<Value, (i64, String)> {
    let params = params.ok_or((-32602, "missing params".to_string()))?;
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or((-32602, "missing params.name".to_string()))?
        .to_string();
    let prompt = params
        .get("arguments")
        .and_then(|a| a.get("prompt"))
        .and_then(Value::as_str)
        .ok_or((-32602, "missing params.arguments.prompt".to_string()))?
        .to_string();

    let mut req = AgentRequest { prompt: Some(prompt), ..Default::default() };
    iacgov_registry::parse_and_enrich(&mut req);

    let emitter = BufferEmitter::default();
    if let Err(err) = dispatcher.dispatch(Some(&name), &req, &emitter).await {
        let code = err.code.jsonrpc_code().unwrap_or(-32000);
        return Err((code, err.message));
    }

    let text = emitter.into_text();
    Ok(json!({ "content": [{ "type": "text", "text": text }] }))
}
