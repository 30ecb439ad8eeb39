// SPDX-License-Identifier: MIT OR Apache-2.0
//! The serial read-one-line/dispatch/write-one-line loop.

use crate::handlers::handle;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use iacgov_error::IacGovError;
use iacgov_registry::Dispatcher;
use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error};

/// Run the stdio JSON-RPC loop to completion (EOF on stdin).
///
/// Requests are processed one at a time, in the order read; a malformed
/// line yields a `-32700` error response rather than aborting the loop.
pub async fn run(dispatcher: &Dispatcher) -> Result<(), IacGovError> {
    let stdin = io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|err| IacGovError::internal("failed to read stdin").with_source(err))?;
        let Some(line) = line else {
            debug!("stdin closed, stopping mcp loop");
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(req) => handle(dispatcher, req).await,
            Err(err) => {
                error!(error = %err, "malformed JSON-RPC request line");
                JsonRpcResponse::failure(Value::Null, -32700, format!("parse error: {err}"))
            }
        };

        let mut encoded = serde_json::to_string(&response).map_err(|err| IacGovError::internal(err.to_string()))?;
        encoded.push('\n');
        stdout
            .write_all(encoded.as_bytes())
            .await
            .map_err(|err| IacGovError::internal("failed to write stdout").with_source(err))?;
        stdout
            .flush()
            .await
            .map_err(|err| IacGovError::internal("failed to flush stdout").with_source(err))?;
    }
}
