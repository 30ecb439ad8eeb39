// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-mcp
//!
//! The MCP stdio transport: line-delimited JSON-RPC 2.0 on stdin/stdout.
//! `initialize`/`tools/list`/`tools/call` as specified; every other method
//! name is `-32601`. Logs go to stderr so stdout stays reserved for
//! protocol traffic.

mod emitter;
mod handlers;
mod protocol;
mod server;

pub use emitter::BufferEmitter;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::run;
