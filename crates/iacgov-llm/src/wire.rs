// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wire types for the OpenAI-compatible Chat Completions API.

use iacgov_core::{Message, Role};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

#[derive(Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> WireMessage<'a> {
    pub fn from_message(msg: &'a Message) -> Self {
        Self {
            role: msg.role,
            content: &msg.content,
        }
    }
}

/// A non-streaming `chat.completion` response.
#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: String,
}

/// A single `chat.completion.chunk` SSE frame.
///
/// Mirrors the shape streamed by OpenAI-compatible endpoints: only the
/// fields the content-extraction path needs are modeled.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub(crate) struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub(crate) struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub(crate) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_deserializes_content_delta() {
        let raw = r#"{"choices":[{"delta":{"content":"hel"},"finish_reason":null}]}"#;
        let chunk: ChatCompletionChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hel"));
    }

    #[test]
    fn chunk_with_no_content_delta_parses_as_none() {
        let raw = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        let chunk: ChatCompletionChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.choices[0].delta.content, None);
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }
}
