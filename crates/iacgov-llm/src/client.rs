// SPDX-License-Identifier: MIT OR Apache-2.0
//! A minimal OpenAI-compatible chat-completions client with SSE streaming.

use crate::wire::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, WireMessage};
use futures::StreamExt;
use iacgov_core::{Message, Token};
use iacgov_error::{ErrorCode, IacGovError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Number of in-flight content chunks buffered between the stream driver
/// and its consumer before `send` starts to apply backpressure.
const CONTENT_CHANNEL_CAPACITY: usize = 100;

/// Sampling temperature for every chat-completion request, chosen for
/// consistent, low-variance governance narratives rather than creative text.
const CHAT_TEMPERATURE: f64 = 0.3;

/// Configuration for an [`LlmClient`].
#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

/// An OpenAI-compatible chat-completions client.
///
/// Cheap to clone: the inner [`reqwest::Client`] is reference-counted.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmClientConfig,
    token: Token,
}

impl LlmClient {
    /// Build a client. Returns an error only if the underlying HTTP client
    /// fails to construct (e.g. an invalid TLS configuration).
    pub fn new(config: LlmClientConfig, token: Token) -> Result<Self, IacGovError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                IacGovError::new(ErrorCode::ConfigInvalid, "failed to build LLM HTTP client")
                    .with_source(e)
            })?;
        Ok(Self { http, config, token })
    }

    fn request_builder(&self, body: &ChatCompletionRequest<'_>) -> reqwest::RequestBuilder {
        let mut req = self.http.post(&self.config.endpoint).json(body);
        if !self.token.is_empty() {
            req = req.bearer_auth(self.token.as_str());
        }
        req
    }

    /// Run a single non-streaming completion and return the assistant's
    /// full text.
    pub async fn complete(&self, messages: &[Message]) -> Result<String, IacGovError> {
        let wire_messages: Vec<WireMessage<'_>> = messages.iter().map(WireMessage::from_message).collect();
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: wire_messages,
            max_tokens: self.config.max_tokens,
            temperature: CHAT_TEMPERATURE,
            stream: false,
        };

        let response = self
            .request_builder(&body)
            .send()
            .await
            .map_err(|e| IacGovError::new(ErrorCode::LlmApiError, "LLM request failed").with_source(e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(IacGovError::new(
                ErrorCode::LlmApiError,
                format!("LLM endpoint returned status {status}"),
            ));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| IacGovError::new(ErrorCode::LlmApiError, "failed to decode LLM response").with_source(e))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(IacGovError::new(ErrorCode::LlmEmptyResponse, "LLM returned an empty completion"));
        }

        Ok(content)
    }

    /// Start a streaming completion. Returns a bounded content receiver and
    /// a one-shot error receiver; the driver task closes both when the
    /// stream ends, errors, or `cancel` fires.
    pub fn stream(
        &self,
        messages: Vec<Message>,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<String>, oneshot::Receiver<IacGovError>) {
        let (content_tx, content_rx) = mpsc::channel(CONTENT_CHANNEL_CAPACITY);
        let (error_tx, error_rx) = oneshot::channel();
        let client = self.clone();

        tokio::spawn(async move {
            if let Err(err) = client.drive_stream(messages, &content_tx, &cancel).await {
                let _ = error_tx.send(err);
            }
        });

        (content_rx, error_rx)
    }

    async fn drive_stream(
        &self,
        messages: Vec<Message>,
        content_tx: &mpsc::Sender<String>,
        cancel: &CancellationToken,
    ) -> Result<(), IacGovError> {
        let wire_messages: Vec<WireMessage<'_>> = messages.iter().map(WireMessage::from_message).collect();
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: wire_messages,
            max_tokens: self.config.max_tokens,
            temperature: CHAT_TEMPERATURE,
            stream: true,
        };

        let response = self
            .request_builder(&body)
            .send()
            .await
            .map_err(|e| IacGovError::new(ErrorCode::LlmApiError, "LLM stream request failed").with_source(e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(IacGovError::new(
                ErrorCode::LlmApiError,
                format!("LLM endpoint returned status {status}"),
            ));
        }

        let mut bytes_stream = response.bytes_stream();
        let mut buffer = String::new();

        loop {
            let chunk = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("LLM stream cancelled by caller");
                    return Err(IacGovError::new(ErrorCode::LlmCancelled, "LLM stream cancelled"));
                }
                chunk = bytes_stream.next() => chunk,
            };

            let Some(chunk) = chunk else {
                break;
            };
            let chunk = chunk
                .map_err(|e| IacGovError::new(ErrorCode::LlmApiError, "LLM stream transport error").with_source(e))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline_at) = buffer.find('\n') {
                let line = buffer[..newline_at].trim_end_matches('\r').to_string();
                buffer.drain(..=newline_at);

                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim();
                if data.is_empty() {
                    continue;
                }
                if data == "[DONE]" {
                    return Ok(());
                }

                match serde_json::from_str::<ChatCompletionChunk>(data) {
                    Ok(parsed) => {
                        for choice in parsed.choices {
                            if let Some(text) = choice.delta.content {
                                if !text.is_empty() && content_tx.send(text).await.is_err() {
                                    return Ok(());
                                }
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "skipping malformed SSE chunk"),
                }
            }
        }

        Ok(())
    }
}
