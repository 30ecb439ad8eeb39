// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-llm
//!
//! An OpenAI-compatible chat-completions client used for optional LLM
//! enhancement of agent output. Streaming responses are modeled as a
//! producer-closed, bounded content channel plus a one-shot error channel;
//! consumers must drain the content channel to completion.

mod client;
mod wire;

pub use client::{LlmClient, LlmClientConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use iacgov_core::{Message, Role, Token};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn config(endpoint: String) -> LlmClientConfig {
        LlmClientConfig {
            endpoint,
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            max_tokens: 256,
        }
    }

    #[tokio::test]
    async fn complete_returns_assistant_text() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "hello from the model"}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(config(server.uri()), Token::default()).unwrap();
        let messages = vec![Message { role: Role::User, content: "hi".to_string() }];
        let text = client.complete(&messages).await.unwrap();
        assert_eq!(text, "hello from the model");
    }

    #[tokio::test]
    async fn complete_empty_content_is_an_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": ""}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(config(server.uri()), Token::default()).unwrap();
        let messages = vec![Message { role: Role::User, content: "hi".to_string() }];
        let err = client.complete(&messages).await.unwrap_err();
        assert_eq!(err.code, iacgov_error::ErrorCode::LlmEmptyResponse);
    }

    #[tokio::test]
    async fn complete_5xx_is_llm_api_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = LlmClient::new(config(server.uri()), Token::default()).unwrap();
        let messages = vec![Message { role: Role::User, content: "hi".to_string() }];
        let err = client.complete(&messages).await.unwrap_err();
        assert_eq!(err.code, iacgov_error::ErrorCode::LlmApiError);
    }

    #[tokio::test]
    async fn stream_drains_content_chunks_until_done() {
        let server = wiremock::MockServer::start().await;
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"he\"},\"finish_reason\":null}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"llo\"},\"finish_reason\":null}]}\n\n\
                    data: [DONE]\n\n";
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw(body, "text/event-stream"),
            )
            .mount(&server)
            .await;

        let client = LlmClient::new(config(server.uri()), Token::default()).unwrap();
        let messages = vec![Message { role: Role::User, content: "hi".to_string() }];
        let (mut content_rx, error_rx) = client.stream(messages, CancellationToken::new());

        let mut collected = String::new();
        while let Some(chunk) = content_rx.recv().await {
            collected.push_str(&chunk);
        }
        assert_eq!(collected, "hello");
        assert!(error_rx.await.is_err(), "error channel should close without sending");
    }

    #[tokio::test]
    async fn stream_cancellation_closes_both_channels() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_raw("data: [DONE]\n\n", "text/event-stream"),
            )
            .mount(&server)
            .await;

        let client = LlmClient::new(config(server.uri()), Token::default()).unwrap();
        let messages = vec![Message { role: Role::User, content: "hi".to_string() }];
        let cancel = CancellationToken::new();
        let (mut content_rx, error_rx) = client.stream(messages, cancel.clone());
        cancel.cancel();

        assert!(content_rx.recv().await.is_none());
        let err = error_rx.await.unwrap();
        assert_eq!(err.code, iacgov_error::ErrorCode::LlmCancelled);
    }
}
