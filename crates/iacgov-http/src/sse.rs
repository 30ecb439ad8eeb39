// SPDX-License-Identifier: MIT OR Apache-2.0
//! The SSE [`Emitter`] implementation and its bit-exact event framing.

use async_trait::async_trait;
use iacgov_core::{Confirmation, Emitter, Reference};
use serde_json::json;
use tokio::sync::mpsc;

/// Capacity of the channel backing one SSE stream. Matches the LLM content
/// channel's back-pressure capacity.
const CHANNEL_CAPACITY: usize = 100;

/// One framed SSE event: an `event:` name and its `data:` JSON payload.
pub struct SseEvent {
    pub name: &'static str,
    pub data: serde_json::Value,
}

/// Streams agent output as SSE events over a bounded channel.
///
/// Calls after [`Emitter::done`] has been sent are silently dropped, per
/// the `Emitter` contract — this happens naturally once the receiving end
/// of the channel is closed or the done marker has already been sent.
pub struct SseEmitter {
    tx: mpsc::Sender<SseEvent>,
}

impl SseEmitter {
    /// Build a new emitter and its paired receiver.
    pub fn channel() -> (Self, mpsc::Receiver<SseEvent>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Emitter for SseEmitter {
    async fn message(&self, text: &str) {
        let _ = self
            .tx
            .send(SseEvent { name: "copilot_message", data: json!({ "content": text }) })
            .await;
    }

    async fn references(&self, refs: Vec<Reference>) {
        let _ = self
            .tx
            .send(SseEvent { name: "copilot_references", data: json!({ "references": refs }) })
            .await;
    }

    async fn confirmation(&self, confirmation: Confirmation) {
        let _ = self
            .tx
            .send(SseEvent { name: "copilot_confirmation", data: json!({ "confirmation": confirmation }) })
            .await;
    }

    async fn error(&self, text: &str) {
        let _ = self
            .tx
            .send(SseEvent { name: "copilot_error", data: json!({ "error": text }) })
            .await;
    }

    async fn done(&self) {
        let _ = self.tx.send(SseEvent { name: "copilot_done", data: json!({}) }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn message_event_uses_flat_content_shape() {
        let (emitter, mut rx) = SseEmitter::channel();
        emitter.message("hello").await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "copilot_message");
        assert_eq!(event.data, json!({ "content": "hello" }));
    }

    #[tokio::test]
    async fn references_event_shape() {
        let (emitter, mut rx) = SseEmitter::channel();
        emitter
            .references(vec![Reference { title: "Docs".into(), url: "https://example.com".into() }])
            .await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "copilot_references");
        assert_eq!(event.data, json!({ "references": [{ "title": "Docs", "url": "https://example.com" }] }));
    }

    #[tokio::test]
    async fn confirmation_event_shape() {
        let (emitter, mut rx) = SseEmitter::channel();
        emitter.confirmation(Confirmation { title: "Proceed?".into(), message: "Apply change".into() }).await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "copilot_confirmation");
        assert_eq!(event.data, json!({ "confirmation": { "title": "Proceed?", "message": "Apply change" } }));
    }

    #[tokio::test]
    async fn done_event_is_empty_object() {
        let (emitter, mut rx) = SseEmitter::channel();
        emitter.done().await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "copilot_done");
        assert_eq!(event.data, json!({}));
    }
}
