// SPDX-License-Identifier: MIT OR Apache-2.0
//! An [`Emitter`] that records every call in order, for asserting on a
//! dispatch's output shape rather than just its concatenated text.

use async_trait::async_trait;
use iacgov_core::{Confirmation, Emitter, Reference};
use std::sync::Mutex;

/// One recorded emitter call.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedEvent {
    /// An `Emitter::message` call.
    Message(String),
    /// An `Emitter::references` call.
    References(Vec<Reference>),
    /// An `Emitter::confirmation` call.
    Confirmation(Confirmation),
    /// An `Emitter::error` call.
    Error(String),
    /// The terminal `Emitter::done` call.
    Done,
}

/// Captures every call made to it; drains into a `Vec<CapturedEvent>` for
/// assertions once a dispatch has completed.
#[derive(Default)]
pub struct CapturingEmitter {
    events: Mutex<Vec<CapturedEvent>>,
}

impl CapturingEmitter {
    /// Consume the emitter and return the events recorded, in call order.
    #[must_use]
    pub fn into_events(self) -> Vec<CapturedEvent> {
        self.events.into_inner().unwrap_or_default()
    }

    /// Concatenate every `Message` event's text, ignoring other event kinds.
    #[must_use]
    pub fn messages_text(&self) -> String {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                CapturedEvent::Message(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Emitter for CapturingEmitter {
    async fn message(&self, text: &str) {
        self.events.lock().unwrap().push(CapturedEvent::Message(text.to_string()));
    }

    async fn references(&self, refs: Vec<Reference>) {
        self.events.lock().unwrap().push(CapturedEvent::References(refs));
    }

    async fn confirmation(&self, confirmation: Confirmation) {
        self.events.lock().unwrap().push(CapturedEvent::Confirmation(confirmation));
    }

    async fn error(&self, text: &str) {
        self.events.lock().unwrap().push(CapturedEvent::Error(text.to_string()));
    }

    async fn done(&self) {
        self.events.lock().unwrap().push(CapturedEvent::Done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let emitter = CapturingEmitter::default();
        emitter.message("hello").await;
        emitter.error("oops").await;
        emitter.done().await;
        let events = emitter.into_events();
        assert_eq!(
            events,
            vec![
                CapturedEvent::Message("hello".to_string()),
                CapturedEvent::Error("oops".to_string()),
                CapturedEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn messages_text_ignores_other_event_kinds() {
        let emitter = CapturingEmitter::default();
        emitter.message("a").await;
        emitter.done().await;
        emitter.message("b").await;
        assert_eq!(emitter.messages_text(), "ab");
    }
}
