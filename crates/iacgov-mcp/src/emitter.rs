// SPDX-License-Identifier: MIT OR Apache-2.0
//! A buffering [`Emitter`] that flattens one dispatch's output into a
//! single text blob, since stdio never streams SSE-style events.

use async_trait::async_trait;
use iacgov_core::{Confirmation, Emitter, Reference};
use std::sync::Mutex;

/// Collects every emitted message/error into one buffer, in call order.
/// References and confirmations are rendered inline as Markdown so no
/// structured output is silently dropped.
#[derive(Default)]
pub struct BufferEmitter {
    buffer: Mutex<String>,
}

impl BufferEmitter {
    /// Consume the emitter and return its accumulated text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.buffer.into_inner().unwrap_or_default()
    }
}

#[async_trait]
impl Emitter for BufferEmitter {
    async fn message(&self, text: &str) {
        self.buffer.lock().unwrap().push_str(text);
    }

    async fn references(&self, refs: Vec<Reference>) {
        if refs.is_empty() {
            return;
        }
        let mut buffer = self.buffer.lock().unwrap();
        for reference in refs {
            buffer.push_str(&format!("\n- [{}]({})", reference.title, reference.url));
        }
        buffer.push('\n');
    }

    async fn confirmation(&self, confirmation: Confirmation) {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.push_str(&format!("\n**{}**: {}\n", confirmation.title, confirmation.message));
    }

    async fn error(&self, text: &str) {
        self.buffer.lock().unwrap().push_str(&format!("Error: {text}\n"));
    }

    async fn done(&self) {}
}
