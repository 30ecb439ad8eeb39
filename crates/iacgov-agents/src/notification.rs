// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Notification agent: a command-style agent over notification
//! channels and test/send commands. Sends are always logged, never
//! delivered.

use crate::command::{contains, prompt_text};
use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter};
use iacgov_error::IacGovError;
use tracing::info;

const USAGE: &str = "Notification commands: `channels`, `test`, `send <message>`, `status`.";
const CHANNELS: &[&str] = &["teams", "slack", "email"];

/// The Notification agent: logs outbound notification intents without
/// delivering them.
pub struct NotificationAgent;

impl Default for NotificationAgent {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for NotificationAgent {
    fn id(&self) -> &str {
        "notification"
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: "notification".to_string(),
            name: "Notification Agent".to_string(),
            description: "Logs notification channel, test, and send commands without delivering them.".to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::default()
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let prompt = prompt_text(req);

        if contains(prompt, "channels") {
            emit.message(&format!("Configured channels: {}.", CHANNELS.join(", "))).await;
        } else if contains(prompt, "test") {
            info!("notification test command received");
            emit.message("Test notification logged (not delivered).").await;
        } else if contains(prompt, "send") {
            info!(prompt = %prompt, "notification send command received");
            emit.message("Notification logged (not delivered) — no message is actually sent in this environment.")
                .await;
        } else if contains(prompt, "status") {
            emit.message("Notification subsystem status: enabled for logging only, delivery disabled.").await;
        } else {
            emit.message(USAGE).await;
        }

        Ok(())
    }
}
