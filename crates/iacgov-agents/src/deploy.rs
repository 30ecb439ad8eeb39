// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Deploy agent: a command-style agent over deployment promotion,
//! rollback, status, and history. No IaC input required, no side effects.

use crate::command::{contains, parse_promote, prompt_text};
use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter};
use iacgov_error::IacGovError;

const USAGE: &str = "Deploy commands: `promote <target> to <environment>`, `status`, `rollback`, `history`.";

/// The Deploy agent: simulated promotion/rollback workflow commands.
pub struct DeployAgent;

impl Default for DeployAgent {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for DeployAgent {
    fn id(&self) -> &str {
        "deploy"
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: "deploy".to_string(),
            name: "Deploy Agent".to_string(),
            description: "Simulates deployment promotion, rollback, and status commands.".to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::default()
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let prompt = prompt_text(req);

        if let Some((target, environment)) = parse_promote(prompt) {
            emit.message(&format!(
                "Promoting `{target}` to `{environment}`. (simulated — no deployment was actually triggered)"
            ))
            .await;
        } else if contains(prompt, "rollback") {
            emit.message("Rolling back the most recent deployment. (simulated)").await;
        } else if contains(prompt, "history") {
            emit.message(
                "| Time | Target | Environment | Result |\n|---|---|---|---|\n\
                 | -24h | api-gateway | production | success |\n\
                 | -3d | worker-pool | staging | success |\n",
            )
            .await;
        } else if contains(prompt, "status") {
            emit.message("Deployment pipeline status: idle, no deployment in progress.").await;
        } else {
            emit.message(USAGE).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacgov_core::{Confirmation, Reference};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingEmitter {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Emitter for CapturingEmitter {
        async fn message(&self, text: &str) {
            self.messages.lock().unwrap().push(text.to_string());
        }
        async fn references(&self, _refs: Vec<Reference>) {}
        async fn confirmation(&self, _c: Confirmation) {}
        async fn error(&self, _text: &str) {}
        async fn done(&self) {}
    }

    async fn run(prompt: &str) -> String {
        let mut req = AgentRequest::default();
        req.prompt = Some(prompt.to_string());
        let agent = DeployAgent;
        let emitter = CapturingEmitter::default();
        agent.handle(&req, &emitter).await.unwrap();
        emitter.messages.lock().unwrap().join("")
    }

    #[tokio::test]
    async fn promote_command_names_target_and_environment() {
        let out = run("promote payments-api to production").await;
        assert!(out.contains("payments-api"));
        assert!(out.contains("production"));
        assert!(out.contains("simulated"));
    }

    #[tokio::test]
    async fn unrecognized_prompt_gets_usage() {
        let out = run("what can you do?").await;
        assert_eq!(out, USAGE);
    }
}
