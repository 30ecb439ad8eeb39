// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Orchestrator: classifies intent by keyword, runs a fixed sequence of
//! sub-agents against the same request and emitter, and optionally
//! synthesizes their output with a final LLM pass.
//!
//! Registered as an ordinary agent; cycle protection against re-entering
//! itself is the dispatcher's job (`__dispatch_visited`), not this agent's.

use crate::command::{contains, prompt_text};
use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter, Message, Role};
use iacgov_error::IacGovError;
use iacgov_llm::LlmClient;
use iacgov_registry::Dispatcher;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const CODE_REVIEW_WORKFLOW: &[&str] = &["policy", "security", "cost", "module"];
const FULL_ANALYSIS_WORKFLOW: &[&str] = &["security", "policy", "compliance", "cost", "impact", "module"];
const DEPLOY_CHECK_WORKFLOW: &[&str] = &["security", "policy", "cost", "impact"];

const SYNTHESIS_SYSTEM_PROMPT: &str =
    "You are synthesizing the output of several infrastructure governance agents into one short executive summary.";

const USAGE: &str =
    "Orchestrator commands: `status`, `code review`, `full analysis`, `deploy check`, or `<agent-id> ...` to route directly.";

enum Intent {
    Status,
    RouteTo(String),
    Workflow(&'static [&'static str]),
    Usage,
}

fn classify(dispatcher: &Dispatcher, prompt: &str, has_iac: bool) -> Intent {
    if let Some(first_word) = prompt.split_whitespace().next() {
        let candidate = first_word.to_ascii_lowercase();
        if candidate != "orchestrator" && dispatcher.registry().contains(&candidate) {
            return Intent::RouteTo(candidate);
        }
    }

    if contains(prompt, "status") {
        Intent::Status
    } else if contains(prompt, "code review") {
        Intent::Workflow(CODE_REVIEW_WORKFLOW)
    } else if contains(prompt, "full analysis") {
        Intent::Workflow(FULL_ANALYSIS_WORKFLOW)
    } else if contains(prompt, "deploy check") {
        Intent::Workflow(DEPLOY_CHECK_WORKFLOW)
    } else if has_iac {
        Intent::Workflow(FULL_ANALYSIS_WORKFLOW)
    } else {
        Intent::Usage
    }
}

/// The Orchestrator agent: composes the other registered agents.
pub struct OrchestratorAgent {
    dispatcher: Dispatcher,
    llm: Option<Arc<LlmClient>>,
}

impl OrchestratorAgent {
    /// Build an orchestrator over a dispatcher and an optional LLM client
    /// for the final synthesis pass.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, llm: Option<Arc<LlmClient>>) -> Self {
        Self { dispatcher, llm }
    }

    async fn run_workflow(&self, ids: &[&str], req: &AgentRequest, emit: &dyn Emitter) {
        for id in ids {
            emit.message(&format!("\n## {id}\n\n")).await;
            if let Err(err) = self.dispatcher.dispatch(Some(id), req, emit).await {
                warn!(agent = *id, error = %err, "sub-agent dispatch failed");
                emit.message(&format!("\u{26a0} {id}: {err}\n")).await;
            }
        }
    }

    async fn status_report(&self, emit: &dyn Emitter) {
        let mut out = String::from("| Agent | Name | Description |\n|---|---|---|\n");
        for agent in self.dispatcher.registry().list() {
            let _ = writeln!(out, "| {} | {} | {} |", agent.id, agent.name, agent.description);
        }
        emit.message(&out).await;
    }

    async fn synthesize(&self, req: &AgentRequest, workflow: &[&str], emit: &dyn Emitter) {
        let Some(llm) = &self.llm else {
            return;
        };
        if req.token.is_empty() {
            return;
        }
        let code = req.iac.as_ref().map_or("", |iac| iac.raw_code.as_str());
        let messages = vec![
            Message { role: Role::System, content: SYNTHESIS_SYSTEM_PROMPT.to_string() },
            Message {
                role: Role::User,
                content: format!(
                    "The following agents ran in order: {}.\n\nIaC under review:\n```\n{code}\n```\n\nWrite a short executive summary tying their findings together.",
                    workflow.join(", ")
                ),
            },
        ];

        emit.message("\n\n## Summary\n\n").await;
        let (mut content_rx, error_rx) = llm.stream(messages, CancellationToken::new());
        while let Some(chunk) = content_rx.recv().await {
            emit.message(&chunk).await;
        }
        if let Ok(err) = error_rx.await {
            warn!(error = %err, "orchestrator synthesis pass failed");
            emit.message(&format!("\n\n_LLM enhancement unavailable: {err}_")).await;
        }
        emit.message("\n\n").await;
    }
}

#[async_trait]
impl Agent for OrchestratorAgent {
    fn id(&self) -> &str {
        "orchestrator"
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: "orchestrator".to_string(),
            name: "Orchestrator Agent".to_string(),
            description: "Classifies intent and composes the other registered agents into a single response."
                .to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::default()
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let prompt = prompt_text(req);
        let has_iac = req.iac.as_ref().is_some_and(|iac| !iac.is_empty());

        match classify(&self.dispatcher, prompt, has_iac) {
            Intent::Status => self.status_report(emit).await,
            Intent::RouteTo(id) => {
                if let Err(err) = self.dispatcher.dispatch(Some(id.as_str()), req, emit).await {
                    emit.error(&err.to_string()).await;
                }
            }
            Intent::Workflow(ids) => {
                info!(workflow = ?ids, "orchestrator running workflow");
                self.run_workflow(ids, req, emit).await;
                self.synthesize(req, ids, emit).await;
            }
            Intent::Usage => emit.message(USAGE).await,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacgov_core::{AgentCapabilities as Caps, Confirmation, Reference};
    use iacgov_registry::AgentRegistryBuilder;
    use std::sync::Mutex;

    struct StubAgent {
        id: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn id(&self) -> &str {
            self.id
        }
        fn metadata(&self) -> AgentMetadata {
            AgentMetadata { id: self.id.to_string(), name: self.id.to_string(), description: String::new() }
        }
        fn capabilities(&self) -> AgentCapabilities {
            Caps::default()
        }
        async fn handle(&self, _req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
            if self.fail {
                return Err(IacGovError::internal("boom"));
            }
            emit.message(&format!("{} output", self.id)).await;
            Ok(())
        }
    }

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

    fn dispatcher() -> Dispatcher {
        let registry = AgentRegistryBuilder::new()
            .register(StubAgent { id: "policy", fail: false })
            .register(StubAgent { id: "security", fail: false })
            .register(StubAgent { id: "compliance", fail: false })
            .register(StubAgent { id: "cost", fail: false })
            .register(StubAgent { id: "impact", fail: false })
            .register(StubAgent { id: "module", fail: true })
            .build();
        Dispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn code_review_runs_fixed_workflow_order() {
        let orchestrator = OrchestratorAgent::new(dispatcher(), None);
        let mut req = AgentRequest::default();
        req.prompt = Some("please do a code review".to_string());
        let emitter = CapturingEmitter::default();
        orchestrator.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");

        let policy_pos = out.find("policy output").unwrap();
        let security_pos = out.find("security output").unwrap();
        let cost_pos = out.find("cost output").unwrap();
        assert!(policy_pos < security_pos);
        assert!(security_pos < cost_pos);
    }

    #[tokio::test]
    async fn failing_sub_agent_is_logged_and_does_not_abort() {
        let orchestrator = OrchestratorAgent::new(dispatcher(), None);
        let mut req = AgentRequest::default();
        req.prompt = Some("code review please".to_string());
        let emitter = CapturingEmitter::default();
        orchestrator.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("\u{26a0} module:"));
        assert!(out.contains("cost output"));
    }

    #[tokio::test]
    async fn status_keyword_lists_registered_agents() {
        let orchestrator = OrchestratorAgent::new(dispatcher(), None);
        let mut req = AgentRequest::default();
        req.prompt = Some("status please".to_string());
        let emitter = CapturingEmitter::default();
        orchestrator.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("policy"));
        assert!(out.contains("security"));
    }

    #[tokio::test]
    async fn explicit_agent_prefix_routes_directly() {
        let orchestrator = OrchestratorAgent::new(dispatcher(), None);
        let mut req = AgentRequest::default();
        req.prompt = Some("cost please estimate this".to_string());
        let emitter = CapturingEmitter::default();
        orchestrator.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert_eq!(out, "cost output");
    }
}
