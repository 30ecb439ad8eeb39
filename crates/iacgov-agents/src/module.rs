// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Module agent: a command-style agent over the registered governance
//! rule catalog, treated as the host's module inventory — there is no
//! separate Terraform/Bicep module registry in this spec, so the agent
//! reports on the rule modules it actually has.

use crate::command::{contains, prompt_text};
use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter, RuleCategory};
use iacgov_error::IacGovError;
use iacgov_rules::RuleEngine;
use std::fmt::Write as _;
use std::sync::Arc;

const USAGE: &str = "Module commands: `status`, `rules`, `history`.";

/// The Module agent: reports on the installed rule catalog.
pub struct ModuleAgent {
    engine: Arc<RuleEngine>,
}

impl ModuleAgent {
    /// Build a Module agent over the given rule catalog.
    #[must_use]
    pub fn new(engine: Arc<RuleEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Agent for ModuleAgent {
    fn id(&self) -> &str {
        "module"
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: "module".to_string(),
            name: "Module Agent".to_string(),
            description: "Reports on the installed governance rule catalog.".to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::default()
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let prompt = prompt_text(req);

        if contains(prompt, "rules") {
            let mut out = String::from("| Category | Rule | Title |\n|---|---|---|\n");
            for category in [RuleCategory::Policy, RuleCategory::Security, RuleCategory::Compliance] {
                for rule in self.engine.rules_by_category(category) {
                    let _ = writeln!(out, "| {category} | {} | {} |", rule.id, rule.title);
                }
            }
            emit.message(&out).await;
        } else if contains(prompt, "history") {
            emit.message("Rule catalog history: seeded at startup, no runtime mutations recorded.").await;
        } else if contains(prompt, "status") {
            emit.message(&format!("Module catalog status: {} rules registered.", self.engine.rules().len())).await;
        } else {
            emit.message(USAGE).await;
        }

        Ok(())
    }
}
