// SPDX-License-Identifier: MIT OR Apache-2.0
//! Policy, Security, and Compliance are the same shape: evaluate one
//! [`RuleCategory`] against every declared resource, render a table or a
//! "passed" message, then optionally enhance with the LLM.

use crate::common::{findings_summary, llm_enhance, render_findings_table, require_iac};
use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter, RuleCategory};
use iacgov_error::IacGovError;
use iacgov_llm::LlmClient;
use iacgov_rules::RuleEngine;
use std::sync::Arc;
use tracing::{debug, info};

const POLICY_SYSTEM_PROMPT: &str =
    "You are a cloud governance policy reviewer. Summarize the policy findings below and prioritize remediation.";
const SECURITY_SYSTEM_PROMPT: &str =
    "You are a cloud security reviewer. Summarize the security findings below, flagging anything exploitable first.";
const COMPLIANCE_SYSTEM_PROMPT: &str =
    "You are a compliance auditor mapping infrastructure to CIS, NIST, and SOC 2 controls. Summarize the findings below by framework.";

/// A rule-category agent: Policy, Security, or Compliance.
pub struct RuleCategoryAgent {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: RuleCategory,
    system_prompt: &'static str,
    engine: Arc<RuleEngine>,
    llm: Option<Arc<LlmClient>>,
}

impl RuleCategoryAgent {
    /// The Policy agent: organizational governance rules (`POL-*`).
    #[must_use]
    pub fn policy(engine: Arc<RuleEngine>, llm: Option<Arc<LlmClient>>) -> Self {
        Self {
            id: "policy",
            name: "Policy Agent",
            description: "Checks declared IaC resources against organizational governance rules.",
            category: RuleCategory::Policy,
            system_prompt: POLICY_SYSTEM_PROMPT,
            engine,
            llm,
        }
    }

    /// The Security agent: hardening rules (`SEC-*`), property- and
    /// pattern-based.
    #[must_use]
    pub fn security(engine: Arc<RuleEngine>, llm: Option<Arc<LlmClient>>) -> Self {
        Self {
            id: "security",
            name: "Security Agent",
            description: "Scans declared IaC resources for security-hardening violations, including hardcoded secrets.",
            category: RuleCategory::Security,
            system_prompt: SECURITY_SYSTEM_PROMPT,
            engine,
            llm,
        }
    }

    /// The Compliance agent: regulatory framework mappings (`CIS-*`,
    /// `NIST-*`, `SOC2-*`).
    #[must_use]
    pub fn compliance(engine: Arc<RuleEngine>, llm: Option<Arc<LlmClient>>) -> Self {
        Self {
            id: "compliance",
            name: "Compliance Agent",
            description: "Maps declared IaC resources to CIS, NIST, and SOC 2 control requirements.",
            category: RuleCategory::Compliance,
            system_prompt: COMPLIANCE_SYSTEM_PROMPT,
            engine,
            llm,
        }
    }
}

#[async_trait]
impl Agent for RuleCategoryAgent {
    fn id(&self) -> &str {
        self.id
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities {
            needs_iac_input: true,
            needs_raw_code: matches!(self.category, RuleCategory::Security),
            needs_file_contents: false,
        }
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let Some(iac) = require_iac(req, emit).await else {
            return Ok(());
        };

        let mut findings = Vec::new();
        for resource in &iac.resources {
            let resource_findings = self.engine.evaluate_category(resource, self.category);
            debug!(agent = self.id, resource = %resource.qualified_name(), found = resource_findings.len(), "evaluated resource");
            findings.extend(resource_findings);
        }
        info!(agent = self.id, findings = findings.len(), "dispatch complete");

        if findings.is_empty() {
            emit.message(&format!("All {} checks passed.", self.category)).await;
        } else {
            emit.message(&render_findings_table(&findings)).await;
        }

        if let Some(llm) = &self.llm {
            if !req.token.is_empty() {
                llm_enhance(llm, self.system_prompt, &iac.raw_code, &findings_summary(&findings), emit).await;
            }
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

    fn insecure_request() -> AgentRequest {
        let code = r#"
resource "azurerm_storage_account" "insecure" {
  enable_https_traffic_only = false
  min_tls_version           = "TLS1_0"
  allow_blob_public_access  = true
}
"#;
        let mut req = AgentRequest::default();
        req.prompt = Some(format!("review this:\n```terraform\n{code}\n```"));
        iacgov_registry::parse_and_enrich(&mut req);
        req
    }

    #[tokio::test]
    async fn policy_agent_reports_known_rule_ids() {
        let agent = RuleCategoryAgent::policy(Arc::new(RuleEngine::with_seed_rules()), None);
        let emitter = CapturingEmitter::default();
        agent.handle(&insecure_request(), &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("POL-001"));
        assert!(out.contains("POL-003"));
        assert!(out.contains("POL-004"));
    }

    #[tokio::test]
    async fn policy_agent_reports_clean_pass() {
        let code = r#"
resource "azurerm_storage_account" "secure" {
  enable_https_traffic_only        = true
  min_tls_version                  = "TLS1_2"
  allow_blob_public_access         = false
  infrastructure_encryption_enabled = true
  network_rules {
    default_action = "Deny"
  }
}
"#;
        let mut req = AgentRequest::default();
        req.prompt = Some(format!("```terraform\n{code}\n```"));
        iacgov_registry::parse_and_enrich(&mut req);

        let agent = RuleCategoryAgent::policy(Arc::new(RuleEngine::with_seed_rules()), None);
        let emitter = CapturingEmitter::default();
        agent.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("passed"));
        assert!(!out.contains("POL-001"));
    }

    #[tokio::test]
    async fn missing_iac_input_emits_short_message_and_succeeds() {
        let agent = RuleCategoryAgent::security(Arc::new(RuleEngine::with_seed_rules()), None);
        let emitter = CapturingEmitter::default();
        agent.handle(&AgentRequest::default(), &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("No IaC code"));
    }
}
