// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Drift agent: compares declared properties against a hardcoded
//! expected baseline state, independent of the policy/security/compliance
//! rule catalog.

use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter, Resource};
use iacgov_error::IacGovError;
use iacgov_parser::get_nested_property;
use serde_json::{json, Value};
use std::fmt::Write as _;
use tracing::info;

struct Baseline {
    resource_type: &'static str,
    property: &'static str,
    expected: Value,
}

fn baselines() -> Vec<Baseline> {
    vec![
        Baseline { resource_type: "azurerm_storage_account", property: "min_tls_version", expected: json!("TLS1_2") },
        Baseline { resource_type: "azurerm_storage_account", property: "enable_https_traffic_only", expected: json!(true) },
        Baseline { resource_type: "azurerm_key_vault", property: "soft_delete_enabled", expected: json!(true) },
    ]
}

struct DriftEntry {
    resource: String,
    property: &'static str,
    expected: Value,
    actual: Option<Value>,
}

fn drift_for(resource: &Resource, baselines: &[Baseline]) -> Vec<DriftEntry> {
    baselines
        .iter()
        .filter(|b| b.resource_type == resource.r#type)
        .filter_map(|b| {
            let actual = get_nested_property(&resource.properties, b.property).cloned();
            if actual.as_ref() == Some(&b.expected) {
                None
            } else {
                Some(DriftEntry {
                    resource: resource.qualified_name(),
                    property: b.property,
                    expected: b.expected.clone(),
                    actual,
                })
            }
        })
        .collect()
}

/// The Drift agent: reports properties that have drifted from the expected
/// baseline configuration.
pub struct DriftAgent;

impl Default for DriftAgent {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for DriftAgent {
    fn id(&self) -> &str {
        "drift"
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: "drift".to_string(),
            name: "Drift Agent".to_string(),
            description: "Compares declared resource properties against a baseline expected configuration.".to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities { needs_iac_input: true, needs_raw_code: false, needs_file_contents: false }
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let Some(iac) = crate::common::require_iac(req, emit).await else {
            return Ok(());
        };

        let baselines = baselines();
        let entries: Vec<DriftEntry> = iac.resources.iter().flat_map(|r| drift_for(r, &baselines)).collect();

        info!(drifted = entries.len(), "drift dispatch complete");

        if entries.is_empty() {
            emit.message("No drift detected against the baseline configuration.").await;
            return Ok(());
        }

        let mut out = String::from("| Resource | Property | Expected | Actual |\n|---|---|---|---|\n");
        for e in &entries {
            let actual = e.actual.as_ref().map_or_else(|| "absent".to_string(), std::string::ToString::to_string);
            let _ = writeln!(out, "| {} | {} | {} | {} |", e.resource, e.property, e.expected, actual);
        }
        emit.message(&out).await;
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

    #[tokio::test]
    async fn reports_drift_on_mismatched_tls_version() {
        let code = r#"
resource "azurerm_storage_account" "old" {
  min_tls_version = "TLS1_0"
}
"#;
        let mut req = AgentRequest::default();
        req.prompt = Some(format!("```terraform\n{code}\n```"));
        iacgov_registry::parse_and_enrich(&mut req);

        let agent = DriftAgent;
        let emitter = CapturingEmitter::default();
        agent.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("min_tls_version"));
        assert!(out.contains("TLS1_0"));
    }

    #[tokio::test]
    async fn no_drift_when_baseline_matches() {
        let code = r#"
resource "azurerm_storage_account" "current" {
  min_tls_version            = "TLS1_2"
  enable_https_traffic_only  = true
}
"#;
        let mut req = AgentRequest::default();
        req.prompt = Some(format!("```terraform\n{code}\n```"));
        iacgov_registry::parse_and_enrich(&mut req);

        let agent = DriftAgent;
        let emitter = CapturingEmitter::default();
        agent.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("No drift"));
    }
}
