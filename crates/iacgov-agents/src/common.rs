// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared pieces of the common 4-step agent contract: the "no IaC" guard,
//! findings-table rendering, and the optional LLM enhancement pass.

use iacgov_core::{AgentRequest, Emitter, Finding, IacInput, Message, Role};
use iacgov_llm::LlmClient;
use std::fmt::Write as _;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Step 1 of the common contract: emit a short message and return `None`
/// when the request carries no usable IaC input.
pub async fn require_iac<'a>(req: &'a AgentRequest, emit: &dyn Emitter) -> Option<&'a IacInput> {
    match &req.iac {
        Some(iac) if !iac.is_empty() => Some(iac),
        _ => {
            emit.message("No IaC code was found in this request.").await;
            None
        }
    }
}

/// Render a Markdown findings table: `rule | severity | resource | issue | fix`.
/// `resource` is `shortType.name`, e.g. `storage_account.insecure`.
#[must_use]
pub fn render_findings_table(findings: &[Finding]) -> String {
    let mut out = String::from("| Rule | Severity | Resource | Issue | Fix |\n|---|---|---|---|---|\n");
    for f in findings {
        let short_type = f.resource_type.split_once('_').map_or(f.resource_type.as_str(), |(_, rest)| rest);
        let name = f.resource.rsplit('.').next().unwrap_or(&f.resource);
        let _ = writeln!(out, "| {} | {} | {short_type}.{name} | {} | {} |", f.rule_id, f.severity, f.message, f.remediation);
    }
    out
}

/// A one-line-per-finding plain-text summary, used as LLM context — the
/// Markdown table is for the human reader, this is for the model.
#[must_use]
pub fn findings_summary(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No violations found.".to_string();
    }
    findings
        .iter()
        .map(|f| format!("- [{}] {} ({}): {}", f.severity, f.rule_id, f.resource, f.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Step 4 of the common contract: when an LLM client and a caller token are
/// both present, stream a narrative enhancement built from the raw code and
/// the findings summary, framed with its own heading and trailing blank
/// lines.
pub async fn llm_enhance(llm: &LlmClient, system_prompt: &str, raw_code: &str, findings_text: &str, emit: &dyn Emitter) {
    let messages = vec![
        Message { role: Role::System, content: system_prompt.to_string() },
        Message {
            role: Role::User,
            content: format!(
                "Here is the IaC source under review:\n\n```\n{raw_code}\n```\n\nDeterministic findings:\n{findings_text}\n\nWrite a brief prioritized narrative summary for the engineer who will act on this."
            ),
        },
    ];

    emit.message("\n\n---\n\n").await;
    let (mut content_rx, error_rx) = llm.stream(messages, CancellationToken::new());
    while let Some(chunk) = content_rx.recv().await {
        emit.message(&chunk).await;
    }
    if let Ok(err) = error_rx.await {
        warn!(error = %err, "LLM enhancement pass failed");
        emit.message(&format!("\n\n_LLM enhancement unavailable: {err}_")).await;
    }
    emit.message("\n\n").await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacgov_core::{RuleCategory, Severity};

    fn finding() -> Finding {
        Finding {
            rule_id: "POL-001".to_string(),
            category: RuleCategory::Policy,
            severity: Severity::High,
            resource: "azurerm_storage_account.insecure".to_string(),
            resource_type: "azurerm_storage_account".to_string(),
            message: "HTTPS traffic is not enforced".to_string(),
            remediation: "Set enable_https_traffic_only = true".to_string(),
        }
    }

    #[test]
    fn table_uses_short_type_dot_name() {
        let table = render_findings_table(&[finding()]);
        assert!(table.contains("storage_account.insecure"));
        assert!(table.contains("POL-001"));
    }

    #[test]
    fn summary_reports_clean_state() {
        assert_eq!(findings_summary(&[]), "No violations found.");
    }
}
