// SPDX-License-Identifier: MIT OR Apache-2.0
//! iacgov-core
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! The stable contract for the IaC governance agent host: the shared wire
//! types (`Resource`, `IaCInput`, `AgentRequest`, findings, rules) and the
//! `Agent`/`Emitter` traits every agent and transport builds on.
//!
//! If you only take one dependency in this workspace, take this one.

mod token;

pub use token::Token;

use async_trait::async_trait;
use iacgov_error::IacGovError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// IaC resource model
// ---------------------------------------------------------------------------

/// The IaC source dialect a request's code was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IacFormat {
    /// HashiCorp Terraform / HCL.
    Terraform,
    /// Azure Bicep.
    Bicep,
    /// Format could not be determined.
    Unknown,
}

impl fmt::Display for IacFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Terraform => "Terraform",
            Self::Bicep => "Bicep",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A single normalized IaC resource declaration.
///
/// `properties` keys are always lowercase snake_case Terraform-style, even
/// when the resource originated from Bicep — normalization happens at parse
/// time. `raw_block` retains the original textual form so pattern-based
/// rules can scan for things that never become structured properties (e.g.
/// hardcoded secrets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Resource {
    /// Resource type, e.g. `azurerm_storage_account`.
    pub r#type: String,
    /// Resource name/label.
    pub name: String,
    /// Flattened, normalized properties.
    pub properties: BTreeMap<String, Value>,
    /// 1-based line number of the resource header in the source text.
    pub line: usize,
    /// The original textual block, braces included.
    pub raw_block: String,
}

impl Resource {
    /// `type.name`, the identifier used in finding tables.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.r#type, self.name)
    }

    /// The resource type with its provider prefix stripped, e.g.
    /// `azurerm_storage_account` -> `storage_account`.
    #[must_use]
    pub fn short_type(&self) -> &str {
        self.r#type
            .split_once('_')
            .map_or(self.r#type.as_str(), |(_, rest)| rest)
    }
}

/// Parsed IaC input attached to a request once a host has extracted and
/// parsed code from the prompt/messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IacInput {
    /// Detected source format.
    pub format: Option<IacFormat>,
    /// The raw extracted code (possibly multiple fenced blocks joined).
    pub raw_code: String,
    /// Normalized resources parsed from `raw_code`.
    pub resources: Vec<Resource>,
}

impl IacInput {
    /// `true` when no code was found (an empty, host-populated input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_code.is_empty() && self.resources.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Conversation model
// ---------------------------------------------------------------------------

/// The role of a [`Message`] in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// End-user turn.
    User,
    /// Agent/assistant turn.
    Assistant,
    /// System instruction turn.
    System,
}

/// A single conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    /// Who sent this message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

/// A reference surfaced alongside a response (e.g. a documentation link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reference {
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
}

/// A confirmation prompt surfaced to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Confirmation {
    /// Short title.
    pub title: String,
    /// Longer message body.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Agent request
// ---------------------------------------------------------------------------

/// A request dispatched to one agent.
///
/// `iac` is populated by `parse_and_enrich` in `iacgov-registry`, never by
/// the client directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AgentRequest {
    /// The top-level prompt, when the transport carries one separately from
    /// `messages` (e.g. the MCP `tools/call` arguments).
    #[serde(default)]
    pub prompt: Option<String>,
    /// Ordered conversation history.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// References attached to the request by the client.
    #[serde(default)]
    pub references: Vec<Reference>,
    /// Parsed IaC input, populated by `parse_and_enrich`.
    #[serde(default)]
    pub iac: Option<IacInput>,
    /// Free-form metadata (user agent, client id, etc.).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Opaque bearer token forwarded from the transport; never logged.
    #[serde(default)]
    pub token: Token,
}

impl AgentRequest {
    /// Resolve the text to look for IaC code in: the explicit `prompt` field
    /// if set, else the content of the last user message.
    #[must_use]
    pub fn resolved_prompt(&self) -> Option<&str> {
        self.prompt.as_deref().or_else(|| {
            self.messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.as_str())
        })
    }
}

// ---------------------------------------------------------------------------
// Agent metadata / capabilities
// ---------------------------------------------------------------------------

/// Descriptive metadata about a registered agent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AgentMetadata {
    /// Stable identifier, unique within a registry.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// One-line description, surfaced in `GET /agents` and MCP `tools/list`.
    pub description: String,
}

/// What a given agent needs from the host before it can run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct AgentCapabilities {
    /// `true` if this agent requires `req.iac` to be populated and
    /// non-empty before it can do useful work.
    pub needs_iac_input: bool,
    /// `true` if this agent scans `req.iac.raw_code` directly (pattern
    /// rules, secret scanning).
    pub needs_raw_code: bool,
    /// `true` if this agent needs file contents beyond what the prompt
    /// carries (reserved for future host-side file resolution).
    pub needs_file_contents: bool,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// The abstract output sink an agent streams through.
///
/// Implementations exist per transport (SSE framing over HTTP, buffered
/// text collection for MCP stdio). Ordering within one dispatch is the
/// order calls are made; `done` is terminal and idempotent — calls after
/// `done` are silently dropped.
#[async_trait]
pub trait Emitter: Send + Sync {
    /// Emit a chunk of Markdown text.
    async fn message(&self, text: &str);

    /// Emit a set of references.
    async fn references(&self, refs: Vec<Reference>);

    /// Emit a confirmation prompt.
    async fn confirmation(&self, confirmation: Confirmation);

    /// Emit an error message (non-fatal to the wire contract — the
    /// transport still emits `done` afterwards).
    async fn error(&self, text: &str);

    /// Signal that this dispatch is complete. Idempotent.
    async fn done(&self);
}

// ---------------------------------------------------------------------------
// Agent trait
// ---------------------------------------------------------------------------

/// A named unit of analysis.
///
/// Agents are process-lived singletons built once at startup and registered
/// into an `AgentRegistry`. A single dispatch must not mutate `req` or
/// retain `emit` beyond the call.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable identifier, unique within a registry.
    fn id(&self) -> &str;

    /// Descriptive metadata for discovery endpoints.
    fn metadata(&self) -> AgentMetadata;

    /// Declared capability requirements.
    fn capabilities(&self) -> AgentCapabilities;

    /// Handle one request, streaming output through `emit`.
    ///
    /// Returning `Err` signals an execution failure; callers (the
    /// dispatcher, the orchestrator) are responsible for turning that into
    /// an `emit.error(...)` call per the host's error-handling contract —
    /// agents are not required to call `emit.error` themselves before
    /// returning `Err`.
    async fn handle(
        &self,
        req: &AgentRequest,
        emit: &dyn Emitter,
    ) -> Result<(), IacGovError>;
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// Severity of a rule violation, ordered `Critical` (highest) to `Info`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Lowest severity: informational only.
    Info,
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
    /// Critical severity.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// The category a [`crate::Rule`] (defined in `iacgov-rules`) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Organizational/governance policy checks.
    Policy,
    /// Security-hardening checks.
    Security,
    /// Regulatory/compliance framework checks.
    Compliance,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Policy => "Policy",
            Self::Security => "Security",
            Self::Compliance => "Compliance",
        };
        f.write_str(s)
    }
}

/// A single rule violation produced against a specific resource.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    /// The violated rule's stable id, e.g. `POL-001`.
    pub rule_id: String,
    /// The rule's category.
    pub category: RuleCategory,
    /// Severity of the violation.
    pub severity: Severity,
    /// The resource's qualified name (`type.name`).
    pub resource: String,
    /// The resource's full Terraform-style type.
    pub resource_type: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// Suggested remediation text.
    pub remediation: String,
}
