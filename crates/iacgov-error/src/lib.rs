//! Unified error taxonomy for the IaC governance host.
//!
//! Every [`IacGovError`] carries a stable, machine-readable [`ErrorCode`] in
//! addition to its human-readable message, so transports can surface a
//! consistent code to clients regardless of which crate raised the error.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad family that an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// IaC extraction/parsing errors.
    Parser,
    /// Rule evaluation errors.
    Rules,
    /// LLM client errors.
    Llm,
    /// Agent registry / dispatch errors.
    Registry,
    /// HTTP or stdio transport errors.
    Transport,
    /// Configuration errors.
    Config,
    /// Catch-all for unexpected internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Parser => "parser",
            Self::Rules => "rules",
            Self::Llm => "llm",
            Self::Registry => "registry",
            Self::Transport => "transport",
            Self::Config => "config",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Machine-readable, stable error code.
///
/// Serialises to a `SCREAMING_SNAKE_CASE` string; variants are additive
/// only, never renamed, so clients can match on them across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No code-like content could be extracted from the request.
    ParserNoCodeFound,
    /// A rule definition violates the "exactly one check kind" invariant.
    RulesInvalidDefinition,
    /// The LLM endpoint returned a non-2xx response.
    LlmApiError,
    /// The LLM response had no choices or failed to decode.
    LlmEmptyResponse,
    /// The LLM call exceeded its deadline or was cancelled.
    LlmCancelled,
    /// No agent is registered under the requested id.
    RegistryUnknownAgent,
    /// No default agent is configured and none was requested.
    RegistryNoDefaultAgent,
    /// The orchestrator detected a dispatch cycle.
    RegistryDispatchCycle,
    /// Request body exceeded the configured size limit.
    TransportBodyTooLarge,
    /// Request body was not valid JSON.
    TransportBadRequest,
    /// JSON-RPC method name is not recognised.
    TransportMethodNotFound,
    /// JSON-RPC request failed to parse as JSON.
    TransportParseError,
    /// JSON-RPC request parameters were invalid.
    TransportInvalidParams,
    /// A required environment variable was missing or malformed.
    ConfigInvalid,
    /// A webhook signature failed verification.
    ConfigWebhookSignatureInvalid,
    /// Catch-all for unexpected internal failures.
    Internal,
}

impl ErrorCode {
    /// The [`ErrorCategory`] this code belongs to.
    #[must_use]
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::ParserNoCodeFound => ErrorCategory::Parser,
            Self::RulesInvalidDefinition => ErrorCategory::Rules,
            Self::LlmApiError | Self::LlmEmptyResponse | Self::LlmCancelled => ErrorCategory::Llm,
            Self::RegistryUnknownAgent
            | Self::RegistryNoDefaultAgent
            | Self::RegistryDispatchCycle => ErrorCategory::Registry,
            Self::TransportBodyTooLarge
            | Self::TransportBadRequest
            | Self::TransportMethodNotFound
            | Self::TransportParseError
            | Self::TransportInvalidParams => ErrorCategory::Transport,
            Self::ConfigInvalid | Self::ConfigWebhookSignatureInvalid => ErrorCategory::Config,
            Self::Internal => ErrorCategory::Internal,
        }
    }

    /// The JSON-RPC 2.0 error code this taxonomy code maps to, if any.
    #[must_use]
    pub fn jsonrpc_code(self) -> Option<i64> {
        match self {
            Self::TransportParseError => Some(-32700),
            Self::TransportMethodNotFound => Some(-32601),
            Self::TransportInvalidParams => Some(-32602),
            Self::RegistryUnknownAgent => Some(-32000),
            _ => None,
        }
    }
}

/// The unified error type returned by every public operation in this
/// workspace.
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct IacGovError {
    /// Stable machine-readable code.
    pub code: ErrorCode,
    /// Human-readable detail.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl IacGovError {
    /// Construct a new error with no underlying cause.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause to this error.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}
