// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-config
//!
//! Environment-variable configuration for the governance host. The
//! recognized variables are the complete surface — unknown vars are
//! ignored — and each has a per-[`Environment`] default baked in, not read
//! from a file.

mod duration;

pub use duration::parse_go_duration;

use iacgov_error::{ErrorCode, IacGovError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deployment environment; selects defaults for model, log level,
/// notifications, and whether a webhook secret is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    Dev,
    /// Automated test runs.
    Test,
    /// Production.
    Prod,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "test" => Self::Test,
            _ => Self::Dev,
        }
    }

    fn default_log_level(self) -> &'static str {
        match self {
            Self::Dev => "debug",
            Self::Test => "warn",
            Self::Prod => "info",
        }
    }

    fn default_enable_llm(self) -> bool {
        matches!(self, Self::Prod)
    }

    fn default_enable_notifications(self) -> bool {
        matches!(self, Self::Prod)
    }

    fn webhook_secret_required(self) -> bool {
        matches!(self, Self::Prod)
    }
}

const DEFAULT_MODEL_ENDPOINT: &str = "https://models.inference.ai.azure.com";
const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";
const DEFAULT_MAX_BODY_SIZE: usize = 1_048_576;

/// Fully resolved runtime configuration for the governance host.
#[derive(Debug, Clone)]
pub struct GovHostConfig {
    pub port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub github_webhook_secret: Option<String>,
    pub http_read_timeout: Duration,
    pub http_write_timeout: Duration,
    pub http_idle_timeout: Duration,
    pub agent_timeout: Duration,
    pub max_body_size: usize,
    pub model_name: String,
    pub model_endpoint: String,
    pub model_timeout: Duration,
    pub model_max_tokens: u32,
    pub enable_llm: bool,
    pub enable_notifications: bool,
    pub teams_webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub smtp_server: Option<String>,
}

impl GovHostConfig {
    /// Load configuration from the process environment, applying
    /// per-[`Environment`] defaults for anything not explicitly set.
    pub fn from_env() -> Result<Self, IacGovError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary lookup function. Used by
    /// [`Self::from_env`] and exercised directly by tests so config
    /// resolution never depends on process-global environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IacGovError> {
        let environment = lookup("ENVIRONMENT").map_or(Environment::Dev, |v| Environment::parse(&v));

        let port = parse_or("PORT", &lookup, 8080u16)?;
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| environment.default_log_level().to_string());
        let github_webhook_secret = lookup("GITHUB_WEBHOOK_SECRET");

        let http_read_timeout = parse_duration_or("HTTP_READ_TIMEOUT", &lookup, "30s")?;
        let http_write_timeout = parse_duration_or("HTTP_WRITE_TIMEOUT", &lookup, "30s")?;
        let http_idle_timeout = parse_duration_or("HTTP_IDLE_TIMEOUT", &lookup, "120s")?;
        let agent_timeout = parse_duration_or("AGENT_TIMEOUT", &lookup, "90s")?;

        let max_body_size = parse_or("MAX_BODY_SIZE", &lookup, DEFAULT_MAX_BODY_SIZE)?;

        let model_name = lookup("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
        let model_endpoint = lookup("MODEL_ENDPOINT").unwrap_or_else(|| DEFAULT_MODEL_ENDPOINT.to_string());
        let model_timeout = parse_duration_or("MODEL_TIMEOUT", &lookup, "30s")?;
        let model_max_tokens = parse_or("MODEL_MAX_TOKENS", &lookup, 1024u32)?;

        let enable_llm = parse_bool_or("ENABLE_LLM", &lookup, environment.default_enable_llm());
        let enable_notifications =
            parse_bool_or("ENABLE_NOTIFICATIONS", &lookup, environment.default_enable_notifications());

        let teams_webhook_url = lookup("TEAMS_WEBHOOK_URL");
        let slack_webhook_url = lookup("SLACK_WEBHOOK_URL");
        let smtp_server = lookup("SMTP_SERVER");

        let config = Self {
            port,
            environment,
            log_level,
            github_webhook_secret,
            http_read_timeout,
            http_write_timeout,
            http_idle_timeout,
            agent_timeout,
            max_body_size,
            model_name,
            model_endpoint,
            model_timeout,
            model_max_tokens,
            enable_llm,
            enable_notifications,
            teams_webhook_url,
            slack_webhook_url,
            smtp_server,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), IacGovError> {
        if self.environment.webhook_secret_required() && self.github_webhook_secret.is_none() {
            return Err(IacGovError::new(
                ErrorCode::ConfigInvalid,
                "GITHUB_WEBHOOK_SECRET is required when ENVIRONMENT=prod",
            ));
        }
        Ok(())
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T, IacGovError>
where
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| IacGovError::new(ErrorCode::ConfigInvalid, format!("invalid value for {key}: '{raw}'"))),
    }
}

fn parse_duration_or(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: &str,
) -> Result<Duration, IacGovError> {
    match lookup(key) {
        None => parse_go_duration(default),
        Some(raw) => parse_go_duration(&raw),
    }
}

fn parse_bool_or(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: bool) -> bool {
    match lookup(key).map(|v| v.to_ascii_lowercase()) {
        Some(v) if v == "true" || v == "1" || v == "yes" => true,
        Some(v) if v == "false" || v == "0" || v == "no" => false,
        _ => default,
    }
}
