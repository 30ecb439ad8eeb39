// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyword-intent parsing shared by the command-style agents (Deploy,
//! Notification, Module). None of these require IaC input; they read a
//! free-text prompt and emit deterministic Markdown. No side effects are
//! ever performed.

use iacgov_core::AgentRequest;

/// `true` if `prompt` contains `keyword`, case-insensitively.
#[must_use]
pub fn contains(prompt: &str, keyword: &str) -> bool {
    prompt.to_ascii_lowercase().contains(keyword)
}

/// Parse a `promote <target> to <environment>` command.
#[must_use]
pub fn parse_promote(prompt: &str) -> Option<(String, String)> {
    let lower = prompt.to_ascii_lowercase();
    let promote_at = lower.find("promote")?;
    let after_promote = &prompt[promote_at + "promote".len()..];
    let to_at = after_promote.to_ascii_lowercase().find(" to ")?;
    let target = after_promote[..to_at].trim();
    let environment = after_promote[to_at + " to ".len()..]
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches(['.', ',', '!', '?']);
    if target.is_empty() || environment.is_empty() {
        return None;
    }
    Some((target.to_string(), environment.to_string()))
}

/// Resolve the command-line text: `req.resolved_prompt()`, or empty.
#[must_use]
pub fn prompt_text(req: &AgentRequest) -> &str {
    req.resolved_prompt().unwrap_or_default()
}
