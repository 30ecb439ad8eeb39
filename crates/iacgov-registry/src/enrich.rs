// SPDX-License-Identifier: MIT OR Apache-2.0
//! Populates `AgentRequest.iac` from the request's prompt/messages.

use iacgov_core::AgentRequest;

/// Idempotently populate `req.iac` from its resolved prompt text.
///
/// Running this twice on the same request is a no-op the second time:
/// once `iac` is `Some`, it is never overwritten.
pub fn parse_and_enrich(req: &mut AgentRequest) {
    if req.iac.is_some() {
        return;
    }
    let Some(prompt) = req.resolved_prompt() else {
        return;
    };
    let code = iacgov_parser::extract_code(prompt);
    if code.is_empty() {
        return;
    }
    req.iac = Some(iacgov_parser::parse(&code));
}
