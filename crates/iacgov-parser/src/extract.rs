// SPDX-License-Identifier: MIT OR Apache-2.0
//! Extraction of IaC code from a free-form chat message.

use crate::format::detect_format;
use iacgov_core::IacFormat;
use regex::Regex;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:terraform|bicep|hcl|json)?\s*\n(.*?)```").unwrap()
});

static INLINE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

/// Extract plausibly-code-like text from a chat message.
///
/// Precedence: fenced blocks (all of them, joined by a blank line), then
/// inline back-tick spans (all of them, joined by a blank line), then the
/// whole message if it independently looks like Terraform/Bicep. Returns
/// an empty string when nothing plausible is found.
#[must_use]
pub fn extract_code(message: &str) -> String {
    let fenced: Vec<&str> = FENCED_BLOCK
        .captures_iter(message)
        .map(|c| c.get(1).unwrap().as_str().trim_end_matches('\n'))
        .collect();
    if !fenced.is_empty() {
        return fenced.join("\n\n");
    }

    let inline: Vec<&str> = INLINE_SPAN
        .captures_iter(message)
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    if !inline.is_empty() {
        return inline.join("\n\n");
    }

    if detect_format(message) != IacFormat::Unknown {
        return message.trim().to_string();
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_fenced_block() {
        let msg = "Here's my storage account:\n```terraform\nresource \"azurerm_storage_account\" \"x\" {}\n```\nplease review";
        let code = extract_code(msg);
        assert_eq!(code, "resource \"azurerm_storage_account\" \"x\" {}");
    }

    #[test]
    fn extracts_multiple_fenced_blocks_joined() {
        let msg = "```hcl\nresource \"a\" \"b\" {}\n```\nand also\n```hcl\nresource \"c\" \"d\" {}\n```";
        let code = extract_code(msg);
        assert!(code.contains("resource \"a\" \"b\" {}"));
        assert!(code.contains("resource \"c\" \"d\" {}"));
        assert!(code.contains("\n\n"));
    }

    #[test]
    fn falls_back_to_inline_span_when_no_fence() {
        let msg = "can you check `resource \"x\" \"y\" {}` for issues?";
        assert_eq!(extract_code(msg), "resource \"x\" \"y\" {}");
    }

    #[test]
    fn falls_back_to_whole_message_when_it_looks_like_code() {
        let msg = r#"resource "azurerm_storage_account" "x" { name = "x" }"#;
        assert_eq!(extract_code(msg), msg.trim());
    }

    #[test]
    fn returns_empty_for_plain_prose() {
        assert_eq!(extract_code("what is my monthly AKS cost?"), "");
    }
}
