// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brace-counting resource-block scanner.
//!
//! This is not a full HCL/Bicep parser. It locates `resource`/`data` headers
//! by regex, then walks the block body byte-by-byte, tracking brace depth
//! and quote state, to find the matching close brace and to pull out
//! `key = value` / `key: value` pairs one level deep (with one further level
//! of nested-block recursion, e.g. `network_rules { default_action = ... }`).

use crate::bicep;
use iacgov_core::{IacFormat, Resource};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TERRAFORM_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:resource|data)\s+"([^"]+)"\s+"([^"]+)"\s*\{"#).unwrap()
});

static BICEP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"resource\s+(\w+)\s+'([^']+)'\s*=\s*\{").unwrap());

/// Parse all top-level resource blocks out of `code`.
///
/// `Resource::line` is one plus the number of `\n` bytes preceding the
/// header. An unterminated block (no matching close brace before end of
/// input) is treated as extending to the end of the input rather than
/// being dropped.
#[must_use]
pub fn parse_resources(code: &str, format: IacFormat) -> Vec<Resource> {
    match format {
        IacFormat::Bicep => parse_bicep(code),
        _ => parse_terraform(code),
    }
}

fn line_of(code: &str, byte_offset: usize) -> usize {
    1 + code[..byte_offset].bytes().filter(|&b| b == b'\n').count()
}

fn parse_terraform(code: &str) -> Vec<Resource> {
    let mut out = Vec::new();
    for caps in TERRAFORM_HEADER.captures_iter(code) {
        let whole = caps.get(0).unwrap();
        let r#type = caps.get(1).unwrap().as_str().to_string();
        let name = caps.get(2).unwrap().as_str().to_string();
        let body_start = whole.end();
        let body_end = find_block_end(code, body_start);
        let body = &code[body_start..body_end];
        let properties = parse_block_body(body);
        let raw_end = (body_end + 1).min(code.len());
        out.push(Resource {
            r#type,
            name,
            properties,
            line: line_of(code, whole.start()),
            raw_block: code[whole.start()..raw_end].to_string(),
        });
    }
    out
}

fn parse_bicep(code: &str) -> Vec<Resource> {
    let mut out = Vec::new();
    for caps in BICEP_HEADER.captures_iter(code) {
        let whole = caps.get(0).unwrap();
        let symbolic_name = caps.get(1).unwrap().as_str().to_string();
        let raw_type = caps.get(2).unwrap().as_str();
        let r#type = bicep::normalize_type(raw_type);
        let body_start = whole.end();
        let body_end = find_block_end(code, body_start);
        let body = &code[body_start..body_end];
        let mut properties = parse_block_body(body);
        properties = properties
            .into_iter()
            .map(|(k, v)| (bicep::normalize_property_name(&k), v))
            .collect();
        let raw_end = (body_end + 1).min(code.len());
        out.push(Resource {
            r#type,
            name: symbolic_name,
            properties,
            line: line_of(code, whole.start()),
            raw_block: code[whole.start()..raw_end].to_string(),
        });
    }
    out
}

/// Find the byte offset of the `}` matching the opening brace implicitly
/// consumed before `start` (depth 1 on entry). Returns `code.len()` when
/// the block is never closed.
fn find_block_end(code: &str, start: usize) -> usize {
    let mut depth: i32 = 1;
    let mut quote: Option<char> = None;
    let bytes = code.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        let c = code[i..].chars().next().unwrap();
        match quote {
            Some(q) => {
                if c == '\\' {
                    i += c.len_utf8();
                    if i < bytes.len() {
                        i += code[i..].chars().next().unwrap().len_utf8();
                    }
                    continue;
                }
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return i;
                    }
                }
                _ => {}
            },
        }
        i += c.len_utf8();
    }
    code.len()
}

/// Parse a block body into one level of `key = value` / `key: value`
/// pairs, recursing one level into nested `key { ... }` sub-blocks.
fn parse_block_body(body: &str) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        if body[i..].starts_with("//") {
            if let Some(nl) = body[i..].find('\n') {
                i += nl + 1;
            } else {
                break;
            }
            continue;
        }
        let key_start = i;
        while i < bytes.len() && ((bytes[i] as char).is_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        if i == key_start {
            i += 1;
            continue;
        }
        let key = body[key_start..i].to_string();

        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i < bytes.len() && (bytes[i] == b'=' || bytes[i] == b':') {
            i += 1;
        }
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        if bytes[i] == b'{' {
            let nested_end = find_block_end(body, i + 1);
            let nested_body = &body[i + 1..nested_end];
            let nested = parse_block_body(nested_body);
            out.insert(key, Value::Object(map_from_btree(nested)));
            i = (nested_end + 1).min(body.len());
        } else {
            let line_end = body[i..].find('\n').map_or(body.len(), |n| i + n);
            let raw_value = &body[i..line_end];
            out.insert(key, parse_scalar(raw_value));
            i = line_end;
        }
    }
    out
}

fn map_from_btree(map: BTreeMap<String, Value>) -> Map<String, Value> {
    map.into_iter().collect()
}

fn parse_scalar(raw: &str) -> Value {
    let mut text = raw.trim();
    if let Some(idx) = text.find("//") {
        text = text[..idx].trim();
    }
    let text = text.trim_end_matches(',').trim();

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Value::String(text[1..text.len() - 1].to_string());
    }
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Value::String(text[1..text.len() - 1].to_string());
    }
    if text == "true" || text == "false" {
        return Value::Bool(text == "true");
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Number(n.into());
    }
    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_terraform_resource() {
        let code = "resource \"azurerm_storage_account\" \"insecure\" {\n  name = \"mystorageacct\"\n  supports_https_traffic_only = false\n  min_tls_version = \"TLS1_0\"\n}\n";
        let resources = parse_resources(code, IacFormat::Terraform);
        assert_eq!(resources.len(), 1);
        let r = &resources[0];
        assert_eq!(r.r#type, "azurerm_storage_account");
        assert_eq!(r.name, "insecure");
        assert_eq!(r.line, 1);
        assert_eq!(r.properties.get("name"), Some(&Value::String("mystorageacct".into())));
        assert_eq!(r.properties.get("supports_https_traffic_only"), Some(&Value::Bool(false)));
    }

    #[test]
    fn line_number_accounts_for_preceding_newlines() {
        let code = "# comment\n\nresource \"azurerm_key_vault\" \"kv\" {\n  name = \"kv\"\n}\n";
        let resources = parse_resources(code, IacFormat::Terraform);
        assert_eq!(resources[0].line, 3);
    }

    #[test]
    fn parses_nested_block() {
        let code = r#"resource "azurerm_storage_account" "x" {
  name = "x"
  network_rules {
    default_action = "Deny"
  }
}
"#;
        let resources = parse_resources(code, IacFormat::Terraform);
        let nested = resources[0].properties.get("network_rules").unwrap();
        assert_eq!(nested["default_action"], Value::String("Deny".into()));
    }

    #[test]
    fn unterminated_block_extends_to_end_of_input() {
        let code = "resource \"azurerm_storage_account\" \"x\" {\n  name = \"x\"\n";
        let resources = parse_resources(code, IacFormat::Terraform);
        assert_eq!(resources.len(), 1);
        assert!(resources[0].raw_block.ends_with("\"x\"\n") || resources[0].raw_block.contains("name"));
    }

    #[test]
    fn parses_bicep_resource_and_normalizes_type_and_properties() {
        let code = "resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n  name: 'mystorageacct'\n  supportsHttpsTrafficOnly: false\n}\n";
        let resources = parse_resources(code, IacFormat::Bicep);
        assert_eq!(resources.len(), 1);
        let r = &resources[0];
        assert_eq!(r.r#type, "azurerm_storage_account");
        assert_eq!(r.name, "sa");
        assert_eq!(
            r.properties.get("enable_https_traffic_only"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn parses_multiple_resources() {
        let code = r#"resource "azurerm_storage_account" "a" { name = "a" }
resource "azurerm_key_vault" "b" { name = "b" }
"#;
        let resources = parse_resources(code, IacFormat::Terraform);
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].name, "b");
    }
}
