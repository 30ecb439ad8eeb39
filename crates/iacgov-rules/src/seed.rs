// SPDX-License-Identifier: MIT OR Apache-2.0
//! The built-in policy/security/compliance rule set.
//!
//! Rule ids are part of the public contract: the MCP and HTTP transports,
//! and the test suite, reference them verbatim.

use crate::rule::{Rule, RuleCheck};
use iacgov_core::{RuleCategory, Severity};
use regex::Regex;
use serde_json::json;

fn types(ts: &[&str]) -> Vec<String> {
    ts.iter().map(|t| (*t).to_string()).collect()
}

/// The full built-in rule set: six policy, five security, six compliance.
#[must_use]
pub fn seed_rules() -> Vec<Rule> {
    vec![
        // ---- Policy ----------------------------------------------------
        Rule {
            id: "POL-001",
            category: RuleCategory::Policy,
            severity: Severity::High,
            title: "Storage account must enforce HTTPS-only traffic",
            remediation: "Set enable_https_traffic_only = true",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "enable_https_traffic_only".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "POL-002",
            category: RuleCategory::Policy,
            severity: Severity::Medium,
            title: "AKS cluster must enable role-based access control",
            remediation: "Set role_based_access_control_enabled = true",
            resource_types: types(&["azurerm_kubernetes_cluster"]),
            check: RuleCheck::Property {
                path: "role_based_access_control_enabled".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "POL-003",
            category: RuleCategory::Policy,
            severity: Severity::High,
            title: "Storage account must require TLS 1.2 or higher",
            remediation: "Set min_tls_version = \"TLS1_2\"",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "min_tls_version".to_string(),
                expected: json!("TLS1_2"),
            },
        },
        Rule {
            id: "POL-004",
            category: RuleCategory::Policy,
            severity: Severity::Critical,
            title: "Storage account must not allow public blob access",
            remediation: "Set allow_blob_public_access = false",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "allow_blob_public_access".to_string(),
                expected: json!(false),
            },
        },
        Rule {
            id: "POL-005",
            category: RuleCategory::Policy,
            severity: Severity::Medium,
            title: "Key Vault must enable soft-delete",
            remediation: "Set soft_delete_enabled = true",
            resource_types: types(&["azurerm_key_vault"]),
            check: RuleCheck::Property {
                path: "soft_delete_enabled".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "POL-006",
            category: RuleCategory::Policy,
            severity: Severity::Medium,
            title: "Key Vault must enable purge protection",
            remediation: "Set purge_protection_enabled = true",
            resource_types: types(&["azurerm_key_vault"]),
            check: RuleCheck::Property {
                path: "purge_protection_enabled".to_string(),
                expected: json!(true),
            },
        },
        // ---- Security ----------------------------------------------------
        Rule {
            id: "SEC-001",
            category: RuleCategory::Security,
            severity: Severity::Critical,
            title: "Hardcoded secret literal found in resource block",
            remediation: "Move secrets to Key Vault or a secure variable store",
            resource_types: Vec::new(),
            check: RuleCheck::Patterns(vec![Regex::new(
                r#"(?i)(password|secret|api_key)\s*=\s*"[^"]+""#,
            )
            .unwrap()]),
        },
        Rule {
            id: "SEC-002",
            category: RuleCategory::Security,
            severity: Severity::High,
            title: "Storage account must not be reachable from the public network",
            remediation: "Set public_network_access_enabled = false",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "public_network_access_enabled".to_string(),
                expected: json!(false),
            },
        },
        Rule {
            id: "SEC-003",
            category: RuleCategory::Security,
            severity: Severity::High,
            title: "App service must enforce HTTPS-only",
            remediation: "Set https_only = true",
            resource_types: types(&["azurerm_app_service", "azurerm_linux_web_app"]),
            check: RuleCheck::Property {
                path: "https_only".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "SEC-004",
            category: RuleCategory::Security,
            severity: Severity::Medium,
            title: "Storage account should use infrastructure (double) encryption",
            remediation: "Set infrastructure_encryption_enabled = true",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "infrastructure_encryption_enabled".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "SEC-005",
            category: RuleCategory::Security,
            severity: Severity::Critical,
            title: "Network security group allows unrestricted inbound traffic",
            remediation: "Restrict source_address_prefix and destination_port_range",
            resource_types: types(&["azurerm_network_security_group"]),
            check: RuleCheck::Patterns(vec![
                Regex::new(r#"source_address_prefix\s*=\s*"\*""#).unwrap(),
                Regex::new(r#"destination_port_range\s*=\s*"\*""#).unwrap(),
            ]),
        },
        // ---- Compliance --------------------------------------------------
        Rule {
            id: "CIS-4.1",
            category: RuleCategory::Compliance,
            severity: Severity::High,
            title: "CIS 4.1: storage accounts must enforce HTTPS-only traffic",
            remediation: "Set enable_https_traffic_only = true",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "enable_https_traffic_only".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "CIS-8.1",
            category: RuleCategory::Compliance,
            severity: Severity::Medium,
            title: "CIS 8.1: Key Vault must not be reachable from the public network",
            remediation: "Set public_network_access_enabled = false",
            resource_types: types(&["azurerm_key_vault"]),
            check: RuleCheck::Property {
                path: "public_network_access_enabled".to_string(),
                expected: json!(false),
            },
        },
        Rule {
            id: "NIST-SC7",
            category: RuleCategory::Compliance,
            severity: Severity::High,
            title: "NIST SC-7: storage network rules must default-deny",
            remediation: "Set network_rules.default_action = \"Deny\"",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "network_rules.default_action".to_string(),
                expected: json!("Deny"),
            },
        },
        Rule {
            id: "NIST-SC28",
            category: RuleCategory::Compliance,
            severity: Severity::Medium,
            title: "NIST SC-28: storage at rest must use infrastructure encryption",
            remediation: "Set infrastructure_encryption_enabled = true",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "infrastructure_encryption_enabled".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "SOC2-CC6.1",
            category: RuleCategory::Compliance,
            severity: Severity::Medium,
            title: "SOC 2 CC6.1: AKS cluster must enforce role-based access control",
            remediation: "Set role_based_access_control_enabled = true",
            resource_types: types(&["azurerm_kubernetes_cluster"]),
            check: RuleCheck::Property {
                path: "role_based_access_control_enabled".to_string(),
                expected: json!(true),
            },
        },
        Rule {
            id: "SOC2-CC6.6",
            category: RuleCategory::Compliance,
            severity: Severity::Medium,
            title: "SOC 2 CC6.6: storage account must require TLS 1.2 in transit",
            remediation: "Set min_tls_version = \"TLS1_2\"",
            resource_types: types(&["azurerm_storage_account"]),
            check: RuleCheck::Property {
                path: "min_tls_version".to_string(),
                expected: json!("TLS1_2"),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_rule_ids_are_unique() {
        let ids: Vec<&str> = seed_rules().iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids.len(), sorted.len());
    }

    #[test]
    fn seed_has_expected_counts_per_category() {
        let rules = seed_rules();
        let policy = rules.iter().filter(|r| r.category == RuleCategory::Policy).count();
        let security = rules.iter().filter(|r| r.category == RuleCategory::Security).count();
        let compliance = rules
            .iter()
            .filter(|r| r.category == RuleCategory::Compliance)
            .count();
        assert_eq!(policy, 6);
        assert_eq!(security, 5);
        assert_eq!(compliance, 6);
    }
}
