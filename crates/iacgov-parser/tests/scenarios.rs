// SPDX-License-Identifier: MIT OR Apache-2.0
use iacgov_core::IacFormat;
use iacgov_parser::{detect_format, extract_code, get_nested_property, parse_resources};
use serde_json::json;

#[test]
fn insecure_terraform_storage_account_scenario() {
    let message = r#"Can you review this?
```terraform
resource "azurerm_storage_account" "insecure" {
  name                            = "insecurestorage"
  enable_https_traffic_only       = false
  min_tls_version                 = "TLS1_0"
  allow_blob_public_access        = true
  public_network_access_enabled   = true
}
```
"#;
    let code = extract_code(message);
    let format = detect_format(&code);
    assert_eq!(format, IacFormat::Terraform);

    let resources = parse_resources(&code, format);
    assert_eq!(resources.len(), 1);
    let r = &resources[0];
    assert_eq!(r.r#type, "azurerm_storage_account");
    assert_eq!(r.name, "insecure");
    assert_eq!(r.properties.get("enable_https_traffic_only"), Some(&json!(false)));
    assert_eq!(r.properties.get("min_tls_version"), Some(&json!("TLS1_0")));
    assert_eq!(r.properties.get("allow_blob_public_access"), Some(&json!(true)));
    assert_eq!(r.properties.get("public_network_access_enabled"), Some(&json!(true)));
}

#[test]
fn secure_terraform_storage_account_scenario() {
    let code = r#"resource "azurerm_storage_account" "secure" {
  enable_https_traffic_only     = true
  min_tls_version                = "TLS1_2"
  allow_blob_public_access       = false
  infrastructure_encryption_enabled = true
  network_rules {
    default_action = "Deny"
  }
}"#;
    let resources = parse_resources(code, IacFormat::Terraform);
    let r = &resources[0];
    assert_eq!(
        get_nested_property(&r.properties, "network_rules.default_action"),
        Some(&json!("Deny"))
    );
    assert_eq!(r.properties.get("infrastructure_encryption_enabled"), Some(&json!(true)));
}

#[test]
fn insecure_bicep_storage_account_scenario() {
    let code = r#"resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {
  name: 'insecurestorage'
  supportsHttpsTrafficOnly: false
  minimumTlsVersion: 'TLS1_0'
  allowBlobPublicAccess: true
}"#;
    let format = detect_format(code);
    assert_eq!(format, IacFormat::Bicep);

    let resources = parse_resources(code, format);
    let r = &resources[0];
    assert_eq!(r.r#type, "azurerm_storage_account");
    assert_eq!(r.properties.get("enable_https_traffic_only"), Some(&json!(false)));
    assert_eq!(r.properties.get("min_tls_version"), Some(&json!("TLS1_0")));
    assert_eq!(r.properties.get("allow_blob_public_access"), Some(&json!(true)));
}

#[test]
fn aks_cluster_node_pool_scenario() {
    let code = r#"resource "azurerm_kubernetes_cluster" "prod" {
  name = "prod"
  default_node_pool {
    node_count = 3
    vm_size    = "Standard_D2s_v3"
  }
}"#;
    let resources = parse_resources(code, IacFormat::Terraform);
    let r = &resources[0];
    let pool = get_nested_property(&r.properties, "default_node_pool.node_count").unwrap();
    assert_eq!(pool, &json!(3));
    let vm_size = get_nested_property(&r.properties, "default_node_pool.vm_size").unwrap();
    assert_eq!(vm_size, &json!("Standard_D2s_v3"));
}

#[test]
fn open_nsg_rule_scenario() {
    let code = r#"resource "azurerm_network_security_group" "open" {
  name = "open"
  security_rule {
    source_address_prefix      = "*"
    destination_port_range     = "*"
  }
}"#;
    let resources = parse_resources(code, IacFormat::Terraform);
    let r = &resources[0];
    let rule = get_nested_property(&r.properties, "security_rule.source_address_prefix").unwrap();
    assert_eq!(rule, &json!("*"));
}

#[test]
fn resource_line_equals_one_plus_preceding_newlines() {
    let code = "# note\n# another\n\nresource \"azurerm_key_vault\" \"kv\" {\n  name = \"kv\"\n}\n";
    let resources = parse_resources(code, IacFormat::Terraform);
    let preceding_newlines = code[..code.find("resource").unwrap()].matches('\n').count();
    assert_eq!(resources[0].line, preceding_newlines + 1);
}
