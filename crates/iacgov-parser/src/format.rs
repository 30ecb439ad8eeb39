// SPDX-License-Identifier: MIT OR Apache-2.0
//! Format detection: distinguishes Terraform/HCL from Bicep by signature.

use iacgov_core::IacFormat;
use regex::Regex;
use std::sync::LazyLock;

static TERRAFORM_SIGNATURES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"resource\s+"[^"]+"\s+"[^"]+"\s*\{"#).unwrap(),
        Regex::new(r#"variable\s+"[^"]+"\s*\{"#).unwrap(),
        Regex::new(r#"provider\s+"[^"]+"\s*\{"#).unwrap(),
        Regex::new(r"terraform\s*\{").unwrap(),
        Regex::new(r#"module\s+"[^"]+"\s*\{"#).unwrap(),
        Regex::new(r#"data\s+"[^"]+"\s+"[^"]+"\s*\{"#).unwrap(),
    ]
});

static BICEP_SIGNATURES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"resource\s+\w+\s+'[^']+'\s*=\s*\{").unwrap(),
        Regex::new(r"param\s+\w+\s+\w+").unwrap(),
        Regex::new(r"targetScope\s*=").unwrap(),
        Regex::new(r"module\s+\w+\s+'[^']+'").unwrap(),
    ]
});

/// Detect whether `code` looks like Terraform/HCL or Bicep.
///
/// Terraform signatures are checked first; the first category with any
/// matching signature wins. Text matching neither is [`IacFormat::Unknown`].
#[must_use]
pub fn detect_format(code: &str) -> IacFormat {
    if TERRAFORM_SIGNATURES.iter().any(|re| re.is_match(code)) {
        return IacFormat::Terraform;
    }
    if BICEP_SIGNATURES.iter().any(|re| re.is_match(code)) {
        return IacFormat::Bicep;
    }
    IacFormat::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_terraform_resource_block() {
        let code = r#"resource "azurerm_storage_account" "x" { name = "x" }"#;
        assert_eq!(detect_format(code), IacFormat::Terraform);
    }

    #[test]
    fn detects_bicep_resource_block() {
        let code = "resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n  name: 'x'\n}";
        assert_eq!(detect_format(code), IacFormat::Bicep);
    }

    #[test]
    fn detects_unknown_for_plain_text() {
        assert_eq!(detect_format("just a question about pricing"), IacFormat::Unknown);
    }

    #[test]
    fn detects_terraform_variable_block() {
        assert_eq!(detect_format(r#"variable "region" { default = "eastus" }"#), IacFormat::Terraform);
    }

    #[test]
    fn detects_bicep_param() {
        assert_eq!(detect_format("param location string = 'eastus'"), IacFormat::Bicep);
    }
}
