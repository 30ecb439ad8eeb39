// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bicep → Terraform property/type normalization tables.

/// Bicep property name → Terraform-equivalent property name.
const PROPERTY_MAP: &[(&str, &str)] = &[
    ("supportsHttpsTrafficOnly", "enable_https_traffic_only"),
    ("minimumTlsVersion", "min_tls_version"),
    ("allowBlobPublicAccess", "allow_blob_public_access"),
    ("publicNetworkAccess", "public_network_access_enabled"),
];

/// Bicep resource type (without the `@version` suffix) → Terraform type.
const TYPE_MAP: &[(&str, &str)] = &[
    ("Microsoft.Storage/storageAccounts", "azurerm_storage_account"),
    ("Microsoft.KeyVault/vaults", "azurerm_key_vault"),
    (
        "Microsoft.ContainerService/managedClusters",
        "azurerm_kubernetes_cluster",
    ),
];

/// Normalize a Bicep property name to its Terraform equivalent, if known.
/// Unknown property names pass through unchanged (lowercased snake_case is
/// not forced on unmapped keys — rules only consult the mapped set).
#[must_use]
pub fn normalize_property_name(name: &str) -> String {
    PROPERTY_MAP
        .iter()
        .find(|(bicep, _)| *bicep == name)
        .map_or_else(|| name.to_string(), |(_, tf)| (*tf).to_string())
}

/// Normalize a Bicep resource type (e.g.
/// `Microsoft.Storage/storageAccounts@2023-01-01`) to its Terraform
/// equivalent type string.
///
/// Known types use the explicit [`TYPE_MAP`]; unknown
/// `Microsoft.X/Y@version` types fall back to a generic
/// `azurerm_<lowercase(Y)>` mapping.
#[must_use]
pub fn normalize_type(bicep_type: &str) -> String {
    let without_version = bicep_type.split('@').next().unwrap_or(bicep_type);

    if let Some((_, tf)) = TYPE_MAP.iter().find(|(bicep, _)| *bicep == without_version) {
        return (*tf).to_string();
    }

    let segment = without_version.rsplit('/').next().unwrap_or(without_version);
    format!("azurerm_{}", segment.to_lowercase())
}
