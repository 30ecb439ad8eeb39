// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Cost agent: a static price table over declared resources. Category-less
//! — it does not consult the rule engine at all.

use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter, Resource};
use iacgov_error::IacGovError;
use iacgov_parser::get_nested_property;
use std::fmt::Write as _;
use tracing::info;

const HOURS_PER_MONTH: f64 = 730.0;
const AKS_LOAD_BALANCER_BASELINE: f64 = 18.25;
const UNKNOWN_VM_HOURLY: f64 = 0.096;
const WINDOWS_MULTIPLIER: f64 = 1.5;
const STORAGE_PER_GB_MONTH: f64 = 0.0184;
const STORAGE_DEFAULT_GB: f64 = 100.0;
const KEY_VAULT_FLAT_MONTHLY: f64 = 3.0;

const VM_HOURLY_RATES: &[(&str, f64)] = &[
    ("Standard_B1s", 0.0104),
    ("Standard_B2s", 0.0416),
    ("Standard_B2ms", 0.0832),
    ("Standard_D2s_v4", 0.096),
    ("Standard_D4s_v3", 0.192),
    ("Standard_D8s_v3", 0.384),
    ("Standard_E2s_v3", 0.126),
    ("Standard_F2s_v2", 0.0846),
];

const APP_SERVICE_PLAN_MONTHLY: &[(&str, f64)] = &[
    ("F1", 0.0),
    ("B1", 54.75),
    ("B2", 109.50),
    ("S1", 73.0),
    ("P1v2", 146.0),
    ("P1v3", 146.0),
];

const ACR_TIER_MONTHLY: &[(&str, f64)] = &[("Basic", 5.0), ("Standard", 20.0), ("Premium", 50.0)];

const NETWORKING_TYPES: &[&str] = &[
    "azurerm_virtual_network",
    "azurerm_subnet",
    "azurerm_network_security_group",
    "azurerm_network_security_rule",
    "azurerm_public_ip",
    "azurerm_route_table",
    "azurerm_nat_gateway",
];

fn lookup_rate(table: &[(&str, f64)], key: &str) -> Option<f64> {
    table.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| *v)
}

fn vm_hourly(sku: &str) -> f64 {
    lookup_rate(VM_HOURLY_RATES, sku).unwrap_or(UNKNOWN_VM_HOURLY)
}

fn property_str<'a>(resource: &'a Resource, path: &str) -> Option<&'a str> {
    get_nested_property(&resource.properties, path).and_then(|v| v.as_str())
}

/// One resource's line in the cost table: the monthly estimate and a short
/// note on how it was derived.
struct LineItem {
    resource: String,
    monthly: f64,
    note: String,
}

fn estimate(resource: &Resource) -> Option<LineItem> {
    let monthly_note = match resource.r#type.as_str() {
        "azurerm_kubernetes_cluster" => {
            let vm_size = property_str(resource, "default_node_pool.vm_size").unwrap_or("unknown");
            let node_count = get_nested_property(&resource.properties, "default_node_pool.node_count")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(1.0);
            let total = vm_hourly(vm_size) * HOURS_PER_MONTH * node_count + AKS_LOAD_BALANCER_BASELINE;
            (total, format!("{node_count} x {vm_size} node pool + load balancer baseline"))
        }
        "azurerm_linux_virtual_machine" | "azurerm_virtual_machine" => {
            let size = property_str(resource, "size").or_else(|| property_str(resource, "vm_size")).unwrap_or("unknown");
            (vm_hourly(size) * HOURS_PER_MONTH, format!("{size} @ {:.4}/h", vm_hourly(size)))
        }
        "azurerm_windows_virtual_machine" => {
            let size = property_str(resource, "size").or_else(|| property_str(resource, "vm_size")).unwrap_or("unknown");
            let rate = vm_hourly(size) * WINDOWS_MULTIPLIER;
            (rate * HOURS_PER_MONTH, format!("{size} (Windows) @ {rate:.4}/h"))
        }
        "azurerm_storage_account" => {
            (STORAGE_PER_GB_MONTH * STORAGE_DEFAULT_GB, format!("{STORAGE_DEFAULT_GB:.0} GB @ ${STORAGE_PER_GB_MONTH}/GB"))
        }
        "azurerm_service_plan" | "azurerm_app_service_plan" => {
            let tier = property_str(resource, "sku_name").or_else(|| property_str(resource, "sku.tier")).unwrap_or("B1");
            let rate = lookup_rate(APP_SERVICE_PLAN_MONTHLY, tier).unwrap_or(54.75);
            (rate, format!("{tier} plan"))
        }
        "azurerm_container_registry" => {
            let tier = property_str(resource, "sku").unwrap_or("Basic");
            let rate = lookup_rate(ACR_TIER_MONTHLY, tier).unwrap_or(5.0);
            (rate, format!("{tier} tier"))
        }
        "azurerm_key_vault" => (KEY_VAULT_FLAT_MONTHLY, "flat Key Vault rate".to_string()),
        t if NETWORKING_TYPES.contains(&t) => (0.0, "networking primitive, not separately billed".to_string()),
        _ => return None,
    };
    Some(LineItem { resource: resource.qualified_name(), monthly: monthly_note.0, note: monthly_note.1 })
}

/// The Cost agent: estimates a monthly dollar figure per resource.
pub struct CostAgent;

impl Default for CostAgent {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for CostAgent {
    fn id(&self) -> &str {
        "cost"
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: "cost".to_string(),
            name: "Cost Agent".to_string(),
            description: "Estimates monthly cost for declared resources from a static price table.".to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities { needs_iac_input: true, needs_raw_code: false, needs_file_contents: false }
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let Some(iac) = crate::common::require_iac(req, emit).await else {
            return Ok(());
        };

        let items: Vec<LineItem> = iac.resources.iter().filter_map(estimate).collect();
        if items.is_empty() {
            emit.message("No priceable resources were found.").await;
            return Ok(());
        }

        let mut out = String::from("| Resource | Est. Monthly Cost | Notes |\n|---|---|---|\n");
        let mut total = 0.0;
        for item in &items {
            total += item.monthly;
            let _ = writeln!(out, "| {} | ${:.2} | {} |", item.resource, item.monthly, item.note);
        }
        let _ = writeln!(out, "\n**Total estimated monthly cost: ${total:.2}**");

        info!(resources = items.len(), total_monthly = total, "cost dispatch complete");
        emit.message(&out).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacgov_core::{Confirmation, Reference};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingEmitter {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Emitter for CapturingEmitter {
        async fn message(&self, text: &str) {
            self.messages.lock().unwrap().push(text.to_string());
        }
        async fn references(&self, _refs: Vec<Reference>) {}
        async fn confirmation(&self, _c: Confirmation) {}
        async fn error(&self, _text: &str) {}
        async fn done(&self) {}
    }

    #[tokio::test]
    async fn aks_total_matches_spec_scenario() {
        let code = r#"
resource "azurerm_kubernetes_cluster" "prod" {
  default_node_pool {
    node_count = 3
    vm_size    = "Standard_D2s_v3"
  }
}
"#;
        let mut req = AgentRequest::default();
        req.prompt = Some(format!("```terraform\n{code}\n```"));
        iacgov_registry::parse_and_enrich(&mut req);

        let agent = CostAgent;
        let emitter = CapturingEmitter::default();
        agent.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");

        assert!(out.contains('$'));
        assert!(out.contains("kubernetes_cluster.prod"));

        let expected = UNKNOWN_VM_HOURLY * HOURS_PER_MONTH * 3.0 + AKS_LOAD_BALANCER_BASELINE;
        assert!((expected - 228.49).abs() < 0.01, "expected ~228.49, got {expected}");
        assert!(out.contains(&format!("{expected:.2}")));
    }

    #[tokio::test]
    async fn unpriceable_resource_set_is_reported() {
        let code = r#"resource "azurerm_resource_group" "rg" {}"#;
        let mut req = AgentRequest::default();
        req.prompt = Some(format!("```terraform\n{code}\n```"));
        iacgov_registry::parse_and_enrich(&mut req);

        let agent = CostAgent;
        let emitter = CapturingEmitter::default();
        agent.handle(&req, &emitter).await.unwrap();
        let out = emitter.messages.lock().unwrap().join("");
        assert!(out.contains("No priceable resources"));
    }
}
