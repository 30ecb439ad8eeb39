// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Impact agent: a static per-type risk weight summed across declared
//! resources, banded into a blast-radius severity.

use async_trait::async_trait;
use iacgov_core::{Agent, AgentCapabilities, AgentMetadata, AgentRequest, Emitter, Resource};
use iacgov_error::IacGovError;
use std::fmt::Write as _;
use tracing::info;

fn risk_weight(resource: &Resource) -> u32 {
    match resource.r#type.as_str() {
        "azurerm_kubernetes_cluster" => 8,
        "azurerm_sql_server" | "azurerm_mssql_server" => 7,
        "azurerm_key_vault" => 6,
        "azurerm_linux_virtual_machine" | "azurerm_windows_virtual_machine" | "azurerm_virtual_machine" => 5,
        "azurerm_storage_account" | "azurerm_container_registry" | "azurerm_network_security_group" => 4,
        "azurerm_service_plan" | "azurerm_app_service_plan" | "azurerm_virtual_network" => 3,
        "azurerm_subnet" => 2,
        _ => 2,
    }
}

fn band(total: u32) -> &'static str {
    if total > 20 {
        "Critical"
    } else if total > 10 {
        "High"
    } else if total > 5 {
        "Medium"
    } else {
        "Low"
    }
}

/// The Impact agent: estimates the blast radius of a set of declared
/// changes.
pub struct ImpactAgent;

impl Default for ImpactAgent {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for ImpactAgent {
    fn id(&self) -> &str {
        "impact"
    }

    fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: "impact".to_string(),
            name: "Impact Agent".to_string(),
            description: "Estimates the blast radius of declared resource changes from static per-type risk weights.".to_string(),
        }
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities { needs_iac_input: true, needs_raw_code: false, needs_file_contents: false }
    }

    async fn handle(&self, req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
        let Some(iac) = crate::common::require_iac(req, emit).await else {
            return Ok(());
        };

        let mut out = String::from("| Resource | Risk Weight |\n|---|---|\n");
        let mut total = 0u32;
        for resource in &iac.resources {
            let weight = risk_weight(resource);
            total += weight;
            let _ = writeln!(out, "| {} | {weight} |", resource.qualified_name());
        }
        let band = band(total);
        let _ = writeln!(out, "\n**Total risk weight: {total} ({band})**");

        info!(total_weight = total, band, "impact dispatch complete");
        emit.message(&out).await;
        Ok(())
    }
}
