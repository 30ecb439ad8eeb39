// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-agents
//!
//! The ten analysis agents: [`RuleCategoryAgent`] (Policy/Security/Compliance),
//! [`CostAgent`], [`DriftAgent`], [`ImpactAgent`], the command-style
//! [`DeployAgent`]/[`NotificationAgent`]/[`ModuleAgent`], and the
//! [`OrchestratorAgent`] that composes them. Every agent implements
//! `iacgov_core::Agent` and follows the common 4-step handling contract in
//! [`common`].

mod command;
pub mod common;
mod cost;
mod deploy;
mod drift;
mod impact;
mod module;
mod notification;
mod orchestrator;
mod rule_agent;

pub use cost::CostAgent;
pub use deploy::DeployAgent;
pub use drift::DriftAgent;
pub use impact::ImpactAgent;
pub use module::ModuleAgent;
pub use notification::NotificationAgent;
pub use orchestrator::OrchestratorAgent;
pub use rule_agent::RuleCategoryAgent;
