// SPDX-License-Identifier: MIT OR Apache-2.0
//! A write-once agent catalog.
//!
//! [`AgentRegistryBuilder`] is the only way to populate an [`AgentRegistry`];
//! once [`AgentRegistryBuilder::build`] is called the registry is sealed and
//! read-only for the lifetime of the process.

use iacgov_core::{Agent, AgentMetadata};
use std::collections::HashMap;
use std::sync::Arc;

/// A sealed, read-only catalog of [`Agent`]s, keyed by their stable id.
#[derive(Clone)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
    default_agent: Option<String>,
}

impl AgentRegistry {
    /// Look up an agent by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(id).cloned()
    }

    /// Resolve the registry's default agent, if one was configured.
    #[must_use]
    pub fn default_agent(&self) -> Option<Arc<dyn Agent>> {
        self.default_agent.as_deref().and_then(|id| self.get(id))
    }

    /// Metadata for every registered agent, sorted by id.
    #[must_use]
    pub fn list(&self) -> Vec<AgentMetadata> {
        let mut ids: Vec<&str> = self.agents.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids.into_iter()
            .map(|id| self.agents[id].metadata())
            .collect()
    }

    /// Whether an agent with the given id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }
}

/// Builder for [`AgentRegistry`]. Consumed by [`Self::build`], which is the
/// only path to a usable registry — there is no mutation after that point.
#[derive(Default)]
pub struct AgentRegistryBuilder {
    agents: HashMap<String, Arc<dyn Agent>>,
    default_agent: Option<String>,
}

impl AgentRegistryBuilder {
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent, keyed by its own [`Agent::id`]. Replaces any
    /// previously registered agent with the same id.
    #[must_use]
    pub fn register(mut self, agent: impl Agent + 'static) -> Self {
        self.agents.insert(agent.id().to_string(), Arc::new(agent));
        self
    }

    /// Mark an already-registered agent id as the registry's default.
    #[must_use]
    pub fn with_default(mut self, id: impl Into<String>) -> Self {
        self.default_agent = Some(id.into());
        self
    }

    /// Seal the builder into a read-only [`AgentRegistry`].
    #[must_use]
    pub fn build(self) -> AgentRegistry {
        AgentRegistry {
            agents: self.agents,
            default_agent: self.default_agent,
        }
    }
}
