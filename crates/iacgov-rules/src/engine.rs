// SPDX-License-Identifier: MIT OR Apache-2.0
//! The engine that owns a rule set and evaluates it against resources.

use crate::rule::Rule;
use iacgov_core::{Finding, Resource, RuleCategory};

/// An ordered collection of [`Rule`]s.
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Create an empty engine with no rules registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine pre-loaded with the built-in policy, security, and
    /// compliance rule set.
    #[must_use]
    pub fn with_seed_rules() -> Self {
        let mut engine = Self::new();
        for rule in crate::seed::seed_rules() {
            engine.add_rule(rule);
        }
        engine
    }

    /// Register a rule.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// All registered rules.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules belonging to a single category, in registration order.
    pub fn rules_by_category(&self, category: RuleCategory) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    /// Evaluate every applicable rule in `category` against `resource` and
    /// collect all findings.
    #[must_use]
    pub fn evaluate_category(&self, resource: &Resource, category: RuleCategory) -> Vec<Finding> {
        self.rules_by_category(category)
            .filter(|r| r.applies(&resource.r#type))
            .flat_map(|r| r.check(resource))
            .collect()
    }

    /// Evaluate every applicable rule against `resource`, across all
    /// categories.
    #[must_use]
    pub fn evaluate_resource(&self, resource: &Resource) -> Vec<Finding> {
        self.rules
            .iter()
            .filter(|r| r.applies(&resource.r#type))
            .flat_map(|r| r.check(resource))
            .collect()
    }

    /// Evaluate every applicable rule against every resource.
    #[must_use]
    pub fn evaluate_all(&self, resources: &[Resource], category: RuleCategory) -> Vec<Finding> {
        resources
            .iter()
            .flat_map(|r| self.evaluate_category(r, category))
            .collect()
    }
}
