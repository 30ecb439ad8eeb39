// SPDX-License-Identifier: MIT OR Apache-2.0
//! A single declarative rule and the three ways it can be checked.

use iacgov_core::{Finding, Resource, RuleCategory, Severity};
use iacgov_parser::get_nested_property;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// The one check a [`Rule`] performs. Exactly one variant drives a given
/// rule; a rule never mixes check kinds.
#[derive(Clone)]
pub enum RuleCheck {
    /// Compare a (possibly dotted) property path against an expected value.
    /// Missing properties and mismatched values are both violations.
    Property { path: String, expected: Value },
    /// Scan the resource's raw source text for regex patterns. Each
    /// pattern with at least one match contributes one violation.
    Patterns(Vec<Regex>),
    /// An arbitrary predicate; `false` is a violation.
    Predicate(Arc<dyn Fn(&Resource) -> bool + Send + Sync>),
}

/// A single policy, security, or compliance rule.
#[derive(Clone)]
pub struct Rule {
    pub id: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub title: &'static str,
    pub remediation: &'static str,
    /// Empty or `["*"]` means the rule applies to every resource type.
    pub resource_types: Vec<String>,
    pub check: RuleCheck,
}

impl Rule {
    /// Whether this rule is scoped to `resource_type`.
    #[must_use]
    pub fn applies(&self, resource_type: &str) -> bool {
        self.resource_types.is_empty()
            || self
                .resource_types
                .iter()
                .any(|t| t == "*" || t == resource_type)
    }

    /// Run this rule's check against `resource`, assuming [`Self::applies`]
    /// has already been confirmed true for its type.
    #[must_use]
    pub fn check(&self, resource: &Resource) -> Vec<Finding> {
        match &self.check {
            RuleCheck::Property { path, expected } => {
                let actual = get_nested_property(&resource.properties, path);
                if actual == Some(expected) {
                    Vec::new()
                } else {
                    vec![self.finding(resource, None)]
                }
            }
            RuleCheck::Predicate(pred) => {
                if pred(resource) {
                    Vec::new()
                } else {
                    vec![self.finding(resource, None)]
                }
            }
            RuleCheck::Patterns(_) => self
                .check_patterns(&resource.raw_block)
                .into_iter()
                .map(|pattern| self.finding(resource, Some(pattern)))
                .collect(),
        }
    }

    /// Run this rule's patterns (if it is a [`RuleCheck::Patterns`] rule)
    /// against arbitrary text, returning the source of each matching
    /// pattern. Non-pattern rules always return an empty vec.
    #[must_use]
    pub fn check_patterns(&self, text: &str) -> Vec<String> {
        match &self.check {
            RuleCheck::Patterns(patterns) => patterns
                .iter()
                .filter(|re| re.is_match(text))
                .map(|re| re.as_str().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn finding(&self, resource: &Resource, matched_pattern: Option<String>) -> Finding {
        let message = matched_pattern.map_or_else(
            || self.title.to_string(),
            |p| format!("{} (matched pattern `{p}`)", self.title),
        );
        Finding {
            rule_id: self.id.to_string(),
            category: self.category,
            severity: self.severity,
            resource: resource.qualified_name(),
            resource_type: resource.r#type.clone(),
            message,
            remediation: self.remediation.to_string(),
        }
    }
}
