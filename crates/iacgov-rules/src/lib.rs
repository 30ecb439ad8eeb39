// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-rules
//!
//! Declarative policy, security, and compliance rules over scanned IaC
//! resources: property comparisons, regex pattern scans, and arbitrary
//! predicates, organized into a [`RuleEngine`].

mod engine;
mod rule;
mod seed;

pub use engine::RuleEngine;
pub use rule::{Rule, RuleCheck};
pub use seed::seed_rules;
