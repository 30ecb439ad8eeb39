// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-registry
//!
//! The write-once agent catalog ([`AgentRegistry`]/[`AgentRegistryBuilder`]),
//! the [`Dispatcher`] that routes requests into it with cycle protection,
//! and [`parse_and_enrich`] which lazily attaches parsed IaC input to a
//! request.

mod dispatcher;
mod enrich;
mod registry;

pub use dispatcher::Dispatcher;
pub use enrich::parse_and_enrich;
pub use registry::{AgentRegistry, AgentRegistryBuilder};
