// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dotted-path navigation into a resource's scanned properties.

use serde_json::Value;
use std::collections::BTreeMap;

/// Look up a dotted path (e.g. `network_rules.default_action`) inside a
/// resource's property map.
///
/// Returns `None` when any segment along the path is missing or when an
/// intermediate segment is not an object.
#[must_use]
pub fn get_nested_property<'a>(
    properties: &'a BTreeMap<String, Value>,
    path: &str,
) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = properties.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
