// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # iacgov-parser
//!
//! Regex/brace-scanning parser for Terraform and Bicep source. Not a full
//! HCL or Bicep grammar: it detects the dialect, extracts likely code out
//! of free-form chat text, and scans `resource`/`data` blocks one level
//! deep (plus one level of nested sub-blocks) into a flat property map.

mod bicep;
mod extract;
mod format;
mod nested;
mod resource;

pub use extract::extract_code;
pub use format::detect_format;
pub use nested::get_nested_property;
pub use resource::parse_resources;

use iacgov_core::IacInput;

/// Parse a raw source string end-to-end into an [`IacInput`]: detect its
/// format, then scan resource blocks out of it.
#[must_use]
pub fn parse(raw_code: &str) -> IacInput {
    let format = detect_format(raw_code);
    let resources = parse_resources(raw_code, format);
    IacInput {
        format: Some(format),
        raw_code: raw_code.to_string(),
        resources,
    }
}
