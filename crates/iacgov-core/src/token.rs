// SPDX-License-Identifier: MIT OR Apache-2.0
//! An opaque bearer token that must never appear in logs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bearer token forwarded verbatim from a transport to the LLM client.
///
/// The `Debug` impl always prints `Token("<redacted>")` regardless of
/// whether a value is set, so accidental `{:?}` logging (e.g. via
/// `tracing`'s struct-field capture) never leaks the token.
#[derive(Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Token(#[serde(default)] String);

impl Token {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// `true` when no token was provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw token value. Callers passing this to an `Authorization`
    /// header are the one legitimate place it should be read.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(\"<redacted>\")")
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}
