// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loads `.tf`/`.bicep` fixture snippets from `tests/fixtures/`.

use std::path::PathBuf;

/// Read a fixture file by name (e.g. `"insecure_storage.tf"`) from this
/// crate's `tests/fixtures/` directory.
///
/// # Panics
///
/// Panics if the fixture does not exist — test fixtures are a build-time
/// concern, not something callers should handle gracefully.
#[must_use]
pub fn load_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("missing fixture {}: {err}", path.display()))
}
