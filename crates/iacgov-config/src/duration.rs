// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parsing for Go-style duration strings (`"90s"`, `"2m"`, `"1h30m"`).

use iacgov_error::{ErrorCode, IacGovError};
use std::time::Duration;

/// Parse a Go-style duration string into a [`Duration`].
///
/// Supports `ns`, `us`/`µs`, `ms`, `s`, `m`, `h` unit suffixes, and
/// concatenated components (`"1h30m"`, `"1m30s500ms"`). A bare number with
/// no unit is rejected — Go requires an explicit unit and so do we.
pub fn parse_go_duration(input: &str) -> Result<Duration, IacGovError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid(input, "empty duration"));
    }

    let mut total = Duration::ZERO;
    let mut rest = trimmed;
    let mut consumed_any = false;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| invalid(input, "missing unit suffix"))?;
        if digits_end == 0 {
            return Err(invalid(input, "expected a numeric component"));
        }
        let (number, remainder) = rest.split_at(digits_end);
        let value: f64 = number
            .parse()
            .map_err(|_| invalid(input, "invalid numeric component"))?;

        let (unit_nanos, unit_len) = if let Some(r) = remainder.strip_prefix("ns") {
            (1.0, remainder.len() - r.len())
        } else if let Some(r) = remainder.strip_prefix("us").or_else(|| remainder.strip_prefix("\u{b5}s")) {
            (1_000.0, remainder.len() - r.len())
        } else if let Some(r) = remainder.strip_prefix("ms") {
            (1_000_000.0, remainder.len() - r.len())
        } else if let Some(r) = remainder.strip_prefix('s') {
            (1_000_000_000.0, remainder.len() - r.len())
        } else if let Some(r) = remainder.strip_prefix('m') {
            (60.0 * 1_000_000_000.0, remainder.len() - r.len())
        } else if let Some(r) = remainder.strip_prefix('h') {
            (3_600.0 * 1_000_000_000.0, remainder.len() - r.len())
        } else {
            return Err(invalid(input, "unrecognized unit suffix"));
        };

        total += Duration::from_nanos((value * unit_nanos) as u64);
        rest = &remainder[unit_len..];
        consumed_any = true;
    }

    if !consumed_any {
        return Err(invalid(input, "no duration components found"));
    }
    Ok(total)
}

fn invalid(input: &str, reason: &str) -> IacGovError {
    IacGovError::new(ErrorCode::ConfigInvalid, format!("invalid duration '{input}': {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_seconds() {
        assert_eq!(parse_go_duration("90s").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn parses_minutes() {
        assert_eq!(parse_go_duration("2m").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn parses_milliseconds() {
        assert_eq!(parse_go_duration("500ms").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn parses_compound_duration() {
        assert_eq!(parse_go_duration("1m30s").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn rejects_missing_unit() {
        assert!(parse_go_duration("90").is_err());
    }

    #[test]
    fn rejects_empty_string() {
        assert!(parse_go_duration("").is_err());
    }
}
