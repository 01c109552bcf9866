//! Named normalization functions for request options.
//!
//! Each normalizer is a pure, total function over its declared domain and
//! explicit about its failure domain: a value that cannot be normalized is
//! a configuration error naming the field, never a panic or a silent
//! coercion.

use crate::errors::{MyraError, MyraResult};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Europe::Berlin;
use chrono_tz::Tz;

/// Literal date format accepted next to Unix timestamps.
const DATE_LITERAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trims leading and trailing `.` characters from a fqdn.
///
/// Idempotent: normalizing twice yields the same string.
pub fn normalize_fqdn(fqdn: &str) -> String {
    fqdn.trim_matches('.').to_string()
}

/// Parses a date-like option value into an instant in the fixed
/// Europe/Berlin reference zone.
///
/// Accepts either a Unix timestamp (all-digit string) or a
/// `YYYY-MM-DD HH:MM:SS` literal interpreted as Berlin civil time.
/// `None` and the empty string normalize to "no date"; anything else that
/// fails to parse is a configuration error on `field`.
pub fn normalize_date(field: &'static str, value: Option<&str>) -> MyraResult<Option<DateTime<Tz>>> {
    let value = match value {
        None => return Ok(None),
        Some(v) if v.is_empty() => return Ok(None),
        Some(v) => v,
    };

    if value.bytes().all(|b| b.is_ascii_digit()) {
        let timestamp: i64 = value
            .parse()
            .map_err(|_| MyraError::invalid(field, format!("timestamp `{}` out of range", value)))?;
        return Berlin
            .timestamp_opt(timestamp, 0)
            .single()
            .map(Some)
            .ok_or_else(|| MyraError::invalid(field, format!("timestamp `{}` out of range", value)));
    }

    let naive = NaiveDateTime::parse_from_str(value, DATE_LITERAL_FORMAT).map_err(|_| {
        MyraError::invalid(
            field,
            format!("`{}` is neither a Unix timestamp nor `YYYY-MM-DD HH:MM:SS`", value),
        )
    })?;

    // Nonexistent or ambiguous local times (DST transitions) are rejected
    // rather than silently resolved.
    Berlin.from_local_datetime(&naive).single().map(Some).ok_or_else(|| {
        MyraError::invalid(
            field,
            format!("`{}` is not an unambiguous Europe/Berlin local time", value),
        )
    })
}

/// Coerces a page-number option to a 1-based page index.
pub fn normalize_page(field: &'static str, value: &str) -> MyraResult<u32> {
    let page: u32 = value
        .trim()
        .parse()
        .map_err(|_| MyraError::invalid(field, format!("`{}` is not an integer", value)))?;
    if page == 0 {
        return Err(MyraError::invalid(field, "page numbering starts at 1"));
    }
    Ok(page)
}

/// Formats an instant the way request bodies carry dates
/// (`2024-06-15T12:30:45+0200`, offset without a colon).
pub fn format_iso8601(date: &DateTime<Tz>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%z").to_string()
}

/// Formats an instant for the `Date` request header
/// (`2024-06-15T12:30:45+02:00`, offset with a colon).
pub fn format_header_date(date: &DateTime<Tz>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}
