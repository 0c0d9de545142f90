//! Helper functions shared by the converters and the parser.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};

use super::keys;

/// Convert milliseconds since the epoch to an RFC 3339 string
///
/// Only years 1970 through 9999 have a string form; other instants are
/// written as `$numberLong`.
///
/// # Arguments
/// * `ms` - Milliseconds since the Unix epoch
///
/// # Returns
/// `Some("2020-01-01T00:00:00.000Z")` style string, or `None` when out of range
pub fn datetime_to_rfc3339(ms: i64) -> Option<String> {
    let dt = DateTime::<Utc>::from_timestamp_millis(ms)?;
    if !(1970..=9999).contains(&dt.year()) {
        return None;
    }
    Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse an RFC 3339 string into milliseconds since the epoch
///
/// Sub-millisecond digits are truncated.
pub fn rfc3339_to_millis(s: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Encode binary data as standard (padded) base64
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64
pub fn base64_to_bytes(s: &str) -> Option<Vec<u8>> {
    STANDARD.decode(s).ok()
}

/// Binary subtype as two lowercase hex digits
pub fn subtype_to_hex(subtype: u8) -> String {
    format!("{subtype:02x}")
}

/// Parse a subtype of one or two hex digits
pub fn hex_to_subtype(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(s, 16).ok()
}

/// Render a double the way `$numberDouble` carries it
///
/// Finite values use the shortest representation that parses back to the
/// same bits, always with a fraction or exponent (`1.0`, `1e100`).
pub fn double_to_string(f: f64) -> String {
    if f.is_nan() {
        keys::NAN.to_string()
    } else if f == f64::INFINITY {
        keys::INFINITY.to_string()
    } else if f == f64::NEG_INFINITY {
        keys::NEG_INFINITY.to_string()
    } else {
        serde_json::Number::from_f64(f)
            .map(|n| n.to_string())
            .unwrap_or_else(|| f.to_string())
    }
}

/// Parse a `$numberDouble` payload
///
/// Only the exact spellings `NaN`, `Infinity` and `-Infinity` produce
/// non-finite values.
pub fn string_to_double(s: &str) -> Option<f64> {
    match s {
        keys::NAN => Some(f64::NAN),
        keys::INFINITY => Some(f64::INFINITY),
        keys::NEG_INFINITY => Some(f64::NEG_INFINITY),
        _ => s.parse::<f64>().ok().filter(|f| f.is_finite()),
    }
}
