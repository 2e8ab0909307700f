//! Marketplace timestamps are UTC, with or without fractional seconds and with
//! or without a trailing `Z`. Display strings are always rendered in UTC+9.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::error::TimestampError;

const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;

const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DISPLAY_FORMAT: &str = "%Y年%m月%d日 %H:%M:%S";
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Parse `YYYY-MM-DDTHH:MM:SS[.ffffff][Z]` as a UTC instant.
///
/// The `Z` marker is optional; the value is UTC either way.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let s = raw.strip_suffix('Z').unwrap_or(raw);
    if !has_expected_shape(s) {
        return Err(TimestampError::Malformed(raw.to_string()));
    }
    NaiveDateTime::parse_from_str(s, PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| TimestampError::Invalid {
            input: raw.to_string(),
            source,
        })
}

/// chrono accepts single-digit fields and signed years, so the fixed-width
/// layout is checked up front.
fn has_expected_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 19 {
        return false;
    }
    let (head, frac) = bytes.split_at(19);
    let head_ok = head.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        13 | 16 => *b == b':',
        _ => b.is_ascii_digit(),
    });
    let frac_ok = match frac.split_first() {
        None => true,
        Some((&b'.', digits)) => !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
        Some(_) => false,
    };
    head_ok && frac_ok
}

/// `YYYY年MM月DD日 HH:MM:SS` in UTC+9.
pub fn to_local_display(instant: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(DISPLAY_OFFSET_SECS) {
        Some(offset) => instant.with_timezone(&offset).format(DISPLAY_FORMAT).to_string(),
        None => instant.format(DISPLAY_FORMAT).to_string(),
    }
}

/// Best-effort display of a raw marketplace timestamp.
///
/// Unparsable input (including the `unknown` sentinel) is returned unchanged.
pub fn display_local(raw: &str) -> String {
    parse_utc(raw)
        .map(to_local_display)
        .unwrap_or_else(|_| raw.to_string())
}

/// Render an instant in the marketplace's own wire format.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format(WIRE_FORMAT).to_string()
}
