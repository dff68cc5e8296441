use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::borrow::Cow;

pub type Timestamp = DateTime<FixedOffset>;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Rewrites a trailing `Z` zone marker as an explicit `+00:00` offset.
///
/// Producers write both forms; the rewrite keeps them parsing to the same
/// instant.
pub fn normalize_zulu(raw: &str) -> Cow<'_, str> {
    match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stripped) => Cow::Owned(format!("{stripped}+00:00")),
        None => Cow::Borrowed(raw),
    }
}

/// Parses a recorded timestamp into a time-aware value.
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty timestamp".to_string());
    }
    let normalized = normalize_zulu(trimmed);
    let s = normalized.as_ref();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(as_utc(naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(as_utc(midnight));
        }
    }

    Err(format!("unrecognised datetime format: '{}'", trimmed))
}

fn as_utc(naive: NaiveDateTime) -> Timestamp {
    Utc.from_utc_datetime(&naive).fixed_offset()
}
