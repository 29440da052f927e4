//! Lenient decoders for backend fields that come in more than one shape

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

/// Deserialize a string that may be null; null becomes empty
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize an optional calendar date
///
/// Accepts `2024-03-01`, RFC 3339 timestamps (`2024-03-01T00:00:00.000Z`)
/// and naive timestamps; only the date part is kept. Null and empty strings
/// are `None`.
pub fn option_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    parse_date(raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}

/// First non-blank of the two names a resource may use for the sub-city
pub(crate) fn pick_subcity(subcity: Option<String>, district: Option<String>) -> Option<String> {
    subcity
        .filter(|s| !s.trim().is_empty())
        .or(district.filter(|s| !s.trim().is_empty()))
}
