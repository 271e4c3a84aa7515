//! Tolerant field probing over loosely-typed provider JSON.
//!
//! Nothing in here fails: a malformed value is treated the same as a missing
//! one and the caller falls back to its default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

/// Candidate subscriber-count keys, in probe order.
pub const SUBSCRIBER_FIELDS: &[&str] = &[
    "participants_count",
    "subscribers_count",
    "member_count",
    "subscribers",
    "members",
    "participants",
    "count",
    "subs",
    "participantsCount",
    "subscribersCount",
    "memberCount",
];

/// Candidate last-post timestamp keys, in probe order.
pub const LAST_POST_FIELDS: &[&str] = &["last_post", "lastPost", "last_activity", "updated_at"];

/// Probes [`SUBSCRIBER_FIELDS`], then the same keys one level down under
/// `stats`. Defaults to 0.
#[must_use]
pub fn extract_subscribers(data: &JsonObject) -> u64 {
    probe_subscribers(data)
        .or_else(|| {
            data.get("stats")
                .and_then(Value::as_object)
                .and_then(probe_subscribers)
        })
        .unwrap_or(0)
}

fn probe_subscribers(data: &JsonObject) -> Option<u64> {
    SUBSCRIBER_FIELDS
        .iter()
        .filter_map(|key| data.get(*key))
        .find_map(count_value)
}

fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|v| u64::try_from(v).unwrap_or(0)))
            .or_else(|| n.as_f64().map(float_to_count)),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '.') && !c.is_whitespace())
                .collect();
            cleaned.parse::<u64>().ok()
        }
        _ => None,
    }
}

/// Truncates towards zero and clamps negatives and non-finite values to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn float_to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

/// First key holding a usable non-negative number. Strings have thousands
/// separators and whitespace stripped before parsing.
#[must_use]
pub fn number(data: &JsonObject, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find_map(number_value)
}

fn number_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// First key holding a count, see [`extract_subscribers`] for coercion rules.
#[must_use]
pub fn count(data: &JsonObject, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find_map(count_value)
}

/// First key holding a string. Empty strings count as present.
#[must_use]
pub fn text<'a>(data: &'a JsonObject, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find_map(Value::as_str)
}

/// First key holding something boolean-like: `true`, `"true"`, `1`.
#[must_use]
pub fn flag(data: &JsonObject, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find_map(|value| match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        })
}

/// Default timestamp when a provider says nothing about the last post.
#[must_use]
pub fn default_last_post(now: NaiveDateTime) -> NaiveDateTime {
    now - TimeDelta::days(1)
}

/// Probes [`LAST_POST_FIELDS`] and parses the first value that matches one
/// of the accepted layouts; otherwise "one day before `now`".
#[must_use]
pub fn last_post(data: &JsonObject, now: NaiveDateTime) -> NaiveDateTime {
    LAST_POST_FIELDS
        .iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .find_map(parse_loose_timestamp)
        .unwrap_or_else(|| default_last_post(now))
}

/// Tries, in order: date only (leading 10 chars), `T`-separated date-time and
/// space-separated date-time (leading 19 chars). Trailing fractions or offsets
/// are ignored.
#[must_use]
pub fn parse_loose_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Some(date) = raw
        .get(..10)
        .filter(|_| raw.len() == 10)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    {
        return Some(date.and_time(NaiveTime::MIN));
    }
    let head = raw.get(..19)?;
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(head, fmt).ok())
}

/// Parses an ISO-8601 timestamp (a trailing `Z` is accepted) and drops the
/// offset, keeping the wall-clock time it was written in.
#[must_use]
pub fn parse_iso_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
