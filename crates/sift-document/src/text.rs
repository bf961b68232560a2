//! Scalar value normalization.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use scraper::Html;
use serde_json::{Number, Value};
use tracing::debug;

/// Output format of normalized dates: ISO-8601 with offset, no fractional seconds.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Naive date-time layouts accepted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Normalizes a date value to [`DATE_FORMAT`].
///
/// Accepts RFC 3339 strings, `YYYY-MM-DD HH:MM:SS` (taken as UTC), bare `YYYY-MM-DD`
/// and integer Unix timestamps. Returns `None` for anything else.
pub fn normalize_date(value: &Value) -> Option<String> {
    let parsed = match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.fixed_offset()),
        _ => None,
    };
    if parsed.is_none() {
        debug!(%value, "unparseable date");
    }
    parsed.map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// Parses the accepted string layouts.
fn parse_date_str(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Strips markup from long text, collapsing whitespace.
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts numeric strings to JSON numbers, element-wise for arrays.
///
/// Values that are not numeric strings are returned unchanged.
pub fn coerce_numeric(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_number(s.trim()) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(coerce_numeric).collect()),
        other => other,
    }
}

/// Parses an integer or finite float.
fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Returns true for values that carry no information: null and empty strings.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
