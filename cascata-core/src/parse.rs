//! Response parsing helpers shared by provider connectors.
//!
//! Providers disagree on how they spell "unknown": `"None"`, `"-"`, empty
//! strings, nulls. Everything here maps those to `None`.

use std::str::FromStr;

use cascata_types::{CascataError, Decimal};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn is_placeholder(s: &str) -> bool {
    matches!(s, "" | "-" | "None" | "none" | "N/A" | "null")
}

/// Parse an optional numeric string into a finite `f64`.
#[must_use]
pub fn opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if is_placeholder(s) {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a numeric string into a `Decimal`, accepting scientific notation.
#[must_use]
pub fn opt_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if is_placeholder(s) {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Interpret a JSON scalar (number or numeric string) as a `Decimal`.
#[must_use]
pub fn json_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => opt_decimal(&n.to_string()),
        Value::String(s) => opt_decimal(s),
        _ => None,
    }
}

/// Interpret a JSON scalar as a finite `f64`.
#[must_use]
pub fn json_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
        Value::String(s) => opt_f64(Some(s)),
        _ => None,
    }
}

/// Non-placeholder, trimmed string field.
#[must_use]
pub fn opt_string(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    (!is_placeholder(s)).then(|| s.to_string())
}

/// Top-level object keys, sorted, for malformed-response diagnostics.
#[must_use]
pub fn top_level_keys(v: &Value) -> Vec<String> {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<String> = map.keys().cloned().collect();
            keys.sort();
            keys
        }
        Value::Array(items) => vec![format!("[array; {} items]", items.len())],
        other => vec![format!("[{}]", json_type(other))],
    }
}

const fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserialize `body` into `T`, reporting the observed keys when the shape is unexpected.
///
/// # Errors
/// Returns `MalformedResponse` when `body` is not JSON or does not match `T`.
pub fn parse_json<T: DeserializeOwned>(connector: &str, body: &str) -> Result<T, CascataError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        CascataError::malformed(connector, format!("invalid JSON: {e}"), vec![])
    })?;
    let keys = top_level_keys(&value);
    serde_json::from_value(value)
        .map_err(|e| CascataError::malformed(connector, format!("unexpected shape: {e}"), keys))
}

/// Map an HTTP status code to the cascade's failure taxonomy.
///
/// # Errors
/// - 429 and 5xx are transient (`ProviderUnavailable`).
/// - Any other non-2xx status is a `ProviderRejected`.
pub fn check_status(connector: &str, status: u16) -> Result<(), CascataError> {
    match status {
        200..=299 => Ok(()),
        429 => Err(CascataError::unavailable(connector, "rate limited (HTTP 429)")),
        500..=599 => Err(CascataError::unavailable(connector, format!("HTTP {status}"))),
        404 => Err(CascataError::rejected(connector, "not found (HTTP 404)")),
        _ => Err(CascataError::rejected(connector, format!("HTTP {status}"))),
    }
}
