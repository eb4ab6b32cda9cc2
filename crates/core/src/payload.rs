//! Validation and normalization of raw status-creation payloads.
//!
//! The HTTP layer hands in an untyped JSON body; [`validate`] collects every
//! rule violation (no short-circuiting) and only then does [`normalize`]
//! produce the strongly-typed record the persistence layer stores. Unvalidated
//! input never reaches the typed domain model.

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Error message constants
// ---------------------------------------------------------------------------

pub const ERR_DEVICE_ID_REQUIRED: &str = "device_id is required";
pub const ERR_TIMESTAMP_REQUIRED: &str = "timestamp is required";
pub const ERR_TIMESTAMP_INVALID: &str = "timestamp must be a valid ISO 8601 date string";
pub const ERR_ONLINE_NOT_BOOLEAN: &str = "online must be a boolean";
pub const ERR_BATTERY_OUT_OF_RANGE: &str = "battery_level must be a number between 0 and 100";
pub const ERR_RSSI_NOT_NUMERIC: &str = "rssi must be a number";

// ---------------------------------------------------------------------------
// Result and record types
// ---------------------------------------------------------------------------

/// Outcome of validating a raw payload. `valid` is true iff `errors` is
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// A validated, typed status record ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeviceStatus {
    pub device_id: String,
    pub timestamp: Timestamp,
    pub battery_level: Option<f64>,
    pub rssi: Option<i32>,
    pub online: bool,
}

// ---------------------------------------------------------------------------
// Field access helpers
// ---------------------------------------------------------------------------

/// Look up a field by name. Returns `None` for non-object payloads.
fn field<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    payload.as_object()?.get(key)
}

/// Look up a field under its snake_case name first, falling back to the
/// camelCase alias. When both keys are present the snake_case value wins.
fn aliased<'a>(payload: &'a Value, snake: &str, camel: &str) -> Option<&'a Value> {
    field(payload, snake).or_else(|| field(payload, camel))
}

/// Parse an ISO 8601 (RFC 3339) timestamp string into UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

/// A non-empty identifier string. Empty strings, nulls, and non-string
/// values all count as missing.
fn as_identifier(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a raw creation payload against every rule, collecting all
/// violations.
///
/// Rules, in order: device identifier present, timestamp present and
/// parseable, `online` is exactly a boolean (the string `"true"` is not
/// accepted), `battery_level` (when present and non-null) is a number in
/// `[0, 100]`, `rssi` (when present and non-null) is numeric. A non-object
/// body fails every required-field rule.
pub fn validate(payload: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    if as_identifier(aliased(payload, "device_id", "deviceId")).is_none() {
        errors.push(ERR_DEVICE_ID_REQUIRED.to_string());
    }

    match field(payload, "timestamp") {
        None | Some(Value::Null) => errors.push(ERR_TIMESTAMP_REQUIRED.to_string()),
        Some(value) => {
            let parsed = value.as_str().and_then(parse_timestamp);
            if parsed.is_none() {
                errors.push(ERR_TIMESTAMP_INVALID.to_string());
            }
        }
    }

    if !matches!(field(payload, "online"), Some(Value::Bool(_))) {
        errors.push(ERR_ONLINE_NOT_BOOLEAN.to_string());
    }

    if let Some(value) = aliased(payload, "battery_level", "batteryLevel") {
        if !value.is_null() {
            let in_range = value.as_f64().is_some_and(|b| (0.0..=100.0).contains(&b));
            if !in_range {
                errors.push(ERR_BATTERY_OUT_OF_RANGE.to_string());
            }
        }
    }

    if let Some(value) = field(payload, "rssi") {
        if !value.is_null() && value.as_f64().is_none() {
            errors.push(ERR_RSSI_NOT_NUMERIC.to_string());
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

/// Convert a payload that passed [`validate`] into a typed record.
///
/// Returns `CoreError::Validation` if called on a payload that was never
/// validated; callers are expected to check [`validate`] first.
pub fn normalize(payload: &Value) -> Result<NewDeviceStatus, CoreError> {
    let result = validate(payload);
    if !result.valid {
        return Err(CoreError::Validation(result.errors.join("; ")));
    }

    let device_id = as_identifier(aliased(payload, "device_id", "deviceId"))
        .ok_or_else(|| CoreError::Validation(ERR_DEVICE_ID_REQUIRED.to_string()))?
        .to_string();

    let timestamp = field(payload, "timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .ok_or_else(|| CoreError::Validation(ERR_TIMESTAMP_INVALID.to_string()))?;

    let online = field(payload, "online")
        .and_then(Value::as_bool)
        .ok_or_else(|| CoreError::Validation(ERR_ONLINE_NOT_BOOLEAN.to_string()))?;

    let battery_level = aliased(payload, "battery_level", "batteryLevel")
        .filter(|v| !v.is_null())
        .and_then(Value::as_f64);

    // Fractional RSSI readings are truncated toward zero; dBm is reported
    // as an integer everywhere downstream.
    let rssi = field(payload, "rssi")
        .filter(|v| !v.is_null())
        .and_then(Value::as_f64)
        .map(|r| r as i32);

    Ok(NewDeviceStatus {
        device_id,
        timestamp,
        battery_level,
        rssi,
        online,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
