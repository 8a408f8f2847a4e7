//! Rule-table validation of JSON request bodies.
//!
//! Each body is described by a slice of [`FieldRule`]s. [`validate`] walks the
//! whole table and collects every failure so the client sees all offending
//! fields at once.

use super::error::{ApiError, FieldError};
use axum::extract::rejection::BytesRejection;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

const FIELD_REQUIRED: &str = "Field required";
const INVALID_STRING: &str = "Input should be a valid string";
const INVALID_INTEGER: &str = "Input should be a valid integer";
const INVALID_OBJECT: &str = "Input should be a valid dictionary";
const INVALID_JSON: &str = "JSON decode error";
const BODY: &str = "body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Minimum length in characters, text fields only.
    pub min_length: Option<usize>,
    /// Inclusive bounds, integer fields only.
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// Reported when a constraint above is violated.
    pub message: &'static str,
}

impl FieldRule {
    #[must_use]
    pub const fn text(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            kind: FieldKind::Text,
            required: true,
            min_length: None,
            min: None,
            max: None,
            message,
        }
    }

    #[must_use]
    pub const fn integer(field: &'static str, message: &'static str) -> Self {
        Self {
            kind: FieldKind::Integer,
            ..Self::text(field, message)
        }
    }

    /// Absent or `null` is accepted; a present value is still checked.
    #[must_use]
    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    #[must_use]
    pub const fn min_length(self, min_length: usize) -> Self {
        Self {
            min_length: Some(min_length),
            ..self
        }
    }

    #[must_use]
    pub const fn min(self, min: i64) -> Self {
        Self {
            min: Some(min),
            ..self
        }
    }

    #[must_use]
    pub const fn max(self, max: i64) -> Self {
        Self {
            max: Some(max),
            ..self
        }
    }

    /// Check `value`, rewriting integer fields given as `5.0` or `"5"` to `5`.
    fn check(&self, value: &mut Value) -> Result<(), &'static str> {
        match self.kind {
            FieldKind::Text => {
                let text = value.as_str().ok_or(INVALID_STRING)?;
                if self
                    .min_length
                    .is_some_and(|min| text.chars().count() < min)
                {
                    return Err(self.message);
                }
            }
            FieldKind::Integer => {
                let number = as_integer(value).ok_or(INVALID_INTEGER)?;
                if self.min.is_some_and(|min| number < min)
                    || self.max.is_some_and(|max| number > max)
                {
                    return Err(self.message);
                }
                *value = Value::from(number);
            }
        }
        Ok(())
    }
}

/// Lax integer reading: JSON integers, integral floats and decimal strings.
#[must_use]
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .and_then(|float| format!("{float:.0}").parse().ok())
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub const EVENT_ID_RULE: FieldRule =
    FieldRule::integer("event_id", "event_id must be a positive integer").min(1);

pub const EVENT_RULES: &[FieldRule] = &[
    FieldRule::text(
        "event_name_ar",
        "event_name_ar must be at least 2 characters long",
    )
    .min_length(2),
    FieldRule::text(
        "event_desc_ar",
        "event_desc_ar must be at least 2 characters long",
    )
    .min_length(2),
    FieldRule::integer("status", "status must be either 0 or 1")
        .min(0)
        .max(1),
    FieldRule::text("event_datetime", "event_datetime cannot be empty"),
    FieldRule::integer("event_image", "event_image must be a positive integer").min(1),
    FieldRule::integer(
        "event_sort_rank",
        "event_sort_rank must be a non-negative integer",
    )
    .min(0),
    FieldRule::text(
        "event_name_en",
        "event_name_en must be at least 2 characters long if provided",
    )
    .optional()
    .min_length(2),
    FieldRule::text(
        "event_desc_en",
        "event_desc_en must be at least 2 characters long if provided",
    )
    .optional()
    .min_length(2),
];

/// Check `body` against every rule and report all failures in table order.
/// Integer fields that pass are normalized in place.
///
/// # Errors
/// Returns one [`FieldError`] per failing rule.
pub fn validate<'a>(
    body: &mut Map<String, Value>,
    rules: impl IntoIterator<Item = &'a FieldRule>,
) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = rules
        .into_iter()
        .filter_map(|rule| {
            let outcome = match body.get_mut(rule.field) {
                None if rule.required => Err(FIELD_REQUIRED),
                None => Ok(()),
                Some(Value::Null) if !rule.required => Ok(()),
                Some(value) => rule.check(value),
            };
            outcome
                .err()
                .map(|message| FieldError::new(rule.field, message))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a raw body as a JSON object.
///
/// # Errors
/// Returns [`ApiError::Validation`] with a single `body` entry when the body
/// is empty, not JSON, or not an object.
pub fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(body_error(FIELD_REQUIRED));
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(body_error(INVALID_OBJECT)),
        Err(_) => Err(body_error(INVALID_JSON)),
    }
}

/// Parse, validate and deserialize a request body in one go.
///
/// # Errors
/// Returns [`ApiError::Validation`] listing every offending field.
pub fn validated<'a, T: DeserializeOwned>(
    bytes: &[u8],
    rules: impl IntoIterator<Item = &'a FieldRule>,
) -> Result<T, ApiError> {
    let mut body = parse_object(bytes)?;
    validate(&mut body, rules).map_err(ApiError::Validation)?;

    serde_json::from_value(Value::Object(body))
        .map_err(|err| ApiError::Validation(vec![FieldError::new(BODY, err.to_string())]))
}

/// Report a body axum could not buffer (too large, aborted) as a `body` error.
#[must_use]
pub fn unreadable_body(rejection: BytesRejection) -> ApiError {
    warn!("Unreadable request body: {}", rejection.body_text());
    body_error(&rejection.body_text())
}

fn body_error(message: &str) -> ApiError {
    ApiError::Validation(vec![FieldError::new(BODY, message)])
}
