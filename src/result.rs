//! Read-only views over gateway responses.
//!
//! The gateway answers every action with a loosely-structured JSON document whose keys are
//! camelCase (and occasionally PascalCase). A [`ResultView`] exposes those fields under their
//! snake_case names:
//!
//! ```rust
//! # use firstpay_rust::result::{ResultView, ResultOptions};
//! # use std::sync::Arc;
//! let view = ResultView::from_body(
//!     r#"{"isSuccess": true, "data": {"refNumber": "1234", "authCode": "A1"}}"#,
//!     Arc::new(ResultOptions::default()),
//! );
//!
//! assert!(view.is_success());
//! let data = view.get_object("data")?;
//! assert_eq!(data.get_string("ref_number")?, "1234");
//! # Ok::<(), firstpay_rust::result::FieldError>(())
//! ```
//!
//! String values that look like dates or times are returned as [`Temporal`] values (see
//! [`crate::temporal`]).

use crate::{
    common::{ERROR_MESSAGES_FIELD, IS_SUCCESS_FIELD},
    naming::{to_pascal, to_snake, to_upper_camel},
    temporal::{self, Temporal},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde_json::{json, Map, Number, Value};
use std::{fmt, sync::Arc};

/// Error returned when reading a field of a [`ResultView`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The response has no field with the requested name.
    #[error("result has no field `{0}`")]
    UnknownField(String),
    /// The field exists but does not hold the requested kind of value.
    #[error("field `{field}` is not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    /// Results cannot be modified.
    #[error("result field `{0}` is read-only")]
    ReadOnly(String),
}

/// Options shared by a result view and every view nested in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultOptions {
    /// Timezone in which the gateway reports naive transaction timestamps.
    pub gateway_timezone: Option<Tz>,
}

/// Value of a single field read from a [`ResultView`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// A string recognized as a date, time or datetime.
    Temporal(Temporal),
    /// A nested JSON object.
    Object(ResultView),
    /// A JSON array. Object elements are wrapped into views, everything else is passed through
    /// without date recognition.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Converts a list element, wrapping objects but leaving strings untouched.
    fn from_element(value: &Value, options: &Arc<ResultOptions>) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| FieldValue::from_element(item, options))
                    .collect(),
            ),
            Value::Object(map) => FieldValue::Object(ResultView::new(map.clone(), options.clone())),
        }
    }

    /// Returns `true` if the value is JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ResultView> {
        match self {
            FieldValue::Object(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self {
            FieldValue::Temporal(t) => Some(t),
            _ => None,
        }
    }
}

/// Read-only view over a JSON object returned by the gateway.
///
/// Field names are given in snake_case and resolved against the camelCase key first, then the
/// PascalCase key. Nested objects share the [`ResultOptions`] of their parent.
#[derive(Clone, PartialEq)]
pub struct ResultView {
    data: Map<String, Value>,
    options: Arc<ResultOptions>,
    raw_body: Option<Arc<str>>,
}

impl ResultView {
    /// Wraps an already decoded JSON object.
    pub fn new(data: Map<String, Value>, options: Arc<ResultOptions>) -> Self {
        Self {
            data,
            options,
            raw_body: None,
        }
    }

    /// Decodes a raw response body.
    ///
    /// A body that is not a JSON object is replaced with a failure document carrying the raw
    /// text as its single error message, so that it flows through the usual success check.
    pub fn from_body(body: &str, options: Arc<ResultOptions>) -> Self {
        let data = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::debug!("Gateway response is not a JSON object");
                let mut map = Map::new();
                map.insert(IS_SUCCESS_FIELD.to_string(), Value::Bool(false));
                map.insert(ERROR_MESSAGES_FIELD.to_string(), json!([body]));
                map
            }
        };

        Self {
            data,
            options,
            raw_body: Some(Arc::from(body)),
        }
    }

    /// The raw response text this view was decoded from.
    ///
    /// Only available on the root view of a response.
    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }

    /// The underlying JSON object, with the key names the gateway used.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn options(&self) -> &ResultOptions {
        &self.options
    }

    /// Snake_case names of all the fields in this object.
    pub fn field_names(&self) -> Vec<String> {
        self.data.keys().map(|k| to_snake(k)).collect()
    }

    /// Returns `true` if `name` resolves to a field of this object.
    pub fn has_field(&self, name: &str) -> bool {
        self.resolve_key(name).is_some()
    }

    /// Value of the `is_success` flag. A missing or non-boolean flag reads as `false`.
    pub fn is_success(&self) -> bool {
        self.get_bool("is_success").unwrap_or(false)
    }

    fn resolve_key(&self, name: &str) -> Option<String> {
        let camel = to_upper_camel(name);
        if self.data.contains_key(&camel) {
            return Some(camel);
        }

        let pascal = to_pascal(&camel);
        self.data.contains_key(&pascal).then_some(pascal)
    }

    /// Reads the field `name`, converting it as described in the [module docs](self).
    pub fn get_field(&self, name: &str) -> Result<FieldValue, FieldError> {
        let key = self
            .resolve_key(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let value = &self.data[key.as_str()];

        if let Some(t) =
            temporal::extract_field(&to_snake(&key), value, self.options.gateway_timezone.as_ref())
        {
            return Ok(FieldValue::Temporal(t));
        }

        Ok(match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Object(map) => {
                FieldValue::Object(ResultView::new(map.clone(), self.options.clone()))
            }
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| FieldValue::from_element(item, &self.options))
                    .collect(),
            ),
        })
    }

    /// Always fails with [`FieldError::ReadOnly`]: results cannot be modified.
    pub fn set_field(&mut self, name: &str, _value: impl Into<Value>) -> Result<(), FieldError> {
        Err(FieldError::ReadOnly(name.to_string()))
    }

    pub fn get_string(&self, name: &str) -> Result<String, FieldError> {
        match self.get_field(name)? {
            FieldValue::String(s) => Ok(s),
            _ => Err(mismatch(name, "a string")),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, FieldError> {
        match self.get_field(name)? {
            FieldValue::Bool(b) => Ok(b),
            _ => Err(mismatch(name, "a boolean")),
        }
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, FieldError> {
        match self.get_field(name)? {
            FieldValue::Number(n) => n.as_i64().ok_or_else(|| mismatch(name, "an integer")),
            _ => Err(mismatch(name, "an integer")),
        }
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, FieldError> {
        match self.get_field(name)? {
            FieldValue::Number(n) => n.as_f64().ok_or_else(|| mismatch(name, "a number")),
            _ => Err(mismatch(name, "a number")),
        }
    }

    /// Reads any recognized date, time or datetime value.
    pub fn get_temporal(&self, name: &str) -> Result<Temporal, FieldError> {
        match self.get_field(name)? {
            FieldValue::Temporal(t) => Ok(t),
            _ => Err(mismatch(name, "a date or time")),
        }
    }

    /// Reads the date part of a date or datetime field.
    pub fn get_date(&self, name: &str) -> Result<NaiveDate, FieldError> {
        self.get_temporal(name)?
            .date()
            .ok_or_else(|| mismatch(name, "a date"))
    }

    /// Reads the time part of a time or datetime field.
    pub fn get_time(&self, name: &str) -> Result<NaiveTime, FieldError> {
        self.get_temporal(name)?
            .time()
            .ok_or_else(|| mismatch(name, "a time"))
    }

    /// Reads a timestamp that has been normalized to UTC.
    ///
    /// Only timezone-aware fields read with a configured gateway timezone are normalized, see
    /// [`temporal::TZ_AWARE_FIELDS`].
    pub fn get_datetime(&self, name: &str) -> Result<DateTime<Utc>, FieldError> {
        match self.get_temporal(name)? {
            Temporal::Utc(dt) => Ok(dt),
            _ => Err(mismatch(name, "a UTC timestamp")),
        }
    }

    pub fn get_object(&self, name: &str) -> Result<ResultView, FieldError> {
        match self.get_field(name)? {
            FieldValue::Object(view) => Ok(view),
            _ => Err(mismatch(name, "an object")),
        }
    }

    pub fn get_list(&self, name: &str) -> Result<Vec<FieldValue>, FieldError> {
        match self.get_field(name)? {
            FieldValue::List(items) => Ok(items),
            _ => Err(mismatch(name, "a list")),
        }
    }

    /// Copy of the whole tree with snake_case keys and dates rendered as ISO-8601 strings.
    pub fn to_snake_case_json(&self) -> Value {
        snake_case_object(&self.data, self.options.gateway_timezone.as_ref())
    }
}

fn mismatch(field: &str, expected: &'static str) -> FieldError {
    FieldError::TypeMismatch {
        field: field.to_string(),
        expected,
    }
}

fn snake_case_object(map: &Map<String, Value>, gateway_tz: Option<&Tz>) -> Value {
    let converted = map
        .iter()
        .map(|(key, value)| {
            let key = to_snake(key);
            let value = snake_case_value(&key, value, gateway_tz);
            (key, value)
        })
        .collect();

    Value::Object(converted)
}

/// Converts `value`, held by the snake_case field `key`, at any depth of the tree.
///
/// Elements of arrays, including nested arrays, are converted as if held by `key` directly.
fn snake_case_value(key: &str, value: &Value, gateway_tz: Option<&Tz>) -> Value {
    match value {
        Value::Object(inner) => snake_case_object(inner, gateway_tz),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| snake_case_value(key, item, gateway_tz))
                .collect(),
        ),
        leaf => temporal::extract_field(key, leaf, gateway_tz)
            .map_or_else(|| leaf.clone(), |t| Value::String(t.to_iso8601())),
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered =
            serde_json::to_string_pretty(&self.to_snake_case_json()).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl fmt::Debug for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultView({})", self.to_snake_case_json())
    }
}
