use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, json};

use crate::StoreError;

/// Field values a document can hold. This is the subset of Firestore's value types the
/// episode documents use.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
}

pub type Document = BTreeMap<String, Value>;

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Ordering between values of the same type; `None` across types, for nulls and arrays.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Encodes into the Firestore REST `Value` representation.
    pub fn to_firestore(&self) -> serde_json::Value {
        match self {
            Value::Null => json!({ "nullValue": null }),
            Value::Boolean(value) => json!({ "booleanValue": value }),
            Value::Integer(value) => json!({ "integerValue": value.to_string() }),
            Value::String(value) => json!({ "stringValue": value }),
            Value::Timestamp(value) => json!({
                "timestampValue": value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            }),
            Value::Array(values) if values.is_empty() => json!({ "arrayValue": {} }),
            Value::Array(values) => json!({
                "arrayValue": {
                    "values": values.iter().map(Value::to_firestore).collect::<Vec<_>>()
                }
            }),
        }
    }

    pub fn from_firestore(raw: &serde_json::Value) -> Result<Self, StoreError> {
        let object = raw
            .as_object()
            .ok_or_else(|| StoreError::Decode(format!("expected value object, got {raw}")))?;
        let (kind, inner) = object
            .iter()
            .next()
            .ok_or_else(|| StoreError::Decode("empty value object".to_string()))?;

        match kind.as_str() {
            "nullValue" => Ok(Value::Null),
            "booleanValue" => inner
                .as_bool()
                .map(Value::Boolean)
                .ok_or_else(|| decode_error(kind, inner)),
            "integerValue" => match inner {
                serde_json::Value::String(text) => text
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| decode_error(kind, inner)),
                serde_json::Value::Number(number) => number
                    .as_i64()
                    .map(Value::Integer)
                    .ok_or_else(|| decode_error(kind, inner)),
                _ => Err(decode_error(kind, inner)),
            },
            "stringValue" => inner
                .as_str()
                .map(|text| Value::String(text.to_string()))
                .ok_or_else(|| decode_error(kind, inner)),
            "timestampValue" => inner
                .as_str()
                .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
                .ok_or_else(|| decode_error(kind, inner)),
            "arrayValue" => {
                let values = inner
                    .get("values")
                    .and_then(serde_json::Value::as_array)
                    .map(|values| {
                        values
                            .iter()
                            .map(Value::from_firestore)
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .transpose()?
                    .unwrap_or_default();
                Ok(Value::Array(values))
            }
            other => Err(StoreError::Decode(format!(
                "unsupported Firestore value type '{other}'"
            ))),
        }
    }
}

fn decode_error(kind: &str, inner: &serde_json::Value) -> StoreError {
    StoreError::Decode(format!("invalid {kind}: {inner}"))
}

pub(crate) fn encode_fields(document: &Document) -> serde_json::Value {
    let fields: Map<String, serde_json::Value> = document
        .iter()
        .map(|(name, value)| (name.clone(), value.to_firestore()))
        .collect();
    json!({ "fields": fields })
}

pub(crate) fn decode_fields(raw: Option<&serde_json::Value>) -> Result<Document, StoreError> {
    let Some(raw) = raw else {
        return Ok(Document::new());
    };
    let fields = raw
        .as_object()
        .ok_or_else(|| StoreError::Decode(format!("expected fields object, got {raw}")))?;
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), Value::from_firestore(value)?)))
        .collect()
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
