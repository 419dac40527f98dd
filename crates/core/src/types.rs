use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// A single row as exchanged with the remote store: field name to value.
pub type Record = serde_json::Map<String, Value>;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Server-assigned record identifier. The backend uses numeric keys, but
/// the store contract also admits string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// `false` for `0` and the empty string, which the UI uses for rows
    /// that were never persisted.
    pub fn is_defined(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Read the `id` field of a record.
    pub fn from_record(record: &Record) -> Option<Self> {
        match record.get("id")? {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }

    /// Whether `value` (typically a record's `id` field) denotes this id.
    /// A numeric id matches its decimal string form and vice versa.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Number(n), Value::Number(v)) => v.as_i64() == Some(*n),
            (Self::Number(n), Value::String(s)) => s.parse::<i64>().ok() == Some(*n),
            (Self::Text(t), Value::String(s)) => t == s,
            (Self::Text(t), Value::Number(v)) => v.to_string() == *t,
            _ => false,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(id.to_string()),
        }
    }
}

/// Convert an arbitrary JSON value into a [`Record`].
pub fn record_from_value(value: Value) -> Result<Record, CoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
