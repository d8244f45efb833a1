//! Tagged value type for the key/value stores

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::shared::errors::StoreError;

/// Value shape stored under a key.
///
/// The variant is decided at write time and persisted with an explicit tag,
/// so reads never have to guess the type back out of a string. Sets are
/// coerced to `Sequence` before storage since the encoding has no set type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoreValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Sequence(Vec<StoreValue>),
    Mapping(BTreeMap<String, StoreValue>),
}

impl StoreValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StoreValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoreValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[StoreValue]> {
        match self {
            StoreValue::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, StoreValue>> {
        match self {
            StoreValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Untagged JSON representation, used to decode typed records.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            StoreValue::Str(s) => serde_json::Value::String(s.clone()),
            StoreValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            StoreValue::Bool(b) => serde_json::Value::Bool(*b),
            StoreValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(StoreValue::to_json_value).collect())
            }
            StoreValue::Mapping(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<serde_json::Value> for StoreValue {
    type Error = StoreError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => Ok(StoreValue::Str(s)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(StoreValue::Number)
                .ok_or_else(|| StoreError::UnsupportedValue(format!("unrepresentable number {n}"))),
            serde_json::Value::Bool(b) => Ok(StoreValue::Bool(b)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(StoreValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(StoreValue::Sequence),
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Ok((k, StoreValue::try_from(v)?)))
                .collect::<Result<BTreeMap<_, _>, StoreError>>()
                .map(StoreValue::Mapping),
            serde_json::Value::Null => {
                Err(StoreError::UnsupportedValue("null has no tagged variant".to_string()))
            }
        }
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::Str(value.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::Str(value)
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        StoreValue::Number(value)
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Number(value as f64)
    }
}

impl From<bool> for StoreValue {
    fn from(value: bool) -> Self {
        StoreValue::Bool(value)
    }
}

impl<T: Into<StoreValue>> From<Vec<T>> for StoreValue {
    fn from(items: Vec<T>) -> Self {
        StoreValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StoreValue>> From<BTreeSet<T>> for StoreValue {
    fn from(items: BTreeSet<T>) -> Self {
        StoreValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StoreValue>> From<BTreeMap<String, T>> for StoreValue {
    fn from(map: BTreeMap<String, T>) -> Self {
        StoreValue::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
