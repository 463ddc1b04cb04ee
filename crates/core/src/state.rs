//! The application state model.
//!
//! Snapshots arrive as serialized JSON of unknown, dynamic structure. They
//! are ingested into an explicit tagged variant so the codec can match
//! exhaustively instead of branching on runtime types; shapes the model
//! cannot represent are rejected at the boundary rather than falling
//! through silently.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// A snapshot of the target application's observable state.
///
/// Mapping keys live in a `BTreeMap`, so visiting order is lexicographic by
/// construction; the codec's deterministic rendering depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Bool(bool),
    Number(i64),
    Text(String),
    Sequence(Vec<AppState>),
    Mapping(BTreeMap<String, AppState>),
}

impl AppState {
    /// Parse a serialized snapshot as carried in an `application state` or
    /// `set state` payload.
    pub fn parse(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(&value)
    }

    /// Ingest a JSON value, rejecting shapes the model cannot represent.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(flag) => Ok(AppState::Bool(*flag)),
            Value::Number(number) => number
                .as_i64()
                .map(AppState::Number)
                .ok_or_else(|| Error::Unsupported(format!("non-integer number {number}"))),
            Value::String(text) => Ok(AppState::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_value)
                .collect::<Result<Vec<_>>>()
                .map(AppState::Sequence),
            Value::Object(entries) => entries
                .iter()
                .map(|(key, value)| Ok((key.clone(), Self::from_value(value)?)))
                .collect::<Result<BTreeMap<_, _>>>()
                .map(AppState::Mapping),
            Value::Null => Err(Error::Unsupported("null".to_string())),
        }
    }

    /// Convert back into a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            AppState::Bool(flag) => Value::Bool(*flag),
            AppState::Number(number) => Value::Number(Number::from(*number)),
            AppState::Text(text) => Value::String(text.clone()),
            AppState::Sequence(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            AppState::Mapping(entries) => {
                let mut out = Map::new();
                for (key, value) in entries {
                    out.insert(key.clone(), value.to_value());
                }
                Value::Object(out)
            }
        }
    }

    /// Serialize for a `set state` payload.
    pub fn serialize(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_round_trips_through_serialize() {
        let payload = r#"{"a":1,"b":[true,"x"],"c":{"nested":"yes"}}"#;
        let state = AppState::parse(payload).unwrap();
        assert_eq!(AppState::parse(&state.serialize()).unwrap(), state);
    }

    #[test]
    fn mapping_keys_are_sorted_regardless_of_insertion_order() {
        let first = AppState::parse(r#"{"zebra":1,"apple":2}"#).unwrap();
        let second = AppState::parse(r#"{"apple":2,"zebra":1}"#).unwrap();
        assert_eq!(first, second);
        let AppState::Mapping(entries) = &first else {
            panic!("expected mapping");
        };
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, ["apple", "zebra"]);
    }

    #[test]
    fn null_is_rejected() {
        let err = AppState::from_value(&json!({"a": null})).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn fractional_numbers_are_rejected() {
        let err = AppState::from_value(&json!(1.5)).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let err = AppState::parse("{not json").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
