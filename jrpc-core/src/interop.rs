//! serde integration
//!
//! [`Value`] implements `Serialize` and `Deserialize`, and converts to and
//! from `serde_json::Value`. This is how typed Rust structs get in and out
//! of envelopes:
//!
//! ```rust
//! use jrpc_core::{interop, Value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! let value = interop::to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(value.to_string(), r#"{ "x" : 1, "y" : 2 }"#);
//!
//! let point: Point = interop::from_value(&value).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! Mapping rules for the kinds JSON lacks: a `DateTime` becomes its RFC 3339
//! string, `Binary` becomes an array of byte numbers, unsigned integers
//! above `i64::MAX` become floats, and non-finite floats become `null` in
//! `serde_json::Value`.

use crate::error::{Error, Result};
use crate::value::{Map, Value};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(text) => serializer.serialize_str(text.as_str()),
            Value::DateTime(date) => serializer.serialize_str(&Value::datetime_string(date)),
            Value::Binary(bytes) => serializer.serialize_bytes(bytes),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> std::result::Result<Value, E> {
        Ok(match i64::try_from(u) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Float(u as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::from(s))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::from(s))
    }

    fn visit_bytes<E: de::Error>(self, bytes: &[u8]) -> std::result::Result<Value, E> {
        Ok(Value::Binary(bytes.to_vec()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Value, A::Error> {
        let mut map = Map::new();
        while let Some((k, v)) = access.next_entry::<String, Value>()? {
            map.insert(k, v);
        }
        Ok(Value::Object(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => items.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(map) => map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(text) => serde_json::Value::String(text.as_str().to_string()),
            Value::DateTime(date) => serde_json::Value::String(Value::datetime_string(date)),
            Value::Binary(bytes) => serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        serde_json::Value::from(&value)
    }
}

/// Convert any serializable type into a [`Value`]
pub fn to_value<T: serde::Serialize + ?Sized>(data: &T) -> Result<Value> {
    serde_json::to_value(data)
        .map(Value::from)
        .map_err(|e| Error::Conversion(e.to_string()))
}

/// Convert a [`Value`] into any deserializable type
pub fn from_value<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T> {
    serde_json::from_value(serde_json::Value::from(value)).map_err(|e| Error::Conversion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcFault;
    use crate::parser::parse;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn test_from_serde_json_keeps_order() {
        let value = Value::from(json!({"z": 1, "a": [true, null], "m": 2.5}));
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(value.get("m"), Some(&Value::Float(2.5)));
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let value = Value::from(json!(u64::MAX));
        assert_eq!(value, Value::Float(u64::MAX as f64));
    }

    #[test]
    fn test_to_serde_json_extension_kinds() {
        let date = DateTime::parse_from_rfc3339("2024-05-06T07:08:09+00:00").unwrap();
        let value = Value::Array(vec![Value::DateTime(date), Value::Binary(vec![1, 255])]);
        assert_eq!(
            serde_json::Value::from(&value),
            json!(["2024-05-06T07:08:09+00:00", [1, 255]])
        );
        assert_eq!(serde_json::Value::from(Value::Float(f64::NAN)), json!(null));
    }

    #[test]
    fn test_serde_roundtrip_through_serde_json() {
        let value = parse(r#"{"id": 3, "tags": ["a", "b"], "ratio": 0.25}"#).unwrap();
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"id":3,"tags":["a","b"],"ratio":0.25}"#);
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_typed_conversion_errors() {
        let result: Result<Vec<i64>> = from_value(&Value::from("nope"));
        assert!(matches!(result, Err(Error::Conversion(_))));
    }

    #[test]
    fn test_fault_serde_shape() {
        let fault = RpcFault::new(500, "boom").with_detail(Value::Int(7));
        let value = to_value(&fault).unwrap();
        assert_eq!(
            value.to_string(),
            r#"{ "name" : "JSONRPCError", "code" : 500, "message" : "boom", "error" : 7 }"#
        );
        let back: RpcFault = from_value(&value).unwrap();
        assert_eq!(back, fault);
    }
}
