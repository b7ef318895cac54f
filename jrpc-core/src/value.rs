//! The generic value model
//!
//! [`Value`] is the in-memory tree that the parser produces and the
//! serializer consumes. Containers own their children outright, so a tree is
//! always acyclic and is dropped recursively with its root.
//!
//! Objects are [`IndexMap`]s: iteration follows first-insertion order, and
//! inserting an existing key replaces the value while the entry keeps its
//! original slot.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::Value;
//!
//! let value: Value = vec![("a", Value::from(1)), ("b", Value::from("two"))]
//!     .into_iter()
//!     .collect();
//!
//! assert_eq!(value.get("a").and_then(Value::as_i64), Some(1));
//! assert_eq!(value.get("b").and_then(Value::as_str), Some("two"));
//! ```

use crate::encoding::Encoding;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use indexmap::IndexMap;
use std::fmt;

/// Ordered string-keyed mapping used for JSON objects
pub type Map = IndexMap<String, Value>;

/// A JSON-compatible value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`; also stands in for "no value"
    Null,
    /// `true` / `false`
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// Double precision float
    Float(f64),
    /// String tagged with its text encoding
    Str(Text),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Ordered mapping with unique keys
    Object(Map),
    /// Timestamp, serialized as a string
    DateTime(DateTime<FixedOffset>),
    /// Raw bytes; has no JSON representation
    Binary(Vec<u8>),
}

/// A string together with the encoding it belongs to
///
/// Two `Text`s are equal when their characters are; the encoding tag does
/// not take part in comparison or hashing.
#[derive(Debug, Clone, Default)]
pub struct Text {
    text: String,
    encoding: Encoding,
}

impl Text {
    /// A UTF-8 string
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_encoding(text, Encoding::Utf8)
    }

    /// A string tagged with `encoding`
    pub fn with_encoding(text: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            text: text.into(),
            encoding,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Text {}

impl std::hash::Hash for Text {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Value {
    /// Name of the value's kind, as used in serialization errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "list",
            Value::Object(_) => "hash",
            Value::DateTime(_) => "date",
            Value::Binary(_) => "binary",
        }
    }

    /// A string value in a specific encoding
    pub fn string_in(text: impl Into<String>, encoding: Encoding) -> Self {
        Value::Str(Text::with_encoding(text, encoding))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float value; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Value::Str(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Member lookup on an object; `None` for any other kind
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Canonical string form of a timestamp (RFC 3339)
    pub fn datetime_string(date: &DateTime<FixedOffset>) -> String {
        date.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Text::new(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Text::new(s))
    }
}

impl From<Text> for Value {
    fn from(t: Text) -> Self {
        Value::Str(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(date: DateTime<FixedOffset>) -> Self {
        Value::DateTime(date)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k.into(), v);
        }
        Value::Object(map)
    }
}

impl fmt::Display for Value {
    /// Compact JSON text; kinds without a JSON form print as `<type>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::serializer::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "<{}>", self.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(7).as_i64(), Some(7));
        assert_eq!(Value::from(7).as_f64(), Some(7.0));
        assert_eq!(Value::from(1.5).as_i64(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_object_overwrite_keeps_slot() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::from(1));
        map.insert("b".to_string(), Value::from(2));
        map.insert("a".to_string(), Value::from(3));

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map["a"], Value::from(3));
    }

    #[test]
    fn test_text_encoding_tag() {
        let v = Value::string_in("abc", Encoding::Latin1);
        assert_eq!(v.as_text().map(Text::encoding), Some(Encoding::Latin1));
        assert_eq!(v, Value::from("abc"));
        assert_ne!(v, Value::from("abd"));
    }

    #[test]
    fn test_text_hash_ignores_encoding() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Text::with_encoding("key", Encoding::Latin1));
        assert!(set.contains(&Text::new("key")));
        assert!(!set.insert(Text::with_encoding("key", Encoding::Ascii)));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Binary(vec![1]).type_name(), "binary");
        assert_eq!(Value::Array(vec![]).type_name(), "list");
        assert_eq!(Value::Object(Map::new()).type_name(), "hash");
    }

    #[test]
    fn test_display_is_compact_json() {
        let v: Value = vec![Value::from(1), Value::from("a")].into_iter().collect();
        assert_eq!(v.to_string(), "[ 1, \"a\" ]");
        assert_eq!(Value::Binary(vec![0]).to_string(), "<binary>");
    }

    #[test]
    fn test_datetime_string() {
        let date = DateTime::parse_from_rfc3339("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(Value::datetime_string(&date), "2024-03-01T12:30:00+02:00");
    }
}
