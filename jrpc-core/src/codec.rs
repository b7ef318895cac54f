//! Encode and decode JSON text in a chosen character encoding
//!
//! These are the entry points applications normally use. They wrap the
//! [`serializer`](crate::serializer) and [`parser`](crate::parser) and add
//! the encoding boundary: output can be produced as UTF-8, US-ASCII or
//! ISO-8859-1 bytes, and input bytes in any of those are decoded before
//! parsing.
//!
//! UTF-8 is the default everywhere; JSON is defined over UTF-8 here.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{codec, Encoding, Value};
//!
//! let value = codec::from_json_str(r#"{"name": "café"}"#).unwrap();
//!
//! let bytes = codec::to_json_bytes(&value, Encoding::Latin1).unwrap();
//! assert_eq!(bytes.last(), Some(&b'}'));
//!
//! let back = codec::from_json_bytes(&bytes, Encoding::Latin1).unwrap();
//! assert_eq!(back.get("name").and_then(Value::as_str), Some("caf\u{e9}"));
//! ```

use crate::encoding::Encoding;
use crate::error::Result;
use crate::parser;
use crate::serializer::{self, Format};
use crate::value::Value;

/// Compact JSON text for `value`, checked against `encoding`
///
/// # Errors
///
/// - `Error::Serialization` if the tree holds a value with no JSON form
/// - `Error::Encoding` if a string holds a character `encoding` lacks
pub fn to_json_string(value: &Value, encoding: Encoding) -> Result<String> {
    serializer::to_string_with(value, Format::Compact, encoding)
}

/// Formatted JSON text for `value`, checked against `encoding`
pub fn to_json_string_formatted(value: &Value, encoding: Encoding) -> Result<String> {
    serializer::to_string_with(value, Format::Indented(0), encoding)
}

/// Compact JSON encoded into bytes of `encoding`
pub fn to_json_bytes(value: &Value, encoding: Encoding) -> Result<Vec<u8>> {
    encoding.encode(&to_json_string(value, encoding)?)
}

/// Formatted JSON encoded into bytes of `encoding`
pub fn to_json_bytes_formatted(value: &Value, encoding: Encoding) -> Result<Vec<u8>> {
    encoding.encode(&to_json_string_formatted(value, encoding)?)
}

/// Parse UTF-8 JSON text
pub fn from_json_str(text: &str) -> Result<Value> {
    parser::parse(text)
}

/// Decode `bytes` from `encoding` and parse the result
///
/// Strings in the returned tree are tagged with `encoding`.
pub fn from_json_bytes(bytes: &[u8], encoding: Encoding) -> Result<Value> {
    let text = encoding.decode(bytes)?;
    parser::parse_with_encoding(&text, encoding)
}
