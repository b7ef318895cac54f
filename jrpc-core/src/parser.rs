//! Recursive-descent JSON parser
//!
//! The parser reads one JSON value from an in-memory buffer and returns the
//! corresponding [`Value`] tree. It is a pure function of its input and keeps
//! no state between calls.
//!
//! # Dialect
//!
//! The accepted language is the JSON subset this system has always spoken,
//! including its tolerances:
//!
//! - Numbers have no exponent part. A leading `.` reads as `0.`; anything
//!   with a `.` is a float, everything else an integer.
//! - An escape other than the standard ones is kept literally, backslash
//!   included. A `\u` not followed by four hex digits is kept as `\u`.
//! - Raw newlines inside strings are data (and still count as lines).
//! - Duplicate object keys: the last value wins, the first position stays.
//! - Empty (or all-whitespace) input yields [`Value::Null`].
//!
//! Every error reports the 1-based line the cursor had reached.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{parse, Value};
//!
//! let value = parse(r#"{"a": [1, 2.5, "x"], "b": null}"#).unwrap();
//! let items = value.get("a").and_then(Value::as_array).unwrap();
//! assert_eq!(items[0], Value::Int(1));
//! assert_eq!(items[1], Value::Float(2.5));
//! ```

use crate::cursor::ParseCursor;
use crate::encoding::Encoding;
use crate::error::{ParseError, Result};
use crate::value::{Map, Text, Value};
use std::num::IntErrorKind;

/// Nesting limit for arrays and objects
pub const MAX_DEPTH: usize = 512;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parse a UTF-8 JSON document
pub fn parse(text: &str) -> Result<Value> {
    parse_with_encoding(text, Encoding::Utf8)
}

/// Parse a JSON document whose strings belong to `encoding`
///
/// `text` has already been decoded; `encoding` is attached to every string
/// in the result, and `\u` escapes must name characters it can represent.
pub fn parse_with_encoding(text: &str, encoding: Encoding) -> Result<Value> {
    let mut parser = Parser {
        cursor: ParseCursor::new(text),
        encoding,
        depth: 0,
    };
    Ok(parser.parse_document()?)
}

struct Parser<'a> {
    cursor: ParseCursor<'a>,
    encoding: Encoding,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.cursor.line())
    }

    fn parse_document(&mut self) -> ParseResult<Value> {
        let value = match self.parse_value()? {
            Some(value) => value,
            None => return Ok(Value::Null),
        };

        self.cursor.skip_whitespace();
        if !self.cursor.at_end() {
            let line = self.cursor.line();
            return Err(self.error(format!("extra text after JSON data on line {}", line)));
        }
        Ok(value)
    }

    /// `None` means the input ended before a value started
    fn parse_value(&mut self) -> ParseResult<Option<Value>> {
        self.cursor.skip_whitespace();
        let first = match self.cursor.peek() {
            Some(b) => b,
            None => return Ok(None),
        };

        let value = match first {
            b'{' => self.nested(Self::parse_object)?,
            b'[' => self.nested(Self::parse_array)?,
            b'"' => Value::Str(Text::with_encoding(self.parse_string()?, self.encoding)),
            b'0'..=b'9' | b'.' | b'-' => self.parse_number()?,
            b't' => self.parse_literal("rue", Value::Bool(true))?,
            b'f' => self.parse_literal("alse", Value::Bool(false))?,
            b'n' => self.parse_literal("ull", Value::Null)?,
            _ => return Err(self.invalid_value()),
        };
        Ok(Some(value))
    }

    fn invalid_value(&self) -> ParseError {
        let line = self.cursor.line();
        self.error(format!("invalid input at line {}; unable to parse JSON value", line))
    }

    fn nested(&mut self, f: fn(&mut Self) -> ParseResult<Value>) -> ParseResult<Value> {
        if self.depth >= MAX_DEPTH {
            let line = self.cursor.line();
            return Err(self.error(format!(
                "JSON data nested more than {} levels deep at line {}",
                MAX_DEPTH, line
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Cursor is on the opening `"`
    fn parse_string(&mut self) -> ParseResult<String> {
        self.cursor.advance();
        let mut buf: Vec<u8> = Vec::new();

        while let Some(b) = self.cursor.peek() {
            match b {
                b'"' => {
                    self.cursor.advance();
                    return String::from_utf8(buf).map_err(|_| {
                        let line = self.cursor.line();
                        self.error(format!("invalid UTF-8 in JSON string at line {}", line))
                    });
                }
                b'\\' => {
                    self.cursor.advance();
                    let escaped = match self.cursor.peek() {
                        Some(e) => e,
                        None => break,
                    };
                    match escaped {
                        b'"' | b'/' | b'\\' => buf.push(escaped),
                        b'b' => buf.push(0x08),
                        b'f' => buf.push(0x0c),
                        b'n' => buf.push(b'\n'),
                        b'r' => buf.push(b'\r'),
                        b't' => buf.push(b'\t'),
                        b'u' => {
                            self.cursor.advance();
                            match self.parse_unicode_escape()? {
                                Some(c) => {
                                    let mut tmp = [0u8; 4];
                                    buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
                                }
                                // not an escape after all; keep it as text and
                                // rescan whatever follows
                                None => buf.extend_from_slice(b"\\u"),
                            }
                            continue;
                        }
                        other => {
                            buf.push(b'\\');
                            buf.push(other);
                        }
                    }
                    self.cursor.advance();
                }
                b'\n' => {
                    self.cursor.newline();
                    buf.push(b);
                    self.cursor.advance();
                }
                _ => {
                    buf.push(b);
                    self.cursor.advance();
                }
            }
        }

        let line = self.cursor.line();
        Err(self.error(format!(
            "premature end of input at line {} while parsing JSON string",
            line
        )))
    }

    fn hex4(&self, offset: usize) -> Option<u32> {
        let mut code = 0u32;
        for i in 0..4 {
            let digit = (self.cursor.peek_at(offset + i)? as char).to_digit(16)?;
            code = (code << 4) | digit;
        }
        Some(code)
    }

    /// Cursor is just past `\u`; consumes the digits only when they are valid
    fn parse_unicode_escape(&mut self) -> ParseResult<Option<char>> {
        let code = match self.hex4(0) {
            Some(code) => code,
            None => return Ok(None),
        };
        self.cursor.advance_by(4);

        let code = if (0xD800..0xDC00).contains(&code) {
            // a high surrogate must be followed by an escaped low surrogate
            let low = match (self.cursor.peek(), self.cursor.peek_at(1)) {
                (Some(b'\\'), Some(b'u')) => self.hex4(2).filter(|l| (0xDC00..0xE000).contains(l)),
                _ => None,
            };
            match low {
                Some(low) => {
                    self.cursor.advance_by(6);
                    0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
                }
                None => code,
            }
        } else {
            code
        };

        let line = self.cursor.line();
        let c = char::from_u32(code).ok_or_else(|| {
            self.error(format!(
                "invalid unicode code point U+{:04X} at line {} in JSON string",
                code, line
            ))
        })?;
        if !self.encoding.can_encode(c) {
            return Err(self.error(format!(
                "unicode character U+{:04X} at line {} cannot be represented in {}",
                code,
                line,
                self.encoding.name()
            )));
        }
        Ok(Some(c))
    }

    /// Cursor is on the opening `{`
    fn parse_object(&mut self) -> ParseResult<Value> {
        self.cursor.advance();
        let mut map = Map::new();

        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(b'}') {
            self.cursor.advance();
            return Ok(Value::Object(map));
        }

        loop {
            let line = self.cursor.line();
            match self.cursor.peek() {
                Some(b'"') => {}
                None => {
                    return Err(self.error(format!(
                        "premature end of input at line {} while parsing JSON object",
                        line
                    )))
                }
                Some(_) if map.is_empty() => {
                    return Err(self.error(format!(
                        "unexpected text encountered at line {} while parsing JSON object (expecting '\"' or '}}')",
                        line
                    )))
                }
                Some(_) => {
                    return Err(self.error(format!(
                        "unexpected text encountered at line {} while parsing JSON object (expecting '\"' for key string)",
                        line
                    )))
                }
            }

            let key = self.parse_string()?;

            self.cursor.skip_whitespace();
            if self.cursor.peek() != Some(b':') {
                let line = self.cursor.line();
                return Err(self.error(format!(
                    "unexpected text encountered at line {} while parsing JSON object (expecting ':')",
                    line
                )));
            }
            self.cursor.advance();

            let value = match self.parse_value()? {
                Some(value) => value,
                None => {
                    let line = self.cursor.line();
                    return Err(self.error(format!(
                        "premature end of input at line {} while parsing JSON object (expecting JSON value for key '{}')",
                        line, key
                    )));
                }
            };
            map.insert(key, value);

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(b'}') => {
                    self.cursor.advance();
                    return Ok(Value::Object(map));
                }
                Some(b',') => {
                    self.cursor.advance();
                    self.cursor.skip_whitespace();
                }
                _ => {
                    let line = self.cursor.line();
                    return Err(self.error(format!(
                        "unexpected text encountered at line {} while parsing JSON object (expecting ',' or '}}')",
                        line
                    )));
                }
            }
        }
    }

    /// Cursor is on the opening `[`
    fn parse_array(&mut self) -> ParseResult<Value> {
        self.cursor.advance();
        let mut items = Vec::new();

        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(b']') {
            self.cursor.advance();
            return Ok(Value::Array(items));
        }

        loop {
            let value = match self.parse_value()? {
                Some(value) => value,
                None => {
                    let line = self.cursor.line();
                    return Err(self.error(format!(
                        "premature end of input at line {} while parsing JSON array (expecting JSON value)",
                        line
                    )));
                }
            };
            items.push(value);

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(b']') => {
                    self.cursor.advance();
                    return Ok(Value::Array(items));
                }
                Some(b',') => self.cursor.advance(),
                _ => {
                    let line = self.cursor.line();
                    return Err(self.error(format!(
                        "unexpected text encountered at line {} while parsing JSON array (expecting ',' or ']')",
                        line
                    )));
                }
            }
        }
    }

    /// Cursor is on a digit, `.` or `-`
    fn parse_number(&mut self) -> ParseResult<Value> {
        let mut text = String::new();
        let mut has_dot = false;

        match self.cursor.peek() {
            Some(b'.') => {
                text.push_str("0.");
                has_dot = true;
            }
            Some(b) => text.push(b as char),
            None => return Err(self.invalid_value()),
        }
        self.cursor.advance();

        while let Some(b) = self.cursor.peek() {
            match b {
                b'.' => {
                    if has_dot {
                        let line = self.cursor.line();
                        return Err(self.error(format!(
                            "unexpected '.' in floating point number at line {} (too many '.' characters)",
                            line
                        )));
                    }
                    has_dot = true;
                }
                // the next token starts here; leave it for the caller
                b',' | b'}' | b']' => break,
                b' ' | b'\t' | b'\r' => {
                    self.cursor.advance();
                    break;
                }
                b'\n' => {
                    self.cursor.advance();
                    self.cursor.newline();
                    break;
                }
                b'0'..=b'9' => {}
                _ => {
                    let line = self.cursor.line();
                    return Err(self.error(format!("unexpected character in number at line {}", line)));
                }
            }
            text.push(b as char);
            self.cursor.advance();
        }

        let line = self.cursor.line();
        if has_dot {
            return text.parse::<f64>().map(Value::Float).map_err(|_| {
                self.error(format!("invalid number '{}' at line {}", text, line))
            });
        }
        match text.parse::<i64>() {
            Ok(i) => Ok(Value::Int(i)),
            // out-of-range integers saturate
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(Value::Int(i64::MAX)),
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(Value::Int(i64::MIN)),
            Err(_) => Err(self.error(format!("invalid number '{}' at line {}", text, line))),
        }
    }

    /// Cursor is on the first letter; `rest` is the remainder of the word
    fn parse_literal(&mut self, rest: &str, value: Value) -> ParseResult<Value> {
        self.cursor.advance();
        for expected in rest.bytes() {
            if self.cursor.peek() != Some(expected) {
                return Err(self.invalid_value());
            }
            self.cursor.advance();
        }

        match self.cursor.peek() {
            None | Some(b',') | Some(b']') | Some(b'}') => Ok(value),
            Some(b' ') | Some(b'\t') | Some(b'\r') => {
                self.cursor.advance();
                Ok(value)
            }
            Some(b'\n') => {
                self.cursor.advance();
                self.cursor.newline();
                Ok(value)
            }
            Some(_) => Err(self.invalid_value()),
        }
    }
}
