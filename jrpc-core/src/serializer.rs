//! JSON text renderer
//!
//! Turns a [`Value`] tree into JSON text in one of two layouts:
//!
//! - **Compact**: a single line with a space after `[`/`{`, before `]`/`}`,
//!   after each `,` and around each `:`. For example
//!   `{ "a" : [ 1, 2 ], "b" : null }`.
//! - **Indented**: the same tokens, but an element is moved to its own line
//!   when its rendering (or the rendering of the sibling before it) is
//!   longer than [`INLINE_THRESHOLD`] bytes. This "mostly compact" layout is
//!   what existing consumers of this format expect byte for byte.
//!
//! Only `"` and `\` are escaped inside strings. Floats are printed with 20
//! significant digits, the way C's `%.20g` prints them.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{serializer, Value};
//!
//! let value: Value = vec![("a", Value::from(1)), ("b", Value::Null)]
//!     .into_iter()
//!     .collect();
//! assert_eq!(serializer::to_string(&value).unwrap(), r#"{ "a" : 1, "b" : null }"#);
//! ```

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::value::Value;

/// Byte length above which an element goes on its own line in indented mode
pub const INLINE_THRESHOLD: usize = 20;

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Single line
    Compact,
    /// Multi-line; the value is the indent of the enclosing container
    Indented(usize),
}

impl Format {
    /// Layout used for the children of a container rendered with `self`
    fn child(self) -> Self {
        match self {
            Format::Compact => Format::Compact,
            Format::Indented(indent) => Format::Indented(indent + 2),
        }
    }
}

/// Compact UTF-8 rendering
pub fn to_string(value: &Value) -> Result<String> {
    to_string_with(value, Format::Compact, Encoding::Utf8)
}

/// Indented UTF-8 rendering starting at indent 0
pub fn to_string_formatted(value: &Value) -> Result<String> {
    to_string_with(value, Format::Indented(0), Encoding::Utf8)
}

/// Render `value` with an explicit layout and target encoding
///
/// The target encoding decides which characters are representable and how
/// long an element is for the line-break heuristic.
pub fn to_string_with(value: &Value, format: Format, encoding: Encoding) -> Result<String> {
    let mut out = String::new();
    write_value(&mut out, value, format, encoding)?;
    Ok(out)
}

/// Append the rendering of `value` to `out`
///
/// On error `out` may hold a partial rendering.
pub fn write_value(out: &mut String, value: &Value, format: Format, encoding: Encoding) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Str(text) => write_string(out, text.as_str(), encoding)?,
        Value::DateTime(date) => write_string(out, &Value::datetime_string(date), encoding)?,
        Value::Array(items) => {
            out.push_str("[ ");
            write_elements(out, items.iter().map(|v| (None, v)), format, encoding)?;
            out.push_str(" ]");
        }
        Value::Object(map) => {
            out.push_str("{ ");
            write_elements(
                out,
                map.iter().map(|(k, v)| (Some(k.as_str()), v)),
                format,
                encoding,
            )?;
            out.push_str(" }");
        }
        Value::Binary(_) => {
            return Err(Error::Serialization {
                type_name: value.type_name().to_string(),
            })
        }
    }
    Ok(())
}

fn write_elements<'v, I>(out: &mut String, elements: I, format: Format, encoding: Encoding) -> Result<()>
where
    I: ExactSizeIterator<Item = (Option<&'v str>, &'v Value)>,
{
    let count = elements.len();
    let mut scratch = String::new();

    for (n, (key, value)) in elements.enumerate() {
        // the previous sibling's width counts too
        let previous_wide = encoding.encoded_len(&scratch) > INLINE_THRESHOLD;
        scratch.clear();
        write_value(&mut scratch, value, format.child(), encoding)?;

        if let Format::Indented(indent) = format {
            if previous_wide || encoding.encoded_len(&scratch) > INLINE_THRESHOLD {
                out.push('\n');
                out.extend(std::iter::repeat(' ').take(indent + 2));
            }
        }

        if let Some(key) = key {
            write_string(out, key, encoding)?;
            out.push_str(" : ");
        }
        out.push_str(&scratch);

        if n + 1 < count {
            out.push_str(", ");
        }
    }
    Ok(())
}

pub(crate) fn write_string(out: &mut String, text: &str, encoding: Encoding) -> Result<()> {
    encoding.check(text)?;
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Ok(())
}

/// `%.20g`: 20 significant digits, trailing zeros dropped, exponent form
/// below 1e-4 or at 1e20 and above
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return if f.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:.19e}", f);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if !(-4..20).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_fraction_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (19 - exponent) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, f)).to_string()
    }
}

fn strip_fraction_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
