//! JSON-RPC envelope builders
//!
//! Pure functions that assemble request, response and error envelopes as
//! JSON text. Member order is fixed (`version`, `method`, `id`, `params` for
//! requests; `version`, `id`, `result`/`error` for answers) and member values
//! are rendered by the [`serializer`](crate::serializer).
//!
//! Every builder has a compact and a formatted variant. Formatted envelopes
//! put each top-level member on its own line with a 2-space indent and
//! render member values with the serializer's indented layout.
//!
//! Absent optional members behave differently depending on the member:
//!
//! - `version` and `id` are omitted.
//! - `params`, `result` and the generic `error` payload are written as `null`.
//! - The `error` detail inside a JSON-RPC 1.1 error object is omitted.
//!
//! Envelopes are always produced as UTF-8 text.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{envelope, Value};
//!
//! let text = envelope::request(
//!     &Value::from("foo"),
//!     Some(&Value::from(7)),
//!     Some(&Value::from("1.1")),
//!     Some(&Value::Array(vec![Value::from(1), Value::from(2)])),
//! )
//! .unwrap();
//! assert_eq!(text, r#"{ "version" : "1.1", "method" : "foo", "id" : 7, "params" : [ 1, 2 ] }"#);
//! ```

use crate::encoding::Encoding;
use crate::error::{Error, Result, FAULT_NAME};
use crate::serializer::{self, Format};
use crate::value::Value;

/// Smallest code accepted by [`error_1_1`]
pub const MIN_ERROR_CODE: i64 = 100;
/// Largest code accepted by [`error_1_1`]
pub const MAX_ERROR_CODE: i64 = 999;

/// Top-level layout of an envelope
#[derive(Clone, Copy)]
struct Layout {
    open: &'static str,
    separator: &'static str,
    close: &'static str,
    values: Format,
}

const COMPACT: Layout = Layout {
    open: "{ ",
    separator: ", ",
    close: " }",
    values: Format::Compact,
};

const FORMATTED: Layout = Layout {
    open: "{\n  ",
    separator: ",\n  ",
    close: "\n}",
    values: Format::Indented(2),
};

/// What to write when a member has no value
#[derive(Clone, Copy, PartialEq, Eq)]
enum Absent {
    Omit,
    Null,
}

struct Envelope {
    layout: Layout,
    out: String,
    members: usize,
}

impl Envelope {
    fn new(layout: Layout) -> Self {
        Self {
            layout,
            out: String::from(layout.open),
            members: 0,
        }
    }

    fn member(mut self, key: &str, value: Option<&Value>, absent: Absent) -> Result<Self> {
        let null = Value::Null;
        let value = match (value, absent) {
            (Some(value), _) => value,
            (None, Absent::Null) => &null,
            (None, Absent::Omit) => return Ok(self),
        };

        if self.members > 0 {
            self.out.push_str(self.layout.separator);
        }
        self.out.push('"');
        self.out.push_str(key);
        self.out.push_str("\" : ");
        serializer::write_value(&mut self.out, value, self.layout.values, Encoding::Utf8)?;
        self.members += 1;
        Ok(self)
    }

    fn finish(mut self) -> String {
        self.out.push_str(self.layout.close);
        self.out
    }
}

fn method_name(method: &Value) -> Result<&Value> {
    match method {
        Value::Str(_) => Ok(method),
        _ => Err(Error::RequestBuild(
            "expecting method name as first parameter".to_string(),
        )),
    }
}

fn build_request(
    layout: Layout,
    method: &Value,
    id: Option<&Value>,
    version: Option<&Value>,
    params: Option<&Value>,
) -> Result<String> {
    let method = method_name(method)?;
    Ok(Envelope::new(layout)
        .member("version", version, Absent::Omit)?
        .member("method", Some(method), Absent::Omit)?
        .member("id", id, Absent::Omit)?
        .member("params", params, Absent::Null)?
        .finish())
}

fn build_answer(
    layout: Layout,
    key: &str,
    version: Option<&Value>,
    id: Option<&Value>,
    payload: Option<&Value>,
) -> Result<String> {
    Ok(Envelope::new(layout)
        .member("version", version, Absent::Omit)?
        .member("id", id, Absent::Omit)?
        .member(key, payload, Absent::Null)?
        .finish())
}

/// Compact request envelope
///
/// `method` must be a string. `params` is written as `null` when absent.
pub fn request(
    method: &Value,
    id: Option<&Value>,
    version: Option<&Value>,
    params: Option<&Value>,
) -> Result<String> {
    build_request(COMPACT, method, id, version, params)
}

/// Formatted request envelope
pub fn request_formatted(
    method: &Value,
    id: Option<&Value>,
    version: Option<&Value>,
    params: Option<&Value>,
) -> Result<String> {
    build_request(FORMATTED, method, id, version, params)
}

/// Compact request whose `params` is the list of positional arguments
///
/// With no arguments `params` is `null`; otherwise the arguments are sent as
/// an array, even when there is only one.
pub fn request_with_positional_args(
    method: &Value,
    id: Option<&Value>,
    version: Option<&Value>,
    args: &[Value],
) -> Result<String> {
    if args.is_empty() {
        request(method, id, version, None)
    } else {
        request(method, id, version, Some(&Value::Array(args.to_vec())))
    }
}

/// Compact request whose `params` is sent exactly as given
pub fn request_call_args(
    method: &Value,
    id: Option<&Value>,
    version: Option<&Value>,
    params: Option<&Value>,
) -> Result<String> {
    request(method, id, version, params)
}

/// Compact response envelope; `result` is written as `null` when absent
pub fn response(version: Option<&Value>, id: Option<&Value>, result: Option<&Value>) -> Result<String> {
    build_answer(COMPACT, "result", version, id, result)
}

/// Formatted response envelope
pub fn response_formatted(
    version: Option<&Value>,
    id: Option<&Value>,
    result: Option<&Value>,
) -> Result<String> {
    build_answer(FORMATTED, "result", version, id, result)
}

/// Compact error envelope carrying a caller-supplied error payload
pub fn error_response(version: Option<&Value>, id: Option<&Value>, error: Option<&Value>) -> Result<String> {
    build_answer(COMPACT, "error", version, id, error)
}

/// Formatted error envelope carrying a caller-supplied error payload
pub fn error_response_formatted(
    version: Option<&Value>,
    id: Option<&Value>,
    error: Option<&Value>,
) -> Result<String> {
    build_answer(FORMATTED, "error", version, id, error)
}

fn validate_error(code: i64, message: &str) -> Result<()> {
    if !(MIN_ERROR_CODE..=MAX_ERROR_CODE).contains(&code) {
        return Err(Error::ErrorBuild(format!(
            "error code must be between {} and {} inclusive (value passed: {})",
            MIN_ERROR_CODE, MAX_ERROR_CODE, code
        )));
    }
    if message.is_empty() {
        return Err(Error::ErrorBuild("empty error message".to_string()));
    }
    Ok(())
}

/// Compact JSON-RPC 1.1 error envelope
///
/// The inner object always has `name`, `code` and `message`; `detail` is
/// added as its `error` member only when given.
///
/// ```rust
/// use jrpc_core::envelope;
///
/// let text = envelope::error_1_1(404, "no such method", None, None).unwrap();
/// assert_eq!(
///     text,
///     r#"{ "version" : "1.1", "error" : { "name" : "JSONRPCError", "code" : 404, "message" : "no such method" } }"#
/// );
///
/// assert!(envelope::error_1_1(50, "bad", None, None).is_err());
/// ```
pub fn error_1_1(code: i64, message: &str, id: Option<&Value>, detail: Option<&Value>) -> Result<String> {
    validate_error(code, message)?;

    let mut out = String::from("{ \"version\" : \"1.1\", ");
    if let Some(id) = id {
        out.push_str("\"id\" : ");
        serializer::write_value(&mut out, id, Format::Compact, Encoding::Utf8)?;
        out.push_str(", ");
    }
    out.push_str(&format!(
        "\"error\" : {{ \"name\" : \"{}\", \"code\" : {}, \"message\" : ",
        FAULT_NAME, code
    ));
    serializer::write_string(&mut out, message, Encoding::Utf8)?;
    if let Some(detail) = detail {
        out.push_str(", \"error\" : ");
        serializer::write_value(&mut out, detail, Format::Compact, Encoding::Utf8)?;
    }
    out.push_str(" } }");
    Ok(out)
}

/// Formatted JSON-RPC 1.1 error envelope
///
/// The `id` stays on one line; `detail` is rendered at indent 4.
pub fn error_1_1_formatted(
    code: i64,
    message: &str,
    id: Option<&Value>,
    detail: Option<&Value>,
) -> Result<String> {
    validate_error(code, message)?;

    let mut out = String::from("{\n  \"version\" : \"1.1\",\n  ");
    if let Some(id) = id {
        out.push_str("\"id\" : ");
        serializer::write_value(&mut out, id, Format::Compact, Encoding::Utf8)?;
        out.push_str(",\n  ");
    }
    out.push_str(&format!(
        "\"error\" :\n  {{\n    \"name\" : \"{}\",\n    \"code\" : {},\n    \"message\" : ",
        FAULT_NAME, code
    ));
    serializer::write_string(&mut out, message, Encoding::Utf8)?;
    if let Some(detail) = detail {
        out.push_str(",\n    \"error\" : ");
        serializer::write_value(&mut out, detail, Format::Indented(4), Encoding::Utf8)?;
    }
    out.push_str("\n  }\n}");
    Ok(out)
}
