//! Error types for jrpc
//!
//! Every fallible operation in the codec and the RPC layer returns
//! [`Result<T>`], whose error side is the single [`Error`] enum below.
//! All of these errors are terminal for the operation that raised them;
//! nothing in jrpc retries internally.
//!
//! # Error Taxonomy
//!
//! - **Parse**: malformed JSON text, carries the message and the 1-based line
//! - **Serialization**: a value kind with no JSON representation
//! - **Encoding**: a character that the requested text encoding cannot carry
//! - **RequestBuild / ErrorBuild**: invalid arguments to an envelope builder
//! - **ResponseDecode**: the remote side answered with a non-text body
//! - **Transport**: whatever the HTTP collaborator reported
//! - **Fault**: a JSON-RPC error object returned by the remote server
//! - **Config**: invalid client configuration
//! - **Conversion**: a value that does not fit the requested Rust type
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{parse, Error};
//!
//! let err = parse("[1, 2").unwrap_err();
//! match err {
//!     Error::Parse(e) => assert_eq!(e.line, 1),
//!     other => panic!("unexpected error: {other}"),
//! }
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for jrpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type for jrpc operations
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Syntax error in JSON input
    #[error("JSON parse error: {0}")]
    Parse(#[from] ParseError),

    /// The value tree contains a kind that has no JSON form (e.g. binary)
    #[error("JSON serialization error: don't know how to serialize type '{type_name}'")]
    Serialization {
        /// Type name of the offending value
        type_name: String,
    },

    /// Text could not be converted into or out of the requested encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Invalid arguments for a request envelope
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// Invalid arguments for a JSON-RPC 1.1 error envelope
    #[error("Error envelope build error: {0}")]
    ErrorBuild(String),

    /// The response body could not be handed to the parser
    #[error("Response decode error: {0}")]
    ResponseDecode(String),

    /// Failure reported by the transport collaborator
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote server answered with a JSON-RPC error object
    #[error("JSON-RPC fault: {0}")]
    Fault(RpcFault),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value did not fit the requested Rust type
    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Syntax error raised by the parser
///
/// `message` is the full human-readable text and already mentions the line
/// where it makes sense; `line` is the 1-based line the cursor was on when
/// the error was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable description
    pub message: String,
    /// 1-based line number at the point of failure
    pub line: usize,
}

impl ParseError {
    /// Create a parse error at `line`
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

/// Errors produced by an HTTP transport
///
/// The call sequence surfaces these unchanged; it never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No response within the transport's deadline
    #[error("timeout waiting for response")]
    Timeout,

    /// The connection could not be established or was lost
    #[error("connection error: {0}")]
    Connection(String),

    /// Non-2xx status without a usable body
    #[error("HTTP status {code}: {reason}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Reason phrase sent by the server
        reason: String,
    },

    /// Anything else the transport wants to report
    #[error("{0}")]
    Other(String),
}

/// Name carried by every JSON-RPC 1.1 error object produced by jrpc
pub const FAULT_NAME: &str = "JSONRPCError";

/// JSON-RPC 1.1 error object
///
/// This is the inner shape of an error envelope:
/// `{ "name" : "JSONRPCError", "code" : 200, "message" : "...", "error" : ... }`.
/// The optional `error` member carries application detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcFault {
    /// Error class name, normally `"JSONRPCError"`
    #[serde(default = "default_fault_name")]
    pub name: String,
    /// Numeric error code
    pub code: i64,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Optional detail payload
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

fn default_fault_name() -> String {
    FAULT_NAME.to_string()
}

impl RpcFault {
    /// Create a fault with the standard name and no detail
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            name: FAULT_NAME.to_string(),
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a detail payload
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Extract the fault from a parsed response envelope
    ///
    /// Returns `None` when the envelope has no `error` member or when that
    /// member is `null`. A non-object `error` member is reported with code 0
    /// and its compact JSON text as the message, so that no information is
    /// lost.
    pub fn from_response(response: &Value) -> Option<Self> {
        let error = response.get("error")?;
        match error {
            Value::Null => None,
            Value::Object(map) => {
                let name = map
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(FAULT_NAME)
                    .to_string();
                let code = map.get("code").and_then(Value::as_i64).unwrap_or(0);
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let detail = map.get("error").or_else(|| map.get("data")).cloned();
                Some(Self {
                    name,
                    code,
                    message,
                    detail,
                })
            }
            other => Some(Self::new(
                0,
                crate::serializer::to_string(other).unwrap_or_else(|_| other.type_name().to_string()),
            )),
        }
    }
}

impl std::fmt::Display for RpcFault {
    /// Formats as "[code] message"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcFault {}

impl From<RpcFault> for Error {
    fn from(fault: RpcFault) -> Self {
        Error::Fault(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::new("invalid input at line 3; unable to parse JSON value", 3);
        assert_eq!(error.line, 3);
        assert!(error.to_string().contains("line 3"));

        let wrapped: Error = error.into();
        assert!(wrapped.to_string().starts_with("JSON parse error:"));
    }

    #[test]
    fn test_serialization_error_names_type() {
        let error = Error::Serialization {
            type_name: "binary".to_string(),
        };
        assert!(error.to_string().contains("'binary'"));
    }

    #[test]
    fn test_transport_error_conversion() {
        let error: Error = TransportError::Timeout.into();
        match error {
            Error::Transport(TransportError::Timeout) => {}
            other => panic!("Expected transport timeout, got {other:?}"),
        }

        let status = TransportError::Status {
            code: 502,
            reason: "Bad Gateway".to_string(),
        };
        assert_eq!(status.to_string(), "HTTP status 502: Bad Gateway");
    }

    #[test]
    fn test_fault_display() {
        let fault = RpcFault::new(404, "no such method");
        assert_eq!(fault.to_string(), "[404] no such method");
        assert_eq!(fault.name, FAULT_NAME);
    }

    #[test]
    fn test_fault_from_response() {
        let response = parse(
            r#"{ "version" : "1.1", "id" : 1, "error" : { "name" : "JSONRPCError", "code" : 500, "message" : "boom", "error" : [1] } }"#,
        )
        .unwrap();
        let fault = RpcFault::from_response(&response).unwrap();
        assert_eq!(fault.code, 500);
        assert_eq!(fault.message, "boom");
        assert_eq!(fault.detail, Some(Value::Array(vec![Value::Int(1)])));
    }

    #[test]
    fn test_fault_absent_or_null() {
        let ok = parse(r#"{"result": 42}"#).unwrap();
        assert!(RpcFault::from_response(&ok).is_none());

        let null_error = parse(r#"{"result": 1, "error": null}"#).unwrap();
        assert!(RpcFault::from_response(&null_error).is_none());
    }

    #[test]
    fn test_fault_non_object_error_member() {
        let response = parse(r#"{"error": "plain text"}"#).unwrap();
        let fault = RpcFault::from_response(&response).unwrap();
        assert_eq!(fault.code, 0);
        assert_eq!(fault.message, "\"plain text\"");
    }
}
