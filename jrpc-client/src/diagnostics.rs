//! Per-call diagnostics record
//!
//! Callers that pass a [`CallDiagnostics`] to one of the `*_with_info` call
//! methods get back what went over the wire. The record is replaced exactly
//! once per call, after the call finished, whether it succeeded or not; any
//! field the call never reached stays `None`.

use crate::call::CallState;
use crate::transport::{Body, Headers};
use jrpc_core::{Map, Value};

/// What one call sent and received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallDiagnostics {
    /// Outgoing request body
    pub request: Option<String>,
    /// Outgoing request line
    pub request_uri: Option<String>,
    /// Outgoing headers
    pub headers: Option<Headers>,
    /// Incoming status line
    pub response_uri: Option<String>,
    /// Incoming body, as the transport delivered it
    pub response: Option<Body>,
    /// Incoming headers
    pub response_headers: Option<Headers>,
    /// Last state reached before the call finished
    pub stage: Option<CallState>,
    /// Where the call ended up
    pub state: Option<CallState>,
}

fn headers_value(headers: &Headers) -> Value {
    headers
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
        .collect()
}

impl CallDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the call failed before anything was recorded
    pub fn is_empty(&self) -> bool {
        self.request.is_none() && self.response.is_none()
    }

    /// The record as an Object keyed `request`, `request-uri`, `headers`,
    /// `response-uri`, `response` and `response_headers`
    ///
    /// Missing fields are left out. A binary response body appears as
    /// [`Value::Binary`].
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(request) = &self.request {
            map.insert("request".to_string(), Value::from(request.as_str()));
        }
        if let Some(uri) = &self.request_uri {
            map.insert("request-uri".to_string(), Value::from(uri.as_str()));
        }
        if let Some(headers) = &self.headers {
            map.insert("headers".to_string(), headers_value(headers));
        }
        if let Some(uri) = &self.response_uri {
            map.insert("response-uri".to_string(), Value::from(uri.as_str()));
        }
        if let Some(body) = &self.response {
            let body = match body {
                Body::Text(text) => Value::from(text.as_str()),
                Body::Binary(bytes) => Value::Binary(bytes.clone()),
            };
            map.insert("response".to_string(), body);
        }
        if let Some(headers) = &self.response_headers {
            map.insert("response_headers".to_string(), headers_value(headers));
        }
        Value::Object(map)
    }
}
