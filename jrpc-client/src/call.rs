//! The call sequence
//!
//! Every call walks the same states:
//!
//! ```text
//! Built → Sent → AwaitingResponse → Parsed
//!   ↓       ↓            ↓
//!   └───────┴────────────┴──────→ Failed
//! ```
//!
//! 1. **Built**: the request envelope was produced. A build error fails the
//!    call here, before the transport is touched.
//! 2. **Sent**: the body and request line are recorded and the POST is
//!    handed to the transport.
//! 3. **AwaitingResponse**: waiting on the transport. Its error, if any, is
//!    returned unchanged. A transport future only runs once it is awaited,
//!    so this state is entered together with `Sent` and logged as one
//!    transition.
//! 4. **Parsed**: the response headers and body were recorded, the body was
//!    text, and it parsed. A binary body fails with `ResponseDecode`; a
//!    parse error is returned unchanged.
//!
//! Nothing is retried and there is no timer here; cancellation and
//! deadlines belong to the transport.

use crate::diagnostics::CallDiagnostics;
use crate::metrics::ClientMetrics;
use crate::transport::{Body, Endpoint, Headers, HttpRequest, Transport};
use jrpc_core::{parse, Error, Result, Value};
use std::time::Instant;

/// Progress of a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Envelope built, nothing sent yet
    Built,
    /// Handed to the transport
    Sent,
    /// Waiting for the transport to answer
    AwaitingResponse,
    /// Response parsed; the call succeeded
    Parsed,
    /// The call failed
    Failed,
}

/// Short label for an error, used in metrics and logs
pub fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::Parse(_) => "parse",
        Error::Serialization { .. } => "serialization",
        Error::Encoding(_) => "encoding",
        Error::RequestBuild(_) => "request_build",
        Error::ErrorBuild(_) => "error_build",
        Error::ResponseDecode(_) => "response_decode",
        Error::Transport(_) => "transport",
        Error::Fault(_) => "fault",
        Error::Config(_) => "config",
        Error::Conversion(_) => "conversion",
    }
}

/// What a call needs from its client
pub(crate) struct CallContext<'a> {
    pub transport: &'a dyn Transport,
    pub endpoint: &'a Endpoint,
    pub headers: &'a Headers,
    pub metrics: Option<&'a ClientMetrics>,
}

struct CallSequence<'c, 'a> {
    ctx: &'c CallContext<'a>,
    method: &'c str,
    state: CallState,
    record: Option<CallDiagnostics>,
}

impl<'c, 'a> CallSequence<'c, 'a> {
    fn transition(&mut self, next: CallState) {
        tracing::debug!(method = %self.method, from = ?self.state, to = ?next, "call state");
        self.state = next;
    }

    fn note(&mut self, f: impl FnOnce(&mut CallDiagnostics)) {
        if let Some(record) = self.record.as_mut() {
            f(record);
        }
    }

    async fn drive(&mut self, body: Result<String>) -> Result<Value> {
        let body = body?;

        let request = HttpRequest {
            method: "POST".to_string(),
            endpoint: self.ctx.endpoint.clone(),
            headers: self.ctx.headers.clone(),
            body: body.into_bytes(),
            want_response_info: true,
        };
        self.note(|r| {
            r.request = Some(String::from_utf8_lossy(&request.body).into_owned());
            r.request_uri = Some(request.request_line());
            r.headers = Some(request.headers.clone());
        });
        if let Some(metrics) = self.ctx.metrics {
            metrics.record_request_size(self.method, request.body.len());
        }

        let transport = self.ctx.transport;
        let pending = transport.send(request);
        self.state = CallState::Sent;
        self.transition(CallState::AwaitingResponse);
        let response = pending.await?;

        tracing::debug!(
            method = %self.method,
            status = response.status,
            bytes = response.body.len(),
            "response received"
        );
        if let Some(metrics) = self.ctx.metrics {
            metrics.record_response_size(self.method, response.body.len());
        }
        self.note(|r| {
            r.response_uri = Some(response.response_line.clone());
            r.response_headers = Some(response.headers.clone());
        });

        match response.body {
            Body::Text(text) => {
                let parsed = parse(&text);
                self.note(|r| r.response = Some(Body::Text(text)));
                parsed
            }
            Body::Binary(bytes) => {
                self.note(|r| r.response = Some(Body::Binary(bytes)));
                Err(Error::ResponseDecode(
                    "undecoded binary response received from remote server".to_string(),
                ))
            }
        }
    }
}

/// Run one call end to end
///
/// `body` is the outcome of building the request envelope. When `info` is
/// given it is overwritten once, after the call, with everything recorded
/// up to the point the call stopped.
pub(crate) async fn execute(
    ctx: &CallContext<'_>,
    method: &str,
    body: Result<String>,
    info: Option<&mut CallDiagnostics>,
) -> Result<Value> {
    let start = Instant::now();
    let mut sequence = CallSequence {
        ctx,
        method,
        state: CallState::Built,
        record: info.as_ref().map(|_| CallDiagnostics::new()),
    };

    let result = sequence.drive(body).await;
    let duration = start.elapsed().as_secs_f64();

    let stage = sequence.state;
    match &result {
        Ok(_) => {
            sequence.transition(CallState::Parsed);
            if let Some(metrics) = ctx.metrics {
                metrics.record_call(method, "success", duration);
            }
        }
        Err(e) => {
            let kind = error_kind(e);
            tracing::warn!(method = %method, error = %e, kind, stage = ?stage, "call failed");
            sequence.transition(CallState::Failed);
            if let Some(metrics) = ctx.metrics {
                metrics.record_call(method, "error", duration);
                metrics.record_error(kind);
            }
        }
    }

    if let Some(out) = info {
        let mut record = sequence.record.take().unwrap_or_default();
        record.stage = Some(stage);
        record.state = Some(sequence.state);
        *out = record;
    }
    result
}
