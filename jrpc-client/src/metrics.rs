//! Client call metrics
//!
//! OpenTelemetry instruments recorded by the call sequence when the client
//! was built with observability enabled:
//!
//! - **calls_total**: finished calls, by method and outcome (counter)
//! - **call_duration**: wall time per call in seconds (histogram)
//! - **errors_total**: failed calls, by error kind (counter)
//! - **request_bytes**: size of outgoing request bodies (histogram)
//! - **response_bytes**: size of incoming response bodies (histogram)
//!
//! ```rust,no_run
//! use jrpc_client::ClientMetrics;
//!
//! let metrics = ClientMetrics::new("billing-client");
//! metrics.record_call("invoice.create", "success", 0.012);
//! ```

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Instruments for one client
pub struct ClientMetrics {
    /// Finished calls
    pub calls_total: Counter<u64>,
    /// Call duration in seconds
    pub call_duration: Histogram<f64>,
    /// Failed calls
    pub errors_total: Counter<u64>,
    /// Request body size in bytes
    pub request_bytes: Histogram<u64>,
    /// Response body size in bytes
    pub response_bytes: Histogram<u64>,
}

impl ClientMetrics {
    /// Instruments on the global meter provider
    pub fn new(service_name: impl Into<String>) -> Self {
        // global::meter wants a 'static name; one leak per client is fine
        let name: &'static str = Box::leak(service_name.into().into_boxed_str());
        let meter = global::meter(name);
        Self::new_with_meter(&meter)
    }

    /// Instruments on a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            calls_total: meter
                .u64_counter("jrpc.client.calls.total")
                .with_description("Total number of finished JSON-RPC calls")
                .build(),
            call_duration: meter
                .f64_histogram("jrpc.client.call.duration")
                .with_description("JSON-RPC call duration in seconds")
                .with_unit("s")
                .build(),
            errors_total: meter
                .u64_counter("jrpc.client.errors.total")
                .with_description("Total number of failed JSON-RPC calls")
                .build(),
            request_bytes: meter
                .u64_histogram("jrpc.client.request.bytes")
                .with_description("Size of request bodies")
                .with_unit("By")
                .build(),
            response_bytes: meter
                .u64_histogram("jrpc.client.response.bytes")
                .with_description("Size of response bodies")
                .with_unit("By")
                .build(),
        }
    }

    /// Record a finished call
    pub fn record_call(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.calls_total.add(1, attributes);
        self.call_duration.record(duration_secs, attributes);
    }

    /// Record a failure by kind (`transport`, `parse`, ...)
    pub fn record_error(&self, error_kind: &str) {
        let attributes = &[KeyValue::new("error_kind", error_kind.to_string())];
        self.errors_total.add(1, attributes);
    }

    pub fn record_request_size(&self, method: &str, bytes: usize) {
        self.request_bytes
            .record(bytes as u64, &[KeyValue::new("method", method.to_string())]);
    }

    pub fn record_response_size(&self, method: &str, bytes: usize) {
        self.response_bytes
            .record(bytes as u64, &[KeyValue::new("method", method.to_string())]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = ClientMetrics::new("test-client");
        metrics.record_call("echo", "success", 0.05);
        metrics.record_error("transport");
        metrics.record_request_size("echo", 64);
        metrics.record_response_size("echo", 17);
    }

    #[test]
    fn test_metrics_with_meter() {
        let meter = global::meter("test-client-meter");
        let metrics = ClientMetrics::new_with_meter(&meter);
        metrics.record_call("sum", "error", 0.01);
        metrics.record_call("sum", "fault", 0.02);
        metrics.record_error("fault");
    }
}
