//! Client builder for addressing, headers and observability
//!
//! The `ClientBuilder` provides a fluent API for configuring a client
//! before building it. It allows you to:
//! - Supply the transport that carries the POSTs
//! - Set the RPC version tag, default path and default headers
//! - Register extra URL schemes
//! - Configure observability (OpenTelemetry)
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrpc_client::{ClientBuilder, Transport};
//! use std::sync::Arc;
//!
//! # fn example(transport: Arc<dyn Transport>) -> jrpc_core::Result<()> {
//! let client = ClientBuilder::new("jsonrpcs://billing.internal/rpc")
//!     .with_transport(transport.clone())
//!     .with_header("X-Tenant", "acme")
//!     .build()?;
//!
//! // With observability
//! let client2 = ClientBuilder::new("jsonrpc://localhost:8080")
//!     .with_transport(transport)
//!     .with_default_observability()
//!     .service_name("billing-client")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::client::DEFAULT_VERSION;
use crate::transport::{default_headers, Headers, ProtocolRegistry, Transport, DEFAULT_PATH};
use crate::{ClientMetrics, JrpcClient};
use jrpc_core::{Error, ObservabilityConfig, Result, Value};
use parking_lot::Mutex;
use std::sync::Arc;

/// Builder for configuring and creating a [`JrpcClient`]
pub struct ClientBuilder {
    url: String,
    transport: Option<Arc<dyn Transport>>,
    version: String,
    default_path: String,
    headers: Headers,
    protocols: ProtocolRegistry,
    observability_config: Option<ObservabilityConfig>,
    service_name: Option<String>,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            transport: None,
            version: DEFAULT_VERSION.to_string(),
            default_path: DEFAULT_PATH.to_string(),
            headers: default_headers(),
            protocols: ProtocolRegistry::default(),
            observability_config: None,
            service_name: None,
        }
    }

    /// Read settings from an options Object
    ///
    /// Recognised keys are `url`, `version`, `default_path`, `headers`
    /// (Object of strings) and `protocols` (scheme mapped to a port, or to
    /// `{ "port" : N, "ssl" : bool }`). Unknown keys are ignored.
    pub fn from_options(options: &Value) -> Result<Self> {
        let map = options
            .as_object()
            .ok_or_else(|| Error::Config(format!("options must be an object, got {}", options.type_name())))?;

        let url = map
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Config("missing 'url' option".to_string()))?;
        let mut builder = Self::new(url);

        if let Some(version) = map.get("version") {
            builder.version = option_str(version, "version")?.to_string();
        }
        if let Some(path) = map.get("default_path") {
            builder.default_path = option_str(path, "default_path")?.to_string();
        }
        if let Some(headers) = map.get("headers") {
            let headers = headers
                .as_object()
                .ok_or_else(|| Error::Config("'headers' option must be an object".to_string()))?;
            for (name, value) in headers {
                builder = builder.with_header(name.as_str(), option_str(value, name)?);
            }
        }
        if let Some(protocols) = map.get("protocols") {
            let protocols = protocols
                .as_object()
                .ok_or_else(|| Error::Config("'protocols' option must be an object".to_string()))?;
            for (scheme, setting) in protocols {
                let (port, tls) = protocol_option(scheme, setting)?;
                builder = builder.with_protocol(scheme.as_str(), port, tls);
            }
        }
        Ok(builder)
    }

    /// Transport that carries the calls (required)
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// RPC version tag sent in every request (default `"1.1"`)
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Path used when the URL has none (default `JSON`)
    pub fn with_default_path(mut self, path: impl Into<String>) -> Self {
        self.default_path = path.into();
        self
    }

    /// Add a header, or replace a default one with the same name
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let existing = self
            .headers
            .keys()
            .find(|k| k.eq_ignore_ascii_case(&name))
            .cloned();
        match existing {
            Some(key) => {
                self.headers.insert(key, value.into());
            }
            None => {
                self.headers.insert(name, value.into());
            }
        }
        self
    }

    pub fn with_user_agent(self, agent: impl Into<String>) -> Self {
        self.with_header("User-Agent", agent)
    }

    /// Register an extra URL scheme
    pub fn with_protocol(mut self, scheme: &str, default_port: u16, tls: bool) -> Self {
        self.protocols.register(scheme, default_port, tls);
        self
    }

    /// Enable OpenTelemetry observability with custom configuration
    pub fn with_observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Enable OpenTelemetry observability with default configuration
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(ObservabilityConfig::default());
        self
    }

    /// Set service name for observability (used if observability is enabled)
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Build the client
    ///
    /// Fails with [`Error::Config`] when no transport was given or the URL
    /// does not resolve against the registered schemes.
    pub fn build(self) -> Result<JrpcClient> {
        let transport = self
            .transport
            .ok_or_else(|| Error::Config("no transport configured".to_string()))?;
        let endpoint = self.protocols.resolve(&self.url, &self.default_path)?;

        // Initialize observability if configured
        let metrics = if let Some(mut config) = self.observability_config {
            if let Some(name) = self.service_name {
                config.service_name = name;
            }
            let service_name = config.service_name.clone();
            jrpc_core::init_observability(config)
                .map_err(|e| Error::Config(format!("failed to initialize observability: {}", e)))?;
            Some(Arc::new(ClientMetrics::new(service_name)))
        } else {
            None
        };

        tracing::info!(endpoint = %endpoint, version = %self.version, "client configured");

        Ok(JrpcClient {
            transport,
            endpoint,
            headers: self.headers,
            version: Arc::new(Mutex::new(self.version)),
            metrics,
        })
    }
}

fn option_str<'v>(value: &'v Value, key: &str) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| Error::Config(format!("option '{}' must be a string, got {}", key, value.type_name())))
}

fn option_port(value: &Value, scheme: &str) -> Result<u16> {
    value
        .as_i64()
        .and_then(|port| u16::try_from(port).ok())
        .ok_or_else(|| Error::Config(format!("invalid port for protocol '{}'", scheme)))
}

fn protocol_option(scheme: &str, setting: &Value) -> Result<(u16, bool)> {
    match setting {
        Value::Int(_) => Ok((option_port(setting, scheme)?, false)),
        Value::Object(fields) => {
            let port = fields
                .get("port")
                .ok_or_else(|| Error::Config(format!("missing port for protocol '{}'", scheme)))?;
            let tls = match fields.get("ssl") {
                None => false,
                Some(flag) => flag
                    .as_bool()
                    .ok_or_else(|| Error::Config(format!("'ssl' for protocol '{}' must be a boolean", scheme)))?,
            };
            Ok((option_port(port, scheme)?, tls))
        }
        other => Err(Error::Config(format!(
            "protocol '{}' must be a port or an object, got {}",
            scheme,
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpRequest, HttpResponse};
    use async_trait::async_trait;
    use jrpc_core::{parse, TransportError};

    struct Silent;

    #[async_trait]
    impl Transport for Silent {
        async fn send(&self, _request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            Err(TransportError::Timeout)
        }
    }

    #[test]
    fn test_builder_creation() {
        let builder = ClientBuilder::new("jsonrpc://localhost");
        assert_eq!(builder.url, "jsonrpc://localhost");
        assert_eq!(builder.version, "1.1");
        assert_eq!(builder.default_path, "JSON");
        assert!(builder.transport.is_none());
        assert!(builder.observability_config.is_none());
    }

    #[test]
    fn test_build_requires_transport() {
        let err = ClientBuilder::new("jsonrpc://localhost").build().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("transport")));
    }

    #[test]
    fn test_build_rejects_unknown_scheme() {
        let err = ClientBuilder::new("ftp://localhost")
            .with_transport(Arc::new(Silent))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("unknown protocol 'ftp'")));
    }

    #[test]
    fn test_builder_chaining() {
        let client = ClientBuilder::new("jsonrpcs://rpc.example.com")
            .with_transport(Arc::new(Silent))
            .with_version("1.0")
            .with_default_path("rpc")
            .with_user_agent("billing/2.1")
            .with_header("content-type", "application/json")
            .with_header("X-Tenant", "acme")
            .build()
            .unwrap();

        assert_eq!(client.version(), "1.0");
        assert_eq!(client.endpoint().port, 443);
        assert!(client.endpoint().tls);
        assert_eq!(client.endpoint().path, "/rpc");

        let headers = client.headers();
        assert_eq!(headers["User-Agent"], "billing/2.1");
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["X-Tenant"], "acme");
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_builder_with_observability() {
        let builder = ClientBuilder::new("jsonrpc://localhost")
            .with_default_observability()
            .service_name("test-client");
        assert!(builder.observability_config.is_some());
        assert_eq!(builder.service_name, Some("test-client".to_string()));
    }

    #[test]
    fn test_from_options() {
        let options = parse(
            r#"{
                "url": "rpc://internal",
                "version": "1.0",
                "default_path": "svc",
                "headers": { "X-Trace": "on" },
                "protocols": { "rpc": { "port": 9443, "ssl": true }, "plain": 9000 }
            }"#,
        )
        .unwrap();

        let client = ClientBuilder::from_options(&options)
            .unwrap()
            .with_transport(Arc::new(Silent))
            .build()
            .unwrap();

        assert_eq!(client.version(), "1.0");
        assert_eq!(client.endpoint().port, 9443);
        assert!(client.endpoint().tls);
        assert_eq!(client.endpoint().path, "/svc");
        assert_eq!(client.headers()["X-Trace"], "on");
    }

    #[test]
    fn test_from_options_errors() {
        assert!(matches!(
            ClientBuilder::from_options(&Value::from("jsonrpc://h")),
            Err(Error::Config(_))
        ));

        let no_url = parse(r#"{"version": "1.1"}"#).unwrap();
        assert!(matches!(ClientBuilder::from_options(&no_url), Err(Error::Config(msg)) if msg.contains("url")));

        let bad_port = parse(r#"{"url": "jsonrpc://h", "protocols": {"x": 70000}}"#).unwrap();
        assert!(matches!(
            ClientBuilder::from_options(&bad_port),
            Err(Error::Config(msg)) if msg.contains("invalid port")
        ));
    }
}
