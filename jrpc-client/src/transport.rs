//! HTTP transport seam
//!
//! jrpc does not speak HTTP itself. A [`Transport`] takes one fully formed
//! POST ([`HttpRequest`]) and returns the raw answer ([`HttpResponse`]) or a
//! [`TransportError`]. Connection handling, TLS, redirects, proxies and
//! timeouts all live behind this trait.
//!
//! This module also owns the addressing side: which URL schemes are known
//! ([`ProtocolRegistry`]), how a URL turns into an [`Endpoint`], and the
//! headers sent with every call.

use async_trait::async_trait;
use indexmap::IndexMap;
use jrpc_core::{Error, Result, TransportError};
use std::fmt;
use url::Url;

/// Ordered header map; names keep the case they were given
pub type Headers = IndexMap<String, String>;

/// Path used when the URL has none
pub const DEFAULT_PATH: &str = "JSON";

/// `Content-Type` sent with every request
pub const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// `Accept` sent with every request
pub const DEFAULT_ACCEPT: &str = "application/json";

/// `User-Agent` sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!("jrpc-client/", env!("CARGO_PKG_VERSION"));

/// Headers every client starts with
pub fn default_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
    headers.insert("Accept".to_string(), DEFAULT_ACCEPT.to_string());
    headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
    headers
}

/// Defaults for one URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    /// Port used when the URL names none
    pub default_port: u16,
    /// Whether the connection is encrypted
    pub tls: bool,
}

/// Known URL schemes
///
/// Starts with `http` (80), `https` (443, TLS), `jsonrpc` (80) and
/// `jsonrpcs` (443, TLS). Scheme names are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    protocols: IndexMap<String, Protocol>,
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        let mut registry = Self {
            protocols: IndexMap::new(),
        };
        registry.register("http", 80, false);
        registry.register("https", 443, true);
        registry.register("jsonrpc", 80, false);
        registry.register("jsonrpcs", 443, true);
        registry
    }
}

impl ProtocolRegistry {
    /// Add or replace a scheme
    pub fn register(&mut self, scheme: &str, default_port: u16, tls: bool) {
        self.protocols
            .insert(scheme.to_ascii_lowercase(), Protocol { default_port, tls });
    }

    pub fn lookup(&self, scheme: &str) -> Option<Protocol> {
        self.protocols.get(&scheme.to_ascii_lowercase()).copied()
    }

    /// Registered scheme names, in registration order
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.protocols.keys().map(String::as_str)
    }

    /// Turn `url` into an [`Endpoint`]
    ///
    /// The scheme must be registered and the URL must name a host. When the
    /// URL has no path (or just `/`), `default_path` is used.
    pub fn resolve(&self, url: &str, default_path: &str) -> Result<Endpoint> {
        let parsed = Url::parse(url).map_err(|e| Error::Config(format!("invalid URL '{}': {}", url, e)))?;

        let scheme = parsed.scheme().to_string();
        let protocol = self
            .lookup(&scheme)
            .ok_or_else(|| Error::Config(format!("unknown protocol '{}' in URL '{}'", scheme, url)))?;

        let host = match parsed.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(Error::Config(format!("no host in URL '{}'", url))),
        };

        let mut path = match parsed.path() {
            "" | "/" => format!("/{}", default_path.trim_start_matches('/')),
            p if p.starts_with('/') => p.to_string(),
            p => format!("/{}", p),
        };
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Endpoint {
            scheme,
            host,
            port: parsed.port().unwrap_or(protocol.default_port),
            tls: protocol.tls,
            path,
        })
    }
}

/// Where calls are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub tls: bool,
    /// Absolute request path, including any query string
    pub path: String,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

/// One outgoing HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Always `"POST"` for calls
    pub method: String,
    pub endpoint: Endpoint,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// The caller wants response headers and the status line back
    pub want_response_info: bool,
}

impl HttpRequest {
    /// The request line as it goes on the wire
    pub fn request_line(&self) -> String {
        format!("{} {} HTTP/1.1", self.method, self.endpoint.path)
    }
}

/// Response body as delivered by the transport
///
/// A transport hands back `Text` when it could decode the body as text
/// (normally guided by the `Content-Type` charset) and `Binary` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Binary(Vec<u8>),
}

impl Body {
    pub fn len(&self) -> usize {
        match self {
            Body::Text(text) => text.len(),
            Body::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Binary(_) => None,
        }
    }
}

/// One HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Status line, e.g. `HTTP/1.1 200 OK`
    pub response_line: String,
    pub headers: Headers,
    pub body: Body,
}

impl HttpResponse {
    /// A `200 OK` carrying a JSON text body
    pub fn ok(body: impl Into<String>) -> Self {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        Self {
            status: 200,
            response_line: "HTTP/1.1 200 OK".to_string(),
            headers,
            body: Body::Text(body.into()),
        }
    }
}

/// Something that can carry one POST and bring back the answer
///
/// Implementations decide on blocking, cancellation and timeouts; the call
/// sequence waits on `send` and nothing else.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_protocols() {
        let registry = ProtocolRegistry::default();
        assert_eq!(
            registry.lookup("jsonrpc"),
            Some(Protocol {
                default_port: 80,
                tls: false
            })
        );
        assert_eq!(
            registry.lookup("JSONRPCS"),
            Some(Protocol {
                default_port: 443,
                tls: true
            })
        );
        assert_eq!(
            registry.schemes().collect::<Vec<_>>(),
            vec!["http", "https", "jsonrpc", "jsonrpcs"]
        );
    }

    #[test]
    fn test_resolve_applies_default_path_and_port() {
        let registry = ProtocolRegistry::default();

        let endpoint = registry.resolve("jsonrpc://rpc.example.com", DEFAULT_PATH).unwrap();
        assert_eq!(endpoint.host, "rpc.example.com");
        assert_eq!(endpoint.port, 80);
        assert!(!endpoint.tls);
        assert_eq!(endpoint.path, "/JSON");

        let secure = registry.resolve("jsonrpcs://rpc.example.com:8443/", DEFAULT_PATH).unwrap();
        assert_eq!(secure.port, 8443);
        assert!(secure.tls);
        assert_eq!(secure.path, "/JSON");
        assert_eq!(secure.to_string(), "jsonrpcs://rpc.example.com:8443/JSON");
    }

    #[test]
    fn test_resolve_keeps_explicit_path() {
        let registry = ProtocolRegistry::default();
        let endpoint = registry.resolve("http://localhost:8080/api/rpc?x=1", DEFAULT_PATH).unwrap();
        assert_eq!(endpoint.path, "/api/rpc?x=1");
        assert_eq!(endpoint.port, 8080);
    }

    #[test]
    fn test_resolve_errors() {
        let registry = ProtocolRegistry::default();
        assert!(matches!(
            registry.resolve("gopher://host", DEFAULT_PATH),
            Err(Error::Config(msg)) if msg.contains("unknown protocol 'gopher'")
        ));
        assert!(matches!(registry.resolve("not a url", DEFAULT_PATH), Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_protocol() {
        let mut registry = ProtocolRegistry::default();
        registry.register("rpc", 9000, false);
        let endpoint = registry.resolve("rpc://internal", "svc").unwrap();
        assert_eq!(endpoint.port, 9000);
        assert_eq!(endpoint.path, "/svc");
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(headers["Content-Type"], "application/json;charset=utf-8");
        assert_eq!(headers["Accept"], "application/json");
        assert!(headers["User-Agent"].starts_with("jrpc-client/"));
    }

    #[test]
    fn test_request_line() {
        let endpoint = ProtocolRegistry::default()
            .resolve("jsonrpc://h", DEFAULT_PATH)
            .unwrap();
        let request = HttpRequest {
            method: "POST".to_string(),
            endpoint,
            headers: default_headers(),
            body: b"{}".to_vec(),
            want_response_info: true,
        };
        assert_eq!(request.request_line(), "POST /JSON HTTP/1.1");
    }
}
