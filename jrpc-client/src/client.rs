//! JSON-RPC client over a pluggable HTTP transport
//!
//! [`JrpcClient`] turns a method name and arguments into a request envelope,
//! POSTs it through its [`Transport`] and parses what comes back. See
//! [`crate::call`] for the states a call goes through.
//!
//! # Cloning
//!
//! `JrpcClient` is cheap to clone. Clones share the transport and the RPC
//! version tag, so `set_version` on one clone is seen by all of them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrpc_client::{JrpcClient, Transport};
//! use jrpc_core::Value;
//! use std::sync::Arc;
//!
//! # async fn example(transport: Arc<dyn Transport>) -> jrpc_core::Result<()> {
//! let client = JrpcClient::builder("jsonrpc://rpc.example.com")
//!     .with_transport(transport)
//!     .build()?;
//!
//! let sum = client.call_checked("add", &[Value::from(2), Value::from(3)]).await?;
//! assert_eq!(sum, Value::Int(5));
//! # Ok(())
//! # }
//! ```

use crate::call::{execute, CallContext};
use crate::diagnostics::CallDiagnostics;
use crate::metrics::ClientMetrics;
use crate::transport::{Endpoint, Headers, Transport};
use crate::ClientBuilder;
use jrpc_core::{envelope, interop, Error, Result, RpcFault, Value};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Version tag sent until `set_version` says otherwise
pub const DEFAULT_VERSION: &str = "1.1";

/// JSON-RPC client
#[derive(Clone)]
pub struct JrpcClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) endpoint: Endpoint,
    pub(crate) headers: Headers,
    /// RPC version tag; readers and writers take the same lock
    pub(crate) version: Arc<Mutex<String>>,
    pub(crate) metrics: Option<Arc<ClientMetrics>>,
}

impl fmt::Debug for JrpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JrpcClient")
            .field("endpoint", &self.endpoint.to_string())
            .field("version", &*self.version.lock())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl JrpcClient {
    /// Start configuring a client for `url`
    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    /// Current RPC version tag
    pub fn version(&self) -> String {
        self.version.lock().clone()
    }

    /// Replace the RPC version tag for this client and all its clones
    pub fn set_version(&self, version: impl Into<String>) {
        let version = version.into();
        tracing::debug!(version = %version, "RPC version changed");
        *self.version.lock() = version;
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Headers sent with every call
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    fn context(&self) -> CallContext<'_> {
        CallContext {
            transport: self.transport.as_ref(),
            endpoint: &self.endpoint,
            headers: &self.headers,
            metrics: self.metrics.as_deref(),
        }
    }

    fn version_value(&self) -> Value {
        Value::from(self.version())
    }

    fn positional_body(&self, method: &str, args: &[Value]) -> Result<String> {
        let version = self.version_value();
        envelope::request_with_positional_args(&Value::from(method), None, Some(&version), args)
    }

    fn args_body(&self, method: &str, params: Option<&Value>) -> Result<String> {
        let version = self.version_value();
        envelope::request_call_args(&Value::from(method), None, Some(&version), params)
    }

    /// Call `method` with positional arguments and return the parsed response
    ///
    /// The whole response envelope is returned; a fault in it is not treated
    /// as an error here (see [`call_checked`](Self::call_checked)).
    #[tracing::instrument(skip(self, args), fields(method = %method, args = args.len()))]
    pub async fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let body = self.positional_body(method, args);
        execute(&self.context(), method, body, None).await
    }

    /// Like [`call`](Self::call), recording what went over the wire in `info`
    #[tracing::instrument(skip(self, info, args), fields(method = %method, args = args.len()))]
    pub async fn call_with_info(
        &self,
        info: &mut CallDiagnostics,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        let body = self.positional_body(method, args);
        execute(&self.context(), method, body, Some(info)).await
    }

    /// Call `method` with `params` sent as-is (`null` when `None`)
    #[tracing::instrument(skip(self, params), fields(method = %method))]
    pub async fn call_args(&self, method: &str, params: Option<&Value>) -> Result<Value> {
        let body = self.args_body(method, params);
        execute(&self.context(), method, body, None).await
    }

    /// Like [`call_args`](Self::call_args), recording what went over the wire in `info`
    #[tracing::instrument(skip(self, info, params), fields(method = %method))]
    pub async fn call_args_with_info(
        &self,
        info: &mut CallDiagnostics,
        method: &str,
        params: Option<&Value>,
    ) -> Result<Value> {
        let body = self.args_body(method, params);
        execute(&self.context(), method, body, Some(info)).await
    }

    /// Call `method` and return only its `result`
    ///
    /// An `error` member in the response becomes [`Error::Fault`]. A missing
    /// `result` is returned as `Null`.
    pub async fn call_checked(&self, method: &str, args: &[Value]) -> Result<Value> {
        let response = self.call(method, args).await?;
        into_result(method, response)
    }

    /// Typed call: `params` and the result go through serde
    ///
    /// `params` is sent as the request's `params` member without being
    /// wrapped in an array.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let params = interop::to_value(&params)?;
        let response = self.call_args(method, Some(&params)).await?;
        let result = into_result(method, response)?;
        interop::from_value(&result)
    }
}

fn into_result(method: &str, response: Value) -> Result<Value> {
    if let Some(fault) = RpcFault::from_response(&response) {
        tracing::error!(method = %method, code = fault.code, message = %fault.message, "remote fault");
        return Err(Error::Fault(fault));
    }
    match response {
        Value::Object(mut map) => Ok(map.shift_remove("result").unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpRequest, HttpResponse};
    use async_trait::async_trait;
    use jrpc_core::TransportError;

    /// Answers every POST with a fixed body and keeps the last request
    struct Canned {
        body: String,
        last: Mutex<Option<HttpRequest>>,
    }

    impl Canned {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                last: Mutex::new(None),
            })
        }

        fn last_body(&self) -> String {
            let last = self.last.lock();
            String::from_utf8(last.as_ref().unwrap().body.clone()).unwrap()
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            *self.last.lock() = Some(request);
            Ok(HttpResponse::ok(self.body.clone()))
        }
    }

    fn client(transport: Arc<Canned>) -> JrpcClient {
        JrpcClient::builder("jsonrpc://localhost")
            .with_transport(transport)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_call_envelope() {
        let transport = Canned::new(r#"{"result": 42}"#);
        let client = client(transport.clone());

        client.call("echo", &[]).await.unwrap();
        assert_eq!(transport.last_body(), r#"{ "version" : "1.1", "method" : "echo", "params" : null }"#);

        client.call("add", &[Value::from(1), Value::from(2)]).await.unwrap();
        assert_eq!(
            transport.last_body(),
            r#"{ "version" : "1.1", "method" : "add", "params" : [ 1, 2 ] }"#
        );
    }

    #[tokio::test]
    async fn test_version_shared_between_clones() {
        let transport = Canned::new(r#"{"result": 1}"#);
        let client = client(transport.clone());
        let clone = client.clone();
        assert_eq!(client.version(), DEFAULT_VERSION);

        clone.set_version("2.0");
        assert_eq!(client.version(), "2.0");

        client.call("ping", &[]).await.unwrap();
        assert!(transport.last_body().starts_with(r#"{ "version" : "2.0""#));
    }

    #[tokio::test]
    async fn test_call_checked_result_and_fault() {
        let ok = client(Canned::new(r#"{"version": "1.1", "result": [1, 2]}"#));
        assert_eq!(
            ok.call_checked("list", &[]).await.unwrap(),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );

        let faulty = client(Canned::new(
            r#"{"error": {"name": "JSONRPCError", "code": 404, "message": "no such method"}}"#,
        ));
        match faulty.call_checked("missing", &[]).await {
            Err(Error::Fault(fault)) => {
                assert_eq!(fault.code, 404);
                assert_eq!(fault.message, "no such method");
            }
            other => panic!("Expected fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_typed_request() {
        let transport = Canned::new(r#"{"result": {"sum": 5}}"#);
        let client = client(transport.clone());

        #[derive(serde::Deserialize)]
        struct Sum {
            sum: i64,
        }

        let sum: Sum = client.request("add", vec![2, 3]).await.unwrap();
        assert_eq!(sum.sum, 5);
        assert_eq!(
            transport.last_body(),
            r#"{ "version" : "1.1", "method" : "add", "params" : [ 2, 3 ] }"#
        );
    }
}
