//! Generic request/response envelope and the executor sending it
//!
//! Every API call is a POST to `<host>/ws` with a JSON body of the form
//! `{"method": ..., "service": ..., "parameters": {...}}`. Responses carry an
//! opaque `status` payload and an `errors` payload that is empty on success.

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Request, Response, Uri};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{LiveboxError, Result};
use crate::session::SessionToken;
use crate::transport::{HttpTransport, TransportError};

/// Path of the API endpoint, relative to the host
pub const ENDPOINT_PATH: &str = "/ws";

/// Content type of every API call
pub const CALL_CONTENT_TYPE: &str = "application/x-sah-ws-4-call+json";

/// Authorization header value for unauthenticated calls
pub const LOGIN_AUTHORIZATION: &str = "X-Sah-Login";

/// Authorization scheme, followed by the session token
pub const AUTHORIZATION_SCHEME: &str = "X-Sah";

/// Request envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: String,
    pub service: String,
    pub parameters: Map<String, Value>,
}

impl ApiRequest {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            service: service.into(),
            parameters: Map::new(),
        }
    }

    /// Add a named parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// Response envelope
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub errors: Value,
}

impl ApiResponse {
    /// The `status` payload, or an API error if `errors` is not empty
    ///
    /// # Errors
    ///
    /// Returns [`LiveboxError::Api`] carrying the raw `errors` payload.
    pub fn into_result(self) -> Result<Value> {
        if is_empty_payload(&self.errors) {
            Ok(self.status)
        } else {
            Err(LiveboxError::Api {
                errors: self.errors,
            })
        }
    }
}

/// Whether an `errors` payload means success
///
/// Absent, `null`, `""`, `[]` and `{}` are all empty.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Sends envelopes to the router's API endpoint
pub struct RequestExecutor<T> {
    endpoint: Uri,
    transport: T,
}

impl<T> std::fmt::Debug for RequestExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("endpoint", &self.endpoint.to_string())
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport> RequestExecutor<T> {
    /// Create an executor for `host` (scheme and authority, e.g. `https://192.168.1.1`)
    ///
    /// # Errors
    ///
    /// Returns a transport error if `<host>/ws` is not a valid URI.
    pub fn new(host: &str, transport: T) -> Result<Self> {
        let endpoint = format!("{}{ENDPOINT_PATH}", host.trim_end_matches('/'));
        let endpoint = endpoint
            .parse::<Uri>()
            .map_err(|e| TransportError::invalid_uri(&endpoint, e.to_string()))?;

        Ok(Self { endpoint, transport })
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send an authenticated call and return its `status` payload
    ///
    /// # Errors
    ///
    /// Fails on transport errors, malformed envelopes and non-empty
    /// `errors` payloads, whatever the HTTP status.
    pub async fn authenticated_call(&self, token: &SessionToken, request: &ApiRequest) -> Result<Value> {
        let authorization = format!("{AUTHORIZATION_SCHEME} {}", token.expose());
        let response = self.send(request, &authorization).await?;

        let envelope: ApiResponse = serde_json::from_slice(response.body())?;
        envelope.into_result()
    }

    /// Send an unauthenticated call and return the raw response
    ///
    /// # Errors
    ///
    /// Fails on transport errors only; the body is not inspected.
    pub async fn login_call(&self, request: &ApiRequest) -> Result<Response<Bytes>> {
        self.send(request, LOGIN_AUTHORIZATION).await
    }

    async fn send(&self, request: &ApiRequest, authorization: &str) -> Result<Response<Bytes>> {
        let body = serde_json::to_vec(request)?;

        let http_request = Request::post(self.endpoint.clone())
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, CALL_CONTENT_TYPE)
            .body(Bytes::from(body))
            .map_err(TransportError::from)?;

        debug!(service = %request.service, method = %request.method, "calling API");

        let response = self.transport.round_trip(http_request).await?;

        if !response.status().is_success() {
            debug!(
                service = %request.service,
                method = %request.method,
                status = %response.status(),
                "API answered with non-success status"
            );
        }

        Ok(response)
    }
}
