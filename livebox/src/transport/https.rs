//! hyper-based transport
//!
//! Plain `http` and `https` hosts are both accepted. Timeouts and connection
//! pooling are whatever hyper's legacy client does by default.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::trace;

use super::tls::insecure_client_config;
use super::{HttpTransport, TransportError};

/// Transport sending requests over the network with hyper
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Build a transport that skips certificate validation
    #[must_use]
    pub fn new() -> Self {
        let https = HttpsConnectorBuilder::new()
            .with_tls_config(insecure_client_config())
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https);

        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for HyperTransport {
    async fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let uri = request.uri().to_string();
        trace!(uri = %uri, method = %request.method(), "sending request");

        let response = self
            .client
            .request(request.map(Full::new))
            .await
            .map_err(|e| TransportError::request_failed(&uri, e.to_string()))?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TransportError::BodyRead {
                uri: uri.clone(),
                reason: e.to_string(),
            })?
            .to_bytes();

        trace!(uri = %uri, status = %parts.status, bytes = body.len(), "received response");

        Ok(Response::from_parts(parts, body))
    }
}
