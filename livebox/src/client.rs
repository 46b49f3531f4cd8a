//! Livebox API client
//!
//! A [`Client`] is one logged-in session. It is meant to be short-lived: the
//! router drops the session after roughly five minutes and the client does
//! not log in again. Once expired, calls fail with an API error.

use serde_json::Value;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{Result, ResultExt};
use crate::request::{ApiRequest, RequestExecutor};
use crate::session::{self, SessionToken};
use crate::transport::{CookieJar, CookieNamePatcher, HttpTransport, HyperTransport};

/// Transport stack used by [`Client::connect`]
pub type LiveboxTransport = CookieJar<CookieNamePatcher<HyperTransport>>;

/// Build the production transport stack
pub fn default_transport() -> LiveboxTransport {
    CookieJar::new(CookieNamePatcher::new(HyperTransport::new()))
}

/// Authenticated client for the Livebox API
pub struct Client<T = LiveboxTransport> {
    executor: RequestExecutor<T>,
    token: SessionToken,
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("executor", &self.executor)
            .field("token", &self.token)
            .finish()
    }
}

impl Client {
    /// Connect to `host` and log in with `password`
    ///
    /// `host` must include the scheme (`http` or `https`). HTTPS is
    /// recommended even though the router's certificate cannot be verified.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is invalid or login fails.
    pub async fn connect(host: &str, password: &str) -> Result<Self> {
        Self::with_transport(host, password, default_transport()).await
    }

    /// Connect using a resolved [`ClientConfig`]
    ///
    /// # Errors
    ///
    /// See [`Client::connect`].
    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate().context("validate client configuration")?;
        Self::connect(&config.host, &config.password).await
    }
}

impl<T: HttpTransport> Client<T> {
    /// Log in over a caller-supplied transport
    ///
    /// # Errors
    ///
    /// Returns an error if the host is invalid or login fails.
    pub async fn with_transport(host: &str, password: &str, transport: T) -> Result<Self> {
        let executor = RequestExecutor::new(host, transport).context("create client")?;
        let token = session::login(&executor, password).await.context("login")?;

        info!(endpoint = %executor.endpoint(), "logged in to Livebox");

        Ok(Self { executor, token })
    }

    /// API endpoint this client talks to
    pub fn endpoint(&self) -> &http::Uri {
        self.executor.endpoint()
    }

    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// Send an authenticated envelope and return its `status` payload
    ///
    /// # Errors
    ///
    /// Transport, decode, and API errors.
    pub async fn call(&self, request: &ApiRequest) -> Result<Value> {
        self.executor.authenticated_call(&self.token, request).await
    }
}
