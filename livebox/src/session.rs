//! Session establishment
//!
//! Logging in creates a context on the router and returns its identifier,
//! which authenticates every later call. The router expires the context
//! after a few minutes of inactivity; nothing here renews it.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{LiveboxError, Result};
use crate::request::{is_empty_payload, ApiRequest, RequestExecutor};
use crate::transport::HttpTransport;

/// Service handling authentication
pub const IDENTIFICATION_SERVICE: &str = "sah.Device.Information";

/// Method creating a session context
pub const CREATE_CONTEXT_METHOD: &str = "createContext";

/// Application name presented at login, same as the router's web UI
pub const APPLICATION_NAME: &str = "webui";

/// The router only has one administrative account
pub const USERNAME: &str = "admin";

/// Opaque session identifier returned by login
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, as sent in the authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    data: Option<LoginData>,
    #[serde(default)]
    errors: Value,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(rename = "contextID", default)]
    context_id: Option<String>,
}

/// Envelope for the context creation call
pub fn create_context_request(password: &str) -> ApiRequest {
    ApiRequest::new(IDENTIFICATION_SERVICE, CREATE_CONTEXT_METHOD)
        .param("applicationName", APPLICATION_NAME)
        .param("username", USERNAME)
        .param("password", password)
}

/// Extract the session token from a login response body
///
/// # Errors
///
/// Returns an API error if the response carries errors, and a decode error
/// if the body is not JSON or has no context identifier.
pub fn parse_login_response(body: &[u8]) -> Result<SessionToken> {
    let response: LoginResponse = serde_json::from_slice(body)?;

    if !is_empty_payload(&response.errors) {
        return Err(LiveboxError::Api {
            errors: response.errors,
        });
    }

    match response.data.and_then(|d| d.context_id) {
        Some(id) if !id.is_empty() => Ok(SessionToken(id)),
        _ => Err(LiveboxError::decode("login response has no data.contextID")),
    }
}

/// Log in and return the session token
///
/// # Errors
///
/// Transport, decode and API errors all abort; there is no retry.
pub async fn login<T: HttpTransport>(executor: &RequestExecutor<T>, password: &str) -> Result<SessionToken> {
    debug!(endpoint = %executor.endpoint(), "creating session context");

    let response = executor.login_call(&create_context_request(password)).await?;
    let token = parse_login_response(response.body())?;

    debug!("session context created");
    Ok(token)
}
