//! HTTP transport layer
//!
//! Every API call is a single request/response exchange through an
//! [`HttpTransport`]. The production stack is built from decorators:
//!
//! ```text
//! Client
//!   |
//!   v
//! CookieJar           stores Set-Cookie, attaches Cookie
//!   |
//!   v
//! CookieNamePatcher   "-sessid" <-> "/sessid"
//!   |
//!   v
//! HyperTransport      hyper + rustls, certificate validation disabled
//!   |
//!   v
//! Livebox
//! ```
//!
//! The cookie-name patcher exists because the router names its session
//! cookie with a `/`, which is not a valid cookie-name character. A
//! conformant cookie store drops such cookies, so the name is rewritten to a
//! store-safe form on the way in and restored on the way out.

mod cookie;
mod error;
mod https;
mod jar;
mod tls;

pub use cookie::{
    patch_set_cookie, restore_cookie, CookieNamePatcher, PATCHED_COOKIE_NAME, REAL_COOKIE_NAME,
};
pub use error::TransportError;
pub use https::HyperTransport;
pub use jar::CookieJar;
pub use tls::insecure_client_config;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};

/// A single HTTP round trip with fully buffered bodies
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the complete response
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the exchange fails. HTTP error statuses
    /// are not errors at this layer.
    async fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        (**self).round_trip(request).await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    async fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        (**self).round_trip(request).await
    }
}
