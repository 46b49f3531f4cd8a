//! Session cookie name patching
//!
//! The router's session cookie is named `<id>/sessid`. `/` is not allowed in
//! a cookie name, so the name is stored as `<id>-sessid` and restored just
//! before a request hits the wire. Only cookie names are rewritten; values
//! and attributes pass through byte for byte.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, Request, Response};
use tracing::trace;

use super::{HttpTransport, TransportError};

/// Cookie name fragment as sent by the router
pub const REAL_COOKIE_NAME: &str = "/sessid";

/// Cookie name fragment as kept in the cookie store
pub const PATCHED_COOKIE_NAME: &str = "-sessid";

/// Transport decorator renaming the session cookie in both directions
#[derive(Debug, Clone, Default)]
pub struct CookieNamePatcher<T> {
    inner: T,
}

impl<T> CookieNamePatcher<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for CookieNamePatcher<T> {
    async fn round_trip(&self, mut request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        rewrite_header(request.headers_mut(), &COOKIE, restore_cookie)?;

        let mut response = self.inner.round_trip(request).await?;

        rewrite_header(response.headers_mut(), &SET_COOKIE, patch_set_cookie)?;

        Ok(response)
    }
}

/// Restore the real session cookie name in a `Cookie` header value
///
/// Returns `None` when the value holds no patched name.
pub fn restore_cookie(value: &str) -> Option<String> {
    if !value.contains(PATCHED_COOKIE_NAME) {
        return None;
    }

    let pairs: Vec<String> = value
        .split(';')
        .map(|pair| rename(pair, PATCHED_COOKIE_NAME, REAL_COOKIE_NAME))
        .collect();
    let restored = pairs.join(";");

    (restored != value).then_some(restored)
}

/// Replace the real session cookie name in a `Set-Cookie` header value
///
/// Returns `None` when the cookie name does not contain the real name.
pub fn patch_set_cookie(value: &str) -> Option<String> {
    if !value.contains(REAL_COOKIE_NAME) {
        return None;
    }

    // Attributes follow the first ';' and are never touched.
    let (pair, attributes) = match value.find(';') {
        Some(idx) => value.split_at(idx),
        None => (value, ""),
    };
    let patched = format!("{}{}", rename(pair, REAL_COOKIE_NAME, PATCHED_COOKIE_NAME), attributes);

    (patched != value).then_some(patched)
}

/// Substitute `from` with `to` in the name part of a `name=value` pair
fn rename(pair: &str, from: &str, to: &str) -> String {
    match pair.split_once('=') {
        Some((name, value)) => format!("{}={}", name.replace(from, to), value),
        None => pair.replace(from, to),
    }
}

fn rewrite_header(
    headers: &mut HeaderMap,
    name: &HeaderName,
    rewrite: fn(&str) -> Option<String>,
) -> Result<(), TransportError> {
    let mut changed = false;
    let mut values = Vec::new();

    for value in headers.get_all(name) {
        match value.to_str().ok().and_then(rewrite) {
            Some(rewritten) => {
                let rewritten = HeaderValue::from_str(&rewritten)
                    .map_err(|e| TransportError::invalid_header(name.as_str(), e.to_string()))?;
                values.push(rewritten);
                changed = true;
            }
            None => values.push(value.clone()),
        }
    }

    if changed {
        trace!(header = %name, "renamed session cookie");
        headers.remove(name);
        for value in values {
            headers.append(name.clone(), value);
        }
    }

    Ok(())
}
