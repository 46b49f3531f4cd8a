//! Cookie store decorator
//!
//! Keeps the cookies set by the router and replays them on later requests.
//! The store is a conformant one: cookies with invalid names never make it
//! in, which is why [`CookieNamePatcher`](super::CookieNamePatcher) must sit
//! below this layer.

use async_trait::async_trait;
use bytes::Bytes;
use cookie_store::CookieStore;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue, Request, Response, Uri};
use parking_lot::Mutex;
use tracing::debug;
use url::Url;

use super::{HttpTransport, TransportError};

/// Transport decorator backed by an in-memory cookie store
pub struct CookieJar<T> {
    inner: T,
    store: Mutex<CookieStore>,
}

impl<T> std::fmt::Debug for CookieJar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieJar")
            .field("cookies", &self.store.lock().iter_unexpired().count())
            .finish_non_exhaustive()
    }
}

impl<T> CookieJar<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            store: Mutex::new(CookieStore::default()),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Names and values of the unexpired cookies currently stored
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.store
            .lock()
            .iter_unexpired()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect()
    }

    fn cookie_header(&self, url: &Url) -> Option<String> {
        let store = self.store.lock();
        let pairs: Vec<String> = store
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect();

        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    fn store_cookies(&self, url: &Url, headers: &HeaderMap) {
        let mut store = self.store.lock();
        for value in headers.get_all(SET_COOKIE) {
            let Ok(value) = value.to_str() else {
                debug!("ignoring non-ASCII Set-Cookie header");
                continue;
            };
            if let Err(e) = store.parse(value, url) {
                debug!(error = %e, "cookie rejected by store");
            }
        }
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for CookieJar<T> {
    async fn round_trip(&self, mut request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let url = request_url(request.uri())?;

        if let Some(cookies) = self.cookie_header(&url) {
            let value = HeaderValue::from_str(&cookies)
                .map_err(|e| TransportError::invalid_header(COOKIE.as_str(), e.to_string()))?;
            request.headers_mut().insert(COOKIE, value);
        }

        let response = self.inner.round_trip(request).await?;

        self.store_cookies(&url, response.headers());

        Ok(response)
    }
}

fn request_url(uri: &Uri) -> Result<Url, TransportError> {
    let uri = uri.to_string();
    Url::parse(&uri).map_err(|e| TransportError::invalid_uri(uri, e.to_string()))
}
