//! Integration tests for the livebox client
//!
//! Every test drives a real [`livebox::Client`] against [`MockRouter`], an
//! in-memory transport that replays scripted responses and records the
//! requests it receives. No network access is needed.
//!
//! # Test Organization
//!
//! - `session`: login and client construction
//! - `port_forwarding`: list/get/upsert/delete end to end
//! - `cookies`: session cookie handling through the full transport stack

pub mod cookies;
pub mod port_forwarding;
pub mod session;

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use parking_lot::Mutex;
use serde_json::{json, Value};

use livebox::{Client, HttpTransport, TransportError};

pub const HOST: &str = "http://livebox.home";
pub const PASSWORD: &str = "hunter2";
pub const CONTEXT_ID: &str = "tFQ8hXu5/sWpV0mc";

/// A request as seen by the router
#[derive(Debug, Clone)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub cookie: Option<String>,
    pub body: Value,
}

/// Scripted router
#[derive(Default)]
pub struct MockRouter {
    responses: Mutex<VecDeque<Result<Response<Bytes>, TransportError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockRouter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response with a JSON body
    pub fn respond(&self, body: Value) -> &Self {
        self.respond_with(200, &[], body)
    }

    /// Queue a response with a status, extra headers and a JSON body
    pub fn respond_with(&self, status: u16, headers: &[(&str, &str)], body: Value) -> &Self {
        let mut builder = Response::builder().status(status);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let response = builder
            .body(Bytes::from(body.to_string()))
            .expect("valid response");
        self.responses.lock().push_back(Ok(response));
        self
    }

    /// Queue a raw body
    pub fn respond_raw(&self, body: &'static str) -> &Self {
        let response = Response::builder()
            .status(200)
            .body(Bytes::from_static(body.as_bytes()))
            .expect("valid response");
        self.responses.lock().push_back(Ok(response));
        self
    }

    /// Queue a transport failure
    pub fn fail(&self, reason: &str) -> &Self {
        self.responses
            .lock()
            .push_back(Err(TransportError::request_failed(HOST, reason)));
        self
    }

    /// Queue a successful login
    pub fn login_ok(&self) -> &Self {
        self.respond(json!({"status": 0, "data": {"contextID": CONTEXT_ID, "username": "admin"}}))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("at least one request")
    }
}

#[async_trait]
impl HttpTransport for MockRouter {
    async fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        assert_eq!(request.method(), http::Method::POST);
        assert_eq!(request.uri().path(), "/ws");

        let header = |name: http::header::HeaderName| {
            request
                .headers()
                .get(name)
                .map(|v| v.to_str().expect("ASCII header").to_string())
        };

        self.requests.lock().push(Recorded {
            authorization: header(http::header::AUTHORIZATION),
            content_type: header(http::header::CONTENT_TYPE),
            cookie: header(http::header::COOKIE),
            body: serde_json::from_slice(request.body()).expect("JSON request body"),
        });

        self.responses
            .lock()
            .pop_front()
            .expect("unexpected request: no scripted response left")
    }
}

/// Logged-in client over a fresh mock router
pub async fn connected() -> (Client<Arc<MockRouter>>, Arc<MockRouter>) {
    let router = MockRouter::new();
    router.login_ok();

    let client = Client::with_transport(HOST, PASSWORD, router.clone())
        .await
        .expect("login succeeds");

    (client, router)
}
