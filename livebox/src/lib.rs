//! livebox: client for the Livebox router API
//!
//! This crate talks to the JSON-over-HTTP API served by Livebox home routers
//! and manages their NAT port forwarding rules.
//!
//! # Architecture
//!
//! ```text
//! Client::{list,get,upsert,delete}_port_forwarding(s)
//!        |
//!        v
//! RequestExecutor        {service, method, parameters} -> {status, errors}
//!        |
//!        v
//! CookieJar -> CookieNamePatcher -> HyperTransport -> POST <host>/ws
//! ```
//!
//! A client logs in once when constructed and keeps the session token for
//! its whole life. Sessions expire on the router after a few minutes and are
//! not renewed, so clients should be created per batch of operations.
//!
//! # Quick Start
//!
//! ```no_run
//! use livebox::{Client, PortForwardingConfig, Protocol};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::connect("https://192.168.1.1", "password").await?;
//!
//! client
//!     .upsert_port_forwarding(PortForwardingConfig {
//!         name: "wireguard".into(),
//!         protocol: Protocol::Udp,
//!         external_port: 51820,
//!         internal_port: 51820,
//!         port_range: 0,
//!         destination: "192.168.1.200".into(),
//!         enabled: true,
//!     })
//!     .await?;
//!
//! for rule in client.list_port_forwardings().await? {
//!     println!("{} -> {}:{}", rule.external_port, rule.destination, rule.internal_port);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`]: Authenticated client
//! - [`config`]: Host and password resolution
//! - [`error`]: Error types
//! - [`port_forwarding`]: Port forwarding rules
//! - [`port_range`]: Port range text encoding
//! - [`protocol`]: Protocol wire encoding
//! - [`request`]: Request/response envelope
//! - [`session`]: Login
//! - [`transport`]: HTTP transport and cookie handling

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod config;
pub mod error;
pub mod port_forwarding;
pub mod port_range;
pub mod protocol;
pub mod request;
pub mod session;
pub mod transport;

// Re-export commonly used types at the crate root
pub use client::{default_transport, Client, LiveboxTransport};
pub use config::ClientConfig;
pub use error::{ConfigError, ErrorKind, LiveboxError, Result, ResultExt, ValidationError};
pub use port_forwarding::{PortForwarding, PortForwardingConfig};
pub use port_range::{format_port_range, parse_port_range, PortRangeError};
pub use protocol::Protocol;
pub use request::{ApiRequest, ApiResponse, RequestExecutor};
pub use session::SessionToken;
pub use transport::{CookieJar, CookieNamePatcher, HttpTransport, HyperTransport, TransportError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
