//! Error types for the Livebox client
//!
//! Errors are grouped by subsystem and aggregated by [`LiveboxError`]. Each
//! layer wraps the error it propagates with the name of the operation that
//! failed (see [`ResultExt::context`]), so a failure reads as a chain such as
//! `upsert port forwarding: do request: API error: [...]`.

use serde_json::Value;
use thiserror::Error;

use crate::port_range::PortRangeError;
use crate::transport::TransportError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LiveboxError>;

/// Top-level error type for the Livebox client
#[derive(Debug, Error)]
pub enum LiveboxError {
    /// Network or HTTP failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed JSON
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON with an unexpected shape or content
    #[error("unexpected response: {reason}")]
    Decode {
        /// What was wrong with the payload
        reason: String,
    },

    /// Invalid port range text received from the router
    #[error("invalid port range: {0}")]
    PortRange(#[from] PortRangeError),

    /// The router answered with a non-empty `errors` payload
    #[error("API error: {errors}")]
    Api {
        /// Raw `errors` payload, kept verbatim for diagnostics
        errors: Value,
    },

    /// Input rejected before any network call
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Logical lookup miss
    #[error("port forwarding {name:?} not found")]
    NotFound {
        /// Name that was looked up
        name: String,
    },

    /// Client configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An inner error annotated with the operation that failed
    #[error("{operation}: {source}")]
    Context {
        /// Name of the failed operation
        operation: &'static str,
        /// Underlying error
        #[source]
        source: Box<LiveboxError>,
    },
}

/// Error categories, independent of the context chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network/HTTP failure
    Transport,
    /// Malformed JSON or unexpected shape
    Decode,
    /// Non-empty `errors` payload from the router
    Api,
    /// Client-side input rejected
    Validation,
    /// Lookup miss
    NotFound,
    /// Invalid client configuration
    Config,
}

impl LiveboxError {
    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Wrap this error with the name of the operation that failed
    #[must_use]
    pub fn context(self, operation: &'static str) -> Self {
        Self::Context {
            operation,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping every context layer
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Category of the root error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Context { source, .. } => source.kind(),
            Self::Transport(_) => ErrorKind::Transport,
            Self::Json(_) | Self::Decode { .. } | Self::PortRange(_) => ErrorKind::Decode,
            Self::Api { .. } => ErrorKind::Api,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Operations recorded on the chain, outermost first
    pub fn operations(&self) -> Vec<&'static str> {
        let mut operations = Vec::new();
        let mut current = self;
        while let Self::Context { operation, source } = current {
            operations.push(*operation);
            current = source;
        }
        operations
    }

    /// Raw `errors` payload if the root error is an API error
    pub fn api_errors(&self) -> Option<&Value> {
        match self.root() {
            Self::Api { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Attach operation names to fallible results
pub trait ResultExt<T> {
    /// Wrap the error, if any, with `operation`
    ///
    /// # Errors
    ///
    /// Returns the error wrapped in [`LiveboxError::Context`].
    fn context(self, operation: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<LiveboxError>,
{
    fn context(self, operation: &'static str) -> Result<T> {
        self.map_err(|e| e.into().context(operation))
    }
}

/// Port forwarding configuration rejected before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty name")]
    EmptyName,

    #[error("invalid external port {0}; must be between 1 and 65535")]
    ExternalPort(u32),

    #[error("invalid internal port {0}; must be between 1 and 65535")]
    InternalPort(u32),

    #[error("invalid port range {0}; must be between 0 and 65535")]
    PortRange(u32),

    #[error("invalid protocol {0:?}; must be one of: \"tcp\", \"udp\" or \"tcp/udp\"")]
    Protocol(String),

    #[error("invalid destination {0:?}; must be a valid IP address")]
    Destination(String),
}

/// Client configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No host given explicitly nor through the environment
    #[error("missing Livebox host; set it explicitly or through the {env} environment variable")]
    MissingHost {
        /// Environment variable consulted
        env: &'static str,
    },

    /// No password given explicitly nor through the environment
    #[error("missing Livebox password; set it explicitly or through the {env} environment variable")]
    MissingPassword {
        /// Environment variable consulted
        env: &'static str,
    },

    /// Host is not an absolute http(s) URI
    #[error("invalid Livebox host {host:?}: {reason}")]
    InvalidHost {
        /// Offending value
        host: String,
        /// Why it was rejected
        reason: String,
    },
}
