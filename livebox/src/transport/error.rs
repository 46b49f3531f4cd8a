//! Transport layer error types

use thiserror::Error;

/// Transport layer errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// URI could not be built or parsed
    #[error("invalid URI {uri:?}: {reason}")]
    InvalidUri {
        /// Offending URI
        uri: String,
        /// Failure reason
        reason: String,
    },

    /// HTTP request building failed
    #[error("HTTP request building failed: {0}")]
    RequestBuild(#[from] http::Error),

    /// Header value could not be represented
    #[error("invalid {name} header: {reason}")]
    InvalidHeader {
        /// Header name
        name: String,
        /// Failure reason
        reason: String,
    },

    /// Request could not be sent or no response was received
    #[error("request to {uri} failed: {reason}")]
    RequestFailed {
        /// Target URI
        uri: String,
        /// Failure reason
        reason: String,
    },

    /// Response body could not be read
    #[error("failed to read response body from {uri}: {reason}")]
    BodyRead {
        /// Target URI
        uri: String,
        /// Failure reason
        reason: String,
    },
}

impl TransportError {
    /// Create an invalid URI error
    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Create a request failure error
    pub fn request_failed(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RequestFailed {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
