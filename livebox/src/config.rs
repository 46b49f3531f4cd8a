//! Client configuration
//!
//! Host and password can be given explicitly or through the environment.
//! An explicit value always wins over the environment.
//!
//! Environment variables:
//! - `LIVEBOX_HOST`: URI exposing the API, e.g. `https://192.168.1.1`
//! - `LIVEBOX_PASSWORD`: administrator password

use std::fmt;

use tracing::debug;
use url::Url;

use crate::error::ConfigError;

/// Environment variable providing the default host
pub const HOST_ENV: &str = "LIVEBOX_HOST";

/// Environment variable providing the default password
pub const PASSWORD_ENV: &str = "LIVEBOX_PASSWORD";

/// Connection settings for [`Client`](crate::Client)
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and authority of the router, without the `/ws` path
    pub host: String,
    pub password: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("password", &"***")
            .finish()
    }
}

impl ClientConfig {
    /// Build and validate a configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the host or password is empty or the host is
    /// not an absolute http(s) URI.
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        let config = Self {
            host: host.trim_end_matches('/').to_string(),
            password: password.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolve from explicit values with the process environment as fallback
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::new`].
    pub fn resolve(host: Option<String>, password: Option<String>) -> Result<Self, ConfigError> {
        Self::resolve_with(host, password, |name| std::env::var(name).ok())
    }

    /// Resolve from explicit values with `lookup` as fallback
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::new`].
    pub fn resolve_with(
        host: Option<String>,
        password: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let host = match host {
            Some(host) => host,
            None => {
                debug!("host taken from {}", HOST_ENV);
                lookup(HOST_ENV).unwrap_or_default()
            }
        };

        let password = match password {
            Some(password) => password,
            None => {
                debug!("password taken from {}", PASSWORD_ENV);
                lookup(PASSWORD_ENV).unwrap_or_default()
            }
        };

        Self::new(host, password)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::MissingHost { env: HOST_ENV });
        }

        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword { env: PASSWORD_ENV });
        }

        let url = Url::parse(&self.host).map_err(|e| ConfigError::InvalidHost {
            host: self.host.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidHost {
                host: self.host.clone(),
                reason: format!("unsupported scheme {:?}; must be http or https", url.scheme()),
            });
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidHost {
                host: self.host.clone(),
                reason: "missing host".into(),
            });
        }

        Ok(())
    }
}
