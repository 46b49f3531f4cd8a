//! NAT port forwarding rules
//!
//! Rules are keyed on the router by a wire identifier derived from the
//! rule name (`webui_<name>`), the same scheme the router's web interface
//! uses. The router is the only source of truth: every read lists all rules
//! again, and `set` overwrites any rule with the same identifier.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::{LiveboxError, Result, ResultExt, ValidationError};
use crate::port_range::{format_port_range, parse_port_range};
use crate::protocol::Protocol;
use crate::request::ApiRequest;
use crate::transport::HttpTransport;

/// Service owning port forwarding rules
pub const FIREWALL_SERVICE: &str = "Firewall";

pub const GET_PORT_FORWARDING: &str = "getPortForwarding";
pub const SET_PORT_FORWARDING: &str = "setPortForwarding";
pub const DELETE_PORT_FORWARDING: &str = "deletePortForwarding";

/// Origin marker of rules managed through the web interface
pub const ORIGIN: &str = "webui";

/// Prefix turning a rule name into its wire identifier
pub const ID_PREFIX: &str = "webui_";

/// Interface forwarded traffic arrives on
pub const SOURCE_INTERFACE: &str = "data";

/// Highest valid port number
pub const MAX_PORT: u32 = 65535;

/// A port forwarding rule as configured on the router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortForwarding {
    pub name: String,
    pub protocol: Protocol,
    pub external_port: u32,
    pub internal_port: u32,
    /// Extra ports forwarded after `external_port`; 0 or 1 means none
    pub port_range: u32,
    pub destination: String,
    pub enabled: bool,
}

/// Desired state of a port forwarding rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortForwardingConfig {
    pub name: String,
    pub protocol: Protocol,
    pub external_port: u32,
    pub internal_port: u32,
    #[serde(default)]
    pub port_range: u32,
    pub destination: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PortForwardingConfig {
    /// Check the configuration before it is sent
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        if !(1..=MAX_PORT).contains(&self.external_port) {
            return Err(ValidationError::ExternalPort(self.external_port));
        }

        if !(1..=MAX_PORT).contains(&self.internal_port) {
            return Err(ValidationError::InternalPort(self.internal_port));
        }

        if self.port_range > MAX_PORT {
            return Err(ValidationError::PortRange(self.port_range));
        }

        if !self.protocol.is_supported() {
            return Err(ValidationError::Protocol(self.protocol.to_string()));
        }

        if self.destination.parse::<IpAddr>().is_err() {
            return Err(ValidationError::Destination(self.destination.clone()));
        }

        Ok(())
    }

    /// Envelope for the `setPortForwarding` call
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::new(FIREWALL_SERVICE, SET_PORT_FORWARDING)
            .param("id", wire_id(&self.name))
            .param("description", self.name.as_str())
            .param("protocol", self.protocol.wire_value())
            .param("internalPort", self.internal_port)
            .param("externalPort", format_port_range(self.external_port, self.port_range))
            .param("destinationIPAddress", self.destination.as_str())
            .param("sourcePrefix", "")
            .param("persistent", true)
            .param("enable", self.enabled)
            .param("sourceInterface", SOURCE_INTERFACE)
            .param("origin", ORIGIN)
    }
}

impl From<PortForwardingConfig> for PortForwarding {
    fn from(config: PortForwardingConfig) -> Self {
        Self {
            name: config.name,
            protocol: config.protocol,
            external_port: config.external_port,
            internal_port: config.internal_port,
            port_range: config.port_range,
            destination: config.destination,
            enabled: config.enabled,
        }
    }
}

/// Wire identifier of the rule named `name`
pub fn wire_id(name: &str) -> String {
    format!("{ID_PREFIX}{name}")
}

/// Rule name encoded in a wire identifier
///
/// Identifiers without the prefix are returned unchanged.
pub fn name_from_wire_id(id: &str) -> &str {
    id.strip_prefix(ID_PREFIX).unwrap_or(id)
}

/// Decode `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Port forwarding rule as returned by `getPortForwarding`
///
/// Missing and `null` fields both take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawPortForwarding {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "Origin", deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(rename = "Description", deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "Status", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "SourceInterface", deserialize_with = "null_as_default")]
    pub source_interface: String,
    #[serde(rename = "Protocol", deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(rename = "ExternalPort", deserialize_with = "null_as_default")]
    pub external_port: String,
    #[serde(rename = "InternalPort", deserialize_with = "null_as_default")]
    pub internal_port: String,
    #[serde(rename = "SourcePrefix", deserialize_with = "null_as_default")]
    pub source_prefix: String,
    #[serde(rename = "DestinationIPAddress", deserialize_with = "null_as_default")]
    pub destination_ip_address: String,
    #[serde(rename = "DestinationMACAddress", deserialize_with = "null_as_default")]
    pub destination_mac_address: String,
    #[serde(rename = "LeaseDuration", deserialize_with = "null_as_default")]
    pub lease_duration: i64,
    #[serde(rename = "HairpinNAT", deserialize_with = "null_as_default")]
    pub hairpin_nat: bool,
    #[serde(rename = "SymmetricSNAT", deserialize_with = "null_as_default")]
    pub symmetric_snat: bool,
    #[serde(rename = "UPnPV1Compat", deserialize_with = "null_as_default")]
    pub upnp_v1_compat: bool,
    #[serde(rename = "Enable", deserialize_with = "null_as_default")]
    pub enable: bool,
}

impl RawPortForwarding {
    /// Convert to a [`PortForwarding`] named after the wire identifier `id`
    ///
    /// # Errors
    ///
    /// Returns a decode error if a port field is not numeric.
    pub fn into_port_forwarding(self, id: &str) -> Result<PortForwarding> {
        let (external_port, port_range) =
            parse_port_range(&self.external_port).context("parse port range")?;

        let internal_port = self
            .internal_port
            .parse::<u32>()
            .map_err(|e| LiveboxError::decode(format!("{:?}: {e}", self.internal_port)))
            .context("parse internal port")?;

        Ok(PortForwarding {
            name: name_from_wire_id(id).to_string(),
            protocol: Protocol::from_wire(&self.protocol),
            external_port,
            internal_port,
            port_range,
            destination: self.destination_ip_address,
            enabled: self.enable,
        })
    }
}

impl<T: HttpTransport> Client<T> {
    /// List every port forwarding rule
    ///
    /// The order of the returned rules is not meaningful.
    ///
    /// # Errors
    ///
    /// Fails on request errors and on any rule with malformed ports.
    pub async fn list_port_forwardings(&self) -> Result<Vec<PortForwarding>> {
        let request = ApiRequest::new(FIREWALL_SERVICE, GET_PORT_FORWARDING).param("origin", ORIGIN);

        let status = self.call(&request).await.context("do request")?;

        // a router without rules may answer `null`
        let raw: Option<BTreeMap<String, RawPortForwarding>> =
            serde_json::from_value(status).context("unmarshal data")?;

        let rules = raw
            .unwrap_or_default()
            .into_iter()
            .map(|(id, rule)| rule.into_port_forwarding(&id))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = rules.len(), "listed port forwardings");
        Ok(rules)
    }

    /// Find the rule named `name`
    ///
    /// The API has no single-rule lookup, so this lists all rules.
    ///
    /// # Errors
    ///
    /// Returns [`LiveboxError::NotFound`] if no rule has that name.
    pub async fn get_port_forwarding(&self, name: &str) -> Result<PortForwarding> {
        self.list_port_forwardings()
            .await
            .context("list port forwardings")?
            .into_iter()
            .find(|rule| rule.name == name)
            .ok_or_else(|| LiveboxError::not_found(name))
    }

    /// Create or replace a rule
    ///
    /// The router does not echo the stored rule, so the returned value is
    /// `config` as sent.
    ///
    /// # Errors
    ///
    /// Validation errors abort before any request is made.
    pub async fn upsert_port_forwarding(&self, config: PortForwardingConfig) -> Result<PortForwarding> {
        config.validate().context("validate configuration")?;

        let request = config.to_request();
        self.call(&request).await.context("do request")?;

        debug!(id = %wire_id(&config.name), "port forwarding upserted");
        Ok(config.into())
    }

    /// Delete the rule named `name`
    ///
    /// # Errors
    ///
    /// Fails on request errors, including the router's answer for unknown ids.
    pub async fn delete_port_forwarding(&self, name: &str) -> Result<()> {
        let id = wire_id(name);
        let request = ApiRequest::new(FIREWALL_SERVICE, DELETE_PORT_FORWARDING)
            .param("id", id.as_str())
            .param("origin", ORIGIN);

        self.call(&request).await.context("do request")?;

        debug!(id = %id, "port forwarding deleted");
        Ok(())
    }
}
