//! Transport protocol of a port forwarding rule
//!
//! The router encodes protocols as IANA protocol numbers in a string:
//! `"6"` (TCP), `"17"` (UDP) and `"6,17"` (both).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Protocol used for port forwarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Wire value not recognized. Only produced when decoding.
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "tcp")]
    Tcp,
    #[serde(rename = "udp")]
    Udp,
    #[serde(rename = "tcp/udp")]
    TcpUdp,
}

impl Protocol {
    /// Protocols that can be sent to the router
    pub const SUPPORTED: [Protocol; 3] = [Protocol::Tcp, Protocol::Udp, Protocol::TcpUdp];

    /// Router wire encoding. `Unknown` encodes to an empty string.
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::Tcp => "6",
            Self::Udp => "17",
            Self::TcpUdp => "6,17",
            Self::Unknown => "",
        }
    }

    /// Decode a router wire value, falling back to `Unknown`
    pub fn from_wire(value: &str) -> Self {
        match value {
            "6" => Self::Tcp,
            "17" => Self::Udp,
            "6,17" => Self::TcpUdp,
            _ => Self::Unknown,
        }
    }

    /// Human-readable name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::TcpUdp => "tcp/udp",
            Self::Unknown => "unknown",
        }
    }

    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ValidationError;

    /// Parse one of `tcp`, `udp` or `tcp/udp` (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::Protocol(s.to_string()))
    }
}
