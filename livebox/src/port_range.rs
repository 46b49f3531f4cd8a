//! Port range text encoding
//!
//! The router writes a forwarded external port either as a single port
//! (`"8080"`) or as a dashed range (`"10000-10005"`). Ranges are exposed as a
//! start port plus an extent (`10000`, `5`).

use std::num::ParseIntError;

use thiserror::Error;

/// Errors produced when parsing port range text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortRangeError {
    #[error("parse external port {text:?}: {source}")]
    Start {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("parse external port range end {text:?}: {source}")]
    End {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("range end {end} precedes start {start}")]
    Reversed { start: u32, end: u32 },
}

/// Parse `"<port>"` or `"<start>-<end>"` into `(port, extent)`
///
/// Only the first dash splits the text. A single port has an extent of 0.
///
/// # Errors
///
/// Returns [`PortRangeError`] if a segment is not an unsigned integer or if
/// the end precedes the start.
pub fn parse_port_range(text: &str) -> Result<(u32, u32), PortRangeError> {
    let (start, end) = match text.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (text, None),
    };

    let port = start.parse::<u32>().map_err(|source| PortRangeError::Start {
        text: start.to_string(),
        source,
    })?;

    let Some(end) = end else {
        return Ok((port, 0));
    };

    let end = end.parse::<u32>().map_err(|source| PortRangeError::End {
        text: end.to_string(),
        source,
    })?;

    let extent = end
        .checked_sub(port)
        .ok_or(PortRangeError::Reversed { start: port, end })?;

    Ok((port, extent))
}

/// Inverse of [`parse_port_range`]
///
/// An extent of 0 or 1 both produce a plain port. Reconciliation against
/// router state relies on this exact output, so it must stay stable.
/// The range end saturates at `u32::MAX` for unvalidated input.
pub fn format_port_range(port: u32, extent: u32) -> String {
    if extent <= 1 {
        return port.to_string();
    }

    format!("{}-{}", port, port.saturating_add(extent))
}
