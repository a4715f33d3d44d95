//! ASHTTP core library for decoding base64-encoded binary query values.
//!
//! Mobile-groupware clients may send their request parameters as a compact
//! binary query instead of a plain URL query string. This crate turns that
//! untrusted payload into a validated `DecodedQuery`:
//! the transport adapter strips the URL and base64 layers, the query decoder
//! (layout/reader/parser) walks the byte stream once, and `QueryView` renders
//! the result with derived display fields.
//!
//! Invariants:
//! - Decoding is all-or-nothing; every failure is a distinct `QueryError`.
//! - No byte is read before its length prefix has been validated.
//! - Command names are resolved only for presentation, never while decoding.
//!
//! # Examples
//! ```
//! use ashttp_core::{QueryView, parse_base64_query};
//!
//! let query = parse_base64_query("oQkECBCeDEK6NjuTWKLjgUH2WCxdBIIanKgLV2luZG93c01haWw=")?;
//! let view = QueryView::from(&query);
//! assert_eq!(view.command_name, "FolderSync");
//! assert_eq!(view.device_id, "9e0c42ba363b9358a2e38141f6582c5d");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod command;
mod common;
mod query;
mod transport;

pub use command::{Command, command_name};
pub use query::{DecodedQuery, QueryError, parse_query};
pub use transport::{ParseError, decode_base64_query, parse_base64_query};

/// Query value used by the CLI when none is supplied.
pub const EXAMPLE_QUERY: &str = "oQkECBCeDEK6NjuTWKLjgUH2WCxdBIIanKgLV2luZG93c01haWw=";

/// Display rendering of a decoded query.
///
/// # Examples
/// ```
/// use ashttp_core::{QueryView, parse_query};
///
/// let query = parse_query(&[141, 99, 0x09, 0x04, 1, 0xab])?;
/// let view = QueryView::from(&query);
/// assert_eq!(view.command_name, "Unknown(99)");
/// assert_eq!(view.device_id, "ab");
/// assert!(view.policy_key.is_none());
/// # Ok::<(), ashttp_core::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryView {
    /// Opaque protocol version tag.
    pub protocol_version: u8,
    /// Raw command code.
    pub command_code: u8,
    /// Resolved command name, or `Unknown(<code>)`.
    pub command_name: String,
    /// Opaque locale identifier.
    pub locale: u16,
    /// Device id as lowercase hex.
    pub device_id: String,
    /// Policy key, when the client sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_key: Option<u32>,
    /// Device type label (invalid UTF-8 is replaced).
    pub device_type: String,
    /// Command parameters as lowercase hex.
    pub command_params: String,
}

impl From<&DecodedQuery> for QueryView {
    fn from(query: &DecodedQuery) -> Self {
        Self {
            protocol_version: query.protocol_version,
            command_code: query.command_code,
            command_name: query.command_name().into_owned(),
            locale: query.locale,
            device_id: query.device_id_hex(),
            policy_key: query.policy_key,
            device_type: query.device_type_lossy().into_owned(),
            command_params: common::hex_lower(&query.command_params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryView, parse_query};

    #[test]
    fn view_omits_absent_policy_key() {
        let query = parse_query(&[1, 0, 0, 0, 1, 0x42]).unwrap();
        let json = serde_json::to_value(QueryView::from(&query)).unwrap();
        assert!(json.get("policy_key").is_none());
        assert_eq!(json["command_name"], "Sync");
        assert_eq!(json["device_type"], "");
        assert_eq!(json["command_params"], "");
    }

    #[test]
    fn view_replaces_invalid_device_type_bytes() {
        let query = parse_query(&[1, 18, 0, 0, 1, 0x42, 0, 2, 0xff, b'x', 0x01]).unwrap();
        let view = QueryView::from(&query);
        assert_eq!(view.command_name, "Ping");
        assert_eq!(view.device_type, "\u{fffd}x");
        assert_eq!(view.command_params, "01");
    }
}
