//! Base64 transport for query values.
//!
//! Clients carry the binary query as a standard base64 value in the request
//! URL. The adapter accepts the bare value, a `?`-prefixed query string or a
//! full request URL, undoes percent-encoding, decodes the base64 to bytes and
//! hands off to `parse_query`. An empty value decodes to zero bytes and is
//! rejected by the decoder as too short.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::query::{DecodedQuery, QueryError, parse_query};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid base64 query: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Decodes the base64 query value carried by `input` into raw bytes.
///
/// # Examples
/// ```
/// use ashttp_core::decode_base64_query;
///
/// let bytes = decode_base64_query("/Microsoft-Server-ActiveSync?jQEJBAE%3D")?;
/// assert_eq!(bytes, vec![141, 1, 9, 4, 1]);
/// # Ok::<(), ashttp_core::ParseError>(())
/// ```
pub fn decode_base64_query(input: &str) -> Result<Vec<u8>, ParseError> {
    let value = query_value(input);
    let unescaped: Vec<u8> = percent_decode_str(value).collect();
    let bytes = STANDARD.decode(&unescaped)?;
    tracing::trace!(encoded_len = value.len(), decoded_len = bytes.len(), "base64 query");
    Ok(bytes)
}

/// Decodes a base64 query value and parses the resulting payload.
///
/// # Examples
/// ```
/// use ashttp_core::parse_base64_query;
///
/// let query = parse_base64_query("oQkECBCeDEK6NjuTWKLjgUH2WCxdBIIanKgLV2luZG93c01haWw=")?;
/// assert_eq!(query.command_name(), "FolderSync");
/// assert_eq!(query.device_type, b"WindowsMail");
/// # Ok::<(), ashttp_core::ParseError>(())
/// ```
pub fn parse_base64_query(input: &str) -> Result<DecodedQuery, ParseError> {
    let bytes = decode_base64_query(input)?;
    Ok(parse_query(&bytes)?)
}

fn query_value(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed.rfind('?') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}
