use std::borrow::Cow;

use super::error::QueryError;
use super::layout;
use super::reader::QueryReader;
use crate::command::{self, Command};
use crate::common::hex_lower;

/// A fully validated binary query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedQuery {
    /// Opaque protocol version tag.
    pub protocol_version: u8,
    /// Raw command code; see `Command` for the known values.
    pub command_code: u8,
    /// Opaque locale identifier (little-endian on the wire).
    pub locale: u16,
    /// Raw device id bytes, never empty.
    pub device_id: Vec<u8>,
    /// Policy key, present only when the client sent a 4-byte key.
    pub policy_key: Option<u32>,
    /// Raw device type bytes, empty when absent.
    pub device_type: Vec<u8>,
    /// Trailing command parameters, uninterpreted.
    pub command_params: Vec<u8>,
}

impl DecodedQuery {
    /// Typed command, when the code is in the known table.
    pub fn command(&self) -> Option<Command> {
        Command::from_code(self.command_code)
    }

    /// Display name, or `Unknown(<code>)`.
    pub fn command_name(&self) -> Cow<'static, str> {
        command::command_name(self.command_code)
    }

    /// Device id as lowercase hex.
    pub fn device_id_hex(&self) -> String {
        hex_lower(&self.device_id)
    }

    /// Device type as text; invalid UTF-8 is replaced.
    pub fn device_type_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.device_type)
    }
}

/// Decodes a raw query payload in a single forward pass.
///
/// # Examples
/// ```
/// use ashttp_core::parse_query;
///
/// let payload = [141, 1, 0x09, 0x04, 2, b'i', b'd'];
/// let query = parse_query(&payload)?;
/// assert_eq!(query.locale, 1033);
/// assert_eq!(query.device_id, b"id");
/// assert_eq!(query.policy_key, None);
/// # Ok::<(), ashttp_core::QueryError>(())
/// ```
pub fn parse_query(payload: &[u8]) -> Result<DecodedQuery, QueryError> {
    let mut reader = QueryReader::new(payload);
    reader.require_len(layout::MIN_LEN)?;

    let too_short = QueryError::TooShort {
        needed: layout::MIN_LEN,
        actual: payload.len(),
    };
    debug_assert_eq!(reader.offset(), layout::PROTOCOL_VERSION_OFFSET);
    let protocol_version = reader.read_u8().ok_or_else(|| too_short.clone())?;
    debug_assert_eq!(reader.offset(), layout::COMMAND_CODE_OFFSET);
    let command_code = reader.read_u8().ok_or_else(|| too_short.clone())?;
    debug_assert_eq!(reader.offset(), layout::LOCALE_RANGE.start);
    let locale = reader.read_u16_le().ok_or(too_short)?;
    debug_assert_eq!(reader.offset(), layout::DEVICE_ID_LENGTH_OFFSET);

    let device_id = read_device_id(&mut reader)?;
    let policy_key = read_policy_key(&mut reader)?;
    let device_type = read_device_type(&mut reader)?;
    let command_params = reader.read_rest().to_vec();
    debug_assert!(reader.is_exhausted());

    tracing::debug!(
        protocol_version,
        command_code,
        locale,
        device_id_len = device_id.len(),
        has_policy_key = policy_key.is_some(),
        device_type_len = device_type.len(),
        params_len = command_params.len(),
        "decoded query"
    );

    Ok(DecodedQuery {
        protocol_version,
        command_code,
        locale,
        device_id,
        policy_key,
        device_type,
        command_params,
    })
}

fn read_device_id(reader: &mut QueryReader<'_>) -> Result<Vec<u8>, QueryError> {
    let declared = reader.read_u8().ok_or(QueryError::InvalidDeviceIdLength)?;
    if declared == 0 {
        return Err(QueryError::InvalidDeviceIdLength);
    }
    let remaining = reader.remaining();
    let bytes = reader
        .read_slice(declared as usize)
        .ok_or(QueryError::TruncatedDeviceId {
            declared,
            remaining,
        })?;
    tracing::trace!(offset = reader.offset(), len = declared, "device id");
    Ok(bytes.to_vec())
}

fn read_policy_key(reader: &mut QueryReader<'_>) -> Result<Option<u32>, QueryError> {
    let Some(length) = reader.read_u8() else {
        return Ok(None);
    };
    match length {
        layout::POLICY_KEY_ABSENT => Ok(None),
        layout::POLICY_KEY_LEN => {
            let remaining = reader.remaining();
            let key = reader
                .read_u32_le()
                .ok_or(QueryError::InvalidPolicyKeyLength { length, remaining })?;
            tracing::trace!(offset = reader.offset(), "policy key");
            Ok(Some(key))
        }
        _ => Err(QueryError::InvalidPolicyKeyLength {
            length,
            remaining: reader.remaining(),
        }),
    }
}

fn read_device_type(reader: &mut QueryReader<'_>) -> Result<Vec<u8>, QueryError> {
    let Some(declared) = reader.read_u8() else {
        return Ok(Vec::new());
    };
    let remaining = reader.remaining();
    let bytes = reader
        .read_slice(declared as usize)
        .ok_or(QueryError::TruncatedDeviceType {
            declared,
            remaining,
        })?;
    tracing::trace!(offset = reader.offset(), len = declared, "device type");
    Ok(bytes.to_vec())
}
