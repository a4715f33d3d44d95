use super::error::QueryError;

/// Forward-only cursor over a query payload.
///
/// Reads never index directly; every access goes through `get` and only
/// advances the cursor when the requested bytes are present.
pub struct QueryReader<'a> {
    payload: &'a [u8],
    offset: usize,
}

impl<'a> QueryReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload, offset: 0 }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), QueryError> {
        if self.payload.len() < needed {
            return Err(QueryError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.payload.len().saturating_sub(self.offset)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let value = self.payload.get(self.offset).copied()?;
        self.offset += 1;
        Some(value)
    }

    pub fn read_u16_le(&mut self) -> Option<u16> {
        let bytes = self.read_array::<2>()?;
        Some(u16::from_le_bytes(bytes))
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        let bytes = self.read_array::<4>()?;
        Some(u32::from_le_bytes(bytes))
    }

    pub fn read_slice(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let bytes = self.payload.get(self.offset..end)?;
        self.offset = end;
        Some(bytes)
    }

    /// Consumes everything after the cursor.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = self.payload.get(self.offset..).unwrap_or_default();
        self.offset = self.payload.len();
        rest
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.read_slice(N)?;
        bytes.try_into().ok()
    }
}
