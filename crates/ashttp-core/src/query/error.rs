use thiserror::Error;

/// Errors returned while decoding a binary query.
///
/// Each variant names the structural expectation that was violated; decoding
/// never produces a partial query.
///
/// # Examples
/// ```
/// use ashttp_core::QueryError;
///
/// let err = QueryError::TruncatedDeviceId {
///     declared: 16,
///     remaining: 3,
/// };
/// assert!(err.to_string().contains("truncated device id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("invalid device id length: 0")]
    InvalidDeviceIdLength,
    #[error("truncated device id: declared {declared} bytes, {remaining} remaining")]
    TruncatedDeviceId { declared: u8, remaining: usize },
    #[error("invalid policy key length: {length} ({remaining} bytes remaining)")]
    InvalidPolicyKeyLength { length: u8, remaining: usize },
    #[error("truncated device type: declared {declared} bytes, {remaining} remaining")]
    TruncatedDeviceType { declared: u8, remaining: usize },
}
