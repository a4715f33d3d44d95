pub const PROTOCOL_VERSION_OFFSET: usize = 0;
pub const COMMAND_CODE_OFFSET: usize = 1;
pub const LOCALE_RANGE: std::ops::Range<usize> = 2..4;
pub const DEVICE_ID_LENGTH_OFFSET: usize = 4;

/// Version, command, locale and the device id length prefix.
pub const MIN_LEN: usize = DEVICE_ID_LENGTH_OFFSET + 1;

pub const POLICY_KEY_LEN: u8 = 4;
pub const POLICY_KEY_ABSENT: u8 = 0;
