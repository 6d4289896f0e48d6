pub(crate) const DEFAULT_BAUD_RATE: u32 = 38400;
pub(crate) const HANDSHAKE_TIMEOUT_MS: u64 = 2000;
pub(crate) const REPLY_TIMEOUT_MS: u64 = 1000;

/// Silence after the last digit of a numeric reply that ends the token
pub(crate) const INTER_BYTE_GAP_MS: u64 = 50;

pub(crate) const DISCOVERY_PORT_PREFIX: &str = "/dev/ttyUSB";
pub(crate) const DISCOVERY_PORT_COUNT: u8 = 10;
