pub mod serialport;

#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use crate::error::IoduinoResult;

pub use self::serialport::{BaudRate, ComPort, SerialPortConnector};

/// Byte stream to a single IOduino board. Dropping the interface closes it.
pub trait DeviceInterface {
    /// Write a complete command and flush it to the device
    fn send(&mut self, command: &[u8]) -> IoduinoResult<()>;

    /// Receive one byte, or `None` if nothing arrived within `timeout`
    fn receive_byte(&mut self, timeout: Duration) -> IoduinoResult<Option<u8>>;

    /// Discard any unread input
    fn flush_buffers(&mut self) -> IoduinoResult<()>;
}

/// Opens device interfaces with the IOduino line settings (8N1, no flow control)
pub trait Connector {
    fn open(&self, port: &str, baud: BaudRate) -> IoduinoResult<Box<dyn DeviceInterface>>;
}

/// Serial connection overrides; anything left `None` falls back to the defaults
#[derive(Debug, Clone, Default)]
pub struct SerialportParams {
    pub port: Option<ComPort>,
    pub baud: Option<BaudRate>,
    pub handshake_timeout: Option<Duration>,
    pub reply_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub enum DeviceInterfaceType {
    Serial(SerialportParams),
}
