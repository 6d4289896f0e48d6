use std::time::Duration;

use constants::{DEFAULT_BAUD_RATE, HANDSHAKE_TIMEOUT_MS, REPLY_TIMEOUT_MS};
pub use discovery::DiscoveryPolicy;
use discovery::{connect_and_verify, discover};
use error::{IoduinoError, IoduinoResult};
use interface::{BaudRate, ComPort, Connector, DeviceInterface, DeviceInterfaceType};
pub use interface::{SerialPortConnector, SerialportParams};
pub use pins::{Level, Pin, PinMode};
use pins::ANALOG_READ_MAX;
use protocols::ioduino::{Command, execute_acknowledged, execute_value};
use tracing::info;

pub(crate) mod constants;
pub mod discovery;
pub mod error;
pub mod interface;
pub mod pins;
pub mod protocols;

/// Where to look for the board
#[derive(Debug, Clone)]
pub enum Target {
    /// Try each candidate in order until one answers the handshake
    Discover(DiscoveryPolicy),
    /// Use exactly this port
    Port(ComPort),
}

/// Fully resolved connection settings
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub target: Target,
    pub baud: BaudRate,
    pub handshake_timeout: Duration,
    pub reply_timeout: Duration,
}

impl ConnectionParams {
    /// Fill in defaults for everything the caller left out
    pub fn from_interface(interface: DeviceInterfaceType) -> Self {
        let DeviceInterfaceType::Serial(params) = interface;
        ConnectionParams {
            target: match params.port {
                Some(port) => Target::Port(port),
                None => Target::Discover(DiscoveryPolicy::default()),
            },
            baud: params.baud.unwrap_or(DEFAULT_BAUD_RATE),
            handshake_timeout: params
                .handshake_timeout
                .unwrap_or(Duration::from_millis(HANDSHAKE_TIMEOUT_MS)),
            reply_timeout: params
                .reply_timeout
                .unwrap_or(Duration::from_millis(REPLY_TIMEOUT_MS)),
        }
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self::from_interface(DeviceInterfaceType::Serial(SerialportParams::default()))
    }
}

/// Session with one Arduino running the IOduino firmware.
///
/// A session only exists once the handshake has succeeded. Every pin
/// operation is a single blocking request/response exchange, so callers
/// sharing a board between threads must serialize access themselves.
pub struct Ioduino {
    device: Option<Box<dyn DeviceInterface>>,
    port: ComPort,
    reply_timeout: Duration,
}

impl Ioduino {
    /// Search `/dev/ttyUSB0` through `/dev/ttyUSB9` for a board
    pub fn new() -> IoduinoResult<Self> {
        Self::connect(&SerialPortConnector, ConnectionParams::default())
    }

    /// Connect to the board on `port`
    pub fn from_port(port: &str) -> IoduinoResult<Self> {
        Self::from_interface(DeviceInterfaceType::Serial(SerialportParams {
            port: Some(port.to_string()),
            ..Default::default()
        }))
    }

    pub fn from_interface(interface: DeviceInterfaceType) -> IoduinoResult<Self> {
        Self::connect(
            &SerialPortConnector,
            ConnectionParams::from_interface(interface),
        )
    }

    /// Connect through any transport, e.g. a non-standard serial backend
    pub fn connect(connector: &dyn Connector, params: ConnectionParams) -> IoduinoResult<Self> {
        let (port, device) = match params.target {
            Target::Discover(policy) => {
                discover(connector, &policy, params.baud, params.handshake_timeout)?
            }
            Target::Port(port) => {
                let device =
                    connect_and_verify(connector, &port, params.baud, params.handshake_timeout)
                        .map_err(|e| IoduinoError::Connect {
                            port: port.clone(),
                            source: Box::new(e),
                        })?;
                (port, device)
            }
        };

        info!("Connected to IOduino at {}", port);
        Ok(Ioduino {
            device: Some(device),
            port,
            reply_timeout: params.reply_timeout,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    /// Port of the board this session was verified on
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Close the port. Later pin operations fail with `NotConnected`.
    pub fn disconnect(&mut self) {
        if self.device.take().is_some() {
            info!("Disconnected from IOduino at {}", self.port);
        }
    }

    fn device(&mut self) -> IoduinoResult<&mut (dyn DeviceInterface + 'static)> {
        self.device.as_deref_mut().ok_or(IoduinoError::NotConnected)
    }

    fn acknowledged(&mut self, command: Command) -> IoduinoResult<()> {
        let timeout = self.reply_timeout;
        execute_acknowledged(self.device()?, command, timeout)
    }

    fn value(&mut self, command: Command, max: u16) -> IoduinoResult<u16> {
        let timeout = self.reply_timeout;
        execute_value(self.device()?, command, timeout, max)
    }

    pub fn set_pin_mode(&mut self, pin: Pin, mode: PinMode) -> IoduinoResult<()> {
        self.acknowledged(Command::PinMode { pin, mode })
    }

    pub fn digital_write(&mut self, pin: Pin, level: Level) -> IoduinoResult<()> {
        self.acknowledged(Command::DigitalWrite { pin, level })
    }

    pub fn digital_read(&mut self, pin: Pin) -> IoduinoResult<Level> {
        match self.value(Command::DigitalRead { pin }, 1)? {
            0 => Ok(Level::Low),
            _ => Ok(Level::High),
        }
    }

    /// Set the PWM duty cycle (0-255) on one of pins 3, 5, 6, 9, 10 or 11
    pub fn analog_write(&mut self, pin: Pin, value: u16) -> IoduinoResult<()> {
        self.acknowledged(Command::AnalogWrite { pin, value })
    }

    /// Sample analog input A0-A5, returning 0-1023
    pub fn analog_read(&mut self, pin: Pin) -> IoduinoResult<u16> {
        self.value(Command::AnalogRead { pin }, ANALOG_READ_MAX)
    }
}
