use std::time::Duration;

use tracing::{debug, info};

use crate::constants::{DISCOVERY_PORT_COUNT, DISCOVERY_PORT_PREFIX};
use crate::error::{IoduinoError, IoduinoResult};
use crate::interface::{BaudRate, ComPort, Connector, DeviceInterface};
use crate::protocols::ioduino::handshake;

/// Ordered list of ports to try when no port is given. The first port
/// that passes the handshake wins and later ports are never opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPolicy {
    candidates: Vec<ComPort>,
    description: String,
}

impl DiscoveryPolicy {
    /// `prefix0` through `prefix{count - 1}`, e.g. `/dev/ttyUSB0`..`/dev/ttyUSB9`
    pub fn indexed(prefix: &str, count: u8) -> Self {
        let candidates = (0..count).map(|i| format!("{}{}", prefix, i)).collect();
        DiscoveryPolicy {
            candidates,
            description: format!("{}[0-{}]", prefix, count.saturating_sub(1)),
        }
    }

    pub fn from_ports(candidates: Vec<ComPort>) -> Self {
        let description = if candidates.is_empty() {
            "(none)".to_string()
        } else {
            candidates.join(", ")
        };

        DiscoveryPolicy {
            candidates,
            description,
        }
    }

    /// Candidates reported by the operating system, in enumeration order
    pub fn available_ports() -> IoduinoResult<Self> {
        let ports = serialport::available_ports().map_err(|e| {
            IoduinoError::Communication(format!("Could not get available ports. Err {:?}", e))
        })?;

        Ok(Self::from_ports(
            ports.into_iter().map(|port| port.port_name).collect(),
        ))
    }

    pub fn candidates(&self) -> &[ComPort] {
        &self.candidates
    }

    /// Human-readable name of the searched range, used in error messages
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self::indexed(DISCOVERY_PORT_PREFIX, DISCOVERY_PORT_COUNT)
    }
}

/// Open `port` and run the handshake. The port is closed again if the
/// handshake fails, since the device is dropped with the error.
pub(crate) fn connect_and_verify(
    connector: &dyn Connector,
    port: &str,
    baud: BaudRate,
    handshake_timeout: Duration,
) -> IoduinoResult<Box<dyn DeviceInterface>> {
    let mut device = connector.open(port, baud)?;
    handshake(device.as_mut(), handshake_timeout)?;
    Ok(device)
}

pub(crate) fn discover(
    connector: &dyn Connector,
    policy: &DiscoveryPolicy,
    baud: BaudRate,
    handshake_timeout: Duration,
) -> IoduinoResult<(ComPort, Box<dyn DeviceInterface>)> {
    for port in policy.candidates() {
        match connect_and_verify(connector, port, baud, handshake_timeout) {
            Ok(device) => {
                info!("Found IOduino at {}", port);
                return Ok((port.clone(), device));
            }
            Err(e) => debug!("Skipping {}: {}", port, e),
        }
    }

    Err(IoduinoError::Discovery(policy.description().to_string()))
}
