use tracing::trace;

use super::{Connector, DeviceInterface};
use crate::error::{IoduinoError, IoduinoResult};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, StopBits};
use std::io::{Read, Write};
use std::time::Duration;

pub type ComPort = String;
pub type BaudRate = u32;

/// Serial port device_interface layer
pub(crate) struct SerialPortDevice {
    pub serial_port: Box<dyn serialport::SerialPort>,
}

impl SerialPortDevice {
    pub fn new(port: &str, baud: BaudRate) -> IoduinoResult<SerialPortDevice> {
        let serial_port = serialport::new(port, baud)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .dtr_on_open(false)
            .open()
            .map_err(|e| IoduinoError::Communication(format!("{}: {}", port, e)))?;

        Ok(SerialPortDevice { serial_port })
    }
}

impl DeviceInterface for SerialPortDevice {
    fn send(&mut self, command: &[u8]) -> IoduinoResult<()> {
        self.serial_port
            .write_all(command)
            .and_then(|_| self.serial_port.flush())
            .map_err(|e| IoduinoError::Communication(format!("{:?}", e)))?;
        trace!("Sent bytes {:?}", command);
        Ok(())
    }

    fn receive_byte(&mut self, timeout: Duration) -> IoduinoResult<Option<u8>> {
        if self.serial_port.timeout() != timeout {
            self.serial_port.set_timeout(timeout).map_err(|e| {
                IoduinoError::Communication(format!("Failed to set read timeout: {}", e))
            })?;
        }

        let mut buffer = [0u8; 1];
        let size = self
            .serial_port
            .read(&mut buffer)
            // Timeout is reported as no byte
            .or_else(|e| {
                if e.kind() == std::io::ErrorKind::TimedOut {
                    Ok(0)
                } else {
                    Err(e)
                }
            })
            .map_err(|e| IoduinoError::Communication(format!("{:?}", e)))?;

        if size == 0 {
            return Ok(None);
        }

        trace!("Received byte {:?}", buffer[0] as char);
        Ok(Some(buffer[0]))
    }

    fn flush_buffers(&mut self) -> IoduinoResult<()> {
        self.serial_port.clear(ClearBuffer::Input).map_err(|e| {
            IoduinoError::Communication(format!("Failed to clear input buffer, {}", e))
        })?;

        Ok(())
    }
}

/// Opens real serial ports through the `serialport` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialPortConnector;

impl Connector for SerialPortConnector {
    fn open(&self, port: &str, baud: BaudRate) -> IoduinoResult<Box<dyn DeviceInterface>> {
        Ok(Box::new(SerialPortDevice::new(port, baud)?))
    }
}
