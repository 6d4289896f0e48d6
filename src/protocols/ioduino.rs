use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::constants::INTER_BYTE_GAP_MS;
use crate::error::{IoduinoError, IoduinoResult};
use crate::interface::DeviceInterface;
use crate::pins::{
    Level, Pin, PinMode, check_analog_input_pin, check_analog_value, check_digital_pin,
    check_pwm_pin,
};

/// Single-byte replies from the firmware
#[repr(u8)]
pub enum IoduinoReply {
    Identify = b'i',
    Ack = b'k',
}

/// A single request understood by the IOduino firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Verify,
    PinMode { pin: Pin, mode: PinMode },
    DigitalWrite { pin: Pin, level: Level },
    DigitalRead { pin: Pin },
    AnalogWrite { pin: Pin, value: u16 },
    AnalogRead { pin: Pin },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Verify => "handshake",
            Command::PinMode { .. } => "set_pin_mode",
            Command::DigitalWrite { .. } => "digital_write",
            Command::DigitalRead { .. } => "digital_read",
            Command::AnalogWrite { .. } => "analog_write",
            Command::AnalogRead { .. } => "analog_read",
        }
    }

    /// Check pin and value against what the firmware accepts for this command
    pub fn validate(&self) -> IoduinoResult<()> {
        let name = self.name();
        match *self {
            Command::Verify => Ok(()),
            Command::PinMode { pin, .. }
            | Command::DigitalWrite { pin, .. }
            | Command::DigitalRead { pin } => check_digital_pin(pin, name),
            Command::AnalogWrite { pin, value } => {
                check_pwm_pin(pin, name)?;
                check_analog_value(value, name)
            }
            Command::AnalogRead { pin } => check_analog_input_pin(pin, name),
        }
    }

    /// ASCII wire form. Numeric fields that end a command are closed by `.`
    pub fn encode(&self) -> Vec<u8> {
        let text = match *self {
            Command::Verify => "v".to_string(),
            Command::PinMode {
                pin,
                mode: PinMode::Output,
            } => format!("pm{}o", pin),
            Command::PinMode {
                pin,
                mode: PinMode::Input,
            } => format!("pm{}i", pin),
            Command::DigitalWrite {
                pin,
                level: Level::High,
            } => format!("dw{}h", pin),
            Command::DigitalWrite {
                pin,
                level: Level::Low,
            } => format!("dw{}l", pin),
            Command::DigitalRead { pin } => format!("dr{}.", pin),
            Command::AnalogWrite { pin, value } => format!("aw{},{}.", pin, value),
            Command::AnalogRead { pin } => format!("ar{}.", pin),
        };

        text.into_bytes()
    }
}

/// Read one byte, giving up once `deadline` has passed
fn receive_before(
    device: &mut dyn DeviceInterface,
    deadline: Instant,
    name: &str,
) -> IoduinoResult<u8> {
    let timed_out = || IoduinoError::Timeout(format!("no response in time ({})", name));

    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(timed_out());
    }

    device.receive_byte(remaining)?.ok_or_else(timed_out)
}

/// Drop whatever is left in the input buffer, then write `command`.
/// Leftovers are trailing line endings or a reply that arrived after its
/// exchange timed out; neither belongs to the next reply.
fn send_fresh(device: &mut dyn DeviceInterface, command: Command) -> IoduinoResult<()> {
    device.flush_buffers()?;
    device.send(&command.encode())
}

/// Send `v` and expect `i` back; stale input from a board reset is discarded first
pub(crate) fn handshake(device: &mut dyn DeviceInterface, timeout: Duration) -> IoduinoResult<()> {
    send_fresh(device, Command::Verify)?;

    let response = receive_before(device, Instant::now() + timeout, Command::Verify.name())?;
    if response != IoduinoReply::Identify as u8 {
        return Err(IoduinoError::Acknowledgment(format!(
            "expected 'i', got {:?} (handshake)",
            response as char
        )));
    }

    debug!("Handshake acknowledged");
    Ok(())
}

/// Run a command whose reply is the single ack byte `k`
pub(crate) fn execute_acknowledged(
    device: &mut dyn DeviceInterface,
    command: Command,
    timeout: Duration,
) -> IoduinoResult<()> {
    command.validate()?;
    send_fresh(device, command)?;

    let response = receive_before(device, Instant::now() + timeout, command.name())?;
    if response != IoduinoReply::Ack as u8 {
        return Err(IoduinoError::Acknowledgment(format!(
            "expected 'k', got {:?} ({})",
            response as char,
            command.name()
        )));
    }

    trace!("{:?} acknowledged", command);
    Ok(())
}

/// Run a command whose reply is one integer token in `0..=max`
pub(crate) fn execute_value(
    device: &mut dyn DeviceInterface,
    command: Command,
    timeout: Duration,
    max: u16,
) -> IoduinoResult<u16> {
    command.validate()?;
    send_fresh(device, command)?;

    let value = read_integer_token(device, Instant::now() + timeout, command.name())?;
    let value = u16::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| {
            IoduinoError::InvalidValue(format!(
                "value {} not in range [0-{}] ({})",
                value,
                max,
                command.name()
            ))
        })?;

    debug!("{:?} returned {}", command, value);
    Ok(value)
}

/// Parse a decimal integer the way the firmware prints one: leading
/// whitespace is skipped, an optional sign, then digits. The token ends at
/// the first non-digit byte (consumed) or when the line goes quiet.
fn read_integer_token(
    device: &mut dyn DeviceInterface,
    deadline: Instant,
    name: &str,
) -> IoduinoResult<i64> {
    let gap = Duration::from_millis(INTER_BYTE_GAP_MS);
    let malformed = |found: String| {
        IoduinoError::InvalidValue(format!("expected integer, got {} ({})", found, name))
    };

    let mut byte = receive_before(device, deadline, name)?;
    while byte.is_ascii_whitespace() {
        byte = receive_before(device, deadline, name)?;
    }

    let negative = byte == b'-';
    if byte == b'-' || byte == b'+' {
        let sign = byte as char;
        byte = device
            .receive_byte(gap)?
            .ok_or_else(|| malformed(format!("lone {:?}", sign)))?;
    }

    if !byte.is_ascii_digit() {
        return Err(malformed(format!("{:?}", byte as char)));
    }

    let mut value: i64 = 0;
    let mut next = Some(byte);
    while let Some(digit) = next.filter(u8::is_ascii_digit) {
        if Instant::now() >= deadline {
            return Err(malformed("a number that never ends".to_string()));
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(digit - b'0')))
            .ok_or_else(|| malformed("an overflowing number".to_string()))?;
        next = device.receive_byte(gap)?;
    }

    Ok(if negative { -value } else { value })
}
