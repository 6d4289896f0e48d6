use std::ops::{Not, RangeInclusive};

use clap::ValueEnum;

use crate::error::{IoduinoError, IoduinoResult};

pub type Pin = u8;

/// Pins addressable by pin mode and digital I/O (D0-D13, A0-A5 as D14-D19)
pub const DIGITAL_PINS: RangeInclusive<Pin> = 0..=19;

/// PWM capable pins on an ATmega328p board
pub const PWM_PINS: [Pin; 6] = [3, 5, 6, 9, 10, 11];

/// Analog input channels A0-A5
pub const ANALOG_INPUT_PINS: RangeInclusive<Pin> = 0..=5;

pub const ANALOG_WRITE_MAX: u16 = 255;

/// 10-bit ADC resolution
pub const ANALOG_READ_MAX: u16 = 1023;

/// Direction of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PinMode {
    Output,
    Input,
}

/// Logic level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Level {
    High,
    Low,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::High => Level::Low,
            Level::Low => Level::High,
        }
    }
}

pub(crate) fn check_digital_pin(pin: Pin, operation: &str) -> IoduinoResult<()> {
    if DIGITAL_PINS.contains(&pin) {
        Ok(())
    } else {
        Err(IoduinoError::ArgumentOutOfRange(format!(
            "pin {} not in range [0-19] ({})",
            pin, operation
        )))
    }
}

pub(crate) fn check_pwm_pin(pin: Pin, operation: &str) -> IoduinoResult<()> {
    if PWM_PINS.contains(&pin) {
        Ok(())
    } else {
        Err(IoduinoError::ArgumentOutOfRange(format!(
            "pin {} not in range [3, 5, 6, 9, 10, 11] ({})",
            pin, operation
        )))
    }
}

pub(crate) fn check_analog_input_pin(pin: Pin, operation: &str) -> IoduinoResult<()> {
    if ANALOG_INPUT_PINS.contains(&pin) {
        Ok(())
    } else {
        Err(IoduinoError::ArgumentOutOfRange(format!(
            "pin {} not in range [0-5] ({})",
            pin, operation
        )))
    }
}

pub(crate) fn check_analog_value(value: u16, operation: &str) -> IoduinoResult<()> {
    if value <= ANALOG_WRITE_MAX {
        Ok(())
    } else {
        Err(IoduinoError::ArgumentOutOfRange(format!(
            "value {} not in range [0-{}] ({})",
            value, ANALOG_WRITE_MAX, operation
        )))
    }
}
