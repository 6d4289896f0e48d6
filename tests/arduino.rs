//! Needs an Arduino flashed with the IOduino firmware on /dev/ttyUSB0, an
//! LED on pin 13 and something wired to A0. Run with `--ignored`.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ioduino::{
        Ioduino, Level, PinMode, SerialportParams, error::IoduinoError,
        interface::DeviceInterfaceType,
    };

    const PORT: &str = "/dev/ttyUSB0";

    #[test]
    #[ignore]
    fn test_arduino_pin_control() {
        // Discovery
        {
            let ioduino = Ioduino::new().unwrap();
            assert!(ioduino.is_connected());
        }

        // Explicit port with custom timeouts
        {
            let mut ioduino = Ioduino::from_interface(DeviceInterfaceType::Serial(SerialportParams {
                port: Some(PORT.to_string()),
                baud: Some(38400),
                handshake_timeout: Some(Duration::from_secs(3)),
                reply_timeout: Some(Duration::from_millis(500)),
            }))
            .unwrap();

            ioduino.set_pin_mode(13, PinMode::Output).unwrap();
            ioduino.digital_write(13, Level::High).unwrap();
            ioduino.digital_write(13, Level::Low).unwrap();

            ioduino.set_pin_mode(2, PinMode::Input).unwrap();
            ioduino.digital_read(2).unwrap();

            ioduino.analog_write(11, 128).unwrap();
            ioduino.analog_write(11, 0).unwrap();

            let sample = ioduino.analog_read(0).unwrap();
            assert!(sample <= 1023);
        }

        // Nothing answers on a port that does not exist
        {
            let err = Ioduino::from_port("/dev/ttyUSB-missing").err().unwrap();
            assert!(matches!(err, IoduinoError::Connect { .. }));
        }
    }
}
