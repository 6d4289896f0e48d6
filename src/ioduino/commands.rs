use std::time::Duration;

use clap::{Args, Subcommand};
use ioduino::{
    ConnectionParams, DiscoveryPolicy, Ioduino, Level, Pin, PinMode, SerialPortConnector,
    SerialportParams, Target,
    error::IoduinoResult,
    interface::DeviceInterfaceType,
    pins::ANALOG_WRITE_MAX,
};
use tracing::info;

use crate::util::create_progress_bar;

#[derive(Args, Debug, Clone)]
pub(crate) struct ConnectionOptions {
    /// Serial port; searched /dev/ttyUSB0-9 when omitted
    #[clap(short, long, global = true)]
    serial: Option<String>,

    /// Baud rate
    #[clap(short, long, global = true)]
    baudrate: Option<u32>,

    /// Search every port the OS reports instead of /dev/ttyUSB0-9
    #[clap(long, default_value_t = false, global = true)]
    scan_available: bool,

    /// How long to wait for the board to answer the handshake
    #[clap(long, global = true)]
    handshake_timeout_ms: Option<u64>,

    /// How long to wait for each reply
    #[clap(long, global = true)]
    reply_timeout_ms: Option<u64>,
}

impl ConnectionOptions {
    pub(crate) fn connect(self) -> IoduinoResult<Ioduino> {
        let scan_available = self.scan_available && self.serial.is_none();
        let mut params = ConnectionParams::from_interface(DeviceInterfaceType::Serial(
            SerialportParams {
                port: self.serial,
                baud: self.baudrate,
                handshake_timeout: self.handshake_timeout_ms.map(Duration::from_millis),
                reply_timeout: self.reply_timeout_ms.map(Duration::from_millis),
            },
        ));

        if scan_available {
            params.target = Target::Discover(DiscoveryPolicy::available_ports()?);
        }

        Ioduino::connect(&SerialPortConnector, params)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum PinCommand {
    /// Configure a pin (0-19) as input or output
    PinMode { pin: Pin, mode: PinMode },

    /// Drive a pin (0-19) high or low
    DigitalWrite { pin: Pin, level: Level },

    /// Read the level of a pin (0-19)
    DigitalRead { pin: Pin },

    /// Set the PWM duty cycle (0-255) of pin 3, 5, 6, 9, 10 or 11
    AnalogWrite { pin: Pin, value: u16 },

    /// Sample analog input 0-5
    AnalogRead { pin: Pin },
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum DemoCommand {
    /// Toggle a digital pin once per interval
    Blink {
        #[clap(short, long, default_value_t = 13)]
        pin: Pin,

        #[clap(short, long, default_value_t = 10)]
        count: u64,

        #[clap(short, long, default_value_t = 1000)]
        interval_ms: u64,
    },

    /// Ramp a PWM pin up and back down
    Fade {
        #[clap(short, long, default_value_t = 11)]
        pin: Pin,

        #[clap(short, long, default_value_t = 5)]
        cycles: u64,

        #[clap(long, default_value_t = 10)]
        step: u16,

        #[clap(short, long, default_value_t = 20)]
        delay_ms: u64,
    },

    /// Print an analog input once per interval
    Sample {
        #[clap(short, long, default_value_t = 0)]
        pin: Pin,

        #[clap(short, long, default_value_t = 10)]
        count: u64,

        #[clap(short, long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

pub(crate) fn handle_status(ioduino: &Ioduino) {
    println!("Connected to IOduino at {}", ioduino.port());
}

pub(crate) fn handle_pin(ioduino: &mut Ioduino, cmd: PinCommand) -> IoduinoResult<()> {
    match cmd {
        PinCommand::PinMode { pin, mode } => ioduino.set_pin_mode(pin, mode)?,
        PinCommand::DigitalWrite { pin, level } => ioduino.digital_write(pin, level)?,
        PinCommand::DigitalRead { pin } => {
            let level = ioduino.digital_read(pin)?;
            println!("{:?}", level);
        }
        PinCommand::AnalogWrite { pin, value } => ioduino.analog_write(pin, value)?,
        PinCommand::AnalogRead { pin } => {
            let value = ioduino.analog_read(pin)?;
            println!("{}", value);
        }
    }

    Ok(())
}

pub(crate) fn handle_demo(ioduino: &mut Ioduino, cmd: DemoCommand) -> IoduinoResult<()> {
    match cmd {
        DemoCommand::Blink {
            pin,
            count,
            interval_ms,
        } => blink(ioduino, pin, count, Duration::from_millis(interval_ms)),
        DemoCommand::Fade {
            pin,
            cycles,
            step,
            delay_ms,
        } => fade(ioduino, pin, cycles, step, Duration::from_millis(delay_ms)),
        DemoCommand::Sample {
            pin,
            count,
            interval_ms,
        } => sample(ioduino, pin, count, Duration::from_millis(interval_ms)),
    }
}

fn blink(ioduino: &mut Ioduino, pin: Pin, count: u64, interval: Duration) -> IoduinoResult<()> {
    ioduino.set_pin_mode(pin, PinMode::Output)?;

    let pb = create_progress_bar(count, &format!("Blinking pin {}", pin));
    let mut level = Level::Low;
    for _ in 0..count {
        level = !level;
        ioduino.digital_write(pin, level)?;
        std::thread::sleep(interval);
        pb.inc(1);
    }

    ioduino.digital_write(pin, Level::Low)?;
    pb.finish_with_message("Done");
    Ok(())
}

fn fade(
    ioduino: &mut Ioduino,
    pin: Pin,
    cycles: u64,
    step: u16,
    delay: Duration,
) -> IoduinoResult<()> {
    ioduino.set_pin_mode(pin, PinMode::Output)?;

    let ramp = fade_ramp(step);
    let pb = create_progress_bar(cycles, &format!("Fading pin {}", pin));
    for _ in 0..cycles {
        for brightness in ramp.iter().chain(ramp.iter().rev()) {
            ioduino.analog_write(pin, *brightness)?;
            std::thread::sleep(delay);
        }
        pb.inc(1);
    }

    ioduino.analog_write(pin, 0)?;
    pb.finish_with_message("Done");
    Ok(())
}

/// Duty cycles from off to fully on, always ending at `ANALOG_WRITE_MAX`
fn fade_ramp(step: u16) -> Vec<u16> {
    let mut ramp: Vec<u16> = (0..=ANALOG_WRITE_MAX)
        .step_by(step.max(1) as usize)
        .collect();
    if ramp.last() != Some(&ANALOG_WRITE_MAX) {
        ramp.push(ANALOG_WRITE_MAX);
    }
    ramp
}

fn sample(ioduino: &mut Ioduino, pin: Pin, count: u64, interval: Duration) -> IoduinoResult<()> {
    let pb = create_progress_bar(count, &format!("Sampling A{}", pin));
    for i in 0..count {
        let value = ioduino.analog_read(pin)?;
        pb.println(format!("{}) A{} = {}", i, pin, value));
        pb.inc(1);
        std::thread::sleep(interval);
    }

    pb.finish_and_clear();
    info!("Took {} samples from A{}", count, pin);
    Ok(())
}
