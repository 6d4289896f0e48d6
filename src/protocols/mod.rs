pub mod ioduino;

pub use ioduino::{Command, IoduinoReply};
