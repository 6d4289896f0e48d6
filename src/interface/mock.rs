//! Scripted stand-ins for a serial port and its connector

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use super::{BaudRate, Connector, DeviceInterface};
use crate::error::{IoduinoError, IoduinoResult};

#[derive(Debug, Default)]
pub(crate) struct DeviceLog {
    pub sent: Vec<u8>,
    pub closed: bool,
    pub reads: usize,
    pub flushes: usize,
    /// Bytes thrown away by `flush_buffers`
    pub discarded: Vec<u8>,
}

/// What a mock board does on the wire
#[derive(Debug, Clone, Default)]
pub(crate) struct MockScript {
    stale: Vec<u8>,
    replies: Vec<Vec<u8>>,
    babble: Option<u8>,
}

impl MockScript {
    /// The n-th send makes the n-th reply readable; once they run out the
    /// board is silent
    pub fn replies(replies: &[&str]) -> Self {
        MockScript {
            replies: replies.iter().map(|r| r.as_bytes().to_vec()).collect(),
            ..Default::default()
        }
    }

    /// Bytes already waiting in the input buffer when the port opens
    pub fn with_stale_input(mut self, bytes: &[u8]) -> Self {
        self.stale = bytes.to_vec();
        self
    }

    /// Keep sending `byte` whenever there is nothing else to read
    pub fn babbling(mut self, byte: u8) -> Self {
        self.babble = Some(byte);
        self
    }
}

pub(crate) struct MockDevice {
    input: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    babble: Option<u8>,
    log: Rc<RefCell<DeviceLog>>,
}

impl MockDevice {
    pub fn new(script: MockScript) -> (Self, Rc<RefCell<DeviceLog>>) {
        let log = Rc::new(RefCell::new(DeviceLog::default()));
        let device = MockDevice {
            input: script.stale.into_iter().collect(),
            replies: script.replies.into_iter().collect(),
            babble: script.babble,
            log: Rc::clone(&log),
        };
        (device, log)
    }
}

impl DeviceInterface for MockDevice {
    fn send(&mut self, command: &[u8]) -> IoduinoResult<()> {
        self.log.borrow_mut().sent.extend_from_slice(command);
        if let Some(reply) = self.replies.pop_front() {
            self.input.extend(reply);
        }
        Ok(())
    }

    fn receive_byte(&mut self, _timeout: Duration) -> IoduinoResult<Option<u8>> {
        self.log.borrow_mut().reads += 1;
        Ok(self.input.pop_front().or(self.babble))
    }

    fn flush_buffers(&mut self) -> IoduinoResult<()> {
        let mut log = self.log.borrow_mut();
        log.flushes += 1;
        log.discarded.extend(self.input.drain(..));
        Ok(())
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.log.borrow_mut().closed = true;
    }
}

/// Behaviour of one port behind a [`MockConnector`]
pub(crate) enum MockPort {
    /// Opening fails as if the path did not exist
    Missing,
    /// Opens and behaves as scripted
    Board(MockScript),
}

#[derive(Default)]
pub(crate) struct MockConnector {
    ports: HashMap<String, MockPort>,
    attempts: RefCell<Vec<String>>,
    logs: RefCell<HashMap<String, Rc<RefCell<DeviceLog>>>>,
}

impl MockConnector {
    pub fn with_port(mut self, port: &str, behaviour: MockPort) -> Self {
        self.ports.insert(port.to_string(), behaviour);
        self
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.borrow().clone()
    }

    pub fn log(&self, port: &str) -> Rc<RefCell<DeviceLog>> {
        Rc::clone(
            self.logs
                .borrow()
                .get(port)
                .expect("port was never opened"),
        )
    }
}

impl Connector for MockConnector {
    fn open(&self, port: &str, _baud: BaudRate) -> IoduinoResult<Box<dyn DeviceInterface>> {
        self.attempts.borrow_mut().push(port.to_string());

        match self.ports.get(port) {
            Some(MockPort::Board(script)) => {
                let (device, log) = MockDevice::new(script.clone());
                self.logs.borrow_mut().insert(port.to_string(), log);
                Ok(Box::new(device))
            }
            Some(MockPort::Missing) | None => Err(IoduinoError::Communication(format!(
                "{}: No such file or directory",
                port
            ))),
        }
    }
}
