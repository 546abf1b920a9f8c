//! Test doubles for the report layer.
#![allow(dead_code)]

use hidapi::HidError;
use std::cell::RefCell;
use std::collections::VecDeque;
use usbio::{Error, Protocol, ReportIo, Result};

/// Records written reports and replays queued IN reports.
#[derive(Debug, Default)]
pub struct MockIo {
    writes: RefCell<Vec<Vec<u8>>>,
    reads: RefCell<VecDeque<Vec<u8>>>,
}

impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_read(&self, report: &[u8]) {
        self.reads.borrow_mut().push_back(report.to_vec());
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.borrow().clone()
    }
}

impl ReportIo for MockIo {
    fn write_report(&self, data: &[u8]) -> Result<usize> {
        self.writes.borrow_mut().push(data.to_vec());
        Ok(data.len())
    }

    fn read_report(&self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize> {
        match self.reads.borrow_mut().pop_front() {
            Some(report) => {
                let len = report.len().min(buf.len());
                buf[..len].copy_from_slice(&report[..len]);
                Ok(len)
            }
            None => Ok(0),
        }
    }
}

#[derive(Debug)]
struct BoardState {
    port: u16,
    pending: VecDeque<Vec<u8>>,
    writes: Vec<Vec<u8>>,
    fail_write_at: Option<usize>,
}

/// A USB-IO board answering either report layout from an in-memory port.
#[derive(Debug)]
pub struct SimulatedBoard {
    protocol: Protocol,
    state: RefCell<BoardState>,
}

impl SimulatedBoard {
    pub fn new(protocol: Protocol, port: u16) -> Self {
        Self {
            protocol,
            state: RefCell::new(BoardState {
                port,
                pending: VecDeque::new(),
                writes: Vec::new(),
                fail_write_at: None,
            }),
        }
    }

    /// Makes the `index`-th report write (0-based) fail without reaching the port.
    pub fn fail_write_at(self, index: usize) -> Self {
        self.state.borrow_mut().fail_write_at = Some(index);
        self
    }

    pub fn port(&self) -> u16 {
        self.state.borrow().port
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    /// Command bytes of every report written so far.
    pub fn commands(&self) -> Vec<u8> {
        self.state.borrow().writes.iter().map(|w| w[0]).collect()
    }
}

impl ReportIo for SimulatedBoard {
    fn write_report(&self, data: &[u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        let index = state.writes.len();
        state.writes.push(data.to_vec());
        if state.fail_write_at == Some(index) {
            return Err(Error::Hid(HidError::HidApiError {
                message: "simulated write failure".to_string(),
            }));
        }

        let [low, high] = state.port.to_le_bytes();
        match (self.protocol, data[0]) {
            (Protocol::Split, 0x01) => state.port = u16::from_le_bytes([data[1], high]),
            (Protocol::Split, 0x02) => state.port = u16::from_le_bytes([low, data[1]]),
            (Protocol::Split, 0x03) => state.pending.push_back(vec![0x03, low, 0, 0, 0, 0, 0, 0]),
            (Protocol::Split, 0x04) => state.pending.push_back(vec![0x04, high, 0, 0, 0, 0, 0, 0]),
            (Protocol::FourByte, 0x01) => state.port = u16::from_le_bytes([data[1], data[3]]),
            (Protocol::FourByte, 0x03) => state.pending.push_back(vec![0x03, low, 0x04, high]),
            _ => {}
        }
        Ok(data.len())
    }

    fn read_report(&self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize> {
        match self.state.borrow_mut().pending.pop_front() {
            Some(report) => {
                let len = report.len().min(buf.len());
                buf[..len].copy_from_slice(&report[..len]);
                Ok(len)
            }
            None => Ok(0),
        }
    }
}
