//! Wire protocols for reading and writing the 16-bit port state.
//!
//! Two report layouts are in use by USB-IO compatible boards:
//!
//! *   [`SplitPortReport`]: one command per 8-bit port. Reading issues
//!     `0x03`/`0x04` and takes the value from byte 1 of each reply; writing
//!     sends `[0x01, low]` then `[0x02, high]`.
//! *   [`FourByteReport`]: both ports in one 4-byte report. Writing sends
//!     `[0x01, low, 0x02, high]`; reading requests `[0x03, 0, 0x04, 0]` and
//!     takes low/high from bytes 1 and 3 of the reply.
//!
//! Every report write is followed by a fixed settle delay so the firmware
//! can latch the new state. The delay is unconditional; nothing is retried.

use crate::consts::{self, DEFAULT_READ_TIMEOUT_MS, SETTLE_DELAY};
use crate::error::{Error, Result};
use hidapi::HidDevice;
use log::trace;
use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

/// Raw report exchange with a device.
///
/// Implemented for [`hidapi::HidDevice`]; tests substitute a scripted device.
pub trait ReportIo {
    /// Writes one OUT report, returning the number of bytes written.
    fn write_report(&self, data: &[u8]) -> Result<usize>;
    /// Reads one IN report into `buf`, returning the number of bytes read.
    /// Returns `Ok(0)` if nothing arrived within `timeout_ms`.
    fn read_report(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize>;
}

impl ReportIo for HidDevice {
    fn write_report(&self, data: &[u8]) -> Result<usize> {
        Ok(self.write(data)?)
    }

    fn read_report(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        Ok(self.read_timeout(buf, timeout_ms)?)
    }
}

impl<D: ReportIo + ?Sized> ReportIo for &D {
    fn write_report(&self, data: &[u8]) -> Result<usize> {
        (**self).write_report(data)
    }

    fn read_report(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        (**self).read_report(buf, timeout_ms)
    }
}

/// Reads and writes the whole 16-bit port state of one device.
pub trait PortTransport {
    /// Reads the current state, pin 0 in the least significant bit.
    fn read_state(&self) -> Result<u16>;
    /// Drives all 16 pins. The value is not read back.
    fn write_state(&self, value: u16) -> Result<()>;
}

impl<T: PortTransport + ?Sized> PortTransport for Box<T> {
    fn read_state(&self) -> Result<u16> {
        (**self).read_state()
    }

    fn write_state(&self, value: u16) -> Result<()> {
        (**self).write_state(value)
    }
}

/// Selects the report layout spoken by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    /// One command per port, 8-byte reports.
    #[default]
    Split,
    /// Both ports in a single 4-byte report.
    FourByte,
}

impl Protocol {
    /// Wraps a report device in the transport for this layout.
    pub fn transport<'a, D: ReportIo + 'a>(
        self,
        io: D,
        settle: Duration,
    ) -> Box<dyn PortTransport + 'a> {
        match self {
            Protocol::Split => Box::new(SplitPortReport::new(io).with_settle_delay(settle)),
            Protocol::FourByte => Box::new(FourByteReport::new(io).with_settle_delay(settle)),
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "split" => Ok(Protocol::Split),
            "four-byte" | "fourbyte" | "4" => Ok(Protocol::FourByte),
            _ => Err(Error::UnknownProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Split => f.write_str("split"),
            Protocol::FourByte => f.write_str("four-byte"),
        }
    }
}

fn write_padded<D: ReportIo>(io: &D, report: &[u8], size: usize) -> Result<()> {
    let mut buf = vec![0u8; size.max(report.len())];
    buf[..report.len()].copy_from_slice(report);
    trace!("Writing report: {:02X?}", &buf[..]);
    io.write_report(&buf)?;
    Ok(())
}

fn read_at_least<D: ReportIo>(io: &D, buf: &mut [u8], needed: usize) -> Result<usize> {
    let len = io.read_report(buf, DEFAULT_READ_TIMEOUT_MS)?;
    if len == 0 {
        return Err(Error::Timeout);
    }
    trace!("Read report: {:02X?}", &buf[..len]);
    if len < needed {
        return Err(Error::InvalidReport {
            expected: needed,
            actual: len,
        });
    }
    Ok(len)
}

/// Layout with one command per 8-bit port.
#[derive(Debug)]
pub struct SplitPortReport<D> {
    io: D,
    settle: Duration,
}

impl<D: ReportIo> SplitPortReport<D> {
    pub fn new(io: D) -> Self {
        Self {
            io,
            settle: SETTLE_DELAY,
        }
    }

    /// Overrides the delay observed after each report exchange.
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    fn command(&self, command: u8, value: u8) -> Result<()> {
        write_padded(&self.io, &[command, value], consts::split::REPORT_SIZE)?;
        thread::sleep(self.settle);
        Ok(())
    }

    fn read_port(&self, command: u8) -> Result<u8> {
        use consts::split::{REPORT_SIZE, VALUE_OFFSET};

        self.command(command, 0)?;
        let mut buf = [0u8; REPORT_SIZE];
        read_at_least(&self.io, &mut buf, VALUE_OFFSET + 1)?;
        thread::sleep(self.settle);
        Ok(buf[VALUE_OFFSET])
    }
}

impl<D: ReportIo> PortTransport for SplitPortReport<D> {
    fn read_state(&self) -> Result<u16> {
        let low = self.read_port(consts::split::CMD_READ_PORT0)?;
        let high = self.read_port(consts::split::CMD_READ_PORT1)?;
        let value = u16::from_le_bytes([low, high]);
        trace!("Read port state 0x{:04X}", value);
        Ok(value)
    }

    fn write_state(&self, value: u16) -> Result<()> {
        let [low, high] = value.to_le_bytes();
        trace!("Writing port state 0x{:04X}", value);
        self.command(consts::split::CMD_WRITE_PORT0, low)?;
        self.command(consts::split::CMD_WRITE_PORT1, high)
    }
}

/// Layout carrying both ports in one 4-byte report.
#[derive(Debug)]
pub struct FourByteReport<D> {
    io: D,
    settle: Duration,
}

impl<D: ReportIo> FourByteReport<D> {
    pub fn new(io: D) -> Self {
        Self {
            io,
            settle: SETTLE_DELAY,
        }
    }

    /// Overrides the delay observed after each report write.
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    fn send(&self, report: &[u8]) -> Result<()> {
        write_padded(&self.io, report, consts::four_byte::REPORT_SIZE)?;
        thread::sleep(self.settle);
        Ok(())
    }
}

impl<D: ReportIo> PortTransport for FourByteReport<D> {
    fn read_state(&self) -> Result<u16> {
        use consts::four_byte::*;

        self.send(&[CMD_READ_PORT0, 0, CMD_READ_PORT1, 0])?;
        let mut buf = [0u8; REPORT_SIZE];
        read_at_least(&self.io, &mut buf, REPORT_SIZE)?;
        let value = u16::from_le_bytes([buf[LOW_OFFSET], buf[HIGH_OFFSET]]);
        trace!("Read port state 0x{:04X}", value);
        Ok(value)
    }

    fn write_state(&self, value: u16) -> Result<()> {
        use consts::four_byte::*;

        let [low, high] = value.to_le_bytes();
        trace!("Writing port state 0x{:04X}", value);
        self.send(&[CMD_WRITE_PORT0, low, CMD_WRITE_PORT1, high])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_names() {
        assert_eq!("split".parse::<Protocol>().unwrap(), Protocol::Split);
        assert_eq!("Four-Byte".parse::<Protocol>().unwrap(), Protocol::FourByte);
        assert!(matches!(
            "eight".parse::<Protocol>(),
            Err(Error::UnknownProtocol(_))
        ));
        assert_eq!(Protocol::FourByte.to_string(), "four-byte");
        assert_eq!(Protocol::default(), Protocol::Split);
    }
}
