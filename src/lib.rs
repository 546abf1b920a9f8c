//! # usbio
//!
//! Control the 16 GPIO pins of Morphy USB-IO and compatible boards over
//! their USB HID interface.
//!
//! This crate uses the `hidapi` crate for cross-platform USB HID communication.
//!
//! ## Features
//!
//! *   Device discovery by VID/PID with ordinal selection (`find_devices`, `UsbIo::open_nth`).
//! *   Two report layouts behind one `PortTransport` trait:
//!     *   `SplitPortReport`: one command per 8-bit port (Morphy USB-IO firmware).
//!     *   `FourByteReport`: both ports in one 4-byte report.
//! *   Whole-port writes and single-pin read-modify-write (`PortController`).
//! *   Inverted logic, applied symmetrically on write and on display.
//! *   Output as hex, binary, a single pin bit, or a custom template (`render`).
//!
//! ## Port State
//!
//! The two 8-bit ports form one 16-bit word: port 0 is the low byte
//! (pins 0-7), port 1 the high byte (pins 8-15).
//!
//! ## Inverted Logic
//!
//! With `invert` set, whole-port writes send the complement of the requested
//! word, and single-pin writes drive the pin to the opposite of the
//! requested level. The read-back value is complemented again for display,
//! so the printed value always matches what was requested.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use usbio::{render, OutputFormat, PortController, PortPin, PortRequest, Protocol, Result, UsbIo};
//! use hidapi::HidApi;
//!
//! fn main() -> Result<()> {
//!     let hid_api = HidApi::new()?;
//!     let device = UsbIo::open_nth(&hid_api, usbio::MORPHY_VID, usbio::MORPHY_USBIO_PID, 0)?;
//!     let controller = PortController::new(device.port(Protocol::Split));
//!
//!     // Drive pin 1 high, keep the others
//!     let request = PortRequest {
//!         value: Some(1),
//!         pin: Some(PortPin::new(1)?),
//!         invert: false,
//!     };
//!     let state = controller.execute(&request)?;
//!     println!("{}", render(state, request.pin, request.invert, &OutputFormat::Hex));
//!     Ok(())
//! }
//! ```
//!
//! ## Hardware Setup Notes
//!
//! *   **Linux udev Rules:** Grant user permission to the HID device. Create `/etc/udev/rules.d/99-usbio.rules`:
//!     ```udev
//!     SUBSYSTEM=="hidraw", ATTRS{idVendor}=="0bfe", ATTRS{idProduct}=="1003", MODE="0666", GROUP="plugdev"
//!     ```
//!     Reload: `sudo udevadm control --reload-rules && sudo udevadm trigger`
//! *   **Timing:** The firmware needs ~300 ms after each report to latch
//!     outputs, so a read-modify-write of one pin takes a few seconds.
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

use log::debug;

mod consts;
mod error;
pub mod device;
pub mod format;
pub mod gpio;
pub mod literal;
pub mod logging;
pub mod transport;

pub use device::{find_devices, UsbIo, UsbIoDiscoveryInfo, UsbIoInfo};
pub use error::{Error, Result};
pub use format::{render, OutputFormat, Template};
pub use gpio::{apply_update, PinLevel, PortPin};
pub use literal::{parse_literal, parse_port_literal};
pub use transport::{FourByteReport, PortTransport, Protocol, ReportIo, SplitPortReport};
// Re-export only essential public constants
pub use consts::{MORPHY_USBIO_PID, MORPHY_VID, PORT_MASK, SETTLE_DELAY};

/// One invocation's worth of work: an optional new value, scoped to an
/// optional pin, under an optional logic inversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortRequest {
    /// New value; `None` means read-only.
    pub value: Option<i64>,
    /// Restrict the update and the displayed result to one pin.
    pub pin: Option<PortPin>,
    pub invert: bool,
}

impl PortRequest {
    /// Formats a read-back state the way this request asks for it.
    pub fn render(&self, state: u16, format: &OutputFormat) -> String {
        render(state, self.pin, self.invert, format)
    }
}

/// Sequences port reads and writes over a [`PortTransport`].
///
/// The sequence is strictly linear: read the current state (single-pin
/// writes only), write the new state, read it back.
#[derive(Debug)]
pub struct PortController<T> {
    transport: T,
}

impl<T: PortTransport> PortController<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn read_state(&self) -> Result<u16> {
        self.transport.read_state()
    }

    pub fn write_state(&self, value: u16) -> Result<()> {
        self.transport.write_state(value)
    }

    /// Applies `request` and returns the raw read-back state (not inverted).
    pub fn execute(&self, request: &PortRequest) -> Result<u16> {
        if let Some(requested) = request.value {
            // Whole-port writes don't depend on the current state
            let current = match request.pin {
                Some(_) => self.transport.read_state()?,
                None => 0,
            };
            let next = apply_update(current, requested, request.pin, request.invert);
            debug!(
                "Updating port: current=0x{:04X}, requested={}, pin={:?}, invert={}, next=0x{:04X}",
                current,
                requested,
                request.pin.map(|p| p.number()),
                request.invert,
                next
            );
            self.transport.write_state(next)?;
        }
        self.transport.read_state()
    }
}
