//! Internal constants: USB ids, command bytes and report timing.

use std::time::Duration;

// Default Vendor/Product IDs
/// Vendor ID of the Morphy USB-IO board.
pub const MORPHY_VID: u16 = 0x0BFE;
/// Product ID of the Morphy USB-IO board.
pub const MORPHY_USBIO_PID: u16 = 0x1003;

/// Delay after every report exchange so the firmware can latch the new state.
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Timeout for a single interrupt IN report.
pub const DEFAULT_READ_TIMEOUT_MS: i32 = 1000;

/// Number of pins exposed by the two 8-bit ports.
pub const PORT_PIN_COUNT: u8 = 16;
/// Mask covering the whole 16-bit port state.
pub const PORT_MASK: u16 = 0xFFFF;

// --- Split port reports (one command per 8-bit port) ---
pub mod split {
    pub const CMD_WRITE_PORT0: u8 = 0x01;
    pub const CMD_WRITE_PORT1: u8 = 0x02;
    pub const CMD_READ_PORT0: u8 = 0x03;
    pub const CMD_READ_PORT1: u8 = 0x04;

    // Both directions use the board's 8-byte report
    pub const REPORT_SIZE: usize = 8;
    /// Offset of the port value in an IN report.
    pub const VALUE_OFFSET: usize = 1;
}

// --- Four byte reports (both ports in one exchange) ---
pub mod four_byte {
    pub const CMD_WRITE_PORT0: u8 = 0x01;
    pub const CMD_WRITE_PORT1: u8 = 0x02;
    pub const CMD_READ_PORT0: u8 = 0x03;
    pub const CMD_READ_PORT1: u8 = 0x04;

    pub const REPORT_SIZE: usize = 4;
    pub const LOW_OFFSET: usize = 1;
    pub const HIGH_OFFSET: usize = 3;
}
