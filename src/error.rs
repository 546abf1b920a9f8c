use thiserror::Error;

/// Errors that can occur when talking to a USB-IO board.
///
/// Every variant is fatal for a single invocation: nothing is retried,
/// the caller reports the error and gives up.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying HID API layer (open, read or write failure).
    #[error("HID API error: {0}")]
    Hid(#[from] hidapi::HidError),
    /// No device was found with the specified vendor/product ID.
    #[error("Device not found with VID=0x{vid:04X}, PID=0x{pid:04X}")]
    DeviceNotFound {
        /// The vendor ID that was searched for.
        vid: u16,
        /// The product ID that was searched for.
        pid: u16,
    },
    /// Matching devices exist, but not at the requested ordinal index.
    #[error("Device not found at index {index}: {message}")]
    DeviceNotFoundByIndex {
        /// The index that was requested.
        index: usize,
        /// Additional error details.
        message: String,
    },
    /// The device answered with a report shorter than the layout requires.
    #[error("Invalid HID report received (expected at least {expected} bytes, got {actual})")]
    InvalidReport {
        /// Minimum number of bytes needed to decode the report.
        expected: usize,
        /// Number of bytes actually received.
        actual: usize,
    },
    /// Timeout waiting for device response.
    #[error("Timeout waiting for device response")]
    Timeout,
    /// A numeric literal on the command line could not be parsed.
    #[error("Invalid numeric literal '{literal}': {message}")]
    InvalidLiteral {
        /// The literal as given.
        literal: String,
        /// What was wrong with it.
        message: String,
    },
    /// Pin number is outside the 16 pins of the port.
    #[error("Pin {pin} argument out of range (0-15): {message}")]
    PinArgumentOutOfRange {
        /// The invalid pin number that was specified.
        pin: i64,
        /// Detailed error message explaining the constraint.
        message: String,
    },
    /// A custom output template could not be parsed.
    #[error("Invalid output format '{template}': {message}")]
    InvalidFormat {
        /// The template as given.
        template: String,
        /// What was wrong with it.
        message: String,
    },
    /// The log level name is not in the lookup table.
    #[error("Unknown log level '{0}'")]
    UnknownLogLevel(String),
    /// The report layout name is not recognised.
    #[error("Unknown protocol '{0}' (expected 'split' or 'four-byte')")]
    UnknownProtocol(String),
}

/// Result type alias for USB-IO operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn invalid_literal(literal: &str, message: impl Into<String>) -> Error {
    Error::InvalidLiteral {
        literal: literal.to_string(),
        message: message.into(),
    }
}

pub(crate) fn invalid_format(template: &str, message: impl Into<String>) -> Error {
    Error::InvalidFormat {
        template: template.to_string(),
        message: message.into(),
    }
}
