use crate::consts::{PORT_MASK, PORT_PIN_COUNT};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    /// Level requested by a literal: any non-zero value means High.
    pub fn from_literal(value: i64) -> Self {
        if value != 0 {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

/// Represents a valid port pin number (0-15).
/// Use `PortPin::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortPin(u8);

impl PortPin {
    /// Creates a new PortPin, returning an error if the number is out of range (0-15).
    pub fn new(pin_num: u8) -> Result<Self> {
        if pin_num < PORT_PIN_COUNT {
            Ok(PortPin(pin_num))
        } else {
            Err(Error::PinArgumentOutOfRange {
                pin: pin_num.into(),
                message: "Pin number must be 0-15".to_string(),
            })
        }
    }

    /// Maps the command-line pin selector: any negative number selects the whole port.
    pub fn from_selector(selector: i64) -> Result<Option<Self>> {
        if selector < 0 {
            return Ok(None);
        }
        u8::try_from(selector)
            .ok()
            .filter(|&n| n < PORT_PIN_COUNT)
            .map(|n| Some(PortPin(n)))
            .ok_or_else(|| Error::PinArgumentOutOfRange {
                pin: selector,
                message: "Pin number must be 0-15, or -1 for the whole port".to_string(),
            })
    }

    /// Returns the underlying pin number (0-15).
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Returns the bit mask (1 << pin) within the 16-bit port state.
    #[inline]
    pub fn mask(&self) -> u16 {
        1u16 << self.0
    }
}

/// Truncates a literal to the 16 bits of the port, two's complement for negatives.
#[inline]
pub fn low_word(value: i64) -> u16 {
    (value & i64::from(PORT_MASK)) as u16
}

/// Computes the raw word to write for a requested literal.
///
/// Whole-port mode replaces the state (complemented when `invert` is set);
/// `current` is not consulted. Single-pin mode changes only `pin` in
/// `current`, driving it High when the literal is non-zero, with the sense
/// flipped when `invert` is set.
pub fn apply_update(current: u16, requested: i64, pin: Option<PortPin>, invert: bool) -> u16 {
    match pin {
        None => {
            let value = low_word(requested);
            if invert {
                value ^ PORT_MASK
            } else {
                value
            }
        }
        Some(pin) => {
            let mut level = PinLevel::from_literal(requested);
            if invert {
                level = level.inverted();
            }
            match level {
                PinLevel::High => current | pin.mask(),
                PinLevel::Low => current & (PORT_MASK ^ pin.mask()),
            }
        }
    }
}
