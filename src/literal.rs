//! Integer literals in any of the usual bases.
//!
//! Accepted forms: optional sign, then `0x`/`0o`/`0b` (either case) or plain
//! decimal digits. Single underscores may separate digits, and a prefixed
//! literal may put one right after the prefix (`0x_FF`). Decimal literals
//! cannot carry leading zeros (`010` is rejected, `000` is zero).

use crate::error::{invalid_literal, Result};

/// Parses a literal into an `i64`, rejecting values outside its range.
pub fn parse_literal(text: &str) -> Result<i64> {
    let (negative, radix, digits) = split_literal(text)?;
    let magnitude = u64::from_str_radix(&digits, radix)
        .map_err(|_| invalid_literal(text, "value does not fit in 64 bits"))?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(value).map_err(|_| invalid_literal(text, "value does not fit in 64 bits"))
}

/// Parses a new port value of any width.
///
/// Only the low 16 bits and whether the value is zero matter to the port,
/// so wider literals are folded: the result has the same low 16 bits (two's
/// complement for negatives) and is non-zero exactly when the literal is.
pub fn parse_port_literal(text: &str) -> Result<i64> {
    let (negative, radix, digits) = split_literal(text)?;
    let mut wrapped = 0u64;
    let mut nonzero = false;
    for c in digits.chars() {
        let digit = c.to_digit(radix).unwrap_or(0);
        nonzero |= digit != 0;
        wrapped = wrapped
            .wrapping_mul(u64::from(radix))
            .wrapping_add(u64::from(digit));
    }
    let mut value = wrapped as i64;
    if negative {
        value = value.wrapping_neg();
    }
    if value == 0 && nonzero {
        // Low 64 bits all clear, but the literal itself is not zero
        value = 1 << 16;
    }
    Ok(value)
}

/// Parses a literal that must fit a USB vendor or product id.
pub fn parse_u16_literal(text: &str) -> Result<u16> {
    let value = parse_literal(text)?;
    u16::try_from(value).map_err(|_| invalid_literal(text, "must be in range 0-0xFFFF"))
}

/// Parses a non-negative literal, used for device ordinals.
pub fn parse_index_literal(text: &str) -> Result<usize> {
    let value = parse_literal(text)?;
    usize::try_from(value).map_err(|_| invalid_literal(text, "must not be negative"))
}

/// Validates `text` and returns its sign, radix and bare digits.
fn split_literal(text: &str) -> Result<(bool, u32, String)> {
    let s = text.trim();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, mut digits) = split_radix(unsigned);
    if radix != 10 {
        digits = digits.strip_prefix('_').unwrap_or(digits);
    }
    if digits.is_empty() {
        return Err(invalid_literal(text, "missing digits"));
    }
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err(invalid_literal(text, "misplaced underscore"));
    }

    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if let Some(bad) = cleaned.chars().find(|c| !c.is_digit(radix)) {
        return Err(invalid_literal(
            text,
            format!("invalid digit '{}' for base {}", bad, radix),
        ));
    }
    if radix == 10 && cleaned.starts_with('0') && cleaned.bytes().any(|b| b != b'0') {
        return Err(invalid_literal(
            text,
            "leading zeros are not allowed in decimal literals (use 0o for octal)",
        ));
    }
    Ok((negative, radix, cleaned))
}

fn split_radix(s: &str) -> (u32, &str) {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &s[2..]),
            b'o' | b'O' => return (8, &s[2..]),
            b'b' | b'B' => return (2, &s[2..]),
            _ => {}
        }
    }
    (10, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_prefixed_literals() {
        assert_eq!(parse_literal("0x55AA").unwrap(), 0x55AA);
        assert_eq!(parse_literal("0XabCd").unwrap(), 0xABCD);
        assert_eq!(parse_literal("0b1010").unwrap(), 0b1010);
        assert_eq!(parse_literal("0o777").unwrap(), 0o777);
        assert_eq!(parse_literal("0x_ff").unwrap(), 0xFF);
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(parse_literal("0").unwrap(), 0);
        assert_eq!(parse_literal("000").unwrap(), 0);
        assert_eq!(parse_literal("42").unwrap(), 42);
        assert_eq!(parse_literal("  7 ").unwrap(), 7);
        assert_eq!(parse_literal("65_535").unwrap(), 65535);
        assert_eq!(parse_literal("-1").unwrap(), -1);
        assert_eq!(parse_literal("+12").unwrap(), 12);
        assert_eq!(parse_literal("-0x10").unwrap(), -16);
    }

    #[test]
    fn test_malformed_literals() {
        for bad in [
            "", "0x", "-", "010", "0xZZ", "0b102", "1__0", "_1", "1_", "0x+5", "12abc", "0x__1",
        ] {
            let err = parse_literal(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidLiteral { .. }),
                "'{}' should be rejected, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_literal_overflow() {
        assert_eq!(
            parse_literal("-0x8000000000000000").unwrap(),
            i64::MIN
        );
        assert!(parse_literal("0x8000000000000000").is_err());
        assert!(parse_literal("0x1_0000_0000_0000_0000").is_err());
    }

    #[test]
    fn test_wide_port_literals() {
        assert_eq!(parse_port_literal("0x55AA").unwrap(), 0x55AA);
        assert_eq!(parse_port_literal("-2").unwrap(), -2);
        assert_eq!(parse_port_literal("0").unwrap(), 0);

        let folded = parse_port_literal("0x10000000000000001").unwrap();
        assert_eq!(folded & 0xFFFF, 1);
        let folded = parse_port_literal("-0x1_0000_0000_0000_0002").unwrap();
        assert_eq!(folded & 0xFFFF, 0xFFFE);
        let folded = parse_port_literal("123456789012345678901234567890").unwrap();
        assert_eq!(folded & 0xFFFF, 0x0AD2);

        // Low 64 bits clear, still a non-zero request
        let folded = parse_port_literal("0x1_0000_0000_0000_0000").unwrap();
        assert_eq!(folded & 0xFFFF, 0);
        assert_ne!(folded, 0);

        assert!(parse_port_literal("0xZZ").is_err());
        assert!(parse_port_literal("010").is_err());
    }

    #[test]
    fn test_u16_and_index_literals() {
        assert_eq!(parse_u16_literal("0x0BFE").unwrap(), 0x0BFE);
        assert_eq!(parse_u16_literal("4099").unwrap(), 0x1003);
        assert!(parse_u16_literal("0x10000").is_err());
        assert!(parse_u16_literal("-1").is_err());
        assert_eq!(parse_index_literal("2").unwrap(), 2);
        assert!(parse_index_literal("-1").is_err());
    }
}
