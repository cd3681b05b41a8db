use alloy_primitives::I256;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ParseQuantityError;

/// Parse an integer quantity with C-style automatic base detection.
///
/// Accepts an optional sign followed by `0x`/`0X` (hex), `0b`/`0B` (binary),
/// `0o`/`0O` or a bare leading `0` (octal), or plain decimal digits.
/// Underscores may separate digits or follow a base prefix.
///
/// The value must fit in an `i64`; anything wider is rejected as out of range
/// so that oversized node answers take the fallback path.
pub fn parse_int_auto(value: &str) -> Result<i64, ParseQuantityError> {
    if value.is_empty() {
        return Err(ParseQuantityError::Empty);
    }
    let invalid = || ParseQuantityError::InvalidDigit(value.to_string());

    let (negative, unsigned) = match value.as_bytes()[0] {
        b'+' => (false, &value[1..]),
        b'-' => (true, &value[1..]),
        _ => (false, value),
    };
    if unsigned.is_empty() {
        return Err(invalid());
    }

    let (radix, digits, prefixed) = split_radix(unsigned);

    let mut magnitude: u64 = 0;
    // Underscores are only legal right after a digit or a base prefix.
    let mut after_digit = prefixed;
    let mut after_underscore = false;
    for c in digits.chars() {
        if c == '_' {
            if !after_digit {
                return Err(invalid());
            }
            after_digit = false;
            after_underscore = true;
            continue;
        }
        let digit = c.to_digit(radix).ok_or_else(invalid)?;
        magnitude = magnitude
            .checked_mul(u64::from(radix))
            .and_then(|m| m.checked_add(u64::from(digit)))
            .ok_or_else(|| ParseQuantityError::OutOfRange(value.to_string()))?;
        after_digit = true;
        after_underscore = false;
    }
    if after_underscore {
        return Err(invalid());
    }

    let limit = if negative { i64::MIN.unsigned_abs() } else { i64::MAX as u64 };
    if magnitude > limit {
        return Err(ParseQuantityError::OutOfRange(value.to_string()));
    }
    Ok(if negative {
        (magnitude as i64).wrapping_neg()
    } else {
        magnitude as i64
    })
}

/// Split off a base prefix, returning the radix, the remaining digits and
/// whether a prefix was consumed.
fn split_radix(unsigned: &str) -> (u32, &str, bool) {
    let bytes = unsigned.as_bytes();
    if bytes[0] != b'0' {
        return (10, unsigned, false);
    }
    if bytes.len() >= 3 {
        match bytes[1].to_ascii_lowercase() {
            b'x' => return (16, &unsigned[2..], true),
            b'b' => return (2, &unsigned[2..], true),
            b'o' => return (8, &unsigned[2..], true),
            _ => {}
        }
    }
    (8, &unsigned[1..], true)
}

/// Parse a quantity into a decimal with no fractional digits.
pub fn parse_decimal(value: &str) -> Result<Decimal, ParseQuantityError> {
    parse_int_auto(value).map(Decimal::from)
}

/// Parse a quantity into a signed 256-bit integer.
pub fn parse_int(value: &str) -> Result<I256, ParseQuantityError> {
    let n = parse_int_auto(value)?;
    I256::try_from(n).map_err(|_| ParseQuantityError::OutOfRange(value.to_string()))
}

/// Convert a hex (or auto-base) quantity string into a decimal amount,
/// returning `default` unchanged when it cannot be parsed.
pub fn hex_to_dec(value: &str, default: Decimal) -> Decimal {
    match parse_decimal(value) {
        Ok(amount) => amount,
        Err(e) => {
            debug!("Falling back to {} for quantity {:?}: {}", default, value, e);
            default
        }
    }
}

/// Convert a hex (or auto-base) quantity string into an integer,
/// returning `default` unchanged when it cannot be parsed.
pub fn hex_to_int(value: &str, default: I256) -> I256 {
    match parse_int(value) {
        Ok(n) => n,
        Err(e) => {
            debug!("Falling back to {} for quantity {:?}: {}", default, value, e);
            default
        }
    }
}
