//! Fractional bond-price notation
//!
//! Treasury prices are quoted in 32nds with an eighths digit: `D-FFx`, where
//! `D` is the integer handle, `FF` the 32nds (`00`..`31`) and `x` either an
//! eighth of a 32nd (`0`..`7`, i.e. 1/256) or `+` for a half 32nd (1/64).
//!
//! All values are `Decimal`, so every point of the 1/256 grid is exact and
//! `parse_fractional(&format_fractional(v)) == v` holds on the grid.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::errors::PriceParseError;

/// Number of price ticks per point (1/256 grid).
pub const TICKS_PER_POINT: u32 = 256;

/// Eighths digit rendered as `+`.
const HALF_THIRTY_SECOND: u32 = 4;

/// Smallest price increment: 1/256 = 0.00390625.
pub fn tick() -> Decimal {
    Decimal::new(390_625, 8)
}

/// Convert a whole number of ticks into a price.
pub fn from_ticks(ticks: i64) -> Decimal {
    Decimal::from(ticks) * tick()
}

/// Render a price in `D-FFx` notation.
///
/// Values off the 1/256 grid are floored onto it (as the quoting desks do
/// for derived prices like `mid - spread / 2.2`).
pub fn format_fractional(price: Decimal) -> String {
    let sign = if price.is_sign_negative() && !price.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = price.abs();
    let handle = abs.trunc();

    // Fraction is in [0, 1), so the tick count always fits in 0..=255.
    let ticks = ((abs - handle) * Decimal::from(TICKS_PER_POINT))
        .floor()
        .to_u32()
        .unwrap_or_default();

    let thirty_seconds = ticks / 8;
    let eighths = ticks % 8;
    let last = if eighths == HALF_THIRTY_SECOND {
        "+".to_string()
    } else {
        eighths.to_string()
    };

    format!("{}{}-{:02}{}", sign, handle, thirty_seconds, last)
}

/// Parse a `D-FFx` price string into an exact decimal.
pub fn parse_fractional(input: &str) -> Result<Decimal, PriceParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PriceParseError::Empty);
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (handle_str, fraction) = body
        .split_once('-')
        .ok_or_else(|| PriceParseError::MissingSeparator(trimmed.to_string()))?;

    let handle: u64 = handle_str
        .parse()
        .map_err(|_| PriceParseError::InvalidHandle(trimmed.to_string()))?;

    let ticks = parse_fraction_ticks(fraction)
        .ok_or_else(|| PriceParseError::InvalidFraction(trimmed.to_string()))?;

    let value = Decimal::from(handle) + Decimal::from(ticks) * tick();
    Ok(if negative { -value } else { value })
}

/// Ticks encoded by the `FFx` part, or `None` if it is malformed.
fn parse_fraction_ticks(fraction: &str) -> Option<u32> {
    let bytes = fraction.as_bytes();
    if bytes.len() != 3 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
        return None;
    }

    let thirty_seconds = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
    if thirty_seconds >= 32 {
        return None;
    }

    let eighths = match bytes[2] {
        b'+' => HALF_THIRTY_SECOND,
        b @ b'0'..=b'7' => u32::from(b - b'0'),
        _ => return None,
    };

    Some(thirty_seconds * 8 + eighths)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_format_never_exceeds_input(raw in 0u64..100_000_000_000) {
            // Arbitrary 8dp values in [0, 1000): encoding floors to the grid.
            let value = Decimal::new(raw as i64, 8);
            let decoded = parse_fractional(&format_fractional(value)).unwrap();
            prop_assert!(decoded <= value);
            prop_assert!(value - decoded < tick());
        }
    }
}
