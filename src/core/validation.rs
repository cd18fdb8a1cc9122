//! Structural constraints checked before any write reaches the store.
//!
//! Names are capped at 200 characters, money at 12 total digits with 2
//! fractional digits, sheet months at 1..=12 and years at 0..=32767.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Maximum length, in characters, of every name-like field.
pub const MAX_NAME_LENGTH: usize = 200;
/// Total digits a stored amount may carry.
pub const MAX_DIGITS: u32 = 12;
/// Fractional digits a stored amount may carry.
pub const DECIMAL_PLACES: u32 = 2;
/// Largest sheet year, the range of a positive small integer.
pub const MAX_YEAR: i32 = 32_767;

/// Rejects names longer than [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(field: &'static str, value: &str) -> Result<()> {
    let length = value.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(Error::Validation {
            field,
            message: format!("{length} characters exceeds the limit of {MAX_NAME_LENGTH}"),
        });
    }
    Ok(())
}

/// Rejects amounts that do not fit `decimal(12, 2)`.
///
/// Trailing zeros do not count against the fractional limit, so `1.500` is accepted.
pub fn validate_amount(field: &'static str, value: Decimal) -> Result<()> {
    let normalized = value.normalize();
    if normalized.scale() > DECIMAL_PLACES {
        return Err(Error::Validation {
            field,
            message: format!("{value} has more than {DECIMAL_PLACES} decimal places"),
        });
    }

    let integer_limit = Decimal::from(10_i64.pow(MAX_DIGITS - DECIMAL_PLACES));
    if normalized.abs().trunc() >= integer_limit {
        return Err(Error::Validation {
            field,
            message: format!("{value} has more than {MAX_DIGITS} digits"),
        });
    }
    Ok(())
}

/// Rejects months outside 1..=12.
pub fn validate_month(month: i32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(Error::Validation {
            field: "month",
            message: format!("{month} is not between 1 and 12"),
        });
    }
    Ok(())
}

/// Rejects years outside 0..=[`MAX_YEAR`].
pub fn validate_year(year: i32) -> Result<()> {
    if !(0..=MAX_YEAR).contains(&year) {
        return Err(Error::Validation {
            field: "year",
            message: format!("{year} is not between 0 and {MAX_YEAR}"),
        });
    }
    Ok(())
}
