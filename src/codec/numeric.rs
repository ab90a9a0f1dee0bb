//! Fixed-point numeric text conversion
//!
//! This module converts between decimal text and exact [`Decimal`] values:
//! implied-decimal digit strings, locale-governed separator characters, and
//! leading-sign handling. Formatting truncates excess fractional digits and
//! never rounds; silent rounding would corrupt downstream reconciliation.

use crate::model::Decimal;
use crate::{Error, Result};

/// Parse a whole number field
pub fn parse_integer(raw: &str, record: &str, field: &str, offset: usize) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| {
        Error::format(
            record,
            field,
            offset,
            format!("invalid integer '{}'", raw),
        )
    })
}

/// Parse a decimal field
///
/// With `implied` set, the raw text is sign and digits only and the value is
/// the digits divided by `10^precision`. Otherwise the text may carry one
/// literal `separator` and keeps its own scale.
pub fn parse_decimal(
    raw: &str,
    precision: Option<u32>,
    implied: bool,
    separator: char,
    record: &str,
    field: &str,
    offset: usize,
) -> Result<Decimal> {
    if implied {
        return parse_implied(raw, precision.unwrap_or(0), record, field, offset);
    }
    Decimal::parse(raw, separator).ok_or_else(|| {
        Error::format(
            record,
            field,
            offset,
            format!("invalid decimal '{}'", raw),
        )
    })
}

fn parse_implied(
    raw: &str,
    precision: u32,
    record: &str,
    field: &str,
    offset: usize,
) -> Result<Decimal> {
    let (negative, digits) = match raw.strip_prefix(['-', '+']) {
        Some(rest) => (raw.starts_with('-'), rest),
        None => (false, raw),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::format(
            record,
            field,
            offset,
            format!("invalid characters in implied-decimal value '{}'", raw),
        ));
    }

    let mut unscaled: i128 = 0;
    for digit in digits.chars() {
        unscaled = unscaled
            .checked_mul(10)
            .and_then(|v| v.checked_add((digit as u8 - b'0') as i128))
            .ok_or_else(|| {
                Error::format(record, field, offset, "implied-decimal value overflows")
            })?;
    }
    if negative {
        unscaled = -unscaled;
    }
    Ok(Decimal::new(unscaled, precision))
}

/// Format a decimal field value
///
/// A declared `precision` fixes the fractional digit count, truncating excess
/// digits. Implied mode renders sign and digits with no separator character;
/// otherwise the locale `separator` is used literally.
pub fn format_decimal(
    value: &Decimal,
    precision: Option<u32>,
    implied: bool,
    separator: char,
) -> String {
    let rescaled = match precision {
        Some(p) => value.rescale_truncate(p),
        None => *value,
    };

    if implied {
        let sign = if rescaled.is_negative() { "-" } else { "" };
        return format!("{}{}", sign, rescaled.unscaled().unsigned_abs());
    }

    let rendered = rescaled.to_string();
    if separator == '.' {
        rendered
    } else {
        rendered.replace('.', &separator.to_string())
    }
}
