//! Tests for the fixed-point numeric codec

use crate::codec::numeric::{format_decimal, parse_decimal, parse_integer};
use crate::model::Decimal;
use crate::Error;

#[test]
fn test_implied_decimal_parsing() {
    let value = parse_decimal("12345", Some(2), true, '.', "rec", "f", 0).unwrap();
    assert_eq!(value, Decimal::new(12345, 2));
    assert_eq!(value.to_string(), "123.45");
}

#[test]
fn test_implied_decimal_with_sign() {
    let value = parse_decimal("-1234", Some(2), true, '.', "rec", "f", 0).unwrap();
    assert_eq!(value.to_string(), "-12.34");

    let value = parse_decimal("+1234", Some(2), true, '.', "rec", "f", 0).unwrap();
    assert_eq!(value.to_string(), "12.34");
}

#[test]
fn test_implied_decimal_shorter_than_precision() {
    // Fewer digits than the precision still scale from the right
    let value = parse_decimal("5", Some(2), true, '.', "rec", "f", 0).unwrap();
    assert_eq!(value.to_string(), "0.05");
}

#[test]
fn test_implied_decimal_rejects_non_digits() {
    let err = parse_decimal("12x45", Some(2), true, '.', "rec", "amount", 4).unwrap_err();
    match err {
        Error::Format { field, offset, message, .. } => {
            assert_eq!(field, "amount");
            assert_eq!(offset, 4);
            assert!(message.contains("invalid characters"));
        }
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn test_implied_decimal_overflow_detected() {
    let digits = "9".repeat(60);
    let err = parse_decimal(&digits, Some(2), true, '.', "rec", "f", 0).unwrap_err();
    assert!(err.to_string().contains("overflows"));
}

#[test]
fn test_literal_decimal_parsing_keeps_scale() {
    let value = parse_decimal("10.00", Some(2), false, '.', "rec", "f", 0).unwrap();
    assert_eq!(value.unscaled(), 1000);
    assert_eq!(value.scale(), 2);

    let value = parse_decimal("10", None, false, '.', "rec", "f", 0).unwrap();
    assert_eq!(value.scale(), 0);
}

#[test]
fn test_literal_decimal_rejects_garbage() {
    assert!(parse_decimal("ten", None, false, '.', "rec", "f", 0).is_err());
    assert!(parse_decimal("1.2.3", None, false, '.', "rec", "f", 0).is_err());
}

#[test]
fn test_format_implied_renders_digits_only() {
    assert_eq!(
        format_decimal(&Decimal::new(12345, 2), Some(2), true, '.'),
        "12345"
    );
    assert_eq!(
        format_decimal(&Decimal::new(1000, 2), Some(2), true, '.'),
        "1000"
    );
    assert_eq!(
        format_decimal(&Decimal::new(-1234, 2), Some(2), true, '.'),
        "-1234"
    );
}

#[test]
fn test_format_truncates_excess_fraction() {
    // 1.239 at precision 2 is 1.23, never 1.24
    let value: Decimal = "1.239".parse().unwrap();
    assert_eq!(format_decimal(&value, Some(2), false, '.'), "1.23");
    assert_eq!(format_decimal(&value, Some(2), true, '.'), "123");
}

#[test]
fn test_format_extends_short_fraction() {
    let value: Decimal = "10".parse().unwrap();
    assert_eq!(format_decimal(&value, Some(2), false, '.'), "10.00");
}

#[test]
fn test_format_without_precision_keeps_natural_scale() {
    let value: Decimal = "155000.0".parse().unwrap();
    assert_eq!(format_decimal(&value, None, false, '.'), "155000.0");
}

#[test]
fn test_locale_separator_formatting_and_parsing() {
    let value: Decimal = "123.45".parse().unwrap();
    assert_eq!(format_decimal(&value, Some(2), false, ','), "123,45");

    let parsed = parse_decimal("123,45", None, false, ',', "rec", "f", 0).unwrap();
    assert_eq!(parsed, value);
}

#[test]
fn test_integer_parsing() {
    assert_eq!(parse_integer("2005", "rec", "year", 0).unwrap(), 2005);
    assert_eq!(parse_integer("-7", "rec", "year", 0).unwrap(), -7);

    let err = parse_integer("20O5", "rec", "year", 8).unwrap_err();
    match err {
        Error::Format { field, offset, .. } => {
            assert_eq!(field, "year");
            assert_eq!(offset, 8);
        }
        other => panic!("expected format error, got {other:?}"),
    }
}
