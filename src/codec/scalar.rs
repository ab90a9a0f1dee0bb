//! Typed scalar formatting and parsing shared by both record formats

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::numeric;
use crate::constants::DEFAULT_DATE_PATTERN;
use crate::descriptor::{RecordDescriptor, ValueType};
use crate::descriptor::resolver::ResolvedField;
use crate::model::{Decimal, Value};
use crate::{Error, Result};

/// Render a field value to text per the slot's declared type
///
/// Integer values are accepted where a decimal is declared; any other
/// mismatch between declared type and value variant is a format error.
pub fn format_scalar(
    value: &Value,
    slot: &ResolvedField,
    descriptor: &RecordDescriptor,
) -> Result<String> {
    let scalar = &slot.scalar;
    let separator = descriptor.decimal_separator();
    match (scalar.value_type, value) {
        (ValueType::Text, Value::Text(text)) => Ok(text.clone()),
        (ValueType::Integer, Value::Integer(v)) => Ok(v.to_string()),
        (ValueType::Decimal, Value::Decimal(d)) => Ok(numeric::format_decimal(
            d,
            scalar.precision,
            scalar.implied_decimal,
            separator,
        )),
        (ValueType::Decimal, Value::Integer(v)) => Ok(numeric::format_decimal(
            &Decimal::from_int(*v),
            scalar.precision,
            scalar.implied_decimal,
            separator,
        )),
        (ValueType::Date, Value::Date(dt)) => Ok(format_date(dt, scalar.pattern.as_deref())),
        (declared, actual) => Err(Error::format(
            descriptor.name(),
            slot.qualified_name(),
            slot.position.saturating_sub(1),
            format!(
                "type mismatch: field is declared {} but the value is {}",
                declared.name(),
                actual.type_name()
            ),
        )),
    }
}

/// Parse stripped field text into a typed value
pub fn parse_scalar(
    raw: &str,
    slot: &ResolvedField,
    descriptor: &RecordDescriptor,
    offset: usize,
) -> Result<Value> {
    let scalar = &slot.scalar;
    let record = descriptor.name();
    let field = slot.qualified_name();
    match scalar.value_type {
        ValueType::Text => Ok(Value::Text(raw.to_string())),
        ValueType::Integer => {
            numeric::parse_integer(raw, record, &field, offset).map(Value::Integer)
        }
        ValueType::Decimal => numeric::parse_decimal(
            raw,
            scalar.precision,
            scalar.implied_decimal,
            descriptor.decimal_separator(),
            record,
            &field,
            offset,
        )
        .map(Value::Decimal),
        ValueType::Date => {
            parse_date(raw, scalar.pattern.as_deref(), record, &field, offset).map(Value::Date)
        }
    }
}

fn format_date(value: &NaiveDateTime, pattern: Option<&str>) -> String {
    value
        .format(pattern.unwrap_or(DEFAULT_DATE_PATTERN))
        .to_string()
}

fn parse_date(
    raw: &str,
    pattern: Option<&str>,
    record: &str,
    field: &str,
    offset: usize,
) -> Result<NaiveDateTime> {
    let pattern = pattern.unwrap_or(DEFAULT_DATE_PATTERN);

    // Try a full timestamp first, then a bare date at midnight
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
        Ok(dt)
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, pattern) {
        Ok(date.and_time(NaiveTime::MIN))
    } else {
        Err(Error::format(
            record,
            field,
            offset,
            format!("invalid date '{}' (expected pattern '{}')", raw, pattern),
        ))
    }
}
