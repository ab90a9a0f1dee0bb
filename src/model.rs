//! Runtime record values
//!
//! This module provides the transient value types produced and consumed by the
//! codec: [`RecordValue`] (an owned field map created fresh per call),
//! [`Value`] (one scalar or nested record), and [`Decimal`] (an exact
//! fixed-point number with explicit truncation semantics).

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single field value inside a record
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Free text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Exact fixed-point decimal
    Decimal(Decimal),
    /// Date or timestamp, formatted through a field pattern
    Date(NaiveDateTime),
    /// Nested record populated through a link field
    Record(RecordValue),
}

impl Value {
    /// Human-readable name of the value variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Record(_) => "record",
        }
    }

    /// Borrow the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the integer content, if this is an integer value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract the decimal content, if this is a decimal value
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract the date content, if this is a date value
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the nested record, if this is a record value
    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Date(v)
    }
}

impl From<RecordValue> for Value {
    fn from(v: RecordValue) -> Self {
        Value::Record(v)
    }
}

/// An owned mapping from field name to value
///
/// Record values are transient: one per marshal or unmarshal call, owned
/// exclusively by the caller. Fields are kept in name order so iteration and
/// equality are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValue {
    fields: BTreeMap<String, Value>,
}

impl RecordValue {
    /// Create an empty record value
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any previous value under the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Chained form of [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Look up a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate populated fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Navigate to the nested record at `path`, materializing intermediate
    /// records as needed. Non-record values on the path are replaced.
    pub(crate) fn record_at_path_mut(&mut self, path: &[String]) -> &mut RecordValue {
        let mut current = self;
        for segment in path {
            let slot = current
                .fields
                .entry(segment.clone())
                .or_insert_with(|| Value::Record(RecordValue::new()));
            if !matches!(slot, Value::Record(_)) {
                *slot = Value::Record(RecordValue::new());
            }
            let Value::Record(next) = slot else {
                unreachable!("slot was just set to a record");
            };
            current = next;
        }
        current
    }

    /// Navigate to the nested record at `path`, if fully populated
    pub(crate) fn record_at_path(&self, path: &[String]) -> Option<&RecordValue> {
        let mut current = self;
        for segment in path {
            current = current.fields.get(segment)?.as_record()?;
        }
        Some(current)
    }
}

/// An exact fixed-point decimal number
///
/// Stored as an unscaled `i128` plus a scale: the numeric value is
/// `unscaled / 10^scale`. Equality is numeric, so `10.00` equals `10`.
/// Rescaling to fewer fractional digits truncates toward zero, never rounds.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    unscaled: i128,
    scale: u32,
}

impl Decimal {
    /// Create a decimal from its unscaled value and scale
    pub fn new(unscaled: i128, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    /// Create a whole-number decimal
    pub fn from_int(value: i64) -> Self {
        Self::new(value as i128, 0)
    }

    /// Unscaled value (`self * 10^scale`)
    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    /// Number of fractional digits
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Whether the value is below zero
    pub fn is_negative(&self) -> bool {
        self.unscaled < 0
    }

    /// Change the scale, truncating toward zero when fractional digits are
    /// dropped. Never rounds: `1.239` rescaled to 2 digits is `1.23`.
    pub fn rescale_truncate(&self, scale: u32) -> Decimal {
        if scale == self.scale {
            *self
        } else if scale > self.scale {
            let factor = pow10(scale - self.scale);
            match self.unscaled.checked_mul(factor) {
                Some(unscaled) => Decimal::new(unscaled, scale),
                None => *self,
            }
        } else {
            Decimal::new(self.unscaled / pow10(self.scale - scale), scale)
        }
    }

    /// Parse a decimal literal using the given separator character
    ///
    /// Accepts an optional leading sign, digits, and at most one separator.
    /// Returns `None` for anything else, including overflow.
    pub fn parse(literal: &str, separator: char) -> Option<Decimal> {
        let (negative, body) = match literal.strip_prefix(['-', '+']) {
            Some(rest) => (literal.starts_with('-'), rest),
            None => (false, literal),
        };
        if body.is_empty() {
            return None;
        }

        let mut parts = body.splitn(2, separator);
        let integer_part = parts.next().unwrap_or("");
        let fraction_part = parts.next().unwrap_or("");

        if integer_part.is_empty() && fraction_part.is_empty() {
            return None;
        }
        if !integer_part.chars().all(|c| c.is_ascii_digit())
            || !fraction_part.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let scale = u32::try_from(fraction_part.len()).ok()?;
        let mut unscaled: i128 = 0;
        for digit in integer_part.chars().chain(fraction_part.chars()) {
            unscaled = unscaled
                .checked_mul(10)?
                .checked_add((digit as u8 - b'0') as i128)?;
        }
        if negative {
            unscaled = -unscaled;
        }

        Some(Decimal::new(unscaled, scale))
    }

    /// Scale-normalized form: trailing fractional zeros removed
    fn normalized(&self) -> (i128, u32) {
        if self.unscaled == 0 {
            return (0, 0);
        }
        let mut unscaled = self.unscaled;
        let mut scale = self.scale;
        while scale > 0 && unscaled % 10 == 0 {
            unscaled /= 10;
            scale -= 1;
        }
        (unscaled, scale)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Decimal {}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.unscaled);
        }
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let split = padded.len() - scale;
        let sign = if self.unscaled < 0 { "-" } else { "" };
        write!(f, "{}{}.{}", sign, &padded[..split], &padded[split..])
    }
}

/// Error produced when a decimal literal cannot be parsed
#[derive(thiserror::Error, Debug)]
#[error("invalid decimal literal '{literal}'")]
pub struct DecimalParseError {
    literal: String,
}

impl FromStr for Decimal {
    type Err = DecimalParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::parse(s, '.').ok_or_else(|| DecimalParseError {
            literal: s.to_string(),
        })
    }
}

fn pow10(exponent: u32) -> i128 {
    10i128.saturating_pow(exponent)
}
