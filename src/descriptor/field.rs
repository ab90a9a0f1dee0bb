//! Field-level descriptor metadata
//!
//! A field is either a scalar slot with typing, padding, and alignment rules,
//! or a link delegating a span of the record to a nested record descriptor.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::record::RecordDescriptor;
use crate::constants::IMPLIED_DECIMAL_PADDING_CHAR;

/// Declared type of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text, left-aligned, trailing padding
    #[default]
    Text,
    /// Whole number, right-aligned, leading padding
    Integer,
    /// Fixed-point decimal, right-aligned, leading padding
    Decimal,
    /// Date or timestamp rendered through a chrono pattern
    Date,
}

impl ValueType {
    /// Whether the type takes numeric alignment and padding rules
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Decimal)
    }

    /// Type name for error messages
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Integer => "integer",
            ValueType::Decimal => "decimal",
            ValueType::Date => "date",
        }
    }
}

/// Horizontal alignment of a formatted value inside its fixed span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
}

/// Scalar slot metadata
#[derive(Debug, Clone)]
pub struct ScalarField {
    /// Declared value type
    pub value_type: ValueType,

    /// Span width in characters (fixed format only)
    pub length: Option<usize>,

    /// Fractional digits for decimal fields
    pub precision: Option<u32>,

    /// Raw text carries no separator; the decimal point sits `precision`
    /// digits from the right
    pub implied_decimal: bool,

    /// Per-field override of the record padding character
    pub padding_char: Option<char>,

    /// Per-field override of the type-derived alignment
    pub align: Option<Alignment>,

    /// Reject records where this field is blank
    pub required: bool,

    /// chrono format pattern for date fields
    pub pattern: Option<String>,
}

impl Default for ScalarField {
    fn default() -> Self {
        Self {
            value_type: ValueType::Text,
            length: None,
            precision: None,
            implied_decimal: false,
            padding_char: None,
            align: None,
            required: false,
            pattern: None,
        }
    }
}

impl ScalarField {
    /// Create a scalar of the given type with defaults for everything else
    pub fn of_type(value_type: ValueType) -> Self {
        Self {
            value_type,
            ..Self::default()
        }
    }

    /// Effective alignment: explicit override, else right for numerics and
    /// left for text-like types
    pub fn effective_align(&self) -> Alignment {
        self.align.unwrap_or(if self.value_type.is_numeric() {
            Alignment::Right
        } else {
            Alignment::Left
        })
    }

    /// Effective padding character inside this field's span
    ///
    /// Implied-decimal spans are always zero-filled; otherwise the field
    /// override applies, then the record default.
    pub fn effective_padding(&self, record_padding: char) -> char {
        if self.implied_decimal {
            IMPLIED_DECIMAL_PADDING_CHAR
        } else {
            self.padding_char.unwrap_or(record_padding)
        }
    }
}

/// Scalar-or-link discriminant for one descriptor slot
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A value slot
    Scalar(ScalarField),
    /// Delegation to a nested record whose fields occupy a sub-range of the
    /// parent's position space
    Link(Arc<RecordDescriptor>),
}

/// One field of a record descriptor
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name, unique within its record
    pub name: String,

    /// 1-based start offset (fixed format) or column index (delimited).
    /// Links carry no position of their own: their nested fields declare
    /// positions in the parent's coordinate space.
    pub position: Option<usize>,

    /// Scalar or link semantics; exactly one applies
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a scalar field descriptor
    pub fn scalar(name: impl Into<String>, position: usize, scalar: ScalarField) -> Self {
        Self {
            name: name.into(),
            position: Some(position),
            kind: FieldKind::Scalar(scalar),
        }
    }

    /// Create a link field descriptor
    pub fn link(name: impl Into<String>, target: Arc<RecordDescriptor>) -> Self {
        Self {
            name: name.into(),
            position: None,
            kind: FieldKind::Link(target),
        }
    }

    /// Whether this field delegates to a nested record
    pub fn is_link(&self) -> bool {
        matches!(self.kind, FieldKind::Link(_))
    }

    /// Borrow the scalar metadata, if this is a scalar field
    pub fn as_scalar(&self) -> Option<&ScalarField> {
        match &self.kind {
            FieldKind::Scalar(scalar) => Some(scalar),
            FieldKind::Link(_) => None,
        }
    }

    /// Borrow the linked descriptor, if this is a link field
    pub fn as_link(&self) -> Option<&Arc<RecordDescriptor>> {
        match &self.kind {
            FieldKind::Scalar(_) => None,
            FieldKind::Link(target) => Some(target),
        }
    }
}
