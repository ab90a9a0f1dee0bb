//! Declarative record layout definitions
//!
//! Provides serde-backed configuration structures describing record layouts:
//! the declarative source compiled into immutable descriptors by the
//! [`DescriptorRegistry`](crate::descriptor::DescriptorRegistry). Link fields
//! reference their target record by name, so a set of configurations forms a
//! record graph validated at compile time.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOCALE, DEFAULT_PADDING_CHAR};
use crate::descriptor::{Alignment, LineTerminator, ValueType};
use crate::{Error, Result};

/// Record format discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// Fixed-length lines with positional character spans
    #[default]
    Fixed,
    /// Delimiter-separated columns
    Delimited,
}

/// Declarative definition of one record type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Record type name, unique within a registry
    pub name: String,

    /// Fixed or delimited
    #[serde(default)]
    pub format: FormatKind,

    /// Total fixed width in characters (fixed format)
    #[serde(default)]
    pub length: Option<usize>,

    /// Fill character for fixed records
    #[serde(default = "default_padding_char")]
    pub padding_char: char,

    /// Default fractional digits applied to decimal fields that declare none
    #[serde(default)]
    pub precision: Option<u32>,

    /// Default implied-separator mode applied to decimal fields
    #[serde(default)]
    pub implied_decimal_separator: bool,

    /// Column separator (delimited format)
    #[serde(default)]
    pub delimiter: Option<char>,

    /// Quote character recognized on input (delimited format)
    #[serde(default)]
    pub quote_char: Option<char>,

    /// Quote every column on output (delimited format)
    #[serde(default)]
    pub quoting: bool,

    /// Drop the first line of a body before unmarshalling (delimited format)
    #[serde(default)]
    pub skip_first_line: bool,

    /// Emit a header row of field names when marshalling a body
    #[serde(default)]
    pub generate_header_columns: bool,

    /// Accept empty multi-record bodies
    #[serde(default)]
    pub allow_empty_stream: bool,

    /// Locale tag governing the decimal-separator convention
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Line-terminator convention
    #[serde(default)]
    pub crlf: LineTerminator,

    /// Field definitions in declaration order
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl RecordConfig {
    /// Shorthand for a fixed-length record definition
    pub fn fixed(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            format: FormatKind::Fixed,
            length: Some(length),
            ..Self::empty()
        }
    }

    /// Shorthand for a delimited record definition
    pub fn delimited(name: impl Into<String>, delimiter: char) -> Self {
        Self {
            name: name.into(),
            format: FormatKind::Delimited,
            delimiter: Some(delimiter),
            ..Self::empty()
        }
    }

    /// Append a field definition
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    fn empty() -> Self {
        Self {
            name: String::new(),
            format: FormatKind::Fixed,
            length: None,
            padding_char: DEFAULT_PADDING_CHAR,
            precision: None,
            implied_decimal_separator: false,
            delimiter: None,
            quote_char: None,
            quoting: false,
            skip_first_line: false,
            generate_header_columns: false,
            allow_empty_stream: false,
            locale: DEFAULT_LOCALE.to_string(),
            crlf: LineTerminator::default(),
            fields: Vec::new(),
        }
    }

    /// Structural validation that needs no link targets
    ///
    /// Deep layout checks (span overlaps, link fit) run when the registry
    /// compiles the configuration into a descriptor.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::descriptor("<unnamed>", "record requires a name"));
        }
        if self.fields.is_empty() {
            return Err(Error::descriptor(&self.name, "record declares no fields"));
        }

        match self.format {
            FormatKind::Fixed => {
                if self.length.unwrap_or(0) == 0 {
                    return Err(Error::descriptor(
                        &self.name,
                        "fixed-format record requires a non-zero length",
                    ));
                }
                if self.delimiter.is_some() || self.quote_char.is_some() {
                    return Err(Error::descriptor(
                        &self.name,
                        "delimiter options are not valid on a fixed-format record",
                    ));
                }
            }
            FormatKind::Delimited => {
                if self.delimiter.is_none() {
                    return Err(Error::descriptor(
                        &self.name,
                        "delimited record requires a delimiter",
                    ));
                }
                if self.length.is_some() {
                    return Err(Error::descriptor(
                        &self.name,
                        "a total length is not valid on a delimited record",
                    ));
                }
            }
        }

        for field in &self.fields {
            field.validate(&self.name)?;
        }
        Ok(())
    }
}

/// Declarative definition of one field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name, unique within its record
    pub name: String,

    /// 1-based start offset (fixed) or column index (delimited); links
    /// carry none
    #[serde(default)]
    pub position: Option<usize>,

    /// Span width in characters (fixed format)
    #[serde(default)]
    pub length: Option<usize>,

    /// Declared value type
    #[serde(default, rename = "type")]
    pub value_type: ValueType,

    /// Fractional digits for decimal fields
    #[serde(default)]
    pub precision: Option<u32>,

    /// Raw text carries no separator character
    #[serde(default)]
    pub implied_decimal_separator: bool,

    /// Per-field padding override
    #[serde(default)]
    pub padding_char: Option<char>,

    /// Per-field alignment override
    #[serde(default)]
    pub align: Option<Alignment>,

    /// Reject records where this field is blank
    #[serde(default)]
    pub required: bool,

    /// chrono pattern for date fields
    #[serde(default)]
    pub pattern: Option<String>,

    /// Name of the linked record type; mutually exclusive with the scalar
    /// options above
    #[serde(default)]
    pub link: Option<String>,
}

impl FieldConfig {
    /// Shorthand for a text field
    pub fn text(name: impl Into<String>, position: usize) -> Self {
        Self::scalar(name, position, ValueType::Text)
    }

    /// Shorthand for an integer field
    pub fn integer(name: impl Into<String>, position: usize) -> Self {
        Self::scalar(name, position, ValueType::Integer)
    }

    /// Shorthand for a decimal field
    pub fn decimal(name: impl Into<String>, position: usize) -> Self {
        Self::scalar(name, position, ValueType::Decimal)
    }

    /// Shorthand for a link field
    pub fn link_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: Some(target.into()),
            ..Self::scalar(String::new(), 0, ValueType::Text)
        }
    }

    /// Set the span width
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the decimal precision
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Use an implied decimal separator
    pub fn with_implied_separator(mut self) -> Self {
        self.implied_decimal_separator = true;
        self
    }

    /// Mark the field required
    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }

    fn scalar(name: impl Into<String>, position: usize, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            position: (position > 0).then_some(position),
            length: None,
            value_type,
            precision: None,
            implied_decimal_separator: false,
            padding_char: None,
            align: None,
            required: false,
            pattern: None,
            link: None,
        }
    }

    fn validate(&self, record: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::descriptor(record, "field requires a name"));
        }
        if self.link.is_some() {
            let has_scalar_options = self.position.is_some()
                || self.length.is_some()
                || self.precision.is_some()
                || self.implied_decimal_separator
                || self.padding_char.is_some()
                || self.align.is_some()
                || self.pattern.is_some();
            if has_scalar_options {
                return Err(Error::descriptor(
                    record,
                    format!(
                        "link field '{}' cannot carry scalar field options",
                        self.name
                    ),
                ));
            }
        } else if self.position.is_none() {
            return Err(Error::descriptor(
                record,
                format!("field '{}' requires a position", self.name),
            ));
        }
        Ok(())
    }
}

fn default_padding_char() -> char {
    DEFAULT_PADDING_CHAR
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}
