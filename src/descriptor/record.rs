//! Record descriptors and their build-time validation
//!
//! A [`RecordDescriptor`] captures everything the codec needs to know about
//! one record type: its format (fixed-length or delimited), its fields, its
//! line-terminator convention, and its locale-derived decimal separator.
//! Descriptors are validated and link-resolved once at build time and are
//! immutable afterwards.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::field::{FieldDescriptor, FieldKind, ScalarField, ValueType};
use super::resolver::{self, ResolvedLayout};
use crate::constants::{
    self, DEFAULT_LOCALE, DEFAULT_PADDING_CHAR, MAC_TERMINATOR, UNIX_TERMINATOR,
    WINDOWS_TERMINATOR,
};
use crate::{Error, Result};

/// Line-terminator convention appended to each marshalled record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTerminator {
    /// `\r\n`
    #[default]
    Windows,
    /// `\n`
    Unix,
    /// `\r`
    Mac,
}

impl LineTerminator {
    /// The literal terminator characters
    pub fn as_str(self) -> &'static str {
        match self {
            LineTerminator::Windows => WINDOWS_TERMINATOR,
            LineTerminator::Unix => UNIX_TERMINATOR,
            LineTerminator::Mac => MAC_TERMINATOR,
        }
    }
}

/// Format-specific record options
#[derive(Debug, Clone)]
pub enum RecordFormat {
    /// Fixed-length lines: every field occupies a declared character span
    Fixed {
        /// Total record width in characters, excluding the terminator
        total_length: usize,
        /// Default fill character for unoccupied and padded positions
        padding_char: char,
    },
    /// Delimited rows: fields are separated columns, optionally quoted
    Delimited {
        /// Column separator
        delimiter: char,
        /// Quote character recognized on input; required for `quoting`
        quote_char: Option<char>,
        /// Quote every column on output
        quoting: bool,
        /// Drop the first line of a multi-record body before unmarshalling
        skip_first_line: bool,
        /// Emit a header row of field names when marshalling a body
        generate_header_columns: bool,
    },
}

impl RecordFormat {
    /// Whether this is the fixed-length variant
    pub fn is_fixed(&self) -> bool {
        matches!(self, RecordFormat::Fixed { .. })
    }
}

/// Immutable, validated descriptor for one record type
#[derive(Debug)]
pub struct RecordDescriptor {
    name: String,
    format: RecordFormat,
    terminator: LineTerminator,
    decimal_separator: char,
    allow_empty_stream: bool,
    fields: Vec<FieldDescriptor>,
    layout: ResolvedLayout,
}

impl RecordDescriptor {
    /// Start building a fixed-length record descriptor
    pub fn fixed(name: impl Into<String>, total_length: usize) -> RecordDescriptorBuilder {
        RecordDescriptorBuilder {
            name: name.into(),
            format: BuilderFormat::Fixed {
                total_length,
                padding_char: DEFAULT_PADDING_CHAR,
            },
            terminator: LineTerminator::default(),
            locale: DEFAULT_LOCALE.to_string(),
            allow_empty_stream: false,
            fields: Vec::new(),
        }
    }

    /// Start building a delimited record descriptor
    pub fn delimited(name: impl Into<String>, delimiter: char) -> RecordDescriptorBuilder {
        RecordDescriptorBuilder {
            name: name.into(),
            format: BuilderFormat::Delimited {
                delimiter,
                quote_char: None,
                quoting: false,
                skip_first_line: false,
                generate_header_columns: false,
            },
            terminator: LineTerminator::default(),
            locale: DEFAULT_LOCALE.to_string(),
            allow_empty_stream: false,
            fields: Vec::new(),
        }
    }

    /// Record type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format-specific options
    pub fn format(&self) -> &RecordFormat {
        &self.format
    }

    /// Line-terminator convention
    pub fn terminator(&self) -> LineTerminator {
        self.terminator
    }

    /// Literal decimal separator for non-implied decimal fields
    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Whether an empty multi-record body is acceptable
    pub fn allow_empty_stream(&self) -> bool {
        self.allow_empty_stream
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Link-resolved positional layout
    pub fn layout(&self) -> &ResolvedLayout {
        &self.layout
    }
}

/// Internal builder format state mirroring [`RecordFormat`] with mutable knobs
#[derive(Debug, Clone)]
enum BuilderFormat {
    Fixed {
        total_length: usize,
        padding_char: char,
    },
    Delimited {
        delimiter: char,
        quote_char: Option<char>,
        quoting: bool,
        skip_first_line: bool,
        generate_header_columns: bool,
    },
}

/// Builder for [`RecordDescriptor`], obtained from
/// [`RecordDescriptor::fixed`] or [`RecordDescriptor::delimited`]
#[derive(Debug)]
pub struct RecordDescriptorBuilder {
    name: String,
    format: BuilderFormat,
    terminator: LineTerminator,
    locale: String,
    allow_empty_stream: bool,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptorBuilder {
    /// Set the fill character for a fixed-length record
    pub fn padding_char(mut self, padding: char) -> Self {
        if let BuilderFormat::Fixed { padding_char, .. } = &mut self.format {
            *padding_char = padding;
        }
        self
    }

    /// Set the quote character for a delimited record
    pub fn quote_char(mut self, quote: char) -> Self {
        if let BuilderFormat::Delimited { quote_char, .. } = &mut self.format {
            *quote_char = Some(quote);
        }
        self
    }

    /// Quote every column when marshalling a delimited record
    pub fn quoting(mut self, enabled: bool) -> Self {
        if let BuilderFormat::Delimited { quoting, .. } = &mut self.format {
            *quoting = enabled;
        }
        self
    }

    /// Skip the first line of a delimited body before unmarshalling
    pub fn skip_first_line(mut self, enabled: bool) -> Self {
        if let BuilderFormat::Delimited {
            skip_first_line, ..
        } = &mut self.format
        {
            *skip_first_line = enabled;
        }
        self
    }

    /// Emit a header row of field names when marshalling a delimited body
    pub fn generate_header_columns(mut self, enabled: bool) -> Self {
        if let BuilderFormat::Delimited {
            generate_header_columns,
            ..
        } = &mut self.format
        {
            *generate_header_columns = enabled;
        }
        self
    }

    /// Set the line-terminator convention
    pub fn terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Set the locale governing the decimal-separator convention
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Accept empty multi-record bodies instead of raising an error
    pub fn allow_empty_stream(mut self, allowed: bool) -> Self {
        self.allow_empty_stream = allowed;
        self
    }

    /// Add a fully specified field descriptor
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a text field spanning `length` characters at `position`
    pub fn text_field(self, name: impl Into<String>, position: usize, length: usize) -> Self {
        self.scalar_field(name, position, Some(length), ValueType::Text, None, false)
    }

    /// Add an integer field spanning `length` characters at `position`
    pub fn integer_field(self, name: impl Into<String>, position: usize, length: usize) -> Self {
        self.scalar_field(name, position, Some(length), ValueType::Integer, None, false)
    }

    /// Add a decimal field; `precision` fixes the fractional digit count
    pub fn decimal_field(
        self,
        name: impl Into<String>,
        position: usize,
        length: usize,
        precision: Option<u32>,
    ) -> Self {
        self.scalar_field(
            name,
            position,
            Some(length),
            ValueType::Decimal,
            precision,
            false,
        )
    }

    /// Add an implied-decimal field: digits only in the raw text, decimal
    /// point `precision` digits from the right
    pub fn implied_decimal_field(
        self,
        name: impl Into<String>,
        position: usize,
        length: usize,
        precision: u32,
    ) -> Self {
        self.scalar_field(
            name,
            position,
            Some(length),
            ValueType::Decimal,
            Some(precision),
            true,
        )
    }

    /// Add a date field rendered through a chrono `pattern`
    pub fn date_field(
        mut self,
        name: impl Into<String>,
        position: usize,
        length: usize,
        pattern: impl Into<String>,
    ) -> Self {
        let scalar = ScalarField {
            value_type: ValueType::Date,
            length: Some(length),
            pattern: Some(pattern.into()),
            ..ScalarField::default()
        };
        self.fields
            .push(FieldDescriptor::scalar(name, position, scalar));
        self
    }

    /// Add a delimited column of the given type at a 1-based column index
    pub fn column(mut self, name: impl Into<String>, position: usize, value_type: ValueType) -> Self {
        self.fields.push(FieldDescriptor::scalar(
            name,
            position,
            ScalarField::of_type(value_type),
        ));
        self
    }

    /// Add a link field delegating to a nested record descriptor
    pub fn link(mut self, name: impl Into<String>, target: &Arc<RecordDescriptor>) -> Self {
        self.fields.push(FieldDescriptor::link(name, Arc::clone(target)));
        self
    }

    fn scalar_field(
        mut self,
        name: impl Into<String>,
        position: usize,
        length: Option<usize>,
        value_type: ValueType,
        precision: Option<u32>,
        implied_decimal: bool,
    ) -> Self {
        let scalar = ScalarField {
            value_type,
            length,
            precision,
            implied_decimal,
            ..ScalarField::default()
        };
        self.fields
            .push(FieldDescriptor::scalar(name, position, scalar));
        self
    }

    /// Validate the declared metadata and produce an immutable descriptor
    pub fn build(self) -> Result<RecordDescriptor> {
        let name = self.name;

        if self.fields.is_empty() {
            return Err(Error::descriptor(&name, "record declares no fields"));
        }
        validate_field_names(&name, &self.fields)?;
        for field in &self.fields {
            validate_field(&name, field, matches!(self.format, BuilderFormat::Fixed { .. }))?;
        }

        let layout = resolver::resolve(&name, &self.fields)?;

        let format = match self.format {
            BuilderFormat::Fixed {
                total_length,
                padding_char,
            } => {
                validate_fixed_layout(&name, total_length, &layout)?;
                RecordFormat::Fixed {
                    total_length,
                    padding_char,
                }
            }
            BuilderFormat::Delimited {
                delimiter,
                quote_char,
                quoting,
                skip_first_line,
                generate_header_columns,
            } => {
                if quoting && quote_char.is_none() {
                    return Err(Error::descriptor(
                        &name,
                        "quoting requires a quote character",
                    ));
                }
                validate_delimited_layout(&name, &layout)?;
                RecordFormat::Delimited {
                    delimiter,
                    quote_char,
                    quoting,
                    skip_first_line,
                    generate_header_columns,
                }
            }
        };

        debug!(
            "built record descriptor '{}': {} fields, {} resolved slots",
            name,
            self.fields.len(),
            layout.fields().len()
        );

        Ok(RecordDescriptor {
            name,
            format,
            terminator: self.terminator,
            decimal_separator: constants::decimal_separator_for_locale(&self.locale),
            allow_empty_stream: self.allow_empty_stream,
            fields: self.fields,
            layout,
        })
    }
}

fn validate_field_names(record: &str, fields: &[FieldDescriptor]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            return Err(Error::descriptor(record, "field with empty name"));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(Error::descriptor(
                record,
                format!("duplicate field name '{}'", field.name),
            ));
        }
    }
    Ok(())
}

fn validate_field(record: &str, field: &FieldDescriptor, fixed: bool) -> Result<()> {
    let scalar = match &field.kind {
        FieldKind::Scalar(scalar) => scalar,
        FieldKind::Link(target) => {
            if target.format().is_fixed() != fixed {
                return Err(Error::descriptor(
                    record,
                    format!(
                        "link field '{}' targets a record of a different format",
                        field.name
                    ),
                ));
            }
            return Ok(());
        }
    };

    match field.position {
        Some(0) | None => {
            return Err(Error::descriptor(
                record,
                format!("field '{}' requires a 1-based position", field.name),
            ));
        }
        Some(_) => {}
    }

    if fixed && scalar.length.unwrap_or(0) == 0 {
        return Err(Error::descriptor(
            record,
            format!(
                "fixed-format field '{}' requires a non-zero length",
                field.name
            ),
        ));
    }

    if scalar.precision.is_some() && scalar.value_type != ValueType::Decimal {
        return Err(Error::descriptor(
            record,
            format!(
                "field '{}' declares a precision but is typed {}",
                field.name,
                scalar.value_type.name()
            ),
        ));
    }

    if scalar.implied_decimal {
        if scalar.value_type != ValueType::Decimal {
            return Err(Error::descriptor(
                record,
                format!(
                    "field '{}' declares an implied decimal separator but is typed {}",
                    field.name,
                    scalar.value_type.name()
                ),
            ));
        }
        if scalar.precision.is_none() {
            return Err(Error::descriptor(
                record,
                format!(
                    "implied-decimal field '{}' requires a precision",
                    field.name
                ),
            ));
        }
    }

    if scalar.pattern.is_some() && scalar.value_type != ValueType::Date {
        return Err(Error::descriptor(
            record,
            format!(
                "field '{}' declares a date pattern but is typed {}",
                field.name,
                scalar.value_type.name()
            ),
        ));
    }

    Ok(())
}

fn validate_fixed_layout(record: &str, total_length: usize, layout: &ResolvedLayout) -> Result<()> {
    let mut previous: Option<&super::resolver::ResolvedField> = None;
    for slot in layout.fields() {
        let end = slot.position + slot.length - 1;
        if end > total_length {
            return Err(Error::descriptor(
                record,
                format!(
                    "field '{}' spans positions {}..{} beyond the record length {}",
                    slot.qualified_name(),
                    slot.position,
                    end,
                    total_length
                ),
            ));
        }
        if let Some(prev) = previous {
            if prev.position + prev.length > slot.position {
                return Err(Error::descriptor(
                    record,
                    format!(
                        "fields '{}' and '{}' occupy overlapping positions",
                        prev.qualified_name(),
                        slot.qualified_name()
                    ),
                ));
            }
        }
        previous = Some(slot);
    }
    Ok(())
}

fn validate_delimited_layout(record: &str, layout: &ResolvedLayout) -> Result<()> {
    let mut previous: Option<&super::resolver::ResolvedField> = None;
    for slot in layout.fields() {
        if let Some(prev) = previous {
            if prev.position == slot.position {
                return Err(Error::descriptor(
                    record,
                    format!(
                        "fields '{}' and '{}' declare the same column {}",
                        prev.qualified_name(),
                        slot.qualified_name(),
                        slot.position
                    ),
                ));
            }
        }
        previous = Some(slot);
    }
    Ok(())
}
