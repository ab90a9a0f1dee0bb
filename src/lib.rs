//! Flatrec Library
//!
//! A Rust library for marshalling and unmarshalling flat text records,
//! fixed-length lines with positional fields and delimited (CSV-style) rows,
//! driven by explicit, validated record descriptors.
//!
//! This library provides tools for:
//! - Describing record layouts with positional field descriptors, either
//!   programmatically or from serde-backed configuration
//! - Resolving linked sub-records into a flat positional layout
//! - Fixed-length marshalling with padding, alignment, and implied-decimal
//!   numeric fields
//! - Delimited marshalling with configurable separators, quoting, and
//!   header-row handling
//! - Exact fixed-point numeric conversion with explicit truncation semantics
//! - Comprehensive error reporting naming the offending field and offset
//!
//! ## Usage
//!
//! ```rust
//! use flatrec::{marshal, unmarshal, RecordDescriptor, RecordValue, Value};
//!
//! # fn example() -> flatrec::Result<()> {
//! let descriptor = RecordDescriptor::fixed("tag", 6)
//!     .text_field("code", 1, 3)
//!     .integer_field("count", 4, 3)
//!     .build()?;
//!
//! let mut value = RecordValue::new();
//! value.set("code", "ABC");
//! value.set("count", 42i64);
//!
//! let line = marshal(&value, &descriptor)?;
//! assert_eq!(line, "ABC 42\r\n");
//!
//! let back = unmarshal(&line, &descriptor)?;
//! assert_eq!(back.get("count").and_then(Value::as_integer), Some(42));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod codec;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod model;

// Re-export commonly used types
pub use codec::{marshal, marshal_all, unmarshal, unmarshal_all};
pub use config::{FieldConfig, RecordConfig};
pub use descriptor::{
    Alignment, DescriptorRegistry, FieldDescriptor, FieldKind, LineTerminator, RecordDescriptor,
    RecordFormat, ScalarField, ValueType,
};
pub use model::{Decimal, RecordValue, Value};

/// Result type alias for record codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for descriptor construction and codec operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid static record metadata, raised while building a descriptor
    #[error("descriptor error in record '{record}': {message}")]
    Descriptor { record: String, message: String },

    /// A record links to itself, directly or transitively
    #[error("cyclic link in record graph: {path}")]
    CyclicLink { path: String },

    /// Bad input data at marshal or unmarshal time
    #[error("format error in record '{record}', field '{field}' at offset {offset}: {message}")]
    Format {
        record: String,
        field: String,
        offset: usize,
        message: String,
    },

    /// A record in a multi-record body failed, with its 1-based line number
    #[error("format error in record '{record}' at line {line}: {source}")]
    AtLine {
        record: String,
        line: usize,
        #[source]
        source: Box<Error>,
    },

    /// Empty input body where the descriptor does not allow one
    #[error("no records found in stream for record '{record}'")]
    EmptyStream { record: String },
}

impl Error {
    /// Create a descriptor error with record context
    pub fn descriptor(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Descriptor {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create a cyclic link error from the offending name path
    pub fn cyclic_link(path: impl Into<String>) -> Self {
        Self::CyclicLink { path: path.into() }
    }

    /// Create a format error naming the offending field and char offset
    pub fn format(
        record: impl Into<String>,
        field: impl Into<String>,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Format {
            record: record.into(),
            field: field.into(),
            offset,
            message: message.into(),
        }
    }

    /// Wrap a per-record error with its line number in a multi-record body
    pub fn at_line(record: impl Into<String>, line: usize, source: Error) -> Self {
        Self::AtLine {
            record: record.into(),
            line,
            source: Box::new(source),
        }
    }

    /// Create an empty stream error
    pub fn empty_stream(record: impl Into<String>) -> Self {
        Self::EmptyStream {
            record: record.into(),
        }
    }
}
