//! Record marshalling and unmarshalling
//!
//! The codec is a pair of pure, synchronous functions over an immutable
//! descriptor and a caller-owned record value. Output is built into a local
//! buffer and published only on success; no state is shared across calls, so
//! descriptors may serve any number of concurrent threads.
//!
//! ## Architecture
//!
//! - [`fixed`] - Fixed-length lines: padding, alignment, positional spans
//! - [`delimited`] - Delimited rows: splitting, quoting, header columns
//! - [`numeric`] - Fixed-point decimal and integer text conversion
//! - [`scalar`] - Typed scalar formatting/parsing shared by both formats
//! - [`stream`] - Multi-record bodies with line-numbered error context

pub mod delimited;
pub mod fixed;
pub mod numeric;
pub mod scalar;
pub mod stream;

#[cfg(test)]
pub mod tests;

pub use stream::{marshal_all, unmarshal_all};

use crate::constants::strip_terminator;
use crate::descriptor::{RecordDescriptor, RecordFormat};
use crate::model::RecordValue;
use crate::Result;

/// Marshal one record value into a terminated line
pub fn marshal(value: &RecordValue, descriptor: &RecordDescriptor) -> Result<String> {
    let line = match descriptor.format() {
        RecordFormat::Fixed { .. } => fixed::marshal_record(value, descriptor)?,
        RecordFormat::Delimited { .. } => delimited::marshal_record(value, descriptor)?,
    };
    Ok(format!("{}{}", line, descriptor.terminator().as_str()))
}

/// Unmarshal one record line, tolerating one trailing line terminator
pub fn unmarshal(raw: &str, descriptor: &RecordDescriptor) -> Result<RecordValue> {
    let line = strip_terminator(raw);
    match descriptor.format() {
        RecordFormat::Fixed { .. } => fixed::unmarshal_record(line, descriptor),
        RecordFormat::Delimited { .. } => delimited::unmarshal_record(line, descriptor),
    }
}
