//! Multi-record bodies
//!
//! A body is a sequence of terminated record lines. Unmarshalling honors the
//! descriptor's first-line and empty-body options and wraps per-record errors
//! with their 1-based line number; marshalling emits an optional header row of
//! field names followed by one line per record.

use tracing::debug;

use super::{delimited, fixed};
use crate::descriptor::{RecordDescriptor, RecordFormat};
use crate::model::RecordValue;
use crate::{Error, Result};

/// Marshal a sequence of record values into one terminated body
pub fn marshal_all(values: &[RecordValue], descriptor: &RecordDescriptor) -> Result<String> {
    let terminator = descriptor.terminator().as_str();
    let mut out = String::new();

    if let RecordFormat::Delimited {
        generate_header_columns: true,
        ..
    } = descriptor.format()
    {
        out.push_str(&delimited::header_row(descriptor));
        out.push_str(terminator);
    }

    for (index, value) in values.iter().enumerate() {
        let line = match descriptor.format() {
            RecordFormat::Fixed { .. } => fixed::marshal_record(value, descriptor),
            RecordFormat::Delimited { .. } => delimited::marshal_record(value, descriptor),
        }
        .map_err(|source| Error::at_line(descriptor.name(), index + 1, source))?;
        out.push_str(&line);
        out.push_str(terminator);
    }

    Ok(out)
}

/// Unmarshal a body of terminated record lines
///
/// Blank lines are skipped. An empty body fails unless the descriptor allows
/// empty streams.
pub fn unmarshal_all(input: &str, descriptor: &RecordDescriptor) -> Result<Vec<RecordValue>> {
    let mut lines = split_lines(input);

    if let RecordFormat::Delimited {
        skip_first_line: true,
        ..
    } = descriptor.format()
    {
        if !lines.is_empty() {
            debug!("skipping first line of '{}' body", descriptor.name());
            lines.remove(0);
        }
    }

    lines.retain(|(_, line)| !line.is_empty());
    if lines.is_empty() {
        if descriptor.allow_empty_stream() {
            return Ok(Vec::new());
        }
        return Err(Error::empty_stream(descriptor.name()));
    }

    let mut records = Vec::with_capacity(lines.len());
    for (number, line) in lines {
        let record = match descriptor.format() {
            RecordFormat::Fixed { .. } => fixed::unmarshal_record(line, descriptor),
            RecordFormat::Delimited { .. } => delimited::unmarshal_record(line, descriptor),
        }
        .map_err(|source| Error::at_line(descriptor.name(), number, source))?;
        records.push(record);
    }

    Ok(records)
}

/// Split a body into (1-based line number, unterminated line) pairs,
/// recognizing Windows, Unix, and classic Mac terminators
fn split_lines(input: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let bytes = input.as_bytes();
    let mut start = 0;
    let mut index = 0;
    let mut number = 1;

    while index < bytes.len() {
        match bytes[index] {
            b'\n' => {
                lines.push((number, &input[start..index]));
                number += 1;
                index += 1;
                start = index;
            }
            b'\r' => {
                lines.push((number, &input[start..index]));
                number += 1;
                if bytes.get(index + 1) == Some(&b'\n') {
                    index += 2;
                } else {
                    index += 1;
                }
                start = index;
            }
            _ => index += 1,
        }
    }

    if start < bytes.len() {
        lines.push((number, &input[start..]));
    }
    lines
}
