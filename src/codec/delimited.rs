//! Delimited record marshalling and unmarshalling
//!
//! Rows are split with a quote-aware scanner: a quoted column may contain the
//! delimiter verbatim, a doubled quote inside a quoted column is a literal
//! quote, and an unterminated quote is a format error naming the open column.
//! Columns map to fields by declared 1-based column position; linked
//! sub-records contribute columns in the same coordinate space.

use tracing::debug;

use super::scalar;
use crate::descriptor::{RecordDescriptor, RecordFormat, ValueType};
use crate::model::{RecordValue, Value};
use crate::{Error, Result};

/// One split column with the char offset of its start within the row
#[derive(Debug)]
struct Column {
    value: String,
    offset: usize,
}

/// Marshal a record value into an unterminated delimited row
pub fn marshal_record(value: &RecordValue, descriptor: &RecordDescriptor) -> Result<String> {
    let RecordFormat::Delimited {
        delimiter,
        quote_char,
        quoting,
        ..
    } = descriptor.format()
    else {
        return Err(Error::descriptor(
            descriptor.name(),
            "record is not delimited",
        ));
    };

    let mut columns = vec![String::new(); descriptor.layout().column_count()];
    for slot in descriptor.layout().fields() {
        let field_value = value
            .record_at_path(&slot.path)
            .and_then(|record| record.get(&slot.name));
        match field_value {
            Some(v) => {
                columns[slot.position - 1] = scalar::format_scalar(v, slot, descriptor)?;
            }
            None if slot.scalar.required => {
                return Err(Error::format(
                    descriptor.name(),
                    slot.qualified_name(),
                    slot.position - 1,
                    "missing required field",
                ));
            }
            None => {}
        }
    }

    let encoded: Vec<String> = columns
        .iter()
        .map(|column| encode_column(column, *delimiter, *quote_char, *quoting))
        .collect();
    Ok(encoded.join(&delimiter.to_string()))
}

/// Unmarshal an unterminated delimited row into a record value
pub fn unmarshal_record(line: &str, descriptor: &RecordDescriptor) -> Result<RecordValue> {
    let RecordFormat::Delimited {
        delimiter,
        quote_char,
        ..
    } = descriptor.format()
    else {
        return Err(Error::descriptor(
            descriptor.name(),
            "record is not delimited",
        ));
    };

    let columns = split_row(line, *delimiter, *quote_char, descriptor)?;
    let declared = descriptor.layout().column_count();
    if columns.len() > declared {
        debug!(
            "row has {} columns, record '{}' declares {}; extra columns ignored",
            columns.len(),
            descriptor.name(),
            declared
        );
    }
    if columns.len() < declared {
        let first_missing = descriptor
            .layout()
            .fields()
            .iter()
            .find(|slot| slot.position > columns.len())
            .map(|slot| slot.qualified_name())
            .unwrap_or_else(|| "record".to_string());
        return Err(Error::format(
            descriptor.name(),
            first_missing,
            line.chars().count(),
            format!(
                "row has {} columns but the record declares {}",
                columns.len(),
                declared
            ),
        ));
    }

    let mut out = RecordValue::new();
    for slot in descriptor.layout().fields() {
        let column = &columns[slot.position - 1];
        if column.value.is_empty() {
            if slot.scalar.required {
                return Err(Error::format(
                    descriptor.name(),
                    slot.qualified_name(),
                    column.offset,
                    "required column is empty",
                ));
            }
            // Empty text columns survive round-trips as empty strings
            if slot.scalar.value_type == ValueType::Text {
                out.record_at_path_mut(&slot.path)
                    .set(slot.name.clone(), Value::Text(String::new()));
            }
            continue;
        }

        let parsed = scalar::parse_scalar(&column.value, slot, descriptor, column.offset)?;
        out.record_at_path_mut(&slot.path).set(slot.name.clone(), parsed);
    }

    Ok(out)
}

/// Header row of resolved field names in column order
pub fn header_row(descriptor: &RecordDescriptor) -> String {
    let RecordFormat::Delimited {
        delimiter,
        quote_char,
        quoting,
        ..
    } = descriptor.format()
    else {
        return String::new();
    };

    let names: Vec<String> = descriptor
        .layout()
        .fields()
        .iter()
        .map(|slot| encode_column(&slot.name, *delimiter, *quote_char, *quoting))
        .collect();
    names.join(&delimiter.to_string())
}

fn encode_column(raw: &str, delimiter: char, quote_char: Option<char>, quoting: bool) -> String {
    let Some(quote) = quote_char else {
        return raw.to_string();
    };
    let needs_quotes = quoting
        || raw.contains(delimiter)
        || raw.contains(quote)
        || raw.contains('\n')
        || raw.contains('\r');
    if !needs_quotes {
        return raw.to_string();
    }
    let mut encoded = String::with_capacity(raw.len() + 2);
    encoded.push(quote);
    for c in raw.chars() {
        if c == quote {
            encoded.push(quote);
        }
        encoded.push(c);
    }
    encoded.push(quote);
    encoded
}

fn split_row(
    line: &str,
    delimiter: char,
    quote_char: Option<char>,
    descriptor: &RecordDescriptor,
) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    let mut current = String::new();
    let mut start_offset = 0usize;
    let mut in_quotes = false;
    let mut quote_open_offset = 0usize;

    let mut chars = line.chars().enumerate().peekable();
    while let Some((offset, c)) = chars.next() {
        if in_quotes {
            if Some(c) == quote_char {
                if chars.peek().map(|(_, next)| *next) == quote_char {
                    // Doubled quote inside a quoted column is a literal quote
                    current.push(c);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if Some(c) == quote_char && current.is_empty() {
            in_quotes = true;
            quote_open_offset = offset;
        } else if c == delimiter {
            columns.push(Column {
                value: std::mem::take(&mut current),
                offset: start_offset,
            });
            start_offset = offset + 1;
        } else {
            current.push(c);
        }
    }

    if in_quotes {
        let field = descriptor
            .layout()
            .fields()
            .iter()
            .find(|slot| slot.position == columns.len() + 1)
            .map(|slot| slot.qualified_name())
            .unwrap_or_else(|| format!("column {}", columns.len() + 1));
        return Err(Error::format(
            descriptor.name(),
            field,
            quote_open_offset,
            "unterminated quote",
        ));
    }

    columns.push(Column {
        value: current,
        offset: start_offset,
    });
    Ok(columns)
}
