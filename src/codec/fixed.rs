//! Fixed-length record marshalling and unmarshalling
//!
//! Each scalar slot of the resolved layout occupies an absolute character
//! span. Marshalling fills a local buffer with the record padding character
//! and writes each formatted value aligned inside its span; linked sub-record
//! output lands contiguously at the link's span because nested positions are
//! absolute. Unmarshalling slices the same spans, strips padding per the
//! field's alignment, and assigns values through the resolved link paths.

use tracing::debug;

use super::scalar;
use crate::descriptor::resolver::ResolvedField;
use crate::descriptor::{Alignment, RecordDescriptor, RecordFormat};
use crate::model::RecordValue;
use crate::{Error, Result};

/// Marshal a record value into an unterminated fixed-length line
pub fn marshal_record(value: &RecordValue, descriptor: &RecordDescriptor) -> Result<String> {
    let RecordFormat::Fixed {
        total_length,
        padding_char,
    } = descriptor.format()
    else {
        return Err(Error::descriptor(
            descriptor.name(),
            "record is not fixed-format",
        ));
    };

    let mut buffer = vec![*padding_char; *total_length];
    for slot in descriptor.layout().fields() {
        let start = slot.position - 1;

        let field_value = value
            .record_at_path(&slot.path)
            .and_then(|record| record.get(&slot.name));
        let Some(field_value) = field_value else {
            if slot.scalar.required {
                return Err(Error::format(
                    descriptor.name(),
                    slot.qualified_name(),
                    start,
                    "missing required field",
                ));
            }
            continue;
        };

        let rendered = scalar::format_scalar(field_value, slot, descriptor)?;
        let width = rendered.chars().count();
        if width > slot.length {
            return Err(Error::format(
                descriptor.name(),
                slot.qualified_name(),
                start,
                format!(
                    "formatted value '{}' is {} characters but the field length is {}",
                    rendered, width, slot.length
                ),
            ));
        }

        let padding = slot.scalar.effective_padding(*padding_char);
        for cell in &mut buffer[start..start + slot.length] {
            *cell = padding;
        }
        let write_start = match slot.scalar.effective_align() {
            Alignment::Left => start,
            Alignment::Right => start + slot.length - width,
        };
        for (index, c) in rendered.chars().enumerate() {
            buffer[write_start + index] = c;
        }
    }

    Ok(buffer.into_iter().collect())
}

/// Unmarshal an unterminated fixed-length line into a record value
pub fn unmarshal_record(line: &str, descriptor: &RecordDescriptor) -> Result<RecordValue> {
    let RecordFormat::Fixed {
        total_length,
        padding_char,
    } = descriptor.format()
    else {
        return Err(Error::descriptor(
            descriptor.name(),
            "record is not fixed-format",
        ));
    };

    let chars: Vec<char> = line.chars().collect();
    if chars.len() != *total_length {
        return Err(Error::format(
            descriptor.name(),
            "record length",
            0,
            format!(
                "expected {} characters, found {}",
                total_length,
                chars.len()
            ),
        ));
    }

    let mut out = RecordValue::new();
    for slot in descriptor.layout().fields() {
        let start = slot.position - 1;
        let raw: String = chars[start..start + slot.length].iter().collect();
        let stripped = strip_padding(&raw, slot, *padding_char);

        if stripped.is_empty() {
            if slot.scalar.required {
                return Err(Error::format(
                    descriptor.name(),
                    slot.qualified_name(),
                    start,
                    "required field is blank",
                ));
            }
            debug!(
                "blank optional field '{}' in record '{}'",
                slot.qualified_name(),
                descriptor.name()
            );
            continue;
        }

        let parsed = scalar::parse_scalar(stripped, slot, descriptor, start)?;
        out.record_at_path_mut(&slot.path).set(slot.name.clone(), parsed);
    }

    Ok(out)
}

/// Strip the padding character from the side opposite the field's alignment
///
/// Implied-decimal spans are all digits; only the record padding character is
/// stripped there, and only when it cannot be mistaken for a digit. A span
/// reduced to nothing by a `'0'` pad is the value zero, not a blank.
fn strip_padding<'a>(raw: &'a str, slot: &ResolvedField, record_padding: char) -> &'a str {
    if slot.scalar.implied_decimal {
        if record_padding == '0' {
            return raw;
        }
        return raw.trim_matches(record_padding);
    }

    let padding = slot.scalar.effective_padding(record_padding);
    let stripped = match slot.scalar.effective_align() {
        Alignment::Left => raw.trim_end_matches(padding),
        Alignment::Right => raw.trim_start_matches(padding),
    };
    if stripped.is_empty() && padding == '0' && !raw.is_empty() {
        // An all-zero numeric span is the value zero
        "0"
    } else {
        stripped
    }
}
