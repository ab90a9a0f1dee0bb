//! Tests for record descriptor building and validation

use std::sync::Arc;

use super::{order_record, sub_record};
use crate::descriptor::{LineTerminator, RecordDescriptor, RecordFormat, ValueType};
use crate::Error;

#[test]
fn test_fixed_builder_happy_path() {
    let descriptor = RecordDescriptor::fixed("payment", 25)
        .implied_decimal_field("amount", 1, 5, 2)
        .decimal_field("fee", 6, 5, Some(2))
        .decimal_field("balance", 11, 5, None)
        .text_field("reference", 16, 10)
        .build()
        .unwrap();

    assert_eq!(descriptor.name(), "payment");
    assert!(descriptor.format().is_fixed());
    assert_eq!(descriptor.terminator(), LineTerminator::Windows);
    assert_eq!(descriptor.decimal_separator(), '.');
    assert_eq!(descriptor.fields().len(), 4);
    assert_eq!(descriptor.layout().fields().len(), 4);
}

#[test]
fn test_locale_selects_decimal_separator() {
    let descriptor = RecordDescriptor::fixed("payment", 5)
        .decimal_field("amount", 1, 5, Some(2))
        .locale("de")
        .build()
        .unwrap();

    assert_eq!(descriptor.decimal_separator(), ',');
}

#[test]
fn test_overlapping_fields_rejected() {
    let err = RecordDescriptor::fixed("bad", 10)
        .text_field("first", 1, 3)
        .text_field("second", 2, 3)
        .build()
        .unwrap_err();

    match err {
        Error::Descriptor { record, message } => {
            assert_eq!(record, "bad");
            assert!(message.contains("overlapping"), "message: {message}");
        }
        other => panic!("expected descriptor error, got {other:?}"),
    }
}

#[test]
fn test_field_beyond_record_length_rejected() {
    let err = RecordDescriptor::fixed("bad", 5)
        .text_field("wide", 4, 3)
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::Descriptor { .. }));
    assert!(err.to_string().contains("beyond the record length"));
}

#[test]
fn test_precision_requires_decimal_type() {
    let err = RecordDescriptor::fixed("bad", 5)
        .field(crate::descriptor::FieldDescriptor::scalar(
            "label",
            1,
            crate::descriptor::ScalarField {
                value_type: ValueType::Text,
                length: Some(5),
                precision: Some(2),
                ..Default::default()
            },
        ))
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("precision"));
}

#[test]
fn test_implied_separator_requires_precision() {
    let err = RecordDescriptor::fixed("bad", 5)
        .field(crate::descriptor::FieldDescriptor::scalar(
            "amount",
            1,
            crate::descriptor::ScalarField {
                value_type: ValueType::Decimal,
                length: Some(5),
                implied_decimal: true,
                ..Default::default()
            },
        ))
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("requires a precision"));
}

#[test]
fn test_date_pattern_requires_date_type() {
    let err = RecordDescriptor::fixed("bad", 8)
        .field(crate::descriptor::FieldDescriptor::scalar(
            "when",
            1,
            crate::descriptor::ScalarField {
                value_type: ValueType::Integer,
                length: Some(8),
                pattern: Some("%Y%m%d".to_string()),
                ..Default::default()
            },
        ))
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("date pattern"));
}

#[test]
fn test_fixed_field_requires_length() {
    let err = RecordDescriptor::fixed("bad", 5)
        .column("loose", 1, ValueType::Text)
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("non-zero length"));
}

#[test]
fn test_duplicate_field_names_rejected() {
    let err = RecordDescriptor::fixed("bad", 10)
        .text_field("twice", 1, 3)
        .text_field("twice", 4, 3)
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("duplicate field name"));
}

#[test]
fn test_delimited_duplicate_columns_rejected() {
    let err = RecordDescriptor::delimited("bad", ',')
        .column("first", 1, ValueType::Text)
        .column("second", 1, ValueType::Text)
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("same column"));
}

#[test]
fn test_quoting_requires_quote_char() {
    let err = RecordDescriptor::delimited("bad", ';')
        .column("only", 1, ValueType::Text)
        .quoting(true)
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("quote character"));
}

#[test]
fn test_link_format_must_match() {
    let delimited_target = Arc::new(
        RecordDescriptor::delimited("row", ',')
            .column("col", 1, ValueType::Text)
            .build()
            .unwrap(),
    );
    let err = RecordDescriptor::fixed("bad", 9)
        .link("row", &delimited_target)
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("different format"));
}

#[test]
fn test_link_must_fit_parent_length() {
    // Sub-record spans 4..=6; a 5-character parent cannot hold it
    let err = RecordDescriptor::fixed("order", 5)
        .text_field("field_a", 1, 3)
        .link("sub_rec", &sub_record())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("beyond the record length"));
}

#[test]
fn test_link_overlapping_scalar_rejected() {
    let err = RecordDescriptor::fixed("order", 9)
        .text_field("field_a", 1, 4)
        .link("sub_rec", &sub_record())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("overlapping"));
}

#[test]
fn test_empty_record_rejected() {
    let err = RecordDescriptor::fixed("bad", 5).build().unwrap_err();
    assert!(err.to_string().contains("no fields"));
}

#[test]
fn test_linked_descriptor_accessors() {
    let order = order_record();
    assert_eq!(order.fields().len(), 3);
    assert!(order.fields()[1].is_link());
    assert_eq!(
        order.fields()[1].as_link().map(|d| d.name()),
        Some("sub_rec")
    );
}
