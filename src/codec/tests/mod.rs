//! Test fixtures shared across the codec test modules
//!
//! The fixed-length fixtures mirror well-known payment-style layouts: a
//! five-field numeric record of width 25 and a 9-character record with a
//! linked sub-record at positions 4..=6.

use std::sync::Arc;

use crate::descriptor::{RecordDescriptor, ValueType};
use crate::model::{Decimal, RecordValue};

mod numeric_tests;

/// Fixed record of width 25 exercising every decimal flavor: implied
/// separator, literal separator with precision, and free-scale
pub fn numbers_descriptor() -> RecordDescriptor {
    RecordDescriptor::fixed("data_model", 25)
        .implied_decimal_field("field1", 1, 5, 2)
        .decimal_field("field2", 6, 5, Some(2))
        .decimal_field("field3", 11, 5, None)
        .decimal_field("field4", 16, 5, Some(2))
        .decimal_field("field5", 21, 5, None)
        .build()
        .unwrap()
}

/// Record value matching [`numbers_descriptor`]
pub fn numbers_value() -> RecordValue {
    RecordValue::new()
        .with("field1", Decimal::new(12345, 2))
        .with("field2", Decimal::new(1000, 2))
        .with("field3", Decimal::from_int(10))
        .with("field4", Decimal::new(1000, 2))
        .with("field5", Decimal::from_int(10))
}

/// Parent record with a linked sub-record between two scalar fields
pub fn order_descriptor() -> RecordDescriptor {
    let sub = Arc::new(
        RecordDescriptor::fixed("sub_rec", 9)
            .text_field("field_b", 4, 3)
            .build()
            .unwrap(),
    );
    RecordDescriptor::fixed("order", 9)
        .text_field("field_a", 1, 3)
        .link("sub_rec", &sub)
        .text_field("field_c", 7, 3)
        .build()
        .unwrap()
}

/// Semicolon-delimited, fully quoted listing row with a skipped header line
pub fn listing_descriptor() -> RecordDescriptor {
    RecordDescriptor::delimited("listing", ';')
        .column("stock_id", 1, ValueType::Text)
        .column("make", 2, ValueType::Text)
        .column("year", 3, ValueType::Integer)
        .column("kilometres", 4, ValueType::Decimal)
        .column("options", 5, ValueType::Text)
        .column("reserve_price", 6, ValueType::Decimal)
        .quote_char('"')
        .quoting(true)
        .skip_first_line(true)
        .build()
        .unwrap()
}
