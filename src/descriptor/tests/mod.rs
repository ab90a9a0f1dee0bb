//! Test utilities for descriptor construction, resolution, and registration
//!
//! Provides the shared linked-record fixture used across the descriptor test
//! modules: a 9-character parent with a 3-character sub-record spliced at
//! positions 4..=6.

use std::sync::Arc;

use super::record::RecordDescriptor;

// Test modules
mod record_tests;
mod registry_tests;

/// Sub-record occupying positions 4..=6 of its parent's coordinate space
pub fn sub_record() -> Arc<RecordDescriptor> {
    Arc::new(
        RecordDescriptor::fixed("sub_rec", 9)
            .text_field("field_b", 4, 3)
            .build()
            .unwrap(),
    )
}

/// Parent record with scalar fields at 1..=3 and 7..=9 and a linked
/// sub-record between them
pub fn order_record() -> Arc<RecordDescriptor> {
    Arc::new(
        RecordDescriptor::fixed("order", 9)
            .text_field("field_a", 1, 3)
            .link("sub_rec", &sub_record())
            .text_field("field_c", 7, 3)
            .build()
            .unwrap(),
    )
}
