//! Record descriptors: validated, immutable layout metadata
//!
//! Descriptors are built once, programmatically through
//! [`RecordDescriptor::fixed`]/[`RecordDescriptor::delimited`] builders or
//! compiled from declarative [`RecordConfig`](crate::config::RecordConfig)
//! definitions by the [`DescriptorRegistry`], and are read-only afterwards,
//! safe to share across any number of concurrent codec calls.
//!
//! ## Architecture
//!
//! - [`field`] - Per-field metadata: scalar typing, padding, alignment, links
//! - [`record`] - Record-level metadata, builder, and build-time validation
//! - [`resolver`] - Flattening of linked sub-records into a positional layout
//! - [`registry`] - Named compilation of declarative record configurations

pub mod field;
pub mod record;
pub mod registry;
pub mod resolver;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use field::{Alignment, FieldDescriptor, FieldKind, ScalarField, ValueType};
pub use record::{LineTerminator, RecordDescriptor, RecordDescriptorBuilder, RecordFormat};
pub use registry::DescriptorRegistry;
pub use resolver::{ResolvedField, ResolvedLayout};
