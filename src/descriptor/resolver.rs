//! Record graph resolution
//!
//! Flattens a descriptor's link fields into an ordered list of scalar slots
//! with absolute positions and owning-record paths. Nested links may chain to
//! arbitrary depth; linked sub-records declare their field positions in the
//! parent's coordinate space, so resolution is a splice-and-sort over the
//! combined field set. Resolution runs once at descriptor build time and the
//! result lives on the immutable descriptor.

use tracing::debug;

use super::field::{FieldDescriptor, FieldKind, ScalarField};
use crate::{Error, Result};

/// One scalar slot of the flattened layout
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// Link-name chain from the root record down to the owning record;
    /// empty for top-level fields
    pub path: Vec<String>,

    /// Field name within its owning record
    pub name: String,

    /// Absolute 1-based start offset (fixed) or column index (delimited)
    pub position: usize,

    /// Span width in characters; zero for delimited columns
    pub length: usize,

    /// Scalar metadata carried over from the declaring descriptor
    pub scalar: ScalarField,
}

impl ResolvedField {
    /// Dotted path-and-name form for error messages, e.g. `sub_rec.field_b`
    pub fn qualified_name(&self) -> String {
        if self.path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.path.join("."), self.name)
        }
    }
}

/// Flattened positional layout of a record descriptor, sorted by position
#[derive(Debug)]
pub struct ResolvedLayout {
    fields: Vec<ResolvedField>,
    column_count: usize,
}

impl ResolvedLayout {
    /// Scalar slots in ascending position order
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    /// Highest declared column index (delimited formats)
    pub fn column_count(&self) -> usize {
        self.column_count
    }
}

/// Flatten a field list into a position-ordered scalar layout
pub fn resolve(record: &str, fields: &[FieldDescriptor]) -> Result<ResolvedLayout> {
    let mut resolved = Vec::new();
    let mut name_path = vec![record.to_string()];
    let mut link_path = Vec::new();
    walk(record, fields, &mut name_path, &mut link_path, &mut resolved)?;

    resolved.sort_by_key(|slot| slot.position);
    let column_count = resolved.last().map(|slot| slot.position).unwrap_or(0);

    debug!(
        "resolved {} scalar slots for record '{}'",
        resolved.len(),
        record
    );

    Ok(ResolvedLayout {
        fields: resolved,
        column_count,
    })
}

fn walk(
    record: &str,
    fields: &[FieldDescriptor],
    name_path: &mut Vec<String>,
    link_path: &mut Vec<String>,
    out: &mut Vec<ResolvedField>,
) -> Result<()> {
    for field in fields {
        match &field.kind {
            FieldKind::Scalar(scalar) => {
                let position = field.position.ok_or_else(|| {
                    Error::descriptor(
                        record,
                        format!("field '{}' lacks a position", field.name),
                    )
                })?;
                out.push(ResolvedField {
                    path: link_path.clone(),
                    name: field.name.clone(),
                    position,
                    length: scalar.length.unwrap_or(0),
                    scalar: scalar.clone(),
                });
            }
            FieldKind::Link(target) => {
                if name_path.iter().any(|seen| seen == target.name()) {
                    let mut cycle = name_path.clone();
                    cycle.push(target.name().to_string());
                    return Err(Error::cyclic_link(cycle.join(" -> ")));
                }
                name_path.push(target.name().to_string());
                link_path.push(field.name.clone());
                walk(record, target.fields(), name_path, link_path, out)?;
                link_path.pop();
                name_path.pop();
            }
        }
    }
    Ok(())
}
