//! Named descriptor registry
//!
//! Compiles a set of declarative [`RecordConfig`] definitions into immutable
//! [`RecordDescriptor`]s and serves them by name. Link fields reference their
//! target record by name; the registry orders compilation so targets are built
//! first, reports unknown targets, and rejects cyclic link graphs.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::field::FieldDescriptor;
use super::record::{RecordDescriptor, RecordDescriptorBuilder};
use crate::config::{FieldConfig, FormatKind, RecordConfig};
use crate::descriptor::{ScalarField, ValueType};
use crate::{Error, Result};

/// Build-once, read-many registry of compiled record descriptors
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    records: HashMap<String, Arc<RecordDescriptor>>,
}

impl DescriptorRegistry {
    /// Compile a set of record configurations into a registry
    pub fn compile(configs: &[RecordConfig]) -> Result<Self> {
        let mut by_name: HashMap<&str, &RecordConfig> = HashMap::new();
        for config in configs {
            config.validate()?;
            if by_name.insert(config.name.as_str(), config).is_some() {
                return Err(Error::descriptor(
                    &config.name,
                    "record name defined more than once",
                ));
            }
        }

        let mut registry = Self::default();
        let mut visiting = Vec::new();
        for config in configs {
            compile_record(config, &by_name, &mut visiting, &mut registry.records)?;
        }

        info!("compiled {} record descriptors", registry.records.len());
        Ok(registry)
    }

    /// Look up a compiled descriptor by record name
    pub fn get(&self, name: &str) -> Option<&Arc<RecordDescriptor>> {
        self.records.get(name)
    }

    /// Look up a compiled descriptor, failing when the name is unknown
    pub fn descriptor(&self, name: &str) -> Result<&Arc<RecordDescriptor>> {
        self.records
            .get(name)
            .ok_or_else(|| Error::descriptor(name, "record is not registered"))
    }

    /// Number of compiled record types
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no record types
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate registered record names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

fn compile_record(
    config: &RecordConfig,
    by_name: &HashMap<&str, &RecordConfig>,
    visiting: &mut Vec<String>,
    built: &mut HashMap<String, Arc<RecordDescriptor>>,
) -> Result<()> {
    if built.contains_key(&config.name) {
        return Ok(());
    }
    if visiting.iter().any(|name| name == &config.name) {
        let mut cycle = visiting.clone();
        cycle.push(config.name.clone());
        return Err(Error::cyclic_link(cycle.join(" -> ")));
    }

    visiting.push(config.name.clone());
    // Compile link targets first so this record can reference them
    for field in &config.fields {
        if let Some(target_name) = &field.link {
            let target = by_name.get(target_name.as_str()).copied().ok_or_else(|| {
                Error::descriptor(
                    &config.name,
                    format!(
                        "link field '{}' targets unknown record '{}'",
                        field.name, target_name
                    ),
                )
            })?;
            compile_record(target, by_name, visiting, built)?;
        }
    }
    visiting.pop();

    let descriptor = build_descriptor(config, built)?;
    debug!("registered record descriptor '{}'", config.name);
    built.insert(config.name.clone(), Arc::new(descriptor));
    Ok(())
}

fn build_descriptor(
    config: &RecordConfig,
    built: &HashMap<String, Arc<RecordDescriptor>>,
) -> Result<RecordDescriptor> {
    let mut builder = match config.format {
        FormatKind::Fixed => RecordDescriptor::fixed(&config.name, config.length.unwrap_or(0))
            .padding_char(config.padding_char),
        FormatKind::Delimited => {
            let delimiter = config.delimiter.ok_or_else(|| {
                Error::descriptor(&config.name, "delimited record requires a delimiter")
            })?;
            let mut b = RecordDescriptor::delimited(&config.name, delimiter)
                .quoting(config.quoting)
                .skip_first_line(config.skip_first_line)
                .generate_header_columns(config.generate_header_columns);
            if let Some(quote) = config.quote_char {
                b = b.quote_char(quote);
            }
            b
        }
    };

    builder = builder
        .terminator(config.crlf)
        .locale(&config.locale)
        .allow_empty_stream(config.allow_empty_stream);

    for field in &config.fields {
        builder = add_field(builder, config, field, built)?;
    }
    builder.build()
}

fn add_field(
    builder: RecordDescriptorBuilder,
    config: &RecordConfig,
    field: &FieldConfig,
    built: &HashMap<String, Arc<RecordDescriptor>>,
) -> Result<RecordDescriptorBuilder> {
    if let Some(target_name) = &field.link {
        let target = built.get(target_name).ok_or_else(|| {
            Error::descriptor(
                &config.name,
                format!(
                    "link field '{}' targets unknown record '{}'",
                    field.name, target_name
                ),
            )
        })?;
        return Ok(builder.link(&field.name, target));
    }

    let position = field.position.ok_or_else(|| {
        Error::descriptor(
            &config.name,
            format!("field '{}' requires a position", field.name),
        )
    })?;

    // Record-level numeric defaults apply to decimal fields that do not
    // declare their own
    let is_decimal = field.value_type == ValueType::Decimal;
    let precision = match field.precision {
        Some(p) => Some(p),
        None if is_decimal => config.precision,
        None => None,
    };
    let implied_decimal =
        field.implied_decimal_separator || (is_decimal && config.implied_decimal_separator);

    let scalar = ScalarField {
        value_type: field.value_type,
        length: field.length,
        precision,
        implied_decimal,
        padding_char: field.padding_char,
        align: field.align,
        required: field.required,
        pattern: field.pattern.clone(),
    };
    Ok(builder.field(FieldDescriptor::scalar(&field.name, position, scalar)))
}
