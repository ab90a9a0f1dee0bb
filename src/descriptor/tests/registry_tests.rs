//! Tests for declarative configuration compilation and registry lookups

use crate::config::{FieldConfig, RecordConfig};
use crate::descriptor::DescriptorRegistry;
use crate::Error;

fn order_configs() -> Vec<RecordConfig> {
    vec![
        RecordConfig::fixed("order", 9)
            .with_field(FieldConfig::text("field_a", 1).with_length(3))
            .with_field(FieldConfig::link_to("sub_rec", "sub"))
            .with_field(FieldConfig::text("field_c", 7).with_length(3)),
        RecordConfig::fixed("sub", 9)
            .with_field(FieldConfig::text("field_b", 4).with_length(3)),
    ]
}

#[test]
fn test_compile_and_lookup() {
    let registry = DescriptorRegistry::compile(&order_configs()).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(!registry.is_empty());

    let order = registry.descriptor("order").unwrap();
    assert_eq!(order.layout().fields().len(), 3);
    assert_eq!(
        order.layout().fields()[1].qualified_name(),
        "sub_rec.field_b"
    );

    let mut names: Vec<&str> = registry.names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["order", "sub"]);
}

#[test]
fn test_compile_order_is_independent_of_declaration_order() {
    let mut configs = order_configs();
    configs.reverse();
    let registry = DescriptorRegistry::compile(&configs).unwrap();
    assert!(registry.get("order").is_some());
}

#[test]
fn test_compile_from_json_definition() {
    let json = r#"{
        "name": "payment",
        "format": "fixed",
        "length": 25,
        "locale": "en",
        "crlf": "windows",
        "fields": [
            {"name": "amount", "position": 1, "length": 5, "type": "decimal",
             "precision": 2, "implied_decimal_separator": true},
            {"name": "fee", "position": 6, "length": 5, "type": "decimal", "precision": 2},
            {"name": "reference", "position": 11, "length": 15, "required": true}
        ]
    }"#;
    let config: RecordConfig = serde_json::from_str(json).unwrap();
    let registry = DescriptorRegistry::compile(std::slice::from_ref(&config)).unwrap();

    let payment = registry.descriptor("payment").unwrap();
    assert!(payment.format().is_fixed());
    let slots = payment.layout().fields();
    assert!(slots[0].scalar.implied_decimal);
    assert_eq!(slots[0].scalar.precision, Some(2));
    assert!(slots[2].scalar.required);
}

#[test]
fn test_record_level_numeric_defaults_apply() {
    let mut config = RecordConfig::fixed("amounts", 10)
        .with_field(FieldConfig::decimal("a", 1).with_length(5))
        .with_field(FieldConfig::decimal("b", 6).with_length(5).with_precision(3));
    config.precision = Some(2);
    config.implied_decimal_separator = true;

    let registry = DescriptorRegistry::compile(std::slice::from_ref(&config)).unwrap();
    let slots = registry.descriptor("amounts").unwrap().layout().fields();

    // Field-level declarations win; record defaults fill the gaps
    assert_eq!(slots[0].scalar.precision, Some(2));
    assert!(slots[0].scalar.implied_decimal);
    assert_eq!(slots[1].scalar.precision, Some(3));
    assert!(slots[1].scalar.implied_decimal);
}

#[test]
fn test_unknown_link_target_rejected() {
    let configs = vec![
        RecordConfig::fixed("order", 9)
            .with_field(FieldConfig::text("field_a", 1).with_length(3))
            .with_field(FieldConfig::link_to("sub_rec", "nowhere")),
    ];
    let err = DescriptorRegistry::compile(&configs).unwrap_err();

    match err {
        Error::Descriptor { record, message } => {
            assert_eq!(record, "order");
            assert!(message.contains("unknown record 'nowhere'"));
        }
        other => panic!("expected descriptor error, got {other:?}"),
    }
}

#[test]
fn test_cyclic_links_rejected() {
    let configs = vec![
        RecordConfig::fixed("a", 6)
            .with_field(FieldConfig::text("own", 1).with_length(3))
            .with_field(FieldConfig::link_to("to_b", "b")),
        RecordConfig::fixed("b", 6)
            .with_field(FieldConfig::text("own", 4).with_length(3))
            .with_field(FieldConfig::link_to("back", "a")),
    ];
    let err = DescriptorRegistry::compile(&configs).unwrap_err();

    match err {
        Error::CyclicLink { path } => assert_eq!(path, "a -> b -> a"),
        other => panic!("expected cyclic link error, got {other:?}"),
    }
}

#[test]
fn test_self_link_rejected() {
    let configs = vec![
        RecordConfig::fixed("selfish", 6)
            .with_field(FieldConfig::text("own", 1).with_length(3))
            .with_field(FieldConfig::link_to("me", "selfish")),
    ];
    let err = DescriptorRegistry::compile(&configs).unwrap_err();
    assert!(matches!(err, Error::CyclicLink { .. }));
}

#[test]
fn test_duplicate_record_names_rejected() {
    let configs = vec![
        RecordConfig::fixed("twin", 3).with_field(FieldConfig::text("a", 1).with_length(3)),
        RecordConfig::fixed("twin", 3).with_field(FieldConfig::text("b", 1).with_length(3)),
    ];
    let err = DescriptorRegistry::compile(&configs).unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_unregistered_lookup_fails() {
    let registry = DescriptorRegistry::compile(&order_configs()).unwrap();
    assert!(registry.get("missing").is_none());
    assert!(registry.descriptor("missing").is_err());
}

#[test]
fn test_config_validation_rejects_mixed_options() {
    let mut config = RecordConfig::fixed("bad", 10)
        .with_field(FieldConfig::text("a", 1).with_length(3));
    config.delimiter = Some(';');
    assert!(config.validate().is_err());

    let mut config = RecordConfig::delimited("bad", ';')
        .with_field(FieldConfig::text("a", 1));
    config.length = Some(10);
    assert!(config.validate().is_err());
}
