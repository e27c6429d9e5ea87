//! Building encoders by name, including from serialized configuration.

use pg_binary_encoder::registry::{BUILTIN_ENCODERS, Constructor, EncoderSpec, Registry};
use pg_binary_encoder::{CoderFlags, ConfigError, Encode, Encoder, EncoderKind, Value};

#[test]
fn builtin_table_matches_kinds() {
    assert_eq!(BUILTIN_ENCODERS.len(), EncoderKind::ALL.len());
    for (name, constructor) in BUILTIN_ENCODERS {
        let kind: EncoderKind = name.parse().unwrap();
        let elements = kind.is_composite().then(Encoder::string);
        assert_eq!(constructor(CoderFlags::default(), elements).unwrap().kind(), kind);
    }
}

#[test]
fn unknown_names_are_rejected() {
    assert_eq!(
        "Numeric".parse::<EncoderKind>(),
        Err(ConfigError::UnknownEncoder("Numeric".into()))
    );
    assert!(Registry::empty().build(&EncoderSpec::new("Int4")).is_err());
}

#[test]
fn custom_constructor_overrides_builtin() {
    let mut registry = Registry::default();
    let bigint: Constructor = |flags, elements| Encoder::new(EncoderKind::Int8, flags, elements);
    assert!(registry.register("Int4", bigint).is_some());
    assert_eq!(registry.len(), 8);

    let encoder = registry.build(&EncoderSpec::new("Int4")).unwrap();
    assert_eq!(encoder.encode(&Value::from(1)).unwrap().len(), 8);
}

#[test]
fn spec_of_built_encoder_rebuilds_it() {
    let registry = Registry::default();
    let spec = EncoderSpec::new("FromBase64")
        .with_elements(EncoderSpec::new("FromBase64").with_elements(EncoderSpec::new("String")));
    let encoder = registry.build(&spec).unwrap();
    assert_eq!(EncoderSpec::from(&encoder), spec);
    assert_eq!(
        encoder.encode(&Value::from("YUdWc2JHOD0=")).unwrap(),
        b"hello"
    );
}

#[cfg(feature = "serde")]
mod serde_config {
    use super::*;

    #[test]
    fn type_map_from_json() {
        let json = r#"{
            "bool": {"name": "Boolean"},
            "timestamptz": {"name": "Timestamp", "flags": 1},
            "bytea_b64": {"name": "FromBase64", "elements": {"name": "Bytea"}}
        }"#;
        let specs: std::collections::BTreeMap<String, EncoderSpec> =
            serde_json::from_str(json).unwrap();
        let registry = Registry::default();

        let timestamptz = registry.build(&specs["timestamptz"]).unwrap();
        assert!(timestamptz.flags().contains(CoderFlags::TIMESTAMP_DB_LOCAL));
        assert_eq!(registry.build(&specs["bool"]).unwrap(), Encoder::boolean());
        assert_eq!(
            registry.build(&specs["bytea_b64"]).unwrap(),
            Encoder::from_base64(Encoder::bytea())
        );
    }

    #[test]
    fn spec_serializes_without_empty_elements() {
        let spec = EncoderSpec::new("Int2");
        assert_eq!(
            serde_json::to_string(&spec).unwrap(),
            r#"{"name":"Int2","flags":0}"#
        );
        let back: EncoderSpec = serde_json::from_str(r#"{"name":"Int2"}"#).unwrap();
        assert_eq!(back, spec);
    }
}
