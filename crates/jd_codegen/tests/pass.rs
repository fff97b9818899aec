use std::fs;

use jd_codegen::{
    ClassSchema, CodecKind, CodegenOptions, DefaultValue, GenerateError, MANIFEST_PATH,
    PropertySchema, ShapeError, generate,
};
use syn::parse_quote;

fn sample() -> ClassSchema {
    ClassSchema::new("app::model", "Sample")
        .with_field(
            PropertySchema::new("count", parse_quote!(i32)),
            DefaultValue::Expr(parse_quote!(0)),
        )
        .with_field(PropertySchema::new("label", parse_quote!(Option<String>)), DefaultValue::Required)
        .with_field(PropertySchema::new("tags", parse_quote!(Vec<String>)), DefaultValue::Trait)
}

fn address() -> ClassSchema {
    ClassSchema::new("app::model", "Address")
        .with_field(PropertySchema::new("street", parse_quote!(String)), DefaultValue::Required)
}

fn derived() -> ClassSchema {
    ClassSchema::new("app::model", "Derived")
        .with_base(parse_quote!(Sample))
        .with_field(PropertySchema::new("extra", parse_quote!(u8)), DefaultValue::Required)
}

#[test]
fn one_file_per_codec() {
    let output = generate(&[sample(), address()], &CodegenOptions::default()).unwrap();

    let names: Vec<_> = output.files().iter().map(|f| f.file_name()).collect();
    assert_eq!(
        names,
        [
            "Sample_Serializer.rs",
            "Sample_Deserializer.rs",
            "Address_Serializer.rs",
            "Address_Deserializer.rs",
        ]
    );
    assert_eq!(output.files()[0].kind(), CodecKind::Encoder);
    assert_eq!(output.files()[1].record(), "app::model::Sample");
    assert!(output.files()[0].contents().starts_with("// Generated JSON encoder"));
    assert!(output.files()[1].contents().contains("struct Sample_Deserializer"));
    assert_eq!(output.report().generated(), ["app::model::Sample", "app::model::Address"]);
}

#[test]
fn generation_is_deterministic() {
    let first = generate(&[sample(), address()], &CodegenOptions::default()).unwrap();
    let second = generate(&[sample(), address()], &CodegenOptions::default()).unwrap();

    for (a, b) in first.files().iter().zip(second.files()) {
        assert_eq!(a.contents(), b.contents());
    }
    assert_eq!(first.manifest(), second.manifest());
}

#[test]
fn rejected_records_do_not_stop_the_pass() {
    let output = generate(&[derived(), sample()], &CodegenOptions::default()).unwrap();

    assert_eq!(output.files().len(), 2);
    let rejected = output.report().rejected();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].record, "app::model::Derived");
    assert!(rejected[0].reason.contains("`Sample`"));
    assert_eq!(
        output.manifest().unwrap().to_string(),
        "app::model::Sample_Serializer\napp::model::Sample_Deserializer\n"
    );
    assert!(output.report().to_string().contains("rejected 1"));
}

#[test]
fn only_rejected_records_write_no_manifest() {
    let output = generate(&[derived()], &CodegenOptions::default()).unwrap();
    assert!(output.files().is_empty());
    assert!(output.manifest().is_none());
}

#[test]
fn shape_errors_fail_the_whole_pass() {
    let broken = ClassSchema::new("app::model", "Broken").with_field(
        PropertySchema::new("lookup", parse_quote!(BTreeMap<String>)),
        DefaultValue::Required,
    );

    let error = generate(&[sample(), broken], &CodegenOptions::default()).unwrap_err();
    let GenerateError::Shape {
        record,
        property,
        source,
        ..
    } = &error
    else {
        panic!("unexpected error: {error}");
    };
    assert_eq!(record, "Broken");
    assert_eq!(property, "lookup");
    assert!(matches!(source, ShapeError::Arity { expected: 2, found: 1, .. }));
    assert!(error.to_string().contains("`BTreeMap<String>` expects 2 type argument(s), found 1"));
}

#[test]
fn write_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = generate(&[sample()], &CodegenOptions::default()).unwrap();

    let written = output.write_to(dir.path()).unwrap();
    assert_eq!(written.len(), 3);

    let encoder = fs::read_to_string(dir.path().join("Sample_Serializer.rs")).unwrap();
    assert_eq!(encoder, output.files()[0].contents());

    let manifest = fs::read_to_string(dir.path().join(MANIFEST_PATH)).unwrap();
    assert_eq!(
        manifest,
        "app::model::Sample_Serializer\napp::model::Sample_Deserializer\n"
    );
}

#[test]
fn generated_files_parse_as_rust() {
    let options = CodegenOptions {
        runtime_path: parse_quote!(crate::json),
        auto_register: true,
    };
    let output = generate(&[sample()], &options).unwrap();
    for file in output.files() {
        let parsed = syn::parse_file(file.contents());
        assert!(parsed.is_ok(), "{} does not parse", file.file_name());
        assert!(file.contents().contains("crate :: json :: __macro_exports"));
        assert!(file.contents().contains("inventory :: submit"));
    }
}
