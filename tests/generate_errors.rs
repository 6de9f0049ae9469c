// Error paths of the generation pipeline: rejected documents and failed emission.

use fmtk_luadoc::error::{EmitError, SchemaError};
use fmtk_luadoc::{generate, GeneratorConfig, GeneratorError};

fn run(source: &str) -> Result<String, GeneratorError> {
    generate(source, "runtime-api.json", &GeneratorConfig::default()).map(|stubs| stubs.text)
}

fn document(body: &str) -> String {
    format!(r#"{{ "application": "factorio", "stage": "runtime", "api_version": 1, {body} }}"#)
}

#[test]
fn test_malformed_json() {
    match run(r#"{ "application": "factorio", "stage": "#) {
        Err(GeneratorError::Schema(SchemaError::Malformed { message, .. })) => {
            assert!(!message.is_empty());
        }
        other => panic!("Expected a malformed document error, got {other:?}"),
    }
}

#[test]
fn test_unknown_format() {
    let source = r#"{ "application": "factorio", "stage": "prototype", "api_version": 1 }"#;
    match run(source) {
        Err(GeneratorError::Schema(SchemaError::UnknownFormat { application, stage })) => {
            assert_eq!(application, "factorio");
            assert_eq!(stage, "prototype");
        }
        other => panic!("Expected an unknown format error, got {other:?}"),
    }
}

#[test]
fn test_unsupported_version() {
    let source = r#"{ "application": "factorio", "stage": "runtime", "api_version": 2 }"#;
    match run(source) {
        Err(GeneratorError::Schema(SchemaError::UnsupportedVersion { found, expected })) => {
            assert_eq!(found, 2);
            assert_eq!(expected, 1);
        }
        other => panic!("Expected an unsupported version error, got {other:?}"),
    }
}

#[test]
fn test_unknown_concept_category() {
    let source = document(
        r#""concepts": [ { "name": "Mystery", "order": 0, "description": "", "category": "enum" } ]"#,
    );
    match run(&source) {
        Err(GeneratorError::Schema(SchemaError::UnknownConceptCategory { concept, category })) => {
            assert_eq!(concept, "Mystery");
            assert_eq!(category, "enum");
        }
        other => panic!("Expected an unknown category error, got {other:?}"),
    }
}

#[test]
fn test_unknown_operator() {
    let source = document(
        r#""classes": [ { "name": "LuaThing", "order": 0, "description": "",
                          "operators": [ { "name": "add", "order": 0, "description": "" } ] } ]"#,
    );
    match run(&source) {
        Err(GeneratorError::Emit(EmitError::UnknownOperator { class, operator })) => {
            assert_eq!(class, "LuaThing");
            assert_eq!(operator, "add");
        }
        other => panic!("Expected an unknown operator error, got {other:?}"),
    }
}

#[test]
fn test_unresolved_reference_in_description() {
    let source = document(
        r#""classes": [ { "name": "LuaThing", "order": 0, "description": "See [this](Nowhere)." } ]"#,
    );
    match run(&source) {
        Err(GeneratorError::Emit(EmitError::UnresolvedReference { reference })) => {
            assert_eq!(reference, "Nowhere");
        }
        other => panic!("Expected an unresolved reference error, got {other:?}"),
    }
}

#[test]
fn test_unresolved_type_in_see_also() {
    let source = document(
        r#""classes": [ { "name": "LuaThing", "order": 0, "description": "", "see_also": ["LuaNothing"] } ]"#,
    );
    assert!(matches!(
        run(&source),
        Err(GeneratorError::Emit(EmitError::UnresolvedReference { .. }))
    ));
}

#[test]
fn test_complex_global() {
    let source = document(
        r#""global_objects": [ { "name": "odd", "order": 0, "description": "",
                                 "type": { "complex_type": "array", "value": "string" } } ]"#,
    );
    match run(&source) {
        Err(GeneratorError::Schema(SchemaError::ComplexGlobal { name })) => assert_eq!(name, "odd"),
        other => panic!("Expected a complex global error, got {other:?}"),
    }
}

#[test]
fn test_empty_document_generates() {
    let text = run(&document(r#""classes": []"#)).unwrap();
    assert!(text.starts_with("---@meta\n"));
    assert!(text.contains("---@class defines\ndefines={}\n"));
}
