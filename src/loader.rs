use crate::error::{GeneratorError, SchemaError};
use crate::schema::{
    ApiAttribute, ApiConcept, ConceptKind, Document, Documentation, IdentificationOption, NamedOption,
    RawConcept, RawDocument, TableShape,
};
use crate::utils::byte_offset;
use log::debug;
use miette::NamedSource;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const EXPECTED_APPLICATION: &str = "factorio";
pub const EXPECTED_STAGE: &str = "runtime";
pub const SUPPORTED_API_VERSION: u64 = 1;

#[derive(Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct Options<T> {
    #[serde(default)]
    options: Vec<T>,
}

#[derive(Deserialize)]
struct Attributes {
    #[serde(default)]
    attributes: Vec<ApiAttribute>,
}

/// Parses and validates a runtime API description.
///
/// # Errors
/// Returns a `SchemaError` if the text is not valid JSON, does not describe the runtime
/// stage of the expected application, uses another `api_version`, or contains a concept
/// of an unknown category.
pub fn load(source: &str, file_name: &str) -> Result<Document, GeneratorError> {
    let raw: RawDocument = serde_json::from_str(source).map_err(|err| {
        let offset = byte_offset(source, err.line(), err.column());
        SchemaError::Malformed {
            src: NamedSource::new(file_name, source.to_string()),
            span: (offset, 0).into(),
            message: err.to_string(),
        }
    })?;
    validate(raw)
}

/// Checks the identity and version of an already deserialized document and types its
/// concepts.
///
/// # Errors
/// See [`load`].
pub fn validate(raw: RawDocument) -> Result<Document, GeneratorError> {
    if raw.application != EXPECTED_APPLICATION || raw.stage != EXPECTED_STAGE {
        return Err(SchemaError::UnknownFormat {
            application: raw.application,
            stage: raw.stage,
        }
        .into());
    }
    if raw.api_version != SUPPORTED_API_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found: raw.api_version,
            expected: SUPPORTED_API_VERSION,
        }
        .into());
    }

    let concepts = raw
        .concepts
        .into_iter()
        .map(type_concept)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "loaded {} classes, {} events, {} concepts, {} builtins, {} globals, {} define roots",
        raw.classes.len(),
        raw.events.len(),
        concepts.len(),
        raw.builtin_types.len(),
        raw.global_objects.len(),
        raw.defines.len()
    );

    Ok(Document {
        classes: raw.classes,
        events: raw.events,
        concepts,
        builtin_types: raw.builtin_types,
        global_objects: raw.global_objects,
        defines: raw.defines,
    })
}

fn type_concept(raw: RawConcept) -> Result<ApiConcept, SchemaError> {
    let RawConcept {
        name,
        order,
        category,
        body,
    } = raw;

    let kind = match category.as_str() {
        "identification" => {
            let payload: Options<IdentificationOption> = payload(&name, &category, &body)?;
            ConceptKind::Identification(payload.options)
        }
        "concept" => ConceptKind::Concept,
        "struct" => {
            let payload: Attributes = payload(&name, &category, &body)?;
            ConceptKind::Struct(payload.attributes)
        }
        "flag" => {
            let payload: Options<NamedOption> = payload(&name, &category, &body)?;
            ConceptKind::Flag(payload.options)
        }
        "table" => ConceptKind::Table(payload(&name, &category, &body)?),
        "table_or_array" => {
            let shape: TableShape = payload(&name, &category, &body)?;
            ConceptKind::TableOrArray(shape)
        }
        "union" => {
            let payload: Options<NamedOption> = payload(&name, &category, &body)?;
            ConceptKind::Union(payload.options)
        }
        "filter" => ConceptKind::Filter(payload(&name, &category, &body)?),
        _ => {
            return Err(SchemaError::UnknownConceptCategory {
                concept: name,
                category,
            })
        }
    };
    let doc: Documentation = payload(&name, &category, &body)?;

    Ok(ApiConcept {
        name,
        order,
        doc,
        kind,
    })
}

fn payload<T: DeserializeOwned>(
    name: &str,
    category: &str,
    body: &Map<String, Value>,
) -> Result<T, SchemaError> {
    serde_json::from_value(Value::Object(body.clone())).map_err(|err| SchemaError::InvalidConcept {
        concept: name.to_string(),
        category: category.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ApiType;

    fn document(extra: &str) -> String {
        format!(
            r#"{{ "application": "factorio", "stage": "runtime", "api_version": 1 {extra} }}"#
        )
    }

    #[test]
    fn test_load_empty_document() {
        let doc = load(&document(""), "runtime-api.json").unwrap();
        assert!(doc.classes.is_empty());
        assert!(doc.concepts.is_empty());
    }

    #[test]
    fn test_wrong_application() {
        let source = r#"{ "application": "other", "stage": "runtime", "api_version": 1 }"#;
        match load(source, "runtime-api.json") {
            Err(GeneratorError::Schema(SchemaError::UnknownFormat { application, .. })) => {
                assert_eq!(application, "other")
            }
            other => panic!("Expected an unknown format error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_stage() {
        let source = r#"{ "application": "factorio", "stage": "prototype", "api_version": 1 }"#;
        assert!(matches!(
            load(source, "runtime-api.json"),
            Err(GeneratorError::Schema(SchemaError::UnknownFormat { .. }))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let source = r#"{ "application": "factorio", "stage": "runtime", "api_version": 2 }"#;
        match load(source, "runtime-api.json") {
            Err(GeneratorError::Schema(SchemaError::UnsupportedVersion { found, .. })) => {
                assert_eq!(found, 2)
            }
            other => panic!("Expected an unsupported version error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_has_span() {
        let source = "{\n  \"application\": \"factorio\",\n  oops\n}";
        match load(source, "runtime-api.json") {
            Err(GeneratorError::Schema(SchemaError::Malformed { span, .. })) => {
                assert!(span.offset() > 0);
                assert!(span.offset() <= source.len());
            }
            other => panic!("Expected a malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_concept_categories() {
        let source = document(
            r#", "concepts": [
                { "name": "Position", "order": 0, "description": "A position.", "category": "table_or_array",
                  "parameters": [ { "name": "x", "order": 0, "description": "", "type": "double", "optional": false } ] },
                { "name": "Alignment", "order": 1, "description": "", "category": "union",
                  "options": [ { "name": "left", "order": 0, "description": "" } ] },
                { "name": "EntityID", "order": 2, "description": "", "category": "identification",
                  "options": [ { "order": 0, "description": "", "type": "LuaEntity" } ] }
            ]"#,
        );
        let doc = load(&source, "runtime-api.json").unwrap();
        assert_eq!(doc.concepts.len(), 3);
        assert_eq!(doc.concepts[0].doc.description, "A position.");
        match &doc.concepts[0].kind {
            ConceptKind::TableOrArray(shape) => {
                assert_eq!(shape.parameters[0].ty, ApiType::named("double"))
            }
            other => panic!("Expected a table_or_array concept, got {other:?}"),
        }
        assert_eq!(doc.concepts[1].kind.category(), "union");
        assert_eq!(doc.concepts[2].kind.category(), "identification");
    }

    #[test]
    fn test_option_payloads() {
        let source = document(
            r#", "concepts": [
                { "name": "MouseButtonFlags", "order": 0, "description": "", "category": "flag",
                  "options": [ { "name": "left", "order": 0, "description": "" },
                               { "name": "right", "order": 1 } ] },
                { "name": "Empty", "order": 1, "description": "", "category": "union" },
                { "name": "ItemID", "order": 2, "description": "", "category": "identification",
                  "options": [ { "order": 0, "type": "string" } ] }
            ]"#,
        );
        let doc = load(&source, "runtime-api.json").unwrap();
        match &doc.concepts[0].kind {
            ConceptKind::Flag(options) => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[1].name, "right");
                assert_eq!(options[1].description, "");
            }
            other => panic!("Expected a flag concept, got {other:?}"),
        }
        assert_eq!(doc.concepts[1].kind, ConceptKind::Union(Vec::new()));
        match &doc.concepts[2].kind {
            ConceptKind::Identification(options) => {
                assert_eq!(options[0].ty, ApiType::named("string"))
            }
            other => panic!("Expected an identification concept, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_concept_category() {
        let source = document(
            r#", "concepts": [ { "name": "Weird", "order": 0, "description": "", "category": "mystery" } ]"#,
        );
        match load(&source, "runtime-api.json") {
            Err(GeneratorError::Schema(SchemaError::UnknownConceptCategory {
                concept,
                category,
            })) => {
                assert_eq!(concept, "Weird");
                assert_eq!(category, "mystery");
            }
            other => panic!("Expected an unknown category error, got {other:?}"),
        }
    }
}
