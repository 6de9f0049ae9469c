use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::generator::Generator;
use crate::loader::load;
use std::fmt::Display;

/// The result of a successful generation run.
///
/// `text` is the complete stub file; `synthesized` lists the names of the anonymous table
/// types that were declared for it, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStubs {
    pub text: String,
    pub synthesized: Vec<String>,
}

impl GeneratedStubs {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for GeneratedStubs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Loads a runtime API description and generates its annotation stubs.
///
/// This is the primary entry point. It validates the document, indexes it and emits the
/// stub file in one go.
///
/// # Arguments
///
/// * `source` - The JSON text of the runtime API description.
/// * `file_name` - The name of the file it was read from (used for error reporting).
/// * `config` - Generation settings.
///
/// # Errors
///
/// Returns a `GeneratorError` if the document is malformed or unsupported, or if emission
/// meets an unknown operator or an unresolved reference.
pub fn generate(
    source: &str,
    file_name: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedStubs, GeneratorError> {
    generate_with_appendix(source, file_name, config, "")
}

/// Like [`generate`], with hand-written annotations placed after the concepts.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_with_appendix(
    source: &str,
    file_name: &str,
    config: &GeneratorConfig,
    appendix: &str,
) -> Result<GeneratedStubs, GeneratorError> {
    let document = load(source, file_name)?;
    Generator::new(&document, config)?
        .with_appendix(appendix)
        .generate()
}

#[cfg(test)]
mod tests {
    use crate::{generate, GeneratorConfig};

    const SOURCE: &str = r#"{
        "application": "factorio", "stage": "runtime", "api_version": 1,
        "builtin_types": [ { "name": "float", "order": 0, "description": "" } ]
    }"#;

    #[test]
    fn test_generate_minimal_document() {
        let stubs = generate(SOURCE, "runtime-api.json", &GeneratorConfig::default()).unwrap();
        assert!(stubs.as_str().starts_with("---@meta\n---@diagnostic disable\n\n"));
        assert!(stubs.text.contains("---@class float:number\n"));
        assert!(stubs.synthesized.is_empty());
        assert_eq!(stubs.to_string(), stubs.text);
    }

    #[test]
    fn test_generate_with_appendix() {
        let stubs = super::generate_with_appendix(
            SOURCE,
            "runtime-api.json",
            &GeneratorConfig::default(),
            "---@class Extra\n",
        )
        .unwrap();
        assert!(stubs.text.ends_with("---@class Extra\n\n\n"));
    }
}
