use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum GeneratorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Schema Error")]
pub enum SchemaError {
    #[error("Malformed API description: {message}")]
    #[diagnostic(
        code(schema::malformed),
        help("The document is not valid JSON or does not follow the runtime API format.")
    )]
    Malformed {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unknown JSON format: application `{application}`, stage `{stage}`")]
    #[diagnostic(
        code(schema::unknown_format),
        help("Only the `factorio` application at the `runtime` stage is supported.")
    )]
    UnknownFormat { application: String, stage: String },

    #[error("Unsupported JSON version {found}")]
    #[diagnostic(
        code(schema::unsupported_version),
        help("Only api_version {expected} is supported.")
    )]
    UnsupportedVersion { found: u64, expected: u64 },

    #[error("Unknown concept category `{category}` on concept `{concept}`")]
    #[diagnostic(code(schema::unknown_concept_category))]
    UnknownConceptCategory { concept: String, category: String },

    #[error("Invalid payload for {category} concept `{concept}`: {message}")]
    #[diagnostic(code(schema::invalid_concept))]
    InvalidConcept {
        concept: String,
        category: String,
        message: String,
    },

    #[error("Global object `{name}` does not have a plain type name")]
    #[diagnostic(
        code(schema::complex_global),
        help("Global objects must refer to a class by name.")
    )]
    ComplexGlobal { name: String },
}

#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Emit Error")]
pub enum EmitError {
    #[error("Unknown operator `{operator}` on class `{class}`")]
    #[diagnostic(
        code(emit::unknown_operator),
        help("Only the `index`, `length` and `call` operators can be expressed.")
    )]
    UnknownOperator { class: String, operator: String },

    #[error("Unresolved reference `{reference}`")]
    #[diagnostic(
        code(emit::unresolved_reference),
        help("References must name a builtin, class, event, define, concept or `Class::member`.")
    )]
    UnresolvedReference { reference: String },
}

#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Config Error")]
pub enum ConfigError {
    #[error("Could not read config file `{path}`: {message}")]
    #[diagnostic(code(config::io))]
    Io { path: String, message: String },

    #[error("Could not parse config: {message}")]
    #[diagnostic(code(config::parse))]
    Parse { message: String },
}
