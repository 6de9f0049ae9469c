//! Data model of the runtime API description.
//!
//! The raw serde model mirrors the JSON document. Concepts are kept loosely typed in
//! [`RawConcept`] until the loader has checked their category and turned them into
//! [`ApiConcept`]s; everything downstream works on the validated [`Document`].

use serde::Deserialize;

/// Anything carrying an explicit sort key.
pub trait Ordered {
    fn order(&self) -> u32;
}

macro_rules! ordered {
    ($($ty:ty),* $(,)?) => {
        $(impl Ordered for $ty {
            fn order(&self) -> u32 {
                self.order
            }
        })*
    };
}

ordered!(
    ApiClass,
    ApiMethod,
    ApiAttribute,
    ApiOperator,
    ApiParameter,
    ParameterGroup,
    ApiEvent,
    ApiConcept,
    IdentificationOption,
    NamedOption,
    ApiBuiltin,
    ApiGlobalObject,
    ApiDefine,
    DefineValue,
);

/// Documentation fields shared by every member entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Documentation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub see_also: Vec<String>,
    #[serde(default)]
    pub subclasses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiType {
    Named(String),
    Complex(Box<ComplexType>),
}

impl ApiType {
    pub fn named(name: &str) -> Self {
        ApiType::Named(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "complex_type")]
pub enum ComplexType {
    #[serde(rename = "array")]
    Array { value: ApiType },
    #[serde(rename = "dictionary")]
    Dictionary { key: ApiType, value: ApiType },
    #[serde(rename = "variant")]
    Variant { options: Vec<ApiType> },
    #[serde(rename = "LuaLazyLoadedValue")]
    LazyLoaded { value: ApiType },
    #[serde(rename = "LuaCustomTable")]
    CustomTable { key: ApiType, value: ApiType },
    #[serde(rename = "table")]
    Table(TableShape),
    #[serde(rename = "function")]
    Function { parameters: Vec<ApiType> },
}

/// Fixed fields plus optional variant field groups of a table-shaped type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableShape {
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,
    #[serde(default)]
    pub variant_parameter_groups: Vec<ParameterGroup>,
    #[serde(default)]
    pub variant_parameter_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiParameter {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: ApiType,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterGroup {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,
}

/// Callable payload shared by methods and the `call` operator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,
    #[serde(default)]
    pub variant_parameter_groups: Vec<ParameterGroup>,
    #[serde(default)]
    pub variant_parameter_description: Option<String>,
    #[serde(default)]
    pub variadic_type: Option<ApiType>,
    #[serde(default)]
    pub variadic_description: Option<String>,
    #[serde(default)]
    pub takes_table: bool,
    #[serde(default)]
    pub table_is_optional: bool,
    #[serde(default)]
    pub return_type: Option<ApiType>,
    #[serde(default)]
    pub return_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiMethod {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(flatten)]
    pub doc: Documentation,
    #[serde(flatten)]
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiAttribute {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(flatten)]
    pub doc: Documentation,
    #[serde(rename = "type")]
    pub ty: ApiType,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
}

/// An operator overload. `index` and `length` carry an attribute shape, `call` a method
/// shape, so both payloads are optional here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiOperator {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(flatten)]
    pub doc: Documentation,
    #[serde(rename = "type", default)]
    pub ty: Option<ApiType>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(flatten)]
    pub signature: Signature,
}

impl ApiOperator {
    pub fn as_attribute(&self) -> ApiAttribute {
        ApiAttribute {
            name: self.name.clone(),
            order: self.order,
            doc: self.doc.clone(),
            ty: self.ty.clone().unwrap_or_else(|| ApiType::named("any")),
            read: self.read,
            write: self.write,
        }
    }

    pub fn as_method(&self) -> ApiMethod {
        ApiMethod {
            name: self.name.clone(),
            order: self.order,
            doc: self.doc.clone(),
            signature: self.signature.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiClass {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(flatten)]
    pub doc: Documentation,
    #[serde(default)]
    pub methods: Vec<ApiMethod>,
    #[serde(default)]
    pub attributes: Vec<ApiAttribute>,
    #[serde(default)]
    pub operators: Vec<ApiOperator>,
    #[serde(default)]
    pub base_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiEvent {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(flatten)]
    pub doc: Documentation,
    #[serde(default)]
    pub data: Vec<ApiParameter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentificationOption {
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: ApiType,
}

/// A named choice of a flag or union concept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedOption {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConceptKind {
    Identification(Vec<IdentificationOption>),
    Concept,
    Struct(Vec<ApiAttribute>),
    Flag(Vec<NamedOption>),
    Table(TableShape),
    TableOrArray(TableShape),
    Union(Vec<NamedOption>),
    Filter(TableShape),
}

impl ConceptKind {
    pub fn category(&self) -> &'static str {
        match self {
            ConceptKind::Identification(_) => "identification",
            ConceptKind::Concept => "concept",
            ConceptKind::Struct(_) => "struct",
            ConceptKind::Flag(_) => "flag",
            ConceptKind::Table(_) => "table",
            ConceptKind::TableOrArray(_) => "table_or_array",
            ConceptKind::Union(_) => "union",
            ConceptKind::Filter(_) => "filter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConcept {
    pub name: String,
    pub order: u32,
    pub doc: Documentation,
    pub kind: ConceptKind,
}

/// A concept as it appears in the document, before its category is checked.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConcept {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    pub category: String,
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiBuiltin {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiGlobalObject {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: ApiType,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefineValue {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiDefine {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values: Vec<DefineValue>,
    #[serde(default)]
    pub subkeys: Vec<ApiDefine>,
}

/// The document exactly as deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    pub application: String,
    pub stage: String,
    pub api_version: u64,
    #[serde(default)]
    pub classes: Vec<ApiClass>,
    #[serde(default)]
    pub events: Vec<ApiEvent>,
    #[serde(default)]
    pub concepts: Vec<RawConcept>,
    #[serde(default)]
    pub builtin_types: Vec<ApiBuiltin>,
    #[serde(default)]
    pub global_objects: Vec<ApiGlobalObject>,
    #[serde(default)]
    pub defines: Vec<ApiDefine>,
}

/// A validated runtime API description.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub classes: Vec<ApiClass>,
    pub events: Vec<ApiEvent>,
    pub concepts: Vec<ApiConcept>,
    pub builtin_types: Vec<ApiBuiltin>,
    pub global_objects: Vec<ApiGlobalObject>,
    pub defines: Vec<ApiDefine>,
}
