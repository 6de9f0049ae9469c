use crate::error::SchemaError;
use crate::schema::{
    ApiBuiltin, ApiClass, ApiConcept, ApiDefine, ApiEvent, ApiGlobalObject, ApiType,
    ConceptKind, Document,
};
use crate::utils::sorted_by_order;
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

/// Name of the synthetic root of the constant tree.
pub const DEFINES_ROOT: &str = "defines";

/// Read-only lookup tables over a validated [`Document`].
#[derive(Debug)]
pub struct Index<'a> {
    pub classes: IndexMap<&'a str, &'a ApiClass>,
    pub events: IndexMap<&'a str, &'a ApiEvent>,
    pub concepts: IndexMap<&'a str, &'a ApiConcept>,
    pub builtins: IndexMap<&'a str, &'a ApiBuiltin>,
    /// Global objects keyed by the name of the class they expose.
    pub globals: IndexMap<&'a str, &'a ApiGlobalObject>,
    /// Element type of each table-or-array concept: the type of its first field.
    pub table_or_array_elements: IndexMap<&'a str, &'a ApiType>,
    /// Every path through the constant tree, `defines` included.
    pub defines: IndexSet<String>,
}

impl<'a> Index<'a> {
    /// # Errors
    /// Returns `SchemaError::ComplexGlobal` if a global object's type is not a plain name.
    pub fn build(doc: &'a Document) -> Result<Self, SchemaError> {
        let classes = doc.classes.iter().map(|c| (c.name.as_str(), c)).collect();
        let events = doc.events.iter().map(|e| (e.name.as_str(), e)).collect();
        let concepts = doc.concepts.iter().map(|c| (c.name.as_str(), c)).collect();
        let builtins = doc.builtin_types.iter().map(|b| (b.name.as_str(), b)).collect();

        let mut table_or_array_elements = IndexMap::new();
        for concept in &doc.concepts {
            if let ConceptKind::TableOrArray(shape) = &concept.kind {
                match sorted_by_order(&shape.parameters).first() {
                    Some(first) => {
                        table_or_array_elements.insert(concept.name.as_str(), &first.ty);
                    }
                    None => warn!("table_or_array concept {} has no fields", concept.name),
                }
            }
        }

        let mut globals = IndexMap::new();
        for global in &doc.global_objects {
            match &global.ty {
                ApiType::Named(type_name) => {
                    globals.insert(type_name.as_str(), global);
                }
                ApiType::Complex(_) => {
                    return Err(SchemaError::ComplexGlobal {
                        name: global.name.clone(),
                    })
                }
            }
        }

        let mut defines = IndexSet::new();
        defines.insert(DEFINES_ROOT.to_string());
        let root_prefix = format!("{DEFINES_ROOT}.");
        for define in &doc.defines {
            collect_defines(define, &root_prefix, &mut defines);
        }

        let index = Self {
            classes,
            events,
            concepts,
            builtins,
            globals,
            table_or_array_elements,
            defines,
        };
        debug!(
            "indexed {} globals, {} table_or_array concepts, {} defines",
            index.globals.len(),
            index.table_or_array_elements.len(),
            index.defines.len()
        );
        Ok(index)
    }
}

fn collect_defines(define: &ApiDefine, prefix: &str, defines: &mut IndexSet<String>) {
    let name = format!("{prefix}{}", define.name);
    defines.insert(name.clone());
    for value in &define.values {
        defines.insert(format!("{name}.{}", value.name));
    }
    let child_prefix = format!("{name}.");
    for subkey in &define.subkeys {
        collect_defines(subkey, &child_prefix, defines);
    }
}
