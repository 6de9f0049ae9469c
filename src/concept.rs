use crate::class::ClassShape;
use crate::description::{entire, to_comment};
use crate::error::GeneratorError;
use crate::generator::Generator;
use crate::schema::{ApiConcept, ConceptKind, IdentificationOption, NamedOption, TableShape};
use crate::session::Session;
use crate::table::{TableFields, DEFAULT_APPLIES_TO, FILTER_APPLIES_TO};
use crate::types::NameContext;
use crate::utils::{affix, sorted_by_order};

impl Generator<'_> {
    pub(crate) fn emit_concepts(
        &self,
        out: &mut String,
        session: &mut Session,
    ) -> Result<(), GeneratorError> {
        for concept in sorted_by_order(&self.doc.concepts) {
            match &concept.kind {
                ConceptKind::Identification(options) => {
                    self.emit_identification(out, session, concept, options)?
                }
                ConceptKind::Concept => self.emit_plain_concept(out, concept)?,
                ConceptKind::Struct(attributes) => {
                    let shape = ClassShape::structure(&concept.name, &concept.doc, attributes);
                    self.emit_class(out, session, shape)?
                }
                ConceptKind::Flag(options) => self.emit_flag(out, concept, options)?,
                ConceptKind::Table(shape) | ConceptKind::TableOrArray(shape) => {
                    self.emit_table_concept(out, session, concept, shape, DEFAULT_APPLIES_TO)?
                }
                ConceptKind::Union(options) => self.emit_union(out, concept, options)?,
                ConceptKind::Filter(shape) => {
                    self.emit_table_concept(out, session, concept, shape, FILTER_APPLIES_TO)?
                }
            }
        }
        Ok(())
    }

    /// Documents every way of specifying the concept and declares it as the alternation of
    /// their types.
    fn emit_identification(
        &self,
        out: &mut String,
        session: &mut Session,
        concept: &ApiConcept,
        options: &[IdentificationOption],
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&concept.name)?;
        let options = sorted_by_order(options);

        let mut description = format!(
            "{}May be specified in one of the following ways:",
            affix("", &concept.doc.description, "\n\n")
        );
        let mut alternatives = Vec::with_capacity(options.len());
        for option in &options {
            let context = NameContext::member(&concept.name, &option.order.to_string(), &link);
            let linked = self.format_type(session, Some(&option.ty), &context, true)?;
            description.push_str(&format!(
                "\n- {linked}{}",
                affix(": ", &option.description, "")
            ));
            alternatives.push(self.format_type(session, Some(&option.ty), &context, false)?);
        }

        out.push_str(&to_comment(
            &resolver,
            &entire(&resolver, &concept.doc, &link, Some(&description))?,
        )?);
        out.push_str(&format!("---@alias {} {}\n", concept.name, alternatives.join("|")));
        Ok(())
    }

    fn emit_plain_concept(
        &self,
        out: &mut String,
        concept: &ApiConcept,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&concept.name)?;
        out.push_str(&to_comment(&resolver, &entire(&resolver, &concept.doc, &link, None)?)?);
        out.push_str(&format!("---@class {}\n", concept.name));
        Ok(())
    }

    fn emit_flag(
        &self,
        out: &mut String,
        concept: &ApiConcept,
        options: &[NamedOption],
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&concept.name)?;
        out.push_str(&to_comment(&resolver, &entire(&resolver, &concept.doc, &link, None)?)?);
        out.push_str(&format!("---@class {}\n", concept.name));
        for option in sorted_by_order(options) {
            let comment = format!("{}{link}", affix("", &option.description, "\n\n"));
            out.push_str(&to_comment(&resolver, &comment)?);
            out.push_str(&format!("---@field {} boolean|nil\n", option.name));
        }
        Ok(())
    }

    fn emit_union(
        &self,
        out: &mut String,
        concept: &ApiConcept,
        options: &[NamedOption],
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&concept.name)?;
        let mut description = format!(
            "{}Possible values are:",
            affix("", &concept.doc.description, "\n\n")
        );
        for option in sorted_by_order(options) {
            description.push_str(&format!(
                "\n- \"{}\"{}",
                option.name,
                affix(" - ", &option.description, "")
            ));
        }
        out.push_str(&to_comment(
            &resolver,
            &entire(&resolver, &concept.doc, &link, Some(&description))?,
        )?);
        out.push_str(&format!("---@class {}\n", concept.name));
        Ok(())
    }

    fn emit_table_concept(
        &self,
        out: &mut String,
        session: &mut Session,
        concept: &ApiConcept,
        shape: &TableShape,
        applies_to: &str,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&concept.name)?;
        let groups = shape.variant_parameter_description.as_deref().unwrap_or_default();
        let description = format!("{}{groups}", affix("", &concept.doc.description, "\n\n"));
        let header = entire(&resolver, &concept.doc, &link, Some(description.trim_end()))?;
        let declaration = NameContext::new(concept.name.as_str(), link.as_str());
        self.emit_table(out, session, TableFields::of(shape), &declaration, &header, applies_to)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::loader::load;

    const BASE: &str = "https://lua-api.factorio.com/latest/";

    fn emit(concepts: &str) -> String {
        let source = format!(
            r#"{{
            "application": "factorio", "stage": "runtime", "api_version": 1,
            "builtin_types": [ {{ "name": "string", "order": 0, "description": "" }},
                               {{ "name": "uint", "order": 1, "description": "" }} ],
            "classes": [ {{ "name": "LuaEntity", "order": 0, "description": "" }} ],
            "concepts": {concepts}
        }}"#
        );
        let doc = load(&source, "runtime-api.json").unwrap();
        let config = GeneratorConfig::default();
        let generator = Generator::new(&doc, &config).unwrap();
        let mut session = Session::new();
        let mut out = String::new();
        generator.emit_concepts(&mut out, &mut session).unwrap();
        out
    }

    #[test]
    fn test_identification() {
        let out = emit(
            r#"[ { "name": "EntityIdentification", "order": 0, "description": "An entity.", "category": "identification",
                   "options": [ { "order": 1, "description": "By unit number.", "type": "uint" },
                                { "order": 0, "description": "", "type": "LuaEntity" } ] } ]"#,
        );
        assert!(out.contains(&format!(
            "---May be specified in one of the following ways:  \n\
             ---- [LuaEntity]({BASE}LuaEntity.html)  \n\
             ---- [uint]({BASE}Builtin-Types.html#uint): By unit number.\n"
        )));
        assert!(out.contains("---@alias EntityIdentification LuaEntity|uint\n"));
    }

    #[test]
    fn test_identification_links_only_outer_names() {
        let out = emit(
            r#"[ { "name": "ItemList", "order": 0, "description": "", "category": "identification",
                   "options": [ { "order": 0, "description": "", "type": { "complex_type": "array", "value": "nil" } },
                                { "order": 1, "description": "", "type": "string" } ] } ]"#,
        );
        assert!(out.contains(&format!(
            "---- nil[]  \n---- [string]({BASE}Builtin-Types.html#string)\n"
        )));
        assert!(out.contains("---@alias ItemList nil[]|string\n"));
    }

    #[test]
    fn test_flag() {
        let out = emit(
            r#"[ { "name": "MouseButtonFlags", "order": 0, "description": "", "category": "flag",
                   "options": [ { "name": "left", "order": 0, "description": "Left button." } ] } ]"#,
        );
        assert!(out.contains("---@class MouseButtonFlags\n"));
        assert!(out.contains("---Left button.\n"));
        assert!(out.contains("---@field left boolean|nil\n"));
    }

    #[test]
    fn test_union() {
        let out = emit(
            r#"[ { "name": "Alignment", "order": 0, "description": "Text alignment.", "category": "union",
                   "options": [ { "name": "right", "order": 1, "description": "" },
                                { "name": "left", "order": 0, "description": "Default." } ] } ]"#,
        );
        assert!(out.starts_with(
            "---Text alignment.\n---\n---Possible values are:  \n---- \"left\" - Default.  \n---- \"right\"\n"
        ));
        assert!(out.contains("---@class Alignment\n"));
    }

    #[test]
    fn test_plain_and_struct_concepts() {
        let out = emit(
            r#"[ { "name": "LocalisedString", "order": 0, "description": "Text.", "category": "concept" },
                 { "name": "Color", "order": 1, "description": "", "category": "struct",
                   "attributes": [ { "name": "r", "order": 0, "description": "", "type": "uint", "read": true, "write": true } ] } ]"#,
        );
        assert!(out.contains("---@class LocalisedString\n"));
        assert!(out.contains("---@class Color\n"));
        assert!(out.contains(&format!("---[RW]\n---\n---[View documentation]({BASE}Concepts.html#Color.r)\n")));
        assert!(out.contains("---@field r uint\n"));
        assert!(!out.contains("local Color"));
    }

    #[test]
    fn test_table_and_filter_concepts() {
        let out = emit(
            r#"[ { "name": "BoundingBox", "order": 0, "description": "Two corners.", "category": "table_or_array",
                   "parameters": [ { "name": "left_top", "order": 0, "description": "", "type": "uint", "optional": false } ] },
                 { "name": "EntityPrototypeFilter", "order": 1, "description": "", "category": "filter",
                   "parameters": [ { "name": "filter", "order": 0, "description": "", "type": "string", "optional": false } ],
                   "variant_parameter_groups": [
                     { "name": "type", "order": 0, "description": "", "parameters": [
                        { "name": "type", "order": 0, "description": "", "type": "string", "optional": false } ] } ],
                   "variant_parameter_description": "Other attributes depend on `filter`." } ]"#,
        );
        assert!(out.starts_with("---Two corners.\n---\n---[View documentation]"));
        assert!(out.contains("---@class BoundingBox\n---[View documentation]"));
        assert!(out.contains("---@field left_top uint\n"));
        assert!(out.contains("---Other attributes depend on `filter`.\n"));
        assert!(out.contains("---Applies to filter **\"type\"**: (required)\n"));
    }
}
