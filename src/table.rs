use crate::description::to_comment;
use crate::error::GeneratorError;
use crate::generator::Generator;
use crate::schema::{ApiParameter, ApiType, ParameterGroup, Signature, TableShape};
use crate::session::Session;
use crate::types::NameContext;
use crate::utils::{affix, sorted_by_order};
use indexmap::IndexMap;

pub(crate) const DEFAULT_APPLIES_TO: &str = "Applies to";
pub(crate) const FILTER_APPLIES_TO: &str = "Applies to filter";

/// Fixed fields and variant field groups of a table-shaped declaration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableFields<'a> {
    pub parameters: &'a [ApiParameter],
    pub groups: &'a [ParameterGroup],
}

impl<'a> TableFields<'a> {
    pub fn of(shape: &'a TableShape) -> Self {
        Self {
            parameters: &shape.parameters,
            groups: &shape.variant_parameter_groups,
        }
    }

    pub fn of_signature(signature: &'a Signature) -> Self {
        Self {
            parameters: &signature.parameters,
            groups: &signature.variant_parameter_groups,
        }
    }
}

struct Field<'a> {
    ty: &'a ApiType,
    description: String,
    optional: bool,
}

impl Generator<'_> {
    /// Emits one `---@class` declaration for a table-shaped type and returns its name.
    ///
    /// Fields of the variant groups are merged into the fixed fields: a field present in
    /// several groups is declared once, with one labelled paragraph per group.
    pub(crate) fn emit_table(
        &self,
        out: &mut String,
        session: &mut Session,
        fields: TableFields<'_>,
        declaration: &NameContext,
        header: &str,
        applies_to: &str,
    ) -> Result<String, GeneratorError> {
        let resolver = self.resolver();
        out.push_str(&to_comment(&resolver, header)?);
        out.push_str(&format!("---@class {}\n", declaration.name));

        let mut merged: IndexMap<&str, Field<'_>> = IndexMap::new();
        for parameter in sorted_by_order(fields.parameters) {
            merged.insert(
                &parameter.name,
                Field {
                    ty: &parameter.ty,
                    description: parameter.description.clone(),
                    optional: parameter.optional,
                },
            );
        }
        for group in sorted_by_order(fields.groups) {
            for parameter in sorted_by_order(&group.parameters) {
                let labelled = format!(
                    "{applies_to} **\"{}\"**: {}{}",
                    group.name,
                    if parameter.optional { "(optional)" } else { "(required)" },
                    affix("\n", &parameter.description, "")
                );
                match merged.get_mut(parameter.name.as_str()) {
                    Some(field) => {
                        field.description =
                            format!("{}{labelled}", affix("", &field.description, "\n\n"));
                    }
                    None => {
                        merged.insert(
                            &parameter.name,
                            Field {
                                ty: &parameter.ty,
                                description: labelled,
                                optional: parameter.optional,
                            },
                        );
                    }
                }
            }
        }

        for (name, field) in &merged {
            let comment = format!("{}{}", affix("", &field.description, "\n\n"), declaration.link);
            out.push_str(&to_comment(&resolver, &comment)?);
            let context = NameContext::member(&declaration.name, name, &declaration.link);
            let ty = self.format_type(session, Some(field.ty), &context, false)?;
            let nullable = if field.optional { "|nil" } else { "" };
            out.push_str(&format!("---@field {name} {ty}{nullable}\n"));
        }

        Ok(declaration.name.clone())
    }
}
