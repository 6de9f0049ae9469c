use crate::description::{entire, preprocess, to_comment};
use crate::error::{EmitError, GeneratorError};
use crate::generator::Generator;
use crate::schema::{ApiAttribute, ApiClass, ApiMethod, ApiType, Documentation};
use crate::session::Session;
use crate::table::{TableFields, DEFAULT_APPLIES_TO};
use crate::types::NameContext;
use crate::utils::{affix, escape_lua_keyword, sorted_by_order, to_lua_ident};

const ALLOWED_OPERATORS: [&str; 3] = ["index", "length", "call"];

/// A class, or a struct concept which has the shape of a class but no runtime value.
pub(crate) struct ClassShape<'a> {
    pub name: &'a str,
    pub doc: &'a Documentation,
    pub attributes: &'a [ApiAttribute],
    pub runtime: Option<&'a ApiClass>,
}

impl<'a> ClassShape<'a> {
    pub fn class(class: &'a ApiClass) -> Self {
        Self {
            name: &class.name,
            doc: &class.doc,
            attributes: &class.attributes,
            runtime: Some(class),
        }
    }

    pub fn structure(
        name: &'a str,
        doc: &'a Documentation,
        attributes: &'a [ApiAttribute],
    ) -> Self {
        Self {
            name,
            doc,
            attributes,
            runtime: None,
        }
    }
}

/// Lua name and documentation anchor a method or attribute is emitted under.
#[derive(Clone, Copy)]
struct MemberNames<'a> {
    lua: &'a str,
    anchor: &'a str,
}

impl<'a> MemberNames<'a> {
    fn plain(name: &'a str) -> Self {
        Self {
            lua: name,
            anchor: name,
        }
    }
}

impl Generator<'_> {
    pub(crate) fn emit_classes(
        &self,
        out: &mut String,
        session: &mut Session,
    ) -> Result<(), GeneratorError> {
        for class in sorted_by_order(&self.doc.classes) {
            self.emit_class(out, session, ClassShape::class(class))?;
        }
        Ok(())
    }

    pub(crate) fn emit_class(
        &self,
        out: &mut String,
        session: &mut Session,
        class: ClassShape<'_>,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let global = self.index.globals.get(class.name).copied();

        let needs_label = !class.doc.description.is_empty() || !class.doc.notes.is_empty();
        let description = match global.filter(|g| !g.description.is_empty()) {
            Some(global) => format!(
                "**Global Description:**\n{}{}{}",
                global.description,
                if needs_label { "\n\n**Class Description:**\n" } else { "\n\n" },
                class.doc.description
            ),
            None => class.doc.description.clone(),
        };
        let link = resolver.view_documentation(class.name)?;
        out.push_str(&to_comment(
            &resolver,
            &entire(&resolver, class.doc, &link, Some(&description))?,
        )?);

        match class.runtime {
            Some(runtime) => {
                if let Some(operator) = runtime
                    .operators
                    .iter()
                    .find(|op| !ALLOWED_OPERATORS.contains(&op.name.as_str()))
                {
                    return Err(EmitError::UnknownOperator {
                        class: class.name.to_string(),
                        operator: operator.name.clone(),
                    }
                    .into());
                }
                let bases = if runtime.base_classes.is_empty() {
                    String::new()
                } else {
                    format!(":{}", runtime.base_classes.join(","))
                };
                out.push_str(&format!("---@class {}{bases}\n", class.name));
            }
            None => out.push_str(&format!("---@class {}\n", class.name)),
        }

        for attribute in sorted_by_order(class.attributes) {
            let names = MemberNames::plain(&attribute.name);
            self.emit_attribute(out, session, class.name, attribute, names)?;
        }

        let Some(runtime) = class.runtime else {
            return Ok(());
        };

        for operator in sorted_by_order(&runtime.operators) {
            let names = match operator.name.as_str() {
                "index" => MemberNames {
                    lua: "__index",
                    anchor: "operator%20[]",
                },
                "length" => MemberNames {
                    lua: "__len",
                    anchor: "operator%20#",
                },
                _ => continue,
            };
            self.emit_attribute(out, session, class.name, &operator.as_attribute(), names)?;
        }

        let table_name = match global {
            Some(global) => global.name.clone(),
            None => format!("local {}", to_lua_ident(class.name)),
        };
        out.push_str(&format!("{table_name}={{\n"));
        for method in sorted_by_order(&runtime.methods) {
            if method.signature.takes_table {
                self.emit_table_method(out, session, class.name, method)?;
            } else {
                let names = MemberNames::plain(&method.name);
                self.emit_method(out, session, class.name, method, names)?;
            }
        }
        if let Some(call) = runtime.operators.iter().find(|op| op.name == "call") {
            let names = MemberNames {
                lua: "__call",
                anchor: "operator%20()",
            };
            self.emit_method(out, session, class.name, &call.as_method(), names)?;
        }
        out.push_str("}\n");
        Ok(())
    }

    fn emit_attribute(
        &self,
        out: &mut String,
        session: &mut Session,
        class: &str,
        attribute: &ApiAttribute,
        names: MemberNames<'_>,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&format!("{class}::{}", names.anchor))?;
        let access = format!(
            "[{}{}]{}",
            if attribute.read { "R" } else { "" },
            if attribute.write { "W" } else { "" },
            affix("\n", &attribute.doc.description, "")
        );
        out.push_str(&to_comment(
            &resolver,
            &entire(&resolver, &attribute.doc, &link, Some(&access))?,
        )?);
        let context = NameContext::member(class, names.lua, &link);
        let ty = self.format_type(session, Some(&attribute.ty), &context, false)?;
        out.push_str(&format!("---@field {} {ty}\n", names.lua));
        Ok(())
    }

    fn emit_method(
        &self,
        out: &mut String,
        session: &mut Session,
        class: &str,
        method: &ApiMethod,
        names: MemberNames<'_>,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&format!("{class}::{}", names.anchor))?;
        out.push_str(&to_comment(&resolver, &entire(&resolver, &method.doc, &link, None)?)?);

        let signature = &method.signature;
        let parameters = sorted_by_order(&signature.parameters);
        for parameter in &parameters {
            let context = NameContext::new(
                format!("{class}.{}.{}", method.name, parameter.name),
                link.as_str(),
            );
            out.push_str(&format!(
                "---@param {}{}",
                escape_lua_keyword(&parameter.name),
                if parameter.optional { "? " } else { " " }
            ));
            out.push_str(&self.annotated_type(
                session,
                Some(&parameter.ty),
                &parameter.description,
                &context,
            )?);
        }

        if let Some(variadic) = &signature.variadic_type {
            let context = NameContext::method_vararg(class, &method.name, &link);
            let ty = self.format_type(session, Some(variadic), &context, false)?;
            out.push_str(&format!("---@vararg {ty}\n"));
            let description = signature.variadic_description.as_deref().unwrap_or_default();
            if !description.is_empty() {
                let spacing = if description.contains('\n') { "\n\n" } else { "" };
                out.push_str(&to_comment(
                    &resolver,
                    &format!("\n**vararg**: {spacing}{description}"),
                )?);
            }
        }

        self.emit_return(out, session, class, method, &link)?;

        let mut arguments: Vec<String> = parameters
            .iter()
            .map(|parameter| escape_lua_keyword(&parameter.name))
            .collect();
        if signature.variadic_type.is_some() {
            arguments.push("...".to_string());
        }
        out.push_str(&format!("{}=function({})end,\n", names.lua, arguments.join(",")));
        Ok(())
    }

    /// A method taking a single table argument: the table is declared as
    /// `Class.method_param`, and the method takes one `param` of that type.
    fn emit_table_method(
        &self,
        out: &mut String,
        session: &mut Session,
        class: &str,
        method: &ApiMethod,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let link = resolver.view_documentation(&format!("{class}::{}", method.name))?;
        let declaration = NameContext::method_param(class, &method.name, &link);
        let param_type = self.emit_table(
            out,
            session,
            TableFields::of_signature(&method.signature),
            &declaration,
            &link,
            DEFAULT_APPLIES_TO,
        )?;
        out.push('\n');

        out.push_str(&to_comment(&resolver, &entire(&resolver, &method.doc, &link, None)?)?);
        let optional = if method.signature.table_is_optional { "? " } else { " " };
        out.push_str(&format!("---@param param{optional}{param_type}\n"));
        self.emit_return(out, session, class, method, &link)?;
        out.push_str(&format!("{}=function(param)end,\n", method.name));
        Ok(())
    }

    fn emit_return(
        &self,
        out: &mut String,
        session: &mut Session,
        class: &str,
        method: &ApiMethod,
        link: &str,
    ) -> Result<(), GeneratorError> {
        let Some(return_type) = &method.signature.return_type else {
            return Ok(());
        };
        let context = NameContext::method_return(class, &method.name, link);
        let description = method.signature.return_description.as_deref().unwrap_or_default();
        out.push_str("---@return ");
        out.push_str(&self.annotated_type(session, Some(return_type), description, &context)?);
        Ok(())
    }

    /// The rest of a `---@param` or `---@return` line: the type, then the description
    /// inline when it is a single line, otherwise as a comment block below.
    fn annotated_type(
        &self,
        session: &mut Session,
        ty: Option<&ApiType>,
        description: &str,
        context: &NameContext,
    ) -> Result<String, GeneratorError> {
        let resolver = self.resolver();
        let ty = self.format_type(session, ty, context, false)?;
        if description.is_empty() {
            Ok(format!("{ty}\n"))
        } else if !description.contains('\n') {
            Ok(format!("{ty}@{}\n", preprocess(&resolver, description)?))
        } else {
            Ok(format!("{ty}@\n{}", to_comment(&resolver, description)?))
        }
    }
}
