//! Lowering of schema type expressions into annotation syntax.

use crate::error::GeneratorError;
use crate::generator::Generator;
use crate::schema::{ApiType, ComplexType};
use crate::session::Session;
use crate::table::{TableFields, DEFAULT_APPLIES_TO};
use log::trace;

/// Name and documentation link given to an anonymous table type found at some position
/// inside a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameContext {
    pub name: String,
    pub link: String,
}

impl NameContext {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }

    /// `Owner.member`, the context of a field, attribute or parameter.
    pub fn member(owner: &str, member: &str, link: &str) -> Self {
        Self::new(format!("{owner}.{member}"), link)
    }

    /// `Class.method_param`, the table taken by a table-taking method.
    pub fn method_param(class: &str, method: &str, link: &str) -> Self {
        Self::new(format!("{class}.{method}_param"), link)
    }

    pub fn method_return(class: &str, method: &str, link: &str) -> Self {
        Self::new(format!("{class}.{method}_return"), link)
    }

    pub fn method_vararg(class: &str, method: &str, link: &str) -> Self {
        Self::new(format!("{class}.{method}_vararg"), link)
    }

    /// `Concept_elem`, the element of a table-or-array concept.
    pub fn element(concept: &str, link: &str) -> Self {
        Self::new(format!("{concept}_elem"), link)
    }

    pub fn key(&self) -> Self {
        self.suffixed("_key")
    }

    pub fn value(&self) -> Self {
        self.suffixed("_value")
    }

    /// Alternative `i` (0-based) of a variant.
    pub fn variant(&self, i: usize) -> Self {
        self.suffixed(&format!(".{i}"))
    }

    /// Parameter `n` (1-based) of a function type.
    pub fn param(&self, n: usize) -> Self {
        self.suffixed(&format!("_param{n}"))
    }

    fn suffixed(&self, suffix: &str) -> Self {
        Self::new(format!("{}{suffix}", self.name), self.link.clone())
    }
}

impl Generator<'_> {
    /// Formats a type. A missing type is `any`. Anonymous tables are declared into the
    /// session's deferred buffer under the context name, at most once per name.
    ///
    /// `with_links` links the outermost name only; nested types stay plain.
    pub(crate) fn format_type(
        &self,
        session: &mut Session,
        ty: Option<&ApiType>,
        context: &NameContext,
        with_links: bool,
    ) -> Result<String, GeneratorError> {
        let Some(ty) = ty else {
            return Ok("any".to_string());
        };
        let complex = match ty {
            ApiType::Named(name) => return self.format_named(session, name, with_links),
            ApiType::Complex(complex) => complex.as_ref(),
        };

        let formatted = match complex {
            ComplexType::Array { value } => {
                format!("{}[]", self.format_type(session, Some(value), context, false)?)
            }
            ComplexType::Dictionary { key, value } => format!(
                "{}<{},{}>",
                self.wrap("table", with_links)?,
                self.format_type(session, Some(key), &context.key(), false)?,
                self.format_type(session, Some(value), &context.value(), false)?
            ),
            ComplexType::Variant { options } => options
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    self.format_type(session, Some(option), &context.variant(i), false)
                })
                .collect::<Result<Vec<_>, _>>()?
                .join("|"),
            ComplexType::LazyLoaded { value } => format!(
                "{}<{},nil>",
                self.wrap("LuaLazyLoadedValue", with_links)?,
                self.format_type(session, Some(value), context, false)?
            ),
            ComplexType::CustomTable { key, value } => format!(
                "{}<{},{}>",
                self.wrap("LuaCustomTable", with_links)?,
                self.format_type(session, Some(key), &context.key(), false)?,
                self.format_type(session, Some(value), &context.value(), false)?
            ),
            ComplexType::Table(shape) => {
                if !session.claim(&context.name) {
                    return Ok(context.name.clone());
                }
                trace!("synthesizing table type {}", context.name);
                let mut declaration = String::new();
                self.emit_table(
                    &mut declaration,
                    session,
                    TableFields::of(shape),
                    context,
                    &context.link,
                    DEFAULT_APPLIES_TO,
                )?;
                declaration.push('\n');
                session.defer(&declaration);
                context.name.clone()
            }
            ComplexType::Function { parameters } => {
                let params = parameters
                    .iter()
                    .enumerate()
                    .map(|(i, param)| {
                        let n = i + 1;
                        self.format_type(session, Some(param), &context.param(n), false)
                            .map(|ty| format!("param{n}:{ty}"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                format!("fun({})", params.join(","))
            }
        };
        Ok(formatted)
    }

    /// A table-or-array concept is both its own name and `table<int, element>`; the
    /// consumer checks both.
    fn format_named(
        &self,
        session: &mut Session,
        name: &str,
        with_links: bool,
    ) -> Result<String, GeneratorError> {
        let Some(element) = self.index.table_or_array_elements.get(name).copied() else {
            return self.wrap(name, with_links);
        };
        let context = NameContext::element(name, &self.resolver().view_documentation(name)?);
        let element = self.format_type(session, Some(element), &context, false)?;
        Ok(format!(
            "{}<{},{element}>",
            self.wrap(name, with_links)?,
            self.wrap("int", with_links)?
        ))
    }

    fn wrap(&self, name: &str, with_links: bool) -> Result<String, GeneratorError> {
        if with_links {
            Ok(self.resolver().resolve(name, None)?)
        } else {
            Ok(name.to_string())
        }
    }
}
