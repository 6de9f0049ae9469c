//! Assembly of the annotation stub file.

use crate::api::GeneratedStubs;
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::index::Index;
use crate::resolver::Resolver;
use crate::schema::Document;
use crate::session::Session;
use log::debug;

const HEADER: &str = "---@meta\n---@diagnostic disable\n";

/// Turns a validated [`Document`] into annotation stubs.
///
/// The generator itself is immutable; every call to [`Generator::generate`] runs in a
/// fresh [`Session`], so repeated runs produce identical output.
pub struct Generator<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) index: Index<'a>,
    pub(crate) config: &'a GeneratorConfig,
    appendix: &'a str,
}

impl<'a> Generator<'a> {
    /// # Errors
    /// Returns a `SchemaError` if the document cannot be indexed.
    pub fn new(doc: &'a Document, config: &'a GeneratorConfig) -> Result<Self, GeneratorError> {
        Ok(Self {
            doc,
            index: Index::build(doc)?,
            config,
            appendix: "",
        })
    }

    /// Hand-written annotations emitted verbatim after the concepts.
    #[must_use]
    pub fn with_appendix(mut self, appendix: &'a str) -> Self {
        self.appendix = appendix;
        self
    }

    pub(crate) fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.index, &self.config.doc_base_url)
    }

    /// Generates the whole stub file.
    ///
    /// # Errors
    /// Returns an `EmitError` for an unknown operator or an unresolved reference. No
    /// output is produced in that case.
    pub fn generate(&self) -> Result<GeneratedStubs, GeneratorError> {
        let mut session = Session::new();
        let mut out = String::new();

        out.push_str(HEADER);
        out.push('\n');

        debug!("emitting {} builtins", self.doc.builtin_types.len());
        self.emit_builtins(&mut out)?;
        out.push('\n');

        debug!("emitting defines");
        self.emit_defines(&mut out)?;
        out.push('\n');

        debug!("emitting {} events", self.doc.events.len());
        self.emit_events(&mut out, &mut session)?;
        out.push('\n');

        debug!("emitting {} classes", self.doc.classes.len());
        self.emit_classes(&mut out, &mut session)?;
        out.push('\n');

        debug!("emitting {} concepts", self.doc.concepts.len());
        self.emit_concepts(&mut out, &mut session)?;
        out.push('\n');

        out.push_str(self.appendix);
        out.push('\n');

        let (deferred, synthesized) = session.finish();
        debug!("emitting {} synthesized table types", synthesized.len());
        out.push_str(&deferred);
        out.push('\n');

        Ok(GeneratedStubs {
            text: out,
            synthesized,
        })
    }
}
