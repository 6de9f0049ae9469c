//! Resolution of symbolic cross-references to documentation links.

use crate::error::EmitError;
use crate::index::Index;
use regex::Regex;
use std::sync::LazyLock;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?)\]\((.+?)\)").expect("valid link regex"));
static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("valid url regex"));
static HTML_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.html($|#)").expect("valid page regex"));

pub const VIEW_DOCUMENTATION: &str = "View documentation";
const FILTERS_SUFFIX: &str = "Filters";
const EVENT_FILTER_PREFIX: &str = "Lua";

pub struct Resolver<'a> {
    index: &'a Index<'a>,
    base_url: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a Index<'a>, base_url: &'a str) -> Self {
        Self { index, base_url }
    }

    /// Returns the documentation page (relative to the base URL) for a reference.
    ///
    /// # Errors
    /// Returns `EmitError::UnresolvedReference` if the reference names nothing known.
    pub fn relative_link(&self, reference: &str) -> Result<String, EmitError> {
        let index = self.index;
        if index.builtins.contains_key(reference) {
            return Ok(format!("Builtin-Types.html#{reference}"));
        }
        if index.classes.contains_key(reference) {
            return Ok(format!("{reference}.html"));
        }
        if index.events.contains_key(reference) {
            return Ok(format!("events.html#{reference}"));
        }
        if index.defines.contains(reference) {
            return Ok(format!("defines.html#{reference}"));
        }
        if let Some((owner, member)) = reference.split_once("::") {
            let page = if index.classes.contains_key(owner) {
                owner
            } else if index.concepts.contains_key(owner) {
                "Concepts"
            } else {
                return Err(unresolved(reference));
            };
            return Ok(format!("{page}.html#{owner}.{member}"));
        }
        if reference.ends_with(FILTERS_SUFFIX) {
            if reference.starts_with(EVENT_FILTER_PREFIX) {
                return Ok(format!("Event-Filters.html#{reference}"));
            }
            if index.concepts.contains_key(reference) {
                return Ok(format!("Concepts.html#{reference}"));
            }
            return Err(unresolved(reference));
        }
        if index.concepts.contains_key(reference) {
            return Ok(format!("Concepts.html#{reference}"));
        }
        Err(unresolved(reference))
    }

    /// # Errors
    /// See [`Resolver::relative_link`].
    pub fn resolve_url(&self, reference: &str) -> Result<String, EmitError> {
        Ok(format!("{}{}", self.base_url, self.relative_link(reference)?))
    }

    /// Resolves a reference into a markdown link, labelled with the reference itself unless
    /// a display text is given.
    ///
    /// # Errors
    /// See [`Resolver::relative_link`].
    pub fn resolve(&self, reference: &str, display: Option<&str>) -> Result<String, EmitError> {
        let url = self.resolve_url(reference)?;
        Ok(format!("[{}]({url})", display.unwrap_or(reference)))
    }

    /// # Errors
    /// See [`Resolver::relative_link`].
    pub fn view_documentation(&self, reference: &str) -> Result<String, EmitError> {
        self.resolve(reference, Some(VIEW_DOCUMENTATION))
    }

    /// Rewrites every markdown link in `text` so that it points at the online documentation.
    ///
    /// # Errors
    /// Returns `EmitError::UnresolvedReference` for a symbolic link target that does not
    /// resolve.
    pub fn resolve_all_links(&self, text: &str) -> Result<String, EmitError> {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for caps in MARKDOWN_LINK.captures_iter(text) {
            let (Some(whole), Some(display), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            result.push_str(&text[last..whole.start()]);
            let (display, target) = (display.as_str(), target.as_str());
            if ABSOLUTE_URL.is_match(target) {
                result.push_str(whole.as_str());
            } else if HTML_PAGE.is_match(target) {
                result.push_str(&format!("[{display}]({}{target})", self.base_url));
            } else {
                result.push_str(&self.resolve(target, Some(display))?);
            }
            last = whole.end();
        }
        result.push_str(&text[last..]);
        Ok(result)
    }
}

fn unresolved(reference: &str) -> EmitError {
    EmitError::UnresolvedReference {
        reference: reference.to_string(),
    }
}
