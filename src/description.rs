//! Assembly and rendering of documentation comment blocks.
//!
//! Descriptions are markdown. The annotation consumer joins consecutive lines into one
//! paragraph, so every single line break in prose is turned into a hard break; fenced
//! code is left alone.

use crate::error::EmitError;
use crate::resolver::Resolver;
use crate::schema::Documentation;
use crate::utils::or_list;
use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid fence regex"));

pub const COMMENT_PREFIX: &str = "---";

/// Joins the documentation of an entity into one markdown text.
///
/// The parts, in order and skipping empty ones: the description (or `description`
/// when given), notes, the documentation link, examples, the subclass restriction and
/// the resolved "see also" list.
///
/// # Errors
/// Returns `EmitError::UnresolvedReference` if a "see also" entry does not resolve.
pub fn entire(
    resolver: &Resolver<'_>,
    doc: &Documentation,
    link: &str,
    description: Option<&str>,
) -> Result<String, EmitError> {
    let notes = doc
        .notes
        .iter()
        .map(|note| format!("**Note:** {note}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let examples = doc
        .examples
        .iter()
        .map(|example| format!("### Example\n{example}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let restriction = if doc.subclasses.is_empty() {
        String::new()
    } else {
        format!("_Can only be used if this is {}_", or_list(&doc.subclasses))
    };
    let see_also = if doc.see_also.is_empty() {
        String::new()
    } else {
        let entries = doc
            .see_also
            .iter()
            .map(|reference| resolver.resolve(reference, None).map(|l| format!("- {l}")))
            .collect::<Result<Vec<_>, _>>()?;
        format!("### See also\n{}", entries.join("\n"))
    };

    let parts: [&str; 6] = [
        description.unwrap_or(&doc.description),
        &notes,
        link,
        &examples,
        &restriction,
        &see_also,
    ];
    Ok(parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// Turns every line break that is neither preceded nor followed by another line break
/// into a markdown hard break.
pub fn hard_breaks(prose: &str) -> String {
    let chars: Vec<char> = prose.chars().collect();
    let mut result = String::with_capacity(prose.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '\n'
            && i > 0
            && chars[i - 1] != '\n'
            && chars.get(i + 1).is_some_and(|&next| next != '\n')
        {
            result.push_str("  ");
        }
        result.push(c);
    }
    result
}

/// Applies hard breaks and link resolution to the prose of `text`, passing fenced code
/// through verbatim.
///
/// # Errors
/// Returns `EmitError::UnresolvedReference` for a link that does not resolve.
pub fn preprocess(resolver: &Resolver<'_>, text: &str) -> Result<String, EmitError> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for fence in CODE_FENCE.find_iter(text) {
        result.push_str(&resolver.resolve_all_links(&hard_breaks(&text[last..fence.start()]))?);
        result.push_str(fence.as_str());
        last = fence.end();
    }
    result.push_str(&resolver.resolve_all_links(&hard_breaks(&text[last..]))?);
    Ok(result)
}

/// Renders `text` as annotation comment lines. Empty text renders nothing.
///
/// # Errors
/// See [`preprocess`].
pub fn to_comment(resolver: &Resolver<'_>, text: &str) -> Result<String, EmitError> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let mut comment = String::new();
    for line in preprocess(resolver, text)?.split('\n') {
        comment.push_str(COMMENT_PREFIX);
        comment.push_str(line);
        comment.push('\n');
    }
    Ok(comment)
}
