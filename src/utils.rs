use crate::schema::Ordered;

const LUA_KEYWORDS: [&str; 22] = [
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
    "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Converts a 1-based line and column, as reported by `serde_json`, into a byte offset
/// into the source text. Positions past the end clamp to the source length.
pub fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 1..line {
        match source[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return source.len(),
        }
    }
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Wraps `text` with `pre` and `post`, or returns an empty string when `text` is empty.
pub fn affix(pre: &str, text: &str, post: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{pre}{text}{post}")
    }
}

pub fn escape_lua_keyword(name: &str) -> String {
    if LUA_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Turns an arbitrary name into a valid Lua identifier.
pub fn to_lua_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    escape_lua_keyword(&ident)
}

/// Returns the items ordered by their `order` key. The sort is stable, so equal keys keep
/// their document order.
pub fn sorted_by_order<T: Ordered>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.order());
    sorted
}

/// Joins names as `a, b or c`.
pub fn or_list(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}
