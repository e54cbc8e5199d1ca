//! Escaping and normalization helpers shared by the renderers.

use crate::patterns::ENTITY;
use crate::placeholder::{TOKEN_END, TOKEN_START};

/// Neutralize `&`, `<` and `>` in inline text.
///
/// An `&` that already begins a character reference is kept, so text that
/// has been through this function once comes back unchanged.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for (i, c) in text.char_indices() {
        match c {
            '&' if ENTITY.is_match(&text[i..]) => result.push('&'),
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    result
}

/// Encode already-neutralized text for a double-quoted attribute value
pub fn escape_attribute(text: &str) -> String {
    text.replace('"', "&quot;")
}

/// Escape a raw code block line; every metacharacter is encoded
pub fn escape_code(line: &str) -> String {
    html_escape::encode_text(line).into_owned()
}

/// Collapse CRLF and lone CR to LF and drop placeholder delimiters
pub fn normalize(markdown: &str) -> String {
    markdown
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace([TOKEN_START, TOKEN_END], "")
}
