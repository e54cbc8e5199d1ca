//! Side table shielding finished HTML fragments from later inline passes.
//!
//! A fragment is swapped for an opaque token made of private-use delimiters
//! around its index. Tokens contain no Markdown punctuation, so no pattern
//! can match inside one. Input is stripped of the delimiters before
//! rendering, which keeps every token in the text one we issued.

use regex::Captures;

use crate::patterns::PLACEHOLDER;

pub const TOKEN_START: char = '\u{E000}';
pub const TOKEN_END: char = '\u{E001}';

/// Per-render placeholder map. Each fragment is handed out exactly once.
#[derive(Debug, Default)]
pub struct Placeholders {
    fragments: Vec<Option<String>>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fragment and return the token standing in for it.
    ///
    /// Tokens nested inside `fragment` are resolved first.
    pub fn protect(&mut self, fragment: &str) -> String {
        let resolved = self.resolve(fragment);
        let index = self.fragments.len();
        self.fragments.push(Some(resolved));
        format!("{TOKEN_START}{index}{TOKEN_END}")
    }

    /// Replace every token in `text` with its fragment
    pub fn resolve(&mut self, text: &str) -> String {
        if !text.contains(TOKEN_START) {
            return text.to_string();
        }

        PLACEHOLDER
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.fragments.get_mut(index))
                    .and_then(Option::take)
                    .unwrap_or_default()
            })
            .into_owned()
    }

    /// Number of fragments not yet resolved
    pub fn pending(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protect_and_resolve() {
        let mut placeholders = Placeholders::new();
        let token = placeholders.protect("<br />");
        assert!(!token.contains('<'));

        let text = format!("a{token}b");
        assert_eq!(placeholders.resolve(&text), "a<br />b");
        assert_eq!(placeholders.pending(), 0);
    }

    #[test]
    fn test_resolved_once() {
        let mut placeholders = Placeholders::new();
        let token = placeholders.protect("x");
        let text = format!("{token}{token}");
        assert_eq!(placeholders.resolve(&text), "x");
    }

    #[test]
    fn test_nested_tokens_resolve_eagerly() {
        let mut placeholders = Placeholders::new();
        let inner = placeholders.protect("*");
        let outer = placeholders.protect(&format!("<em>{inner}</em>"));
        assert_eq!(placeholders.pending(), 1);
        assert_eq!(placeholders.resolve(&outer), "<em>*</em>");
        assert_eq!(placeholders.pending(), 0);
    }
}
