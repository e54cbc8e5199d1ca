//! Precompiled recognizers for block and inline constructs.
//!
//! Compiled once on first use and shared read-only by every render.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed literals covered by the tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Opening or closing code fence, capturing the info string
pub static FENCE: Lazy<Regex> = Lazy::new(|| compile(r"^`{3,}(.*)$"));

/// ATX heading: `#`..`######` followed by a space
pub static ATX_HEADING: Lazy<Regex> = Lazy::new(|| compile(r"^(#{1,6}) (.*)$"));

/// Bullet item carrying a checkbox
pub static TASK_ITEM: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*[-*+]\s+\[([ xX])\](?:\s+(.*))?$"));

pub static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| compile(r"^\s*[-*+] (.*)$"));

pub static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| compile(r"^\s*\d+\.\s+(.*)$"));

pub static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*> (.*)$"));

/// Backslash escape of a reserved punctuation character
pub static ESCAPE: Lazy<Regex> = Lazy::new(|| compile(r"\\([\\`*_{}\[\]()#+\-.!])"));

pub static IMAGE: Lazy<Regex> = Lazy::new(|| compile(r"!\[(.*?)\]\((.*?)\)"));

/// Link followed by the `{_blank}` marker
pub static LINK_TARGET_BLANK: Lazy<Regex> =
    Lazy::new(|| compile(r"\[(.*?)\]\((.*?)\)\{_blank\}"));

pub static LINK: Lazy<Regex> = Lazy::new(|| compile(r"\[(.*?)\]\((.*?)\)"));

/// Angle-bracket URL, raw or already neutralized to `&lt;`/`&gt;`
pub static AUTOLINK: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:<|&lt;)(https?://[^\s<>]+?)(?:>|&gt;)"));

/// Character reference at the start of the haystack
pub static ENTITY: Lazy<Regex> = Lazy::new(|| {
    compile(r"^&(?:[A-Za-z][A-Za-z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6});")
});

/// Placeholder token; see [`crate::placeholder`]
pub static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| compile("\u{E000}([0-9]+)\u{E001}"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for pattern in [
            &FENCE,
            &ATX_HEADING,
            &TASK_ITEM,
            &UNORDERED_ITEM,
            &ORDERED_ITEM,
            &BLOCKQUOTE,
            &ESCAPE,
            &IMAGE,
            &LINK_TARGET_BLANK,
            &LINK,
            &AUTOLINK,
            &ENTITY,
            &PLACEHOLDER,
        ] {
            Lazy::force(pattern);
        }
    }

    #[test]
    fn test_fence_info() {
        let caps = FENCE.captures("```rust").unwrap();
        assert_eq!(&caps[1], "rust");
        assert!(FENCE.is_match("````"));
        assert!(!FENCE.is_match("``"));
    }

    #[test]
    fn test_task_item() {
        let caps = TASK_ITEM.captures("- [x] done").unwrap();
        assert_eq!(&caps[1], "x");
        assert_eq!(caps.get(2).map(|m| m.as_str()), Some("done"));
        assert!(TASK_ITEM.is_match("* [ ]"));
    }

    #[test]
    fn test_entity() {
        assert!(ENTITY.is_match("&amp; rest"));
        assert!(ENTITY.is_match("&#39;"));
        assert!(ENTITY.is_match("&#x1F600;"));
        assert!(!ENTITY.is_match("& amp;"));
        assert!(!ENTITY.is_match("&amp"));
    }

    #[test]
    fn test_autolink_entity_form() {
        let caps = AUTOLINK.captures("go &lt;https://a.com&gt; now").unwrap();
        assert_eq!(&caps[1], "https://a.com");
    }
}
