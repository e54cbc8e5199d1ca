//! Line classification for the block renderer.

use crate::patterns::{ATX_HEADING, BLOCKQUOTE, FENCE, ORDERED_ITEM, TASK_ITEM, UNORDERED_ITEM};

/// Block-level meaning of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Code fence delimiter with its language token (possibly empty)
    Fence { language: &'a str },
    Blank,
    TableRow,
    /// Underline turning the preceding paragraph into a heading
    SetextUnderline { level: u8 },
    Heading { level: u8, text: &'a str },
    Rule,
    TaskItem { checked: bool, text: &'a str },
    UnorderedItem { text: &'a str },
    OrderedItem { text: &'a str },
    Quote { text: &'a str },
    /// Plain paragraph text
    Text,
}

impl LineKind<'_> {
    /// Lines that end a running paragraph
    pub fn is_special(&self) -> bool {
        !matches!(self, LineKind::Blank | LineKind::Text)
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            LineKind::TaskItem { .. } | LineKind::UnorderedItem { .. } | LineKind::OrderedItem { .. }
        )
    }
}

/// Classify `line`, given the raw line before it (if any).
///
/// The first matching rule wins, in this order: fence, blank, table row,
/// setext underline, ATX heading, horizontal rule, task item, unordered
/// item, ordered item, blockquote, paragraph text.
pub fn classify<'a>(line: &'a str, previous: Option<&str>) -> LineKind<'a> {
    if let Some(caps) = FENCE.captures(line) {
        let info = caps.get(1).map_or("", |m| m.as_str());
        let language = info.split_whitespace().next().unwrap_or("");
        return LineKind::Fence { language };
    }

    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if is_table_row(line) {
        return LineKind::TableRow;
    }

    if let Some(level) = setext_level(line) {
        if previous.is_some_and(|prev| classify(prev, None) == LineKind::Text) {
            return LineKind::SetextUnderline { level };
        }
    }

    if let Some(caps) = ATX_HEADING.captures(line) {
        let level = caps[1].len() as u8;
        let text = caps.get(2).map_or("", |m| m.as_str());
        return LineKind::Heading { level, text };
    }

    if is_horizontal_rule(line) {
        return LineKind::Rule;
    }

    if let Some(caps) = TASK_ITEM.captures(line) {
        let checked = caps[1].eq_ignore_ascii_case("x");
        let text = caps.get(2).map_or("", |m| m.as_str());
        return LineKind::TaskItem { checked, text };
    }

    if let Some(caps) = UNORDERED_ITEM.captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::UnorderedItem { text };
    }

    if let Some(caps) = ORDERED_ITEM.captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::OrderedItem { text };
    }

    if let Some(caps) = BLOCKQUOTE.captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::Quote { text };
    }

    LineKind::Text
}

/// A table row carries at least two column delimiters
pub fn is_table_row(line: &str) -> bool {
    line.matches('|').take(2).count() == 2
}

fn setext_level(line: &str) -> Option<u8> {
    let trimmed = line.trim();
    if trimmed.len() < 3 {
        return None;
    }
    if trimmed.bytes().all(|b| b == b'=') {
        Some(1)
    } else if trimmed.bytes().all(|b| b == b'-') {
        Some(2)
    } else {
        None
    }
}

/// Three or more of the same rule character, spaces ignored
pub fn is_horizontal_rule(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }

    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}
