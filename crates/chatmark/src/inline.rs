//! Inline Markdown to HTML.
//!
//! Stages run in a fixed order over the output of the previous one:
//! backslash escapes, neutralization of `& < >`, images, target-blank links,
//! links, autolinks, code spans, then strong/emphasis/strikethrough. Every
//! fragment a stage produces is parked in the [`Placeholders`] table, so
//! later stages only ever see plain text and opaque tokens. Tokens are
//! swapped back in as the very last step.

use regex::{Captures, Regex};

use crate::options::RenderOptions;
use crate::patterns::{AUTOLINK, ESCAPE, IMAGE, LINK, LINK_TARGET_BLANK};
use crate::placeholder::Placeholders;
use crate::utilities::{escape_attribute, escape_html, normalize};

const LINE_BREAK: &str = "<br />\n";

/// Delimited formats, applied in this order
const FORMATS: &[Format] = &[
    Format { delimiter: "**", tag: "strong", guarded: true },
    Format { delimiter: "__", tag: "strong", guarded: true },
    Format { delimiter: "*", tag: "em", guarded: true },
    Format { delimiter: "_", tag: "em", guarded: true },
    Format { delimiter: "~~", tag: "del", guarded: false },
];

struct Format {
    delimiter: &'static str,
    tag: &'static str,
    /// Refuse delimiters touching a word character on the outside
    guarded: bool,
}

/// Render one inline span with default options
pub fn render_inline(text: &str) -> String {
    InlineRenderer::new(&RenderOptions::default()).render(&normalize(text))
}

/// Single-use inline renderer owning the placeholder table of one span.
pub struct InlineRenderer<'o> {
    options: &'o RenderOptions,
    placeholders: Placeholders,
}

impl<'o> InlineRenderer<'o> {
    pub fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            placeholders: Placeholders::new(),
        }
    }

    /// Token for a hard line break, to be embedded in the text passed to
    /// [`render`](Self::render)
    pub fn line_break(&mut self) -> String {
        self.placeholders.protect(LINE_BREAK)
    }

    /// Run the full pipeline over `text`
    pub fn render(mut self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let unescaped = self.replace(&ESCAPE, text, |this, caps| {
            this.placeholders.protect(&caps[1])
        });
        let neutralized = escape_html(&unescaped);
        let transformed = self.transform(&neutralized, 0);
        let html = self.placeholders.resolve(&transformed);

        debug_assert_eq!(self.placeholders.pending(), 0);
        html
    }

    /// Stages after neutralization. Also used for link text, which must
    /// not be escaped a second time.
    fn transform(&mut self, text: &str, depth: usize) -> String {
        if depth > self.options.max_nesting {
            log::debug!("inline nesting limit {} reached", self.options.max_nesting);
            return text.to_string();
        }

        let text = self.replace(&IMAGE, text, |this, caps| {
            let alt = this.attribute(&caps[1]);
            let url = this.attribute(&caps[2]);
            this.placeholders
                .protect(&format!(r#"<img src="{url}" alt="{alt}" title="{alt}"/>"#))
        });

        let text = self.replace(&LINK_TARGET_BLANK, &text, |this, caps| {
            let content = this.transform(&caps[1], depth + 1);
            let url = this.attribute(&caps[2]);
            this.placeholders.protect(&format!(
                r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{content}</a>"#
            ))
        });

        let text = self.replace(&LINK, &text, |this, caps| {
            let content = this.transform(&caps[1], depth + 1);
            let url = this.attribute(&caps[2]);
            this.placeholders
                .protect(&format!(r#"<a href="{url}">{content}</a>"#))
        });

        let text = self.replace(&AUTOLINK, &text, |this, caps| {
            let url = escape_html(&this.placeholders.resolve(&caps[1]));
            let href = escape_attribute(&url);
            this.placeholders
                .protect(&format!(r#"<a href="{href}">{url}</a>"#))
        });

        let text = self.code_spans(&text);
        self.format(&text, depth)
    }

    /// Attribute value from captured text. Tokens are resolved here so a
    /// value used twice (alt and title) carries them both times; a hard
    /// break becomes a space.
    fn attribute(&mut self, raw: &str) -> String {
        let value = self.placeholders.resolve(raw).replace(LINE_BREAK, " ");
        escape_attribute(&escape_html(&value))
    }

    /// `regex.replace_all` with access to the renderer inside the closure
    fn replace<F>(&mut self, regex: &Regex, text: &str, mut replacement: F) -> String
    where
        F: FnMut(&mut Self, &Captures) -> String,
    {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;

        for caps in regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            result.push_str(&text[last..whole.start()]);
            result.push_str(&replacement(self, &caps));
            last = whole.end();
        }

        result.push_str(&text[last..]);
        result
    }

    /// Backtick-delimited code spans; a run of n backticks closes only on
    /// the next run of exactly n.
    fn code_spans(&mut self, text: &str) -> String {
        if !text.contains('`') {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        // run lengths already known to have no closer further on
        let mut unclosed: Vec<usize> = Vec::new();

        while let Some(open) = rest.find('`') {
            let run = backtick_run(&rest[open..]);
            let after = &rest[open + run..];

            let close = if unclosed.contains(&run) {
                None
            } else {
                find_closing_run(after, run)
            };
            match close {
                Some(close) => {
                    result.push_str(&rest[..open]);
                    let code = &after[..close];
                    result.push_str(&self.placeholders.protect(&format!("<code>{code}</code>")));
                    rest = &after[close + run..];
                }
                None => {
                    if !unclosed.contains(&run) {
                        unclosed.push(run);
                    }
                    result.push_str(&rest[..open + run]);
                    rest = after;
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// Strong, emphasis and strikethrough passes
    fn format(&mut self, text: &str, depth: usize) -> String {
        let mut text = text.to_string();
        for format in FORMATS {
            if text.contains(format.delimiter) {
                text = self.format_pass(&text, format, depth);
            }
        }
        text
    }

    fn format_pass(&mut self, text: &str, format: &Format, depth: usize) -> String {
        let delimiter = format.delimiter;
        let mut result = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;

        while i < text.len() {
            if text[i..].starts_with(delimiter) && opens(text, i, format) {
                let content_start = i + delimiter.len();
                let Some(close) = find_closer(text, content_start, format) else {
                    // closers depend only on position, so no later opener
                    // can find one either
                    break;
                };
                result.push_str(&text[copied..i]);

                let content = &text[content_start..close];
                let inner = if depth < self.options.max_nesting {
                    self.format(content, depth + 1)
                } else {
                    log::debug!("inline nesting limit {} reached", self.options.max_nesting);
                    content.to_string()
                };
                let tag = format.tag;
                result.push_str(&self.placeholders.protect(&format!("<{tag}>{inner}</{tag}>")));

                i = close + delimiter.len();
                copied = i;
                continue;
            }
            i += text[i..].chars().next().map_or(1, char::len_utf8);
        }

        result.push_str(&text[copied..]);
        result
    }
}

fn backtick_run(text: &str) -> usize {
    text.bytes().take_while(|&b| b == b'`').count()
}

/// Offset of the next backtick run of exactly `len`
fn find_closing_run(text: &str, len: usize) -> Option<usize> {
    let mut offset = 0;
    while let Some(found) = text[offset..].find('`') {
        let start = offset + found;
        let run = backtick_run(&text[start..]);
        if run == len {
            return Some(start);
        }
        offset = start + run;
    }
    None
}

fn delimiter_char(format: &Format) -> char {
    format.delimiter.chars().next().unwrap_or('*')
}

/// Strong delimiters may wrap a single inner mark, as in `***both***`
fn wraps_inner(format: &Format) -> bool {
    format.guarded && format.delimiter.len() == 2
}

fn opens(text: &str, at: usize, format: &Format) -> bool {
    let mark = delimiter_char(format);
    let before = text[..at].chars().next_back();
    let mut rest = text[at + format.delimiter.len()..].chars();

    let Some(mut after) = rest.next() else {
        return false;
    };
    if after == mark && wraps_inner(format) {
        let Some(next) = rest.next() else {
            return false;
        };
        after = next;
    }
    if after.is_whitespace() || after == mark || before == Some(mark) {
        return false;
    }
    !(format.guarded && before.is_some_and(char::is_alphanumeric))
}

fn closes(text: &str, at: usize, format: &Format) -> bool {
    let mark = delimiter_char(format);
    let mut prior = text[..at].chars().rev();
    let after = text[at + format.delimiter.len()..].chars().next();

    let Some(mut before) = prior.next() else {
        return false;
    };
    if before == mark && wraps_inner(format) {
        let Some(previous) = prior.next() else {
            return false;
        };
        before = previous;
    }
    if before.is_whitespace() || before == mark || after == Some(mark) {
        return false;
    }
    !(format.guarded && after.is_some_and(char::is_alphanumeric))
}

/// First valid closing delimiter leaving a non-empty span
fn find_closer(text: &str, content_start: usize, format: &Format) -> Option<usize> {
    let mut offset = content_start;
    while let Some(found) = text[offset..].find(format.delimiter) {
        let at = offset + found;
        if at > content_start && closes(text, at, format) {
            return Some(at);
        }
        offset = at + text[at..].chars().next().map_or(1, char::len_utf8);
    }
    None
}
