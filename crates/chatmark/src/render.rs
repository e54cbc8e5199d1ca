//! Block-level rendering: walks the document line by line.
//!
//! All bookkeeping lives in a [`BlockRenderer`] built for a single call.
//! Open blocks are closed in a fixed order (list, blockquote, table, code
//! fence) by [`BlockRenderer::finish`], which runs after the line loop no
//! matter how the input ends.

use crate::classify::{classify, is_horizontal_rule, LineKind};
use crate::inline::InlineRenderer;
use crate::options::RenderOptions;
use crate::table::render_table_with;
use crate::utilities::{escape_attribute, escape_code, normalize};

/// Render a whole Markdown document
pub fn render_document(markdown: &str, options: &RenderOptions) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let document = normalize(markdown);
    let lines: Vec<&str> = document.split('\n').collect();
    log::debug!("rendering {} lines", lines.len());

    let mut renderer = BlockRenderer::new(&lines, options);
    renderer.run();
    renderer.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
    Task,
}

impl ListKind {
    fn open_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "<ul>",
            ListKind::Ordered => "<ol>",
            ListKind::Task => r#"<ul class="task-list">"#,
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "</ol>",
            ListKind::Unordered | ListKind::Task => "</ul>",
        }
    }
}

/// Append-only HTML with a one-step undo for the latest paragraph
#[derive(Debug, Default)]
struct Output {
    html: String,
    /// Byte offset and source line span of the paragraph just pushed
    last_paragraph: Option<(usize, Lines)>,
}

/// First and last source line of a paragraph
type Lines = (usize, usize);

impl Output {
    fn line(&mut self, fragment: &str) {
        self.html.push_str(fragment);
        self.html.push('\n');
        self.last_paragraph = None;
    }

    fn raw(&mut self, fragment: &str) {
        self.html.push_str(fragment);
        self.last_paragraph = None;
    }

    fn paragraph(&mut self, content: &str, lines: Lines) {
        let start = self.html.len();
        self.html.push_str("<p>");
        self.html.push_str(content);
        self.html.push_str("</p>\n");
        self.last_paragraph = Some((start, lines));
    }

    /// Remove the paragraph pushed last, returning the lines it came from
    fn take_paragraph(&mut self) -> Option<Lines> {
        let (start, lines) = self.last_paragraph.take()?;
        self.html.truncate(start);
        Some(lines)
    }
}

struct BlockRenderer<'a> {
    lines: &'a [&'a str],
    options: &'a RenderOptions,
    out: Output,
    pos: usize,
    in_code: bool,
    list: Option<ListKind>,
    in_quote: bool,
    table: Vec<&'a str>,
}

impl<'a> BlockRenderer<'a> {
    fn new(lines: &'a [&'a str], options: &'a RenderOptions) -> Self {
        Self {
            lines,
            options,
            out: Output::default(),
            pos: 0,
            in_code: false,
            list: None,
            in_quote: false,
            table: Vec::new(),
        }
    }

    fn inline(&self, text: &str) -> String {
        InlineRenderer::new(self.options).render(text)
    }

    fn previous(&self) -> Option<&'a str> {
        self.pos.checked_sub(1).map(|i| self.lines[i])
    }

    fn run(&mut self) {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let kind = classify(line, self.previous());
            log::trace!("line {}: {:?}", self.pos + 1, kind);

            if self.in_code {
                match kind {
                    LineKind::Fence { .. } => {
                        self.out.line("</code></pre>");
                        self.in_code = false;
                    }
                    _ => self.out.line(&escape_code(line)),
                }
                self.pos += 1;
                continue;
            }

            if kind != LineKind::TableRow {
                self.flush_table();
            }

            match kind {
                LineKind::Fence { language } => {
                    self.close_list();
                    self.close_quote();
                    self.out.line(&format!(
                        r#"<pre><code class="language-{}">"#,
                        escape_attribute(&escape_code(language))
                    ));
                    self.in_code = true;
                }
                LineKind::Blank => {
                    self.close_list();
                    self.close_quote();
                    if self.options.paragraph_breaks && self.paragraph_break_follows() {
                        self.out.line("<br/>");
                    }
                }
                LineKind::TableRow => {
                    self.close_list();
                    self.close_quote();
                    self.table.push(line);
                }
                LineKind::SetextUnderline { level } => self.setext(level),
                LineKind::Heading { level, text } => {
                    self.close_list();
                    self.close_quote();
                    let content = self.inline(text);
                    self.out.line(&format!("<h{level}>{content}</h{level}>"));
                }
                LineKind::Rule => self.out.line("<hr/>"),
                LineKind::TaskItem { checked, text } => {
                    self.open_list(ListKind::Task);
                    let checked = if checked { " checked" } else { "" };
                    let content = self.inline(text);
                    self.out.line(&format!(
                        r#"<li class="task-list-item"><input type="checkbox" class="task-list-item-checkbox" disabled{checked}> {content}</li>"#
                    ));
                }
                LineKind::UnorderedItem { text } => {
                    self.open_list(ListKind::Unordered);
                    let content = self.inline(text);
                    self.out.line(&format!("<li>{content}</li>"));
                }
                LineKind::OrderedItem { text } => {
                    self.open_list(ListKind::Ordered);
                    let content = self.inline(text);
                    self.out.line(&format!("<li>{content}</li>"));
                }
                LineKind::Quote { text } => {
                    self.close_list();
                    if !self.in_quote {
                        self.out.line("<blockquote>");
                        self.in_quote = true;
                    }
                    let content = self.inline(text);
                    self.out.line(&format!("<p>{content}</p>"));
                }
                LineKind::Text => {
                    self.close_list();
                    self.close_quote();
                    self.paragraph();
                }
            }

            self.pos += 1;
        }
    }

    /// Whether a blank line at `pos` gets a paragraph-break marker: only
    /// when it leads straight into non-list content.
    fn paragraph_break_follows(&self) -> bool {
        let Some(&next) = self.lines.get(self.pos + 1) else {
            return false;
        };
        let kind = classify(next, Some(self.lines[self.pos]));
        kind != LineKind::Blank && !kind.is_list_item()
    }

    /// Merge the paragraph starting at `pos` with its continuation lines,
    /// leaving `pos` on the last line consumed.
    fn paragraph(&mut self) {
        let first = self.pos;
        while let Some(&next) = self.lines.get(self.pos + 1) {
            let kind = classify(next, Some(self.lines[self.pos]));
            if kind.is_special() || kind == LineKind::Blank {
                break;
            }
            self.pos += 1;
        }

        let content = self.merge(first, self.pos);
        self.out.paragraph(&content, (first, self.pos));
    }

    /// Inline content of lines `first..=last` joined as one paragraph
    fn merge(&self, first: usize, last: usize) -> String {
        let mut inline = InlineRenderer::new(self.options);
        let mut text = String::from(self.lines[first]);

        for &line in &self.lines[first + 1..=last] {
            if text.ends_with("  ") {
                text.truncate(text.trim_end().len());
                text.push_str(&inline.line_break());
            } else {
                text.push(' ');
            }
            text.push_str(line);
        }
        text.truncate(text.trim_end().len());

        inline.render(&text)
    }

    /// Turn the line above the underline at `pos` into a heading. Earlier
    /// lines of the same paragraph stay a paragraph.
    fn setext(&mut self, level: u8) {
        let heading = self.pos - 1;
        let taken = match self.out.take_paragraph() {
            Some((first, last)) if last == heading => Some(first),
            Some((first, last)) => {
                // not the line above; put it back untouched
                let content = self.merge(first, last);
                self.out.paragraph(&content, (first, last));
                None
            }
            None => None,
        };

        let Some(first) = taken else {
            if is_horizontal_rule(self.lines[self.pos]) {
                self.out.line("<hr/>");
            } else {
                self.paragraph();
            }
            return;
        };

        if first < heading {
            let content = self.merge(first, heading - 1);
            self.out.paragraph(&content, (first, heading - 1));
        }
        let content = self.inline(self.lines[heading].trim_end());
        self.out.line(&format!("<h{level}>{content}</h{level}>"));
    }

    fn open_list(&mut self, kind: ListKind) {
        self.close_quote();
        if self.list == Some(kind) {
            return;
        }
        self.close_list();
        self.out.line(kind.open_tag());
        self.list = Some(kind);
    }

    fn close_list(&mut self) {
        if let Some(kind) = self.list.take() {
            self.out.line(kind.close_tag());
        }
    }

    fn close_quote(&mut self) {
        if self.in_quote {
            self.out.line("</blockquote>");
            self.in_quote = false;
        }
    }

    fn flush_table(&mut self) {
        if self.table.is_empty() {
            return;
        }
        if self.table.len() < 2 {
            log::debug!("dropping single pipe row at line {}", self.pos);
        }
        let html = render_table_with(&self.table, self.options);
        self.out.raw(&html);
        self.table.clear();
    }

    /// Close whatever is still open and hand back the HTML
    fn finish(mut self) -> String {
        self.close_list();
        self.close_quote();
        self.flush_table();
        if self.in_code {
            log::debug!("closing unterminated code fence at end of input");
            self.out.line("</code></pre>");
            self.in_code = false;
        }
        self.out.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        render_document(markdown, &RenderOptions::default())
    }

    #[test]
    fn test_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_output_take_paragraph() {
        let mut out = Output::default();
        out.line("<hr/>");
        out.paragraph("text", (1, 2));
        assert_eq!(out.take_paragraph(), Some((1, 2)));
        assert_eq!(out.html, "<hr/>\n");
        assert_eq!(out.take_paragraph(), None);
    }

    #[test]
    fn test_paragraph_merging() {
        assert_eq!(render("first line\nsecond line"), "<p>first line second line</p>\n");
        assert_eq!(render("line 1  \nline 2"), "<p>line 1<br />\nline 2</p>\n");
    }

    #[test]
    fn test_hard_break_per_line() {
        assert_eq!(
            render("a\nb  \nc"),
            "<p>a b<br />\nc</p>\n"
        );
    }

    #[test]
    fn test_paragraph_stops_at_special_line() {
        assert_eq!(
            render("text\n# Head"),
            "<p>text</p>\n<h1>Head</h1>\n"
        );
        assert_eq!(
            render("text\n- item"),
            "<p>text</p>\n<ul>\n<li>item</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_setext() {
        assert_eq!(render("Title\n===\n"), "<h1>Title</h1>\n");
        assert_eq!(render("Subtitle\n---\n"), "<h2>Subtitle</h2>\n");
        assert_eq!(render("one\ntwo\n==="), "<p>one</p>\n<h1>two</h1>\n");
        assert_eq!(
            render("one  \ntwo  \nthree\n---"),
            "<p>one<br />\ntwo</p>\n<h2>three</h2>\n"
        );
    }

    #[test]
    fn test_setext_without_paragraph() {
        assert_eq!(render("a\n===\n==="), "<h1>a</h1>\n<p>===</p>\n");
    }

    #[test]
    fn test_setext_dashes_after_heading_are_a_rule() {
        assert_eq!(render("Title\n===\n---"), "<h1>Title</h1>\n<hr/>\n");
        assert_eq!(render("Title\n===\n- - -"), "<h1>Title</h1>\n<hr/>\n");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            render("```rust\nlet a = 1 < 2;\n```"),
            "<pre><code class=\"language-rust\">\nlet a = 1 &lt; 2;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_is_verbatim() {
        let html = render("```\n# not a heading\n- not a list\n```");
        assert!(html.contains("# not a heading\n- not a list\n"));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn test_unterminated_fence_is_closed() {
        assert_eq!(
            render("```\ncode"),
            "<pre><code class=\"language-\">\ncode\n</code></pre>\n"
        );
    }

    #[test]
    fn test_fence_closes_open_blocks() {
        assert_eq!(
            render("- a\n```\nx\n```"),
            "<ul>\n<li>a</li>\n</ul>\n<pre><code class=\"language-\">\nx\n</code></pre>\n"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render("- item1\n- item2"),
            "<ul>\n<li>item1</li>\n<li>item2</li>\n</ul>\n"
        );
        assert_eq!(render("1. one\n2. two"), "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n");
    }

    #[test]
    fn test_switching_list_kind() {
        assert_eq!(
            render("- a\n1. b"),
            "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_task_list() {
        assert_eq!(
            render("- [x] done\n- [ ] todo"),
            "<ul class=\"task-list\">\n\
             <li class=\"task-list-item\"><input type=\"checkbox\" class=\"task-list-item-checkbox\" disabled checked> done</li>\n\
             <li class=\"task-list-item\"><input type=\"checkbox\" class=\"task-list-item-checkbox\" disabled> todo</li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(render("> quote"), "<blockquote>\n<p>quote</p>\n</blockquote>\n");
        assert_eq!(
            render("> a\n> b"),
            "<blockquote>\n<p>a</p>\n<p>b</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_list_and_quote_close_each_other() {
        assert_eq!(
            render("- item\n> quote"),
            "<ul>\n<li>item</li>\n</ul>\n<blockquote>\n<p>quote</p>\n</blockquote>\n"
        );
        assert_eq!(
            render("> quote\n- item"),
            "<blockquote>\n<p>quote</p>\n</blockquote>\n<ul>\n<li>item</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_rule_leaves_blocks_open() {
        assert_eq!(
            render("- a\n***\n- b"),
            "<ul>\n<li>a</li>\n<hr/>\n<li>b</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_blank_line_breaks() {
        assert_eq!(render("a\n\nb"), "<p>a</p>\n<br/>\n<p>b</p>\n");
        assert_eq!(
            render("- a\n\n- b"),
            "<ul>\n<li>a</li>\n</ul>\n<ul>\n<li>b</li>\n</ul>\n"
        );
        assert_eq!(render("a\n\n\nb"), "<p>a</p>\n<br/>\n<p>b</p>\n");
    }

    #[test]
    fn test_blank_line_breaks_disabled() {
        let options = RenderOptions {
            paragraph_breaks: false,
            ..Default::default()
        };
        assert_eq!(render_document("a\n\nb", &options), "<p>a</p>\n<p>b</p>\n");
    }

    #[test]
    fn test_table_flushes_before_next_block() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\nafter");
        assert!(html.ends_with("</table>\n<p>after</p>\n"));
    }

    #[test]
    fn test_table_at_end_of_input() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.starts_with("<table>\n"));
        assert!(html.ends_with("</table>\n"));
    }

    #[test]
    fn test_lone_pipe_row_dropped() {
        assert_eq!(render("| a | b |\n\ntext"), "<br/>\n<p>text</p>\n");
    }

    #[test]
    fn test_crlf() {
        assert_eq!(render("a\r\nb\rc"), "<p>a b c</p>\n");
    }
}
