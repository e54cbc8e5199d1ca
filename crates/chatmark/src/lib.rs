//! # chatmark
//!
//! Render chat Markdown to safe HTML.
//!
//! A small, line-oriented renderer for the Markdown that shows up in chat
//! messages: headings, fenced code, lists (including task lists),
//! blockquotes, rules, pipe tables, paragraphs with hard breaks, and the
//! usual inline formatting, links and images.
//!
//! ## Design
//!
//! - **Stateless**: every call builds its own working state, so renderers
//!   can be shared across threads without locking
//! - **Safe**: raw HTML in the input is always escaped, never passed through
//! - **Total**: any string renders; malformed input degrades, open blocks
//!   are always closed
//!
//! Not a CommonMark implementation: no reference links, nested lists or
//! footnotes.
//!
//! ## Example
//!
//! ```rust
//! use chatmark::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("# Hello\n\nSome **bold** text");
//! assert!(html.contains("<h1>Hello</h1>"));
//! assert!(html.contains("<strong>bold</strong>"));
//! ```

mod classify;
mod inline;
mod options;
mod patterns;
mod placeholder;
mod render;
mod service;
mod table;
mod utilities;

pub use classify::{classify, LineKind};
pub use inline::render_inline;
pub use options::RenderOptions;
pub use service::MarkdownRenderer;
pub use table::{render_table, Alignment};
pub use utilities::escape_html;

/// Error type for chatmark operations
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Convert Markdown to HTML with default options
pub fn to_html(markdown: &str) -> String {
    render::render_document(markdown, &RenderOptions::default())
}

/// Convert possibly absent Markdown; `None` yields an empty string
pub fn to_html_opt(markdown: Option<&str>) -> String {
    markdown.map(to_html).unwrap_or_default()
}
