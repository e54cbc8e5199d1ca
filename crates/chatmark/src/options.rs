//! Configuration options for rendering

/// Options for [`MarkdownRenderer`](crate::MarkdownRenderer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit a `<br/>` marker for a blank line that separates two
    /// non-list blocks
    pub paragraph_breaks: bool,

    /// Deepest recursion allowed into link text and emphasis content.
    /// Spans nested further are left as escaped text.
    pub max_nesting: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            paragraph_breaks: true,
            max_nesting: 16,
        }
    }
}
