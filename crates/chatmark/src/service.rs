//! MarkdownRenderer - the main entry point for Markdown to HTML conversion.

use std::io::Read;

use crate::options::RenderOptions;
use crate::render::render_document;
use crate::{RenderError, Result};

/// Converts chat Markdown to HTML.
///
/// Holds only its options, so one renderer can be shared freely across
/// threads; every call builds and drops its own working state.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new MarkdownRenderer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MarkdownRenderer with custom options
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Convert Markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        render_document(markdown, &self.options)
    }

    /// Convert possibly absent Markdown; `None` renders as an empty string
    pub fn render_opt(&self, markdown: Option<&str>) -> String {
        markdown.map(|m| self.render(m)).unwrap_or_default()
    }

    /// Read all of `reader` and convert it
    pub fn render_reader<R: Read>(&self, mut reader: R) -> Result<String> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let markdown = String::from_utf8(bytes)
            .map_err(|e| RenderError::InvalidInput(format!("source is not UTF-8: {e}")))?;
        Ok(self.render(&markdown))
    }

    /// Get the current options
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }
}
