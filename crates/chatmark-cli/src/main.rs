//! Command-line front end for chatmark.
//!
//! Reads Markdown from a file or stdin and writes the rendered HTML to
//! stdout or a file. Set `RUST_LOG=chatmark=debug` to trace rendering.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use chatmark::{MarkdownRenderer, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "chatmark")]
#[command(version, about = "Render chat Markdown to safe HTML")]
struct Cli {
    /// Markdown file to render (stdin when omitted)
    input: Option<PathBuf>,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not emit <br/> markers for blank lines between blocks
    #[arg(long)]
    no_paragraph_breaks: bool,

    /// Deepest nesting of link text and emphasis that is still rendered
    #[arg(long, default_value_t = RenderOptions::default().max_nesting)]
    max_nesting: usize,
}

impl Cli {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            paragraph_breaks: !self.no_paragraph_breaks,
            max_nesting: self.max_nesting,
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let renderer = MarkdownRenderer::with_options(cli.options());

    let html = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            renderer
                .render_reader(file)
                .with_context(|| format!("failed to render {}", path.display()))?
        }
        None => renderer
            .render_reader(io::stdin().lock())
            .context("failed to render stdin")?,
    };
    log::info!("rendered {} bytes of HTML", html.len());

    match &cli.output {
        Some(path) => fs::write(path, &html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(html.as_bytes())
            .context("failed to write stdout")?,
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let cli = Cli::parse_from(["chatmark"]);
        assert_eq!(cli.options(), RenderOptions::default());
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "chatmark",
            "notes.md",
            "-o",
            "out.html",
            "--no-paragraph-breaks",
            "--max-nesting",
            "3",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("notes.md")));
        assert_eq!(cli.output, Some(PathBuf::from("out.html")));
        let options = cli.options();
        assert!(!options.paragraph_breaks);
        assert_eq!(options.max_nesting, 3);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
