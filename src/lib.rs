//! Render Markdown back to Markdown, fixing typography in prose on the way.
//!
//! The document is parsed into a tree of [`Block`]s, then folded bottom-up
//! through a [`Renderer`]. Only text runs reach the renderer's transform;
//! code, link targets and structural markers are written back untouched.
//!
//! ```
//! use typomd::{render_with, MarkdownRenderer};
//!
//! let renderer = MarkdownRenderer::new(|s: &str| s.replace("--", "–"));
//! assert_eq!(render_with("a -- `b -- c`", &renderer), "a – ``b -- c``\n\n");
//! ```

mod block;
mod config;
mod error;
mod markdown;
mod parser;
mod renderer;
mod table;
mod typography;

pub use block::{Block, FootnoteDefinition, List, ListItem, Span};
pub use config::{Config, RenderOptions, TypographyConfig};
pub use error::{Error, Result};
pub use renderer::{MarkdownRenderer, Renderer};
pub use table::{Alignment, HeaderCell, Table};
pub use typography::{TextTransform, Typographer};

use log::debug;

/// Parse markdown text into a vector of blocks, dropping any frontmatter.
pub fn parse(markdown: &str) -> Vec<Block> {
    let (_, body) = parser::split_frontmatter(markdown);
    parser::parse(body)
}

/// Render parsed blocks through `renderer`.
pub fn render_blocks<R: Renderer + ?Sized>(blocks: &[Block], renderer: &R) -> String {
    markdown::blocks_to_markdown(blocks, renderer)
}

/// Render markdown with the built-in defaults.
pub fn render(markdown: &str) -> String {
    render_with_config(markdown, &Config::compiled_default())
}

/// Render markdown with the delimiters and typography rules of `config`.
pub fn render_with_config(markdown: &str, config: &Config) -> String {
    let options = config.render.clone();
    match config.typography.typographer() {
        Some(typographer) => {
            render_with(markdown, &MarkdownRenderer::with_options(typographer, options))
        }
        None => {
            let renderer = MarkdownRenderer::with_options(|s: &str| s.to_string(), options);
            render_with(markdown, &renderer)
        }
    }
}

/// Render markdown through a caller-supplied renderer.
///
/// Frontmatter is copied through verbatim ahead of the rendered body.
pub fn render_with<R: Renderer + ?Sized>(markdown: &str, renderer: &R) -> String {
    let (frontmatter, body) = parser::split_frontmatter(markdown);
    let blocks = parser::parse(body);
    debug!("rendering {} top-level blocks", blocks.len());

    let rendered = render_blocks(&blocks, renderer);
    match frontmatter {
        Some(frontmatter) => format!("{frontmatter}\n\n{rendered}"),
        None => rendered,
    }
}
