//! Per-construct rules that write Markdown back out.
//!
//! Every rule receives the already rendered content of its children and
//! returns the construct's canonical text. Rules keep no state between calls.

use log::warn;

use crate::config::RenderOptions;
use crate::table::{HeaderCell, Table};
use crate::typography::{TextTransform, Typographer};

const UNORDERED_PREFIX: &str = "* ";
const ORDERED_PREFIX: &str = "#. ";
const FOOTNOTE_INDENT: &str = "    ";

/// The set of constructs a document is rendered through.
///
/// `text` is the only rule that sees raw prose; all others compose output of
/// earlier calls.
pub trait Renderer {
    fn text(&self, text: &str) -> String;

    /// Paragraph break
    fn newline(&self) -> String;
    fn linebreak(&self) -> String;
    fn hrule(&self) -> String;

    fn heading(&self, text: &str, level: usize) -> String;
    fn paragraph(&self, text: &str) -> String;
    fn list_item(&self, text: &str) -> String;
    fn list(&self, items: &[String], ordered: bool) -> String;
    fn block_code(&self, code: &str, lang: Option<&str>) -> String;
    fn block_quote(&self, text: &str) -> String;
    fn block_html(&self, html: &str) -> String;
    fn table(&self, header: &[HeaderCell], body: &[Vec<String>]) -> String;

    fn emphasis(&self, text: &str) -> String;
    fn double_emphasis(&self, text: &str) -> String;
    fn strikethrough(&self, text: &str) -> String;
    fn codespan(&self, text: &str) -> String;
    fn autolink(&self, link: &str, is_email: bool) -> String;
    fn link(&self, link: &str, title: Option<&str>, text: &str) -> String;
    fn image(&self, src: &str, title: Option<&str>, alt: &str) -> String;
    fn inline_html(&self, html: &str) -> String;

    fn footnote_ref(&self, key: &str) -> String;
    fn footnote_item(&self, key: &str, text: &str) -> String;
    fn footnotes(&self, items: &[String]) -> String;
}

/// Renders Markdown back to Markdown, passing text runs through `T`.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer<T = Typographer> {
    options: RenderOptions,
    transform: T,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(Typographer::default())
    }
}

impl<T: TextTransform> MarkdownRenderer<T> {
    pub fn new(transform: T) -> Self {
        Self::with_options(transform, RenderOptions::default())
    }

    pub fn with_options(transform: T, options: RenderOptions) -> Self {
        Self { options, transform }
    }
}

impl<T: TextTransform> Renderer for MarkdownRenderer<T> {
    fn text(&self, text: &str) -> String {
        self.transform.transform(text)
    }

    fn newline(&self) -> String {
        "\n\n".to_string()
    }

    fn linebreak(&self) -> String {
        "\n".to_string()
    }

    fn hrule(&self) -> String {
        format!("----{}", self.newline())
    }

    fn heading(&self, text: &str, level: usize) -> String {
        if !(1..=6).contains(&level) {
            warn!("heading level {level} is outside 1..=6, rendering it as is");
        }
        format!("{} {text}{}", "#".repeat(level), self.newline())
    }

    fn paragraph(&self, text: &str) -> String {
        format!("{text}{}", self.newline())
    }

    fn list_item(&self, text: &str) -> String {
        text.trim_end_matches('\n').to_string()
    }

    fn list(&self, items: &[String], ordered: bool) -> String {
        let prefix = if ordered {
            ORDERED_PREFIX
        } else {
            UNORDERED_PREFIX
        };
        let continuation = " ".repeat(prefix.len());

        let body: Vec<String> = items
            .iter()
            .filter(|item| !item.is_empty())
            .map(|item| format!("{prefix}{}", indent_continuation(item, &continuation)))
            .collect();
        format!("{}{}", body.join("\n"), self.newline())
    }

    fn block_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or_default();
        let code = code.trim_matches('\n');
        format!("```{lang}\n{code}\n```{}", self.newline())
    }

    fn block_quote(&self, text: &str) -> String {
        let lines: Vec<String> = text
            .trim_end_matches('\n')
            .split('\n')
            .map(|line| format!("> {line}"))
            .collect();
        format!("{}{}", lines.join("\n"), self.newline())
    }

    fn block_html(&self, html: &str) -> String {
        format!("{}{}", html.trim_end_matches('\n'), self.newline())
    }

    fn table(&self, header: &[HeaderCell], body: &[Vec<String>]) -> String {
        Table::rebuild(header, body).render()
    }

    fn emphasis(&self, text: &str) -> String {
        let mark = &self.options.emphasis_mark;
        format!("{mark}{text}{mark}")
    }

    fn double_emphasis(&self, text: &str) -> String {
        let mark = &self.options.double_emphasis_mark;
        format!("{mark}{text}{mark}")
    }

    fn strikethrough(&self, text: &str) -> String {
        format!("~~{text}~~")
    }

    fn codespan(&self, text: &str) -> String {
        format!("``{text}``")
    }

    fn autolink(&self, link: &str, _is_email: bool) -> String {
        format!("<{link}>")
    }

    fn link(&self, link: &str, title: Option<&str>, text: &str) -> String {
        format!("[{text}]({link}{})", title_suffix(title))
    }

    fn image(&self, src: &str, title: Option<&str>, alt: &str) -> String {
        format!("![{alt}]({src}{})", title_suffix(title))
    }

    fn inline_html(&self, html: &str) -> String {
        html.to_string()
    }

    fn footnote_ref(&self, key: &str) -> String {
        format!("[^{key}]")
    }

    fn footnote_item(&self, key: &str, text: &str) -> String {
        let body = text.trim_end_matches('\n');
        format!(
            "[^{key}]: {}{}",
            indent_continuation(body, FOOTNOTE_INDENT),
            self.newline()
        )
    }

    fn footnotes(&self, items: &[String]) -> String {
        items.concat()
    }
}

fn title_suffix(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => format!(" \"{title}\""),
        _ => String::new(),
    }
}

/// Indent every non-empty line after the first.
fn indent_continuation(text: &str, indent: &str) -> String {
    let mut lines = text.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Alignment;

    fn identity() -> MarkdownRenderer<impl TextTransform> {
        MarkdownRenderer::new(|s: &str| s.to_string())
    }

    fn items(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn heading() {
        let r = identity();
        assert_eq!(r.heading("Title", 1), "# Title\n\n");
        assert_eq!(r.heading("Deep", 3), "### Deep\n\n");
        assert_eq!(r.heading("Too deep", 7), "####### Too deep\n\n");
    }

    #[test]
    fn paragraph_and_breaks() {
        let r = identity();
        assert_eq!(r.paragraph("Some text."), "Some text.\n\n");
        assert_eq!(r.linebreak(), "\n");
        assert_eq!(r.newline(), "\n\n");
        assert_eq!(r.hrule(), "----\n\n");
    }

    #[test]
    fn unordered_list() {
        let r = identity();
        assert_eq!(
            r.list(&items(&["one", "two", "three"]), false),
            "* one\n* two\n* three\n\n"
        );
    }

    #[test]
    fn ordered_list_uses_a_single_marker() {
        let r = identity();
        assert_eq!(
            r.list(&items(&["one", "two", "three"]), true),
            "#. one\n#. two\n#. three\n\n"
        );
    }

    #[test]
    fn list_skips_empty_items() {
        let r = identity();
        assert_eq!(r.list(&items(&["", "one", ""]), false), "* one\n\n");
    }

    #[test]
    fn list_item_keeps_former_marker_text() {
        let r = identity();
        let item = r.list_item(":list-item:b\n\n");
        assert_eq!(item, ":list-item:b");
        assert_eq!(r.list(&[item], false), "* :list-item:b\n\n");
    }

    #[test]
    fn list_indents_nested_content() {
        let r = identity();
        let item = r.list_item("parent\n* child\n\nsecond paragraph\n\n");
        assert_eq!(
            r.list(&[item], false),
            "* parent\n  * child\n\n  second paragraph\n\n"
        );
    }

    #[test]
    fn code_blocks() {
        let r = identity();
        assert_eq!(
            r.block_code("\nlet x = 1;\n\n", Some("rust")),
            "```rust\nlet x = 1;\n```\n\n"
        );
        assert_eq!(r.block_code("plain\n", None), "```\nplain\n```\n\n");
    }

    #[test]
    fn block_quote_prefixes_every_line() {
        let r = identity();
        assert_eq!(r.block_quote("a\n\nb\n\n"), "> a\n> \n> b\n\n");
    }

    #[test]
    fn emphasis_uses_configured_marks() {
        let r = MarkdownRenderer::with_options(
            |s: &str| s.to_string(),
            RenderOptions {
                emphasis_mark: "_".to_string(),
                double_emphasis_mark: "#".to_string(),
            },
        );
        assert_eq!(r.emphasis("Hello !"), "_Hello !_");
        assert_eq!(r.double_emphasis("Hello !"), "#Hello !#");
        assert_eq!(identity().double_emphasis("x"), "**x**");
    }

    #[test]
    fn inline_wrappers() {
        let r = identity();
        assert_eq!(r.strikethrough("gone"), "~~gone~~");
        assert_eq!(r.codespan("a `b` c"), "``a `b` c``");
        assert_eq!(r.inline_html("<br>"), "<br>");
    }

    #[test]
    fn autolinks_ignore_the_email_flag() {
        let r = identity();
        assert_eq!(r.autolink("http://example.com", false), "<http://example.com>");
        assert_eq!(r.autolink("user@example.com", true), "<user@example.com>");
    }

    #[test]
    fn links_and_images() {
        let r = identity();
        assert_eq!(r.link("http://a.b", None, "text"), "[text](http://a.b)");
        assert_eq!(r.link("http://a.b", Some(""), "text"), "[text](http://a.b)");
        assert_eq!(
            r.link("http://a.b", Some("Title"), "text"),
            "[text](http://a.b \"Title\")"
        );
        assert_eq!(r.image("i.png", None, "alt"), "![alt](i.png)");
        assert_eq!(r.image("i.png", Some("T"), "alt"), "![alt](i.png \"T\")");
    }

    #[test]
    fn footnotes() {
        let r = identity();
        assert_eq!(r.footnote_ref("note"), "[^note]");
        let first = r.footnote_item("1", "First.\n\n");
        let second = r.footnote_item("2", "Para one.\n\nPara two.\n\n");
        assert_eq!(first, "[^1]: First.\n\n");
        assert_eq!(second, "[^2]: Para one.\n\n    Para two.\n\n");
        assert_eq!(
            r.footnotes(&[first, second]),
            "[^1]: First.\n\n[^2]: Para one.\n\n    Para two.\n\n"
        );
    }

    #[test]
    fn block_html_ends_with_a_blank_line() {
        assert_eq!(identity().block_html("<div>\nx\n</div>\n"), "<div>\nx\n</div>\n\n");
    }

    #[test]
    fn table_delegates_to_reconstruction() {
        let r = identity();
        let header = [HeaderCell::new("A", Alignment::Center)];
        assert_eq!(
            r.table(&header, &[vec!["b".to_string()]]),
            "\n| A |\n|:-:|\n| b |\n\n"
        );
    }

    #[test]
    fn text_runs_go_through_the_transform() {
        let r = MarkdownRenderer::new(|s: &str| s.to_uppercase());
        assert_eq!(r.text("abc"), "ABC");
        let typographic: MarkdownRenderer = MarkdownRenderer::default();
        assert_eq!(typographic.text("Hello !"), "Hello\u{202f}!");
    }
}
