use crate::block::{Block, List, ListItem, Span};
use crate::renderer::Renderer;
use crate::table::{Alignment, HeaderCell};

/// Render blocks through `renderer`, children first.
pub fn blocks_to_markdown<R: Renderer + ?Sized>(blocks: &[Block], renderer: &R) -> String {
    let mut out = String::new();
    for block in blocks {
        emit_block(block, renderer, &mut out);
    }
    out
}

fn emit_block<R: Renderer + ?Sized>(block: &Block, r: &R, out: &mut String) {
    let rendered = match block {
        Block::Heading { level, content } => {
            r.heading(&spans_to_markdown(content, r), usize::from(*level))
        }
        Block::Paragraph { content } => r.paragraph(&spans_to_markdown(content, r)),
        Block::CodeBlock { language, content } => r.block_code(content, language.as_deref()),
        Block::List(list) => list_to_markdown(list, r),
        Block::BlockQuote(children) => r.block_quote(&blocks_to_markdown(children, r)),
        Block::Table {
            alignments,
            headers,
            rows,
        } => table_to_markdown(alignments, headers, rows, r),
        Block::Html(html) => r.block_html(html),
        Block::Rule => r.hrule(),
        Block::Footnotes(definitions) => {
            let items: Vec<String> = definitions
                .iter()
                .map(|d| r.footnote_item(&d.label, &blocks_to_markdown(&d.blocks, r)))
                .collect();
            r.footnotes(&items)
        }
    };
    out.push_str(&rendered);
}

fn list_to_markdown<R: Renderer + ?Sized>(list: &List, r: &R) -> String {
    let items: Vec<String> = list
        .items
        .iter()
        .map(|item| r.list_item(&item_to_markdown(item, r)))
        .collect();
    r.list(&items, list.ordered)
}

fn item_to_markdown<R: Renderer + ?Sized>(item: &ListItem, r: &R) -> String {
    let mut text = spans_to_markdown(&item.content, r);
    if !item.blocks.is_empty() {
        if !text.is_empty() {
            text.push_str(&r.linebreak());
        }
        text.push_str(&blocks_to_markdown(&item.blocks, r));
    }
    text
}

fn table_to_markdown<R: Renderer + ?Sized>(
    alignments: &[Alignment],
    headers: &[Vec<Span>],
    rows: &[Vec<Vec<Span>>],
    r: &R,
) -> String {
    let header: Vec<HeaderCell> = headers
        .iter()
        .enumerate()
        .map(|(column, cell)| {
            let alignment = alignments.get(column).copied().unwrap_or_default();
            HeaderCell::new(spans_to_markdown(cell, r), alignment)
        })
        .collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| spans_to_markdown(cell, r)).collect())
        .collect();
    r.table(&header, &body)
}

fn spans_to_markdown<R: Renderer + ?Sized>(spans: &[Span], r: &R) -> String {
    let mut out = String::new();
    for span in spans {
        span_to_markdown(span, r, &mut out);
    }
    out
}

fn span_to_markdown<R: Renderer + ?Sized>(span: &Span, r: &R, out: &mut String) {
    let rendered = match span {
        Span::Text(text) => r.text(text),
        Span::Emphasis(inner) => r.emphasis(&spans_to_markdown(inner, r)),
        Span::Strong(inner) => r.double_emphasis(&spans_to_markdown(inner, r)),
        Span::Strikethrough(inner) => r.strikethrough(&spans_to_markdown(inner, r)),
        Span::Code(code) => r.codespan(code),
        Span::Link {
            url,
            title,
            content,
        } => r.link(url, title.as_deref(), &spans_to_markdown(content, r)),
        Span::Image { src, title, alt } => r.image(src, title.as_deref(), alt),
        Span::Autolink { url, email } => r.autolink(url, *email),
        Span::FootnoteReference(key) => r.footnote_ref(key),
        Span::Html(html) => r.inline_html(html),
        Span::SoftBreak | Span::LineBreak => r.linebreak(),
    };
    out.push_str(&rendered);
}
