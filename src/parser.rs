use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

use crate::block::{Block, FootnoteDefinition, List, ListItem, Span};
use crate::table::Alignment;

/// Split YAML frontmatter from the beginning of markdown content.
///
/// Returns the frontmatter, both `---` fences included, and the remaining body.
/// The block must open with a `key:` line; anything else is a thematic break
/// followed by ordinary Markdown.
pub fn split_frontmatter(markdown: &str) -> (Option<&str>, &str) {
    let Some(rest) = markdown.strip_prefix("---\n") else {
        return (None, markdown);
    };
    let first_line = rest.split('\n').next().unwrap_or_default();
    if !is_yaml_key_line(first_line) {
        return (None, markdown);
    }
    // Find the closing ---, on a line of its own
    let end = match rest.find("\n---\n") {
        Some(end) => end + "\n---\n".len(),
        None if rest.ends_with("\n---") => rest.len(),
        None => return (None, markdown),
    };
    let (frontmatter, body) = markdown.split_at("---\n".len() + end);
    (
        Some(frontmatter.trim_end_matches('\n')),
        body.trim_start_matches('\n'),
    )
}

fn is_yaml_key_line(line: &str) -> bool {
    match line.split_once(':') {
        Some((key, _)) => {
            !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        None => false,
    }
}

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut blocks = Vec::new();
    let mut state = ParseState::default();

    for event in parser {
        process_event(event, &mut state, &mut blocks);
    }

    if !state.footnotes.is_empty() {
        blocks.push(Block::Footnotes(std::mem::take(&mut state.footnotes)));
    }

    blocks
}

#[derive(Default)]
struct ParseState {
    // Current inline content being built
    spans: Vec<Span>,
    // Open inline constructs, each with the spans of its parent
    inline_stack: Vec<(InlineKind, Vec<Span>)>,

    // Current heading level (if in a heading)
    heading_level: Option<u8>,

    // Code block state
    in_code_block: bool,
    code_language: Option<String>,
    code_content: String,

    // Raw HTML block state
    in_html_block: bool,
    html_content: String,

    // Blocks that hold other blocks, innermost last
    containers: Vec<Container>,
    list_stack: Vec<List>,

    table: Option<TableBuilder>,

    footnotes: Vec<FootnoteDefinition>,
}

enum InlineKind {
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: Option<String> },
    Autolink { url: String, email: bool },
    Image { src: String, title: Option<String> },
}

enum Container {
    BlockQuote(Vec<Block>),
    Item(ListItem),
    Footnote(FootnoteDefinition),
}

#[derive(Default)]
struct TableBuilder {
    alignments: Vec<Alignment>,
    headers: Vec<Vec<Span>>,
    rows: Vec<Vec<Vec<Span>>>,
    current_row: Vec<Vec<Span>>,
    in_head: bool,
}

fn process_event(event: Event, state: &mut ParseState, blocks: &mut Vec<Block>) {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            flush_item_content(state);
            state.heading_level = Some(heading_level_to_u8(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(level) = state.heading_level.take() {
                let content = std::mem::take(&mut state.spans);
                push_block(state, blocks, Block::Heading { level, content });
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => flush_item_content(state),
        Event::End(TagEnd::Paragraph) => {
            let content = std::mem::take(&mut state.spans);
            if !content.is_empty() {
                push_block(state, blocks, Block::Paragraph { content });
            }
        }

        // Text content
        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else {
                push_text(state, &text);
            }
        }

        // Inline code
        Event::Code(code) => {
            state.spans.push(Span::Code(code.into_string()));
        }

        // Raw HTML
        Event::Html(html) => {
            if state.in_html_block {
                state.html_content.push_str(&html);
            } else {
                state.spans.push(Span::Html(html.into_string()));
            }
        }
        Event::InlineHtml(html) => {
            state.spans.push(Span::Html(html.into_string()));
        }
        Event::Start(Tag::HtmlBlock) => {
            flush_item_content(state);
            state.in_html_block = true;
            state.html_content.clear();
        }
        Event::End(TagEnd::HtmlBlock) => {
            state.in_html_block = false;
            let html = std::mem::take(&mut state.html_content);
            push_block(state, blocks, Block::Html(html));
        }

        // Emphasis
        Event::Start(Tag::Emphasis) => open_inline(state, InlineKind::Emphasis),
        Event::Start(Tag::Strong) => open_inline(state, InlineKind::Strong),
        Event::Start(Tag::Strikethrough) => open_inline(state, InlineKind::Strikethrough),
        Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough) => {
            close_inline(state);
        }

        // Links and images
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) => {
            let url = dest_url.into_string();
            let kind = match link_type {
                LinkType::Autolink => InlineKind::Autolink { url, email: false },
                LinkType::Email => InlineKind::Autolink { url, email: true },
                _ => InlineKind::Link {
                    url,
                    title: non_empty(title.into_string()),
                },
            };
            open_inline(state, kind);
        }
        Event::Start(Tag::Image {
            dest_url, title, ..
        }) => {
            let kind = InlineKind::Image {
                src: dest_url.into_string(),
                title: non_empty(title.into_string()),
            };
            open_inline(state, kind);
        }
        Event::End(TagEnd::Link | TagEnd::Image) => close_inline(state),

        // Code blocks
        Event::Start(Tag::CodeBlock(kind)) => {
            flush_item_content(state);
            state.in_code_block = true;
            state.code_language = match kind {
                CodeBlockKind::Fenced(lang) => non_empty(lang.into_string()),
                CodeBlockKind::Indented => None,
            };
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let content = std::mem::take(&mut state.code_content);
            let language = state.code_language.take();
            push_block(state, blocks, Block::CodeBlock { language, content });
        }

        // Block quotes
        Event::Start(Tag::BlockQuote(_)) => {
            flush_item_content(state);
            state.containers.push(Container::BlockQuote(Vec::new()));
        }
        Event::End(TagEnd::BlockQuote(_)) => {
            if let Some(Container::BlockQuote(children)) = state.containers.pop() {
                push_block(state, blocks, Block::BlockQuote(children));
            }
        }

        // Lists
        Event::Start(Tag::List(first_item)) => {
            flush_item_content(state);
            state.list_stack.push(List {
                ordered: first_item.is_some(),
                items: Vec::new(),
            });
        }
        Event::End(TagEnd::List(_)) => {
            if let Some(list) = state.list_stack.pop() {
                // Nested lists land in the enclosing item
                push_block(state, blocks, Block::List(list));
            }
        }

        Event::Start(Tag::Item) => {
            state.containers.push(Container::Item(ListItem::default()));
        }
        Event::End(TagEnd::Item) => {
            // Collect any remaining spans
            flush_item_content(state);
            if let Some(Container::Item(item)) = state.containers.pop() {
                if let Some(list) = state.list_stack.last_mut() {
                    list.items.push(item);
                }
            }
        }

        // Footnotes
        Event::FootnoteReference(label) => {
            state.spans.push(Span::FootnoteReference(label.into_string()));
        }
        Event::Start(Tag::FootnoteDefinition(label)) => {
            flush_item_content(state);
            state.containers.push(Container::Footnote(FootnoteDefinition {
                label: label.into_string(),
                blocks: Vec::new(),
            }));
        }
        Event::End(TagEnd::FootnoteDefinition) => {
            if let Some(Container::Footnote(definition)) = state.containers.pop() {
                state.footnotes.push(definition);
            }
        }

        // Tables
        Event::Start(Tag::Table(alignments)) => {
            flush_item_content(state);
            state.table = Some(TableBuilder {
                alignments: alignments.into_iter().map(Alignment::from).collect(),
                ..TableBuilder::default()
            });
        }
        Event::End(TagEnd::Table) => {
            if let Some(table) = state.table.take() {
                let block = Block::Table {
                    alignments: table.alignments,
                    headers: table.headers,
                    rows: table.rows,
                };
                push_block(state, blocks, block);
            }
        }

        Event::Start(Tag::TableHead) => {
            if let Some(table) = state.table.as_mut() {
                table.in_head = true;
                table.current_row.clear();
            }
        }
        Event::End(TagEnd::TableHead) => {
            if let Some(table) = state.table.as_mut() {
                table.in_head = false;
                table.headers = std::mem::take(&mut table.current_row);
            }
        }

        Event::Start(Tag::TableRow) => {
            if let Some(table) = state.table.as_mut() {
                table.current_row.clear();
            }
        }
        Event::End(TagEnd::TableRow) => {
            if let Some(table) = state.table.as_mut() {
                if !table.in_head {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
        }

        Event::Start(Tag::TableCell) => {
            state.spans.clear();
        }
        Event::End(TagEnd::TableCell) => {
            let cell_content = std::mem::take(&mut state.spans);
            if let Some(table) = state.table.as_mut() {
                table.current_row.push(cell_content);
            }
        }

        // Horizontal rule
        Event::Rule => {
            flush_item_content(state);
            push_block(state, blocks, Block::Rule);
        }

        // Soft/hard breaks
        Event::SoftBreak => {
            state.spans.push(Span::SoftBreak);
        }
        Event::HardBreak => {
            state.spans.push(Span::LineBreak);
        }

        // Ignore other events
        _ => {}
    }
}

/// Append text, extending the previous run so each run reaches the transform whole
fn push_text(state: &mut ParseState, text: &str) {
    if let Some(Span::Text(last)) = state.spans.last_mut() {
        last.push_str(text);
    } else {
        state.spans.push(Span::Text(text.to_string()));
    }
}

fn open_inline(state: &mut ParseState, kind: InlineKind) {
    let parent = std::mem::take(&mut state.spans);
    state.inline_stack.push((kind, parent));
}

fn close_inline(state: &mut ParseState) {
    let Some((kind, parent)) = state.inline_stack.pop() else {
        return;
    };
    let content = std::mem::replace(&mut state.spans, parent);
    let span = match kind {
        InlineKind::Emphasis => Span::Emphasis(content),
        InlineKind::Strong => Span::Strong(content),
        InlineKind::Strikethrough => Span::Strikethrough(content),
        InlineKind::Link { url, title } => Span::Link {
            url,
            title,
            content,
        },
        // The body of an autolink repeats its target
        InlineKind::Autolink { url, email } => Span::Autolink { url, email },
        InlineKind::Image { src, title } => Span::Image {
            src,
            title,
            alt: plain_text(&content),
        },
    };
    state.spans.push(span);
}

/// Route a finished block to the innermost open container, or the document
fn push_block(state: &mut ParseState, blocks: &mut Vec<Block>, block: Block) {
    match state.containers.last_mut() {
        Some(Container::BlockQuote(children)) => children.push(block),
        Some(Container::Item(item)) => item.blocks.push(block),
        Some(Container::Footnote(definition)) => definition.blocks.push(block),
        None => blocks.push(block),
    }
}

/// Move inline content of a tight list item out of the way of the block that follows.
fn flush_item_content(state: &mut ParseState) {
    let Some(Container::Item(item)) = state.containers.last_mut() else {
        return;
    };
    if state.spans.is_empty() {
        return;
    }
    let content = std::mem::take(&mut state.spans);
    if item.blocks.is_empty() {
        item.content.extend(content);
    } else {
        item.blocks.push(Block::Paragraph { content });
    }
}

fn plain_text(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(text) | Span::Code(text) | Span::Html(text) => out.push_str(text),
            Span::Emphasis(inner) | Span::Strong(inner) | Span::Strikethrough(inner) => {
                out.push_str(&plain_text(inner));
            }
            Span::Link { content, .. } => out.push_str(&plain_text(content)),
            Span::Image { alt, .. } => out.push_str(alt),
            Span::Autolink { url, .. } => out.push_str(url),
            Span::FootnoteReference(label) => out.push_str(&format!("[^{label}]")),
            Span::SoftBreak | Span::LineBreak => out.push('\n'),
        }
    }
    out
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
