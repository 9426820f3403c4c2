use crate::table::Alignment;

/// Inline spans of a block's content
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    /// A run of prose; the only span handed to the text transform
    Text(String),
    Emphasis(Vec<Span>),
    Strong(Vec<Span>),
    Strikethrough(Vec<Span>),
    Code(String),
    Link {
        url: String,
        title: Option<String>,
        content: Vec<Span>,
    },
    Image {
        src: String,
        title: Option<String>,
        alt: String,
    },
    Autolink {
        url: String,
        email: bool,
    },
    FootnoteReference(String),
    Html(String),
    SoftBreak,
    LineBreak,
}

/// A single list item: its leading inline content, then any nested blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    pub content: Vec<Span>,
    pub blocks: Vec<Block>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteDefinition {
    pub label: String,
    pub blocks: Vec<Block>,
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    Paragraph {
        content: Vec<Span>,
    },
    CodeBlock {
        language: Option<String>,
        content: String,
    },
    List(List),
    BlockQuote(Vec<Block>),
    Table {
        alignments: Vec<Alignment>,
        headers: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Html(String),
    Rule,
    /// Every footnote definition of the document, in order of appearance
    Footnotes(Vec<FootnoteDefinition>),
}
