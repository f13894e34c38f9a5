//! Tag classification
//!
//! Every element name maps to exactly one [`Tag`]. The render engine matches
//! on this enum exhaustively, so supporting a new element means adding a
//! variant (or extending a `from_name` arm) and handling it at compile time.

/// Supported tag classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// h1-h6, with level 1-6
    Heading(u8),
    Paragraph,
    /// strong, b
    Strong,
    /// em, i, cite, dfn
    Emphasis,
    /// u
    Underline,
    /// del, s, strike
    Strikethrough,
    Anchor,
    Image,
    UnorderedList,
    OrderedList,
    ListItem,
    Pre,
    Code,
    Blockquote,
    Table,
    /// thead, tbody, tfoot
    TableSection,
    TableRow,
    TableHeader,
    TableData,
    Caption,
    Break,
    Rule,
    Title,
    Head,
    Option,
    /// Generic block containers (div, section, article, ...)
    Block,
    /// Elements whose subtree never contributes output (script, style, ...)
    Stripped,
    /// Anything else: the tag is dropped and its children are rendered
    Unknown,
}

/// Elements removed together with their children
const STRIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "object", "embed", "applet", "link",
    "base", "meta", "svg", "math", "canvas",
];

/// Generic block containers
const BLOCK_ELEMENTS: &[&str] = &[
    "html",
    "body",
    "div",
    "section",
    "article",
    "aside",
    "header",
    "footer",
    "main",
    "nav",
    "figure",
    "figcaption",
    "address",
    "details",
    "summary",
    "dl",
    "dt",
    "dd",
    "form",
    "fieldset",
    "legend",
    "center",
    "hgroup",
    "menu",
    "dir",
    "noframes",
    "select",
];

impl Tag {
    /// Classify an element by its (lowercase) name
    pub fn from_name(name: &str) -> Tag {
        match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "strong" | "b" => Tag::Strong,
            "em" | "i" | "cite" | "dfn" => Tag::Emphasis,
            "u" => Tag::Underline,
            "del" | "s" | "strike" => Tag::Strikethrough,
            "a" => Tag::Anchor,
            "img" => Tag::Image,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "pre" => Tag::Pre,
            "code" | "kbd" | "samp" | "tt" => Tag::Code,
            "blockquote" => Tag::Blockquote,
            "table" => Tag::Table,
            "thead" | "tbody" | "tfoot" => Tag::TableSection,
            "tr" => Tag::TableRow,
            "th" => Tag::TableHeader,
            "td" => Tag::TableData,
            "caption" => Tag::Caption,
            "br" => Tag::Break,
            "hr" => Tag::Rule,
            "title" => Tag::Title,
            "head" => Tag::Head,
            "option" => Tag::Option,
            _ if STRIPPED_ELEMENTS.contains(&name) => Tag::Stripped,
            _ if BLOCK_ELEMENTS.contains(&name) => Tag::Block,
            _ => Tag::Unknown,
        }
    }

    /// Whether the element starts its own block in the output.
    ///
    /// Whitespace-only text next to a block element carries no meaning and
    /// is removed by the DOM adapter.
    pub fn is_block(self) -> bool {
        match self {
            Tag::Heading(_)
            | Tag::Paragraph
            | Tag::UnorderedList
            | Tag::OrderedList
            | Tag::ListItem
            | Tag::Pre
            | Tag::Blockquote
            | Tag::Table
            | Tag::TableSection
            | Tag::TableRow
            | Tag::TableHeader
            | Tag::TableData
            | Tag::Caption
            | Tag::Rule
            | Tag::Title
            | Tag::Head
            | Tag::Option
            | Tag::Block => true,
            Tag::Strong
            | Tag::Emphasis
            | Tag::Underline
            | Tag::Strikethrough
            | Tag::Anchor
            | Tag::Image
            | Tag::Code
            | Tag::Break
            | Tag::Stripped
            | Tag::Unknown => false,
        }
    }
}
