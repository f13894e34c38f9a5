//! Markdown render engine - transforms the adapted node tree into Markdown
//!
//! # Traversal
//!
//! The tree is walked depth-first, in document order, with an explicit work
//! stack instead of native recursion. Each element produces an `Open` step
//! and, when it has content to post-process, a matching `Close` step that
//! carries the [`Closing`] action decided at open time. The nesting depth is
//! checked on every step, so adversarial nesting fails with
//! [`ConversionError::DepthExceeded`] instead of exhausting the stack.
//!
//! # Capture buffers
//!
//! Context-sensitive elements (headings, paragraphs, list items, emphasis,
//! links, code, table cells, ...) open a capture buffer. Their children
//! render into it, and on close the element formats the captured text and
//! appends it to the enclosing buffer. Block elements always start on a fresh
//! line: pending inline text is flushed before the block is written.
//!
//! Buffers inside list items are *tight*: a block that can interrupt a
//! paragraph (a nested list, a fence, a heading) follows the previous line
//! directly, which keeps nested lists under their parent item. Other blocks
//! still get a blank line so they do not join the paragraph above.
//!
//! # Examples
//!
//! ```rust
//! use html2md_converter::dom::adapt;
//! use html2md_converter::options::Options;
//! use html2md_converter::render::render;
//!
//! let root = adapt("<ul><li>a<ul><li>b</li></ul></li></ul>").expect("adapt failed");
//! let markdown = render(&root, &Options::default()).expect("render failed");
//! assert_eq!(markdown.trim_end(), "- a\n  - b");
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{Element, Node};
use crate::error::ConversionError;
use crate::options::{HeadingStyle, Options};
use crate::security::SecurityValidator;
use crate::table::{Alignment, TableBuilder};
use crate::tag::Tag;

/// Render a node tree to raw (not yet post-processed) Markdown
pub fn render(root: &Node, options: &Options) -> Result<String, ConversionError> {
    MarkdownRenderer::new(options).render(root)
}

/// Markdown renderer
///
/// Holds only immutable configuration; all per-conversion state lives in a
/// private context created by [`MarkdownRenderer::render`], so one renderer
/// can be used for any number of conversions.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer<'o> {
    options: &'o Options,
    security: SecurityValidator,
}

/// Work item of the traversal stack
enum Step<'a> {
    Open(&'a Node, usize),
    Close(&'a Element, Closing),
}

/// What to do when an element's children have been rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    /// Nothing: the element only contributes its children
    Transparent,
    Block,
    Heading(u8),
    Paragraph,
    Delimited(&'static str),
    Anchor,
    InlineCode,
    CodeBlock,
    Blockquote,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell(Alignment),
    Caption,
    Option,
}

/// One capture buffer
#[derive(Debug, Default)]
struct Buffer {
    text: String,
    /// Blocks that can interrupt a paragraph follow without a blank line
    tight: bool,
    /// Content must stay on one line (headings, table cells, link text)
    single_line: bool,
    /// Inline content: text written here never starts a Markdown line
    inline: bool,
    /// Set when the buffer starts with a list (`true` if ordered)
    first_list: Option<bool>,
    /// Set when the last thing written was a list (`true` if ordered)
    last_list: Option<bool>,
}

/// Largest ordered list number CommonMark accepts (nine digits)
const MAX_LIST_NUMBER: u64 = 999_999_999;

/// Per-level list state
#[derive(Debug)]
struct ListFrame {
    ordered: bool,
    next_number: u64,
}

/// Render-scoped mutable state, created fresh for every conversion
struct RenderContext<'a> {
    options: &'a Options,
    security: &'a SecurityValidator,
    /// Capture stack; index 0 is the document and is never popped
    buffers: Vec<Buffer>,
    lists: Vec<ListFrame>,
    tables: Vec<TableBuilder>,
    pre_depth: usize,
    code_depth: usize,
    fence_language: Option<String>,
}

impl<'o> MarkdownRenderer<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self {
            options,
            security: SecurityValidator::from_options(options),
        }
    }

    /// Render the tree rooted at `root`
    pub fn render(&self, root: &Node) -> Result<String, ConversionError> {
        let mut ctx = RenderContext::new(self.options, &self.security);

        if self.options.include_title {
            if let Some(title) = root.title() {
                ctx.write_heading(1, &escape_text(&title));
            }
        }

        let mut nodes = 0usize;
        let mut stack = vec![Step::Open(root, 0)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node, depth) => {
                    self.security.validate_depth(depth)?;
                    nodes += 1;
                    match node {
                        Node::Document { children } => {
                            stack.extend(children.iter().rev().map(|c| Step::Open(c, depth + 1)));
                        }
                        Node::Element(element) => {
                            if let Some(closing) = ctx.open(element) {
                                stack.push(Step::Close(element, closing));
                                stack.extend(
                                    element
                                        .children
                                        .iter()
                                        .rev()
                                        .map(|c| Step::Open(c, depth + 1)),
                                );
                            }
                        }
                        Node::Text(text) => ctx.text(text),
                        Node::Comment(_) => {}
                    }
                }
                Step::Close(element, closing) => ctx.close(element, closing),
            }
        }

        let markdown = ctx.finish();
        log::debug!(
            "Rendered {} nodes into {} bytes of Markdown",
            nodes,
            markdown.len()
        );
        Ok(markdown)
    }
}

impl<'a> RenderContext<'a> {
    fn new(options: &'a Options, security: &'a SecurityValidator) -> Self {
        Self {
            options,
            security,
            buffers: vec![Buffer::default()],
            lists: Vec::new(),
            tables: Vec::new(),
            pre_depth: 0,
            code_depth: 0,
            fence_language: None,
        }
    }

    fn finish(mut self) -> String {
        // Unbalanced captures cannot happen with a well-formed step stack,
        // but fold any leftovers into the document rather than lose them.
        while self.buffers.len() > 1 {
            let content = self.release();
            self.push_str(&content);
        }
        self.buffers
            .pop()
            .map(|buffer| buffer.text)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Buffers
    // ------------------------------------------------------------------

    fn current(&mut self) -> &mut Buffer {
        let last = self.buffers.len() - 1;
        &mut self.buffers[last]
    }

    fn current_ref(&self) -> &Buffer {
        &self.buffers[self.buffers.len() - 1]
    }

    /// Open a block-level capture
    fn capture_block(&mut self, tight: bool, single_line: bool) {
        let single_line = single_line || self.current_ref().single_line;
        self.buffers.push(Buffer {
            text: String::new(),
            tight,
            single_line,
            inline: false,
            first_list: None,
            last_list: None,
        });
    }

    /// Open an inline capture inheriting the enclosing buffer's mode
    fn capture_inline(&mut self, single_line: bool) {
        let parent = self.current_ref();
        let buffer = Buffer {
            text: String::new(),
            tight: parent.tight,
            single_line: single_line || parent.single_line,
            inline: true,
            first_list: None,
            last_list: None,
        };
        self.buffers.push(buffer);
    }

    /// Close the innermost capture and return its text
    fn release(&mut self) -> String {
        self.release_buffer().text
    }

    fn release_buffer(&mut self) -> Buffer {
        if self.buffers.len() > 1 {
            self.buffers.pop().unwrap_or_default()
        } else {
            Buffer::default()
        }
    }

    fn push_str(&mut self, text: &str) {
        let buffer = self.current();
        buffer.last_list = None;
        buffer.text.push_str(text);
    }

    /// Add a separating space unless one is already there.
    ///
    /// An empty inline capture keeps its leading space so the enclosing
    /// element can move it outside its delimiters.
    fn push_space(&mut self) {
        let buffer = self.current();
        let needed = if buffer.text.is_empty() {
            buffer.inline
        } else {
            !buffer.text.ends_with(char::is_whitespace)
        };
        if needed {
            buffer.text.push(' ');
        }
    }

    fn at_line_start(&self) -> bool {
        let buffer = self.current_ref();
        !buffer.inline
            && !buffer.single_line
            && (buffer.text.is_empty() || buffer.text.ends_with('\n'))
    }

    /// Append a block, separated from preceding content per the buffer mode
    ///
    /// Tight buffers still use a blank line unless the block can interrupt a
    /// paragraph; otherwise it would be read as a lazy continuation line.
    fn push_block(&mut self, block: &str) {
        let loose = !self.current_ref().tight || !interrupts_paragraph(block.trim_start());
        self.push_block_with(block, loose);
    }

    fn push_block_with(&mut self, block: &str, loose: bool) {
        let block = block.trim_start_matches('\n').trim_end();
        if block.trim().is_empty() {
            return;
        }
        let separator = if loose { "\n\n" } else { "\n" };
        let buffer = self.current();
        buffer.last_list = None;
        let kept = buffer.text.trim_end().len();
        buffer.text.truncate(kept);
        if !buffer.text.is_empty() {
            buffer.text.push_str(separator);
        }
        buffer.text.push_str(block);
        buffer.text.push_str(separator);
    }

    fn in_code(&self) -> bool {
        self.pre_depth > 0 || self.code_depth > 0
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Handle an opening element. `None` means the children are skipped.
    fn open(&mut self, element: &Element) -> Option<Closing> {
        if self.in_code() {
            return self.open_in_code(element);
        }

        match element.tag {
            Tag::Heading(_) | Tag::TableHeader | Tag::TableData | Tag::Caption => {
                self.capture_block(true, true);
            }
            Tag::Paragraph | Tag::Blockquote | Tag::Option | Tag::Block => {
                let tight = self.current_ref().tight;
                self.capture_block(tight, false);
            }
            Tag::UnorderedList | Tag::OrderedList => {
                let ordered = element.tag == Tag::OrderedList;
                let next_number = element.attr("start").map_or(1, list_start);
                self.lists.push(ListFrame {
                    ordered,
                    next_number,
                });
                self.capture_block(true, false);
            }
            Tag::ListItem => self.capture_block(true, false),
            Tag::Strong
            | Tag::Emphasis
            | Tag::Underline
            | Tag::Strikethrough => self.capture_inline(false),
            Tag::Anchor => self.capture_inline(true),
            Tag::Code => {
                self.code_depth += 1;
                self.capture_inline(true);
            }
            Tag::Pre => {
                self.pre_depth += 1;
                self.fence_language = language_of(element);
                self.capture_block(false, false);
            }
            Tag::Table => self.tables.push(TableBuilder::new()),
            Tag::TableRow => {
                if let Some(table) = self.tables.last_mut() {
                    table.start_row();
                }
            }
            Tag::Image => {
                self.image(element);
                return None;
            }
            Tag::Break => {
                if self.current_ref().single_line {
                    self.push_space();
                } else {
                    let hard_break = self.options.hard_break();
                    self.push_str(hard_break);
                }
                return None;
            }
            Tag::Rule => {
                self.push_block_with("---", true);
                return None;
            }
            Tag::Title | Tag::Head | Tag::Stripped => return None,
            Tag::TableSection => {}
            Tag::Unknown => {
                log::trace!("Unknown tag <{}> rendered as its children", element.name);
            }
        }

        Some(match element.tag {
            Tag::Heading(level) => Closing::Heading(level),
            Tag::Paragraph => Closing::Paragraph,
            Tag::Strong => Closing::Delimited("**"),
            Tag::Emphasis => Closing::Delimited("*"),
            Tag::Underline => Closing::Delimited("_"),
            Tag::Strikethrough => Closing::Delimited("~~"),
            Tag::Anchor => Closing::Anchor,
            Tag::Code => Closing::InlineCode,
            Tag::Pre => Closing::CodeBlock,
            Tag::Blockquote => Closing::Blockquote,
            Tag::UnorderedList | Tag::OrderedList => Closing::List,
            Tag::ListItem => Closing::ListItem,
            Tag::Table => Closing::Table,
            Tag::TableRow => Closing::TableRow,
            Tag::TableHeader | Tag::TableData => Closing::TableCell(Alignment::from_attributes(
                element.attr("align"),
                element.attr("style"),
            )),
            Tag::Caption => Closing::Caption,
            Tag::Option => Closing::Option,
            Tag::Block => Closing::Block,
            Tag::TableSection | Tag::Unknown => Closing::Transparent,
            Tag::Image | Tag::Break | Tag::Rule | Tag::Title | Tag::Head | Tag::Stripped => {
                Closing::Transparent
            }
        })
    }

    /// Inside `pre` or inline `code` markup is dropped and text is kept verbatim
    fn open_in_code(&mut self, element: &Element) -> Option<Closing> {
        match element.tag {
            Tag::Break => {
                let line_break = if self.pre_depth > 0 { "\n" } else { " " };
                self.push_str(line_break);
                None
            }
            Tag::Image | Tag::Title | Tag::Head | Tag::Stripped => None,
            Tag::Code => {
                if self.pre_depth > 0 && self.fence_language.is_none() {
                    self.fence_language = language_of(element);
                }
                Some(Closing::Transparent)
            }
            _ => Some(Closing::Transparent),
        }
    }

    fn close(&mut self, element: &Element, closing: Closing) {
        match closing {
            Closing::Transparent => {}
            Closing::Block => {
                let buffer = self.release_buffer();
                self.push_tracked(&buffer.text, buffer.first_list, buffer.last_list);
            }
            Closing::Heading(level) => {
                let content = self.release();
                let text = collapse_whitespace(&content);
                if !text.is_empty() {
                    self.write_heading(level, &text);
                }
            }
            Closing::Paragraph => {
                let content = self.release();
                self.push_block(content.trim());
            }
            Closing::Delimited(marker) => self.close_delimited(marker),
            Closing::Anchor => self.close_anchor(element),
            Closing::InlineCode => self.close_inline_code(),
            Closing::CodeBlock => self.close_code_block(),
            Closing::Blockquote => {
                let content = self.release();
                let content = content.trim();
                if !content.is_empty() {
                    let quoted = content
                        .lines()
                        .map(|line| {
                            if line.is_empty() {
                                ">".to_string()
                            } else {
                                format!("> {line}")
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    self.push_block_with(&quoted, true);
                }
            }
            Closing::List => {
                let content = self.release();
                let ordered = self.lists.pop().is_some_and(|list| list.ordered);
                self.push_list(&content, ordered);
            }
            Closing::ListItem => {
                let content = self.release();
                self.close_list_item(content.trim());
            }
            Closing::Table => self.close_table(),
            Closing::TableRow => {
                if let Some(table) = self.tables.last_mut() {
                    table.end_row();
                }
            }
            Closing::TableCell(alignment) => {
                let content = self.release();
                match self.tables.last_mut() {
                    Some(table) => table.push_cell(&content, alignment),
                    None => {
                        self.push_space();
                        self.push_str(content.trim());
                    }
                }
            }
            Closing::Caption => {
                let content = self.release();
                match self.tables.last_mut() {
                    Some(table) => table.set_caption(&content),
                    None => self.push_block(content.trim()),
                }
            }
            Closing::Option => {
                let content = self.release();
                let text = collapse_whitespace(&content);
                if !text.is_empty() {
                    if !self.at_line_start() {
                        self.push_str("\n");
                    }
                    self.push_str(&text);
                    self.push_str("  \n");
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Element rules
    // ------------------------------------------------------------------

    fn text(&mut self, raw: &str) {
        if self.pre_depth > 0 {
            self.push_str(raw);
            return;
        }
        if self.code_depth > 0 {
            let flattened = raw.replace("\r\n", " ").replace(['\n', '\r'], " ");
            self.push_str(&flattened);
            return;
        }

        let collapsed = collapse_whitespace(raw);
        if collapsed.is_empty() {
            if !raw.is_empty() {
                self.push_space();
            }
            return;
        }

        if raw.starts_with(is_html_whitespace) {
            self.push_space();
        }
        let mut escaped = escape_text(&collapsed);
        if self.at_line_start() {
            escaped = escape_line_start(&escaped);
        }
        self.push_str(&escaped);
        if raw.ends_with(is_html_whitespace) {
            self.push_str(" ");
        }
    }

    fn write_heading(&mut self, level: u8, text: &str) {
        match (self.options.heading_style, level) {
            (HeadingStyle::Setext, 1 | 2) => {
                // The text line is a line start of its own, unlike ATX content
                let text = escape_line_start(text);
                let underline = if level == 1 { "=" } else { "-" };
                let block = format!("{text}\n{}", underline.repeat(text.chars().count()));
                self.push_block_with(&block, true);
            }
            _ => {
                let block = format!("{} {text}", "#".repeat(usize::from(level)));
                self.push_block(&block);
            }
        }
    }

    /// Wrap captured inline content in `marker`, keeping surrounding
    /// whitespace outside the delimiters.
    fn close_delimited(&mut self, marker: &str) {
        let content = self.release();
        let inner = content.trim_matches(is_html_whitespace);
        if inner.is_empty() {
            if !content.is_empty() {
                self.push_space();
            }
            return;
        }

        if content.starts_with(is_html_whitespace) {
            self.push_space();
        }
        self.push_str(marker);
        self.push_str(inner);
        self.push_str(marker);
        if content.ends_with(is_html_whitespace) {
            self.push_str(" ");
        }
    }

    fn close_anchor(&mut self, element: &Element) {
        let content = self.release();
        let text = collapse_whitespace(&content);
        if text.is_empty() {
            return;
        }

        let href = element
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .and_then(|href| self.security.sanitize_url(href));

        if content.starts_with(is_html_whitespace) {
            self.push_space();
        }
        match href {
            Some(href) => {
                let link = format!(
                    "[{text}]({}{})",
                    escape_url(href),
                    title_suffix(element.attr("title"))
                );
                self.push_str(&link);
            }
            None => self.push_str(&text),
        }
        if content.ends_with(is_html_whitespace) {
            self.push_str(" ");
        }
    }

    fn image(&mut self, element: &Element) {
        let Some(src) = element
            .attr("src")
            .map(str::trim)
            .filter(|src| !src.is_empty())
        else {
            return;
        };
        let Some(src) = self.security.sanitize_url(src) else {
            return;
        };

        let alt = escape_text(&collapse_whitespace(element.attr("alt").unwrap_or_default()));
        let image = format!(
            "![{alt}]({}{})",
            escape_url(src),
            title_suffix(element.attr("title"))
        );
        self.push_str(&image);
    }

    fn close_inline_code(&mut self) {
        self.code_depth = self.code_depth.saturating_sub(1);
        let content = self.release();
        if content.is_empty() {
            return;
        }

        let fence = "`".repeat(longest_run(&content, '`') + 1);
        let padding = if content.starts_with('`') || content.ends_with('`') {
            " "
        } else {
            ""
        };
        let span = format!("{fence}{padding}{content}{padding}{fence}");
        self.push_str(&span);
    }

    fn close_code_block(&mut self) {
        self.pre_depth = self.pre_depth.saturating_sub(1);
        let content = self.release();
        let language = self.fence_language.take().unwrap_or_default();

        let code = content.replace("\r\n", "\n");
        let code = code.strip_prefix('\n').unwrap_or(&code).trim_end();
        if code.is_empty() {
            return;
        }

        let fence = "`".repeat((longest_run(code, '`') + 1).max(3));
        let block = format!("{fence}{language}\n{code}\n{fence}");
        self.push_block(&block);
    }

    fn push_list(&mut self, list: &str, ordered: bool) {
        self.push_tracked(list, Some(ordered), Some(ordered));
    }

    /// Append a block that may start or end with a list
    fn push_tracked(&mut self, block: &str, first_list: Option<bool>, last_list: Option<bool>) {
        if block.trim().is_empty() {
            return;
        }
        // Adjacent lists of the same kind would merge into one
        if first_list.is_some() && self.current_ref().last_list == first_list {
            self.push_block("<!-- -->");
        }
        let starts_buffer = self.current_ref().text.trim().is_empty();
        self.push_block(block);
        let buffer = self.current();
        if starts_buffer {
            buffer.first_list = first_list;
        }
        buffer.last_list = last_list;
    }

    fn close_list_item(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }

        let marker = match self.lists.last_mut() {
            Some(list) if list.ordered => {
                let number = list.next_number;
                list.next_number = number.saturating_add(1).min(MAX_LIST_NUMBER);
                format!("{number}{} ", self.options.ordered_list_delimiter)
            }
            _ => format!("{} ", self.options.bullet_list_marker),
        };
        let indent = " ".repeat(marker.len());

        let mut item = String::with_capacity(content.len() + marker.len());
        for (index, line) in content.lines().enumerate() {
            if index == 0 {
                item.push_str(&marker);
            } else {
                item.push('\n');
                if !line.is_empty() {
                    item.push_str(&indent);
                }
            }
            item.push_str(line);
        }

        let buffer = self.current();
        buffer.last_list = None;
        if !buffer.text.is_empty() && !buffer.text.ends_with('\n') {
            buffer.text.push('\n');
        }
        buffer.text.push_str(&item);
        buffer.text.push('\n');
    }

    fn close_table(&mut self) {
        let Some(table) = self.tables.pop() else {
            return;
        };

        if !self.tables.is_empty() {
            // A pipe table cannot live inside another table's cell
            let flattened = table.flatten();
            if !flattened.is_empty() {
                self.push_space();
                self.push_str(&flattened);
            }
            return;
        }

        if let Some(caption) = table.caption() {
            self.push_block(caption);
        }
        if let Some(markdown) = table.render(self.options.format_tables) {
            self.push_block_with(&markdown, true);
        }
    }
}

// ----------------------------------------------------------------------
// Text helpers
// ----------------------------------------------------------------------

/// HTML inter-element whitespace (no-break space is content)
fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Collapse runs of HTML whitespace to single spaces and trim
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split(is_html_whitespace)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Backslash-escape characters that would otherwise be read as Markdown
///
/// `<` is escaped only where it would open raw HTML or an autolink.
///
/// ```rust
/// use html2md_converter::render::escape_text;
///
/// assert_eq!(escape_text("a*b"), "a\\*b");
/// assert_eq!(escape_text("[x]_y_`z`"), "\\[x\\]\\_y\\_\\`z\\`");
/// assert_eq!(escape_text("~~x~~"), "\\~\\~x\\~\\~");
/// assert_eq!(escape_text("<b> and 1 < 2"), "\\<b> and 1 < 2");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let special = match ch {
            '\\' | '*' | '_' | '`' | '[' | ']' | '~' => true,
            '<' => chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || matches!(*next, '/' | '!' | '?')),
            _ => false,
        };
        if special {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape text that would start a heading, list item, quote or Setext
/// underline when it begins a line.
fn escape_line_start(text: &str) -> String {
    static LINE_START_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = LINE_START_REGEX.get_or_init(|| {
        Regex::new(r"^(?:#{1,6}(?:\s|$)|[-+](?:\s|$)|>|(\d{1,9})[.)](?:\s|$)|[=-]+\s*$)").ok()
    });
    let Some(regex) = regex.as_ref() else {
        return text.to_string();
    };

    match regex.captures(text) {
        // Ordered list marker: escape the delimiter, "1\. "
        Some(caps) if caps.get(1).is_some() => {
            let digits = caps.get(1).map_or(0, |m| m.end());
            format!("{}\\{}", &text[..digits], &text[digits..])
        }
        Some(_) => format!("\\{text}"),
        None => text.to_string(),
    }
}

/// First number of an ordered list from its `start` attribute
///
/// Digit strings too long for a list marker are clamped; anything else
/// falls back to 1.
fn list_start(value: &str) -> u64 {
    let value = value.trim();
    match value.parse::<u64>() {
        Ok(start) => start.min(MAX_LIST_NUMBER),
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            MAX_LIST_NUMBER
        }
        Err(_) => 1,
    }
}

/// Whether `block` may directly follow a paragraph line without joining it
fn interrupts_paragraph(block: &str) -> bool {
    static INTERRUPT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    INTERRUPT_REGEX
        .get_or_init(|| {
            Regex::new(r"^(?:#{1,6}(?:\s|$)|[-+*]\s|1[.)]\s|`{3}|~{3}|>|<!--)").ok()
        })
        .as_ref()
        .is_some_and(|regex| regex.is_match(block))
}

/// Language named by a `language-*` or `lang-*` class
fn language_of(element: &Element) -> Option<String> {
    static LANGUAGE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = LANGUAGE_REGEX
        .get_or_init(|| Regex::new(r"(?:^|\s)(?:language|lang)-([A-Za-z0-9_+#.-]+)").ok());
    let regex = regex.as_ref()?;

    let class = element.attr("class")?;
    regex
        .captures(class)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Longest run of `ch` in `text`
fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Keep link destinations on one token: spaces and parentheses are
/// percent-encoded.
fn escape_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for ch in url.chars() {
        match ch {
            ' ' => escaped.push_str("%20"),
            '(' => escaped.push_str("%28"),
            ')' => escaped.push_str("%29"),
            '\n' | '\r' | '\t' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// ` "title"` for links and images, or nothing
fn title_suffix(title: Option<&str>) -> String {
    let title = collapse_whitespace(title.unwrap_or_default());
    if title.is_empty() {
        String::new()
    } else {
        format!(" \"{}\"", title.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
