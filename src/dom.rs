//! DOM adapter
//!
//! Converts the reference-counted html5ever tree into the crate's own owned
//! [`Node`] model. The render engine only ever sees this model: lowercase tag
//! names, a classified [`Tag`], plain attribute maps and owned children.
//!
//! While adapting, the tree is cleaned up:
//!
//! - `script`, `style` and other [`Tag::Stripped`] subtrees are removed
//! - event handler attributes are dropped
//! - whitespace-only text next to block elements is removed (except in `pre`)
//! - doctypes and processing instructions are dropped
//!
//! The walk uses an explicit stack, so deeply nested input fails with
//! [`ConversionError::DepthExceeded`] rather than overflowing the call stack.

use std::collections::HashMap;

use markup5ever_rcdom::{Handle, NodeData};

use crate::error::ConversionError;
use crate::parser::parse_html;
use crate::security::SecurityValidator;
use crate::tag::Tag;

/// One node of the adapted document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Tree root
    Document { children: Vec<Node> },
    Element(Element),
    Text(String),
    Comment(String),
}

/// An HTML element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name
    pub name: String,
    /// Tag class used for rendering dispatch
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        Self {
            tag: Tag::from_name(&name),
            name,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute, builder style
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Append a child, builder style
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append a text child, builder style
    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Node::Text(text.to_string()))
    }

    /// Look up an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    /// An empty document
    pub fn empty_document() -> Self {
        Node::Document {
            children: Vec::new(),
        }
    }

    /// Child nodes (empty for text and comments)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children } => children,
            Node::Element(element) => &element.children,
            Node::Text(_) | Node::Comment(_) => &[],
        }
    }

    fn push_child(&mut self, child: Node) {
        match self {
            Node::Document { children } => children.push(child),
            Node::Element(element) => element.children.push(child),
            Node::Text(_) | Node::Comment(_) => {}
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children } => Some(children),
            Node::Element(element) => Some(&mut element.children),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }

    /// Whether this node is an element that renders as its own block
    pub fn is_block(&self) -> bool {
        match self {
            Node::Element(element) => element.tag.is_block(),
            Node::Document { .. } => true,
            Node::Text(_) | Node::Comment(_) => false,
        }
    }

    /// Concatenated text of all descendant text nodes, in document order
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(contents) => text.push_str(contents),
                Node::Comment(_) => {}
                Node::Document { children } => stack.extend(children.iter().rev()),
                Node::Element(element) => stack.extend(element.children.iter().rev()),
            }
        }
        text
    }

    /// Text of the first `<title>` element, whitespace-collapsed
    pub fn title(&self) -> Option<String> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Element(element) if element.tag == Tag::Title => {
                    let title = node
                        .text_content()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ");
                    return (!title.is_empty()).then_some(title);
                }
                _ => stack.extend(node.children().iter().rev()),
            }
        }
        None
    }

    /// Maximum element nesting depth below this node (0 for a leaf)
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in node.children() {
                if let Node::Element(_) = child {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }
}

/// Parse and adapt HTML with the default depth limit
///
/// Empty or whitespace-only input yields an empty document.
///
/// # Examples
///
/// ```rust
/// use html2md_converter::dom::{adapt, Node};
///
/// let root = adapt("<p>Hello <script>x()</script>world</p>").expect("adapt failed");
/// assert_eq!(root.text_content(), "Hello world");
///
/// assert_eq!(adapt("").expect("empty input is fine"), Node::empty_document());
/// ```
pub fn adapt(html: &str) -> Result<Node, ConversionError> {
    adapt_with_validator(html, &SecurityValidator::new())
}

/// Parse and adapt HTML, enforcing the validator's depth limit
pub fn adapt_with_validator(
    html: &str,
    validator: &SecurityValidator,
) -> Result<Node, ConversionError> {
    if html.trim().is_empty() {
        return Ok(Node::empty_document());
    }

    let dom = parse_html(html)?;
    from_rcdom(&dom.document, validator)
}

/// One open node during the adapter walk
struct Frame {
    handle: Handle,
    next_child: usize,
    node: Node,
    in_pre: bool,
}

/// Convert an html5ever subtree into an owned [`Node`] tree
pub fn from_rcdom(root: &Handle, validator: &SecurityValidator) -> Result<Node, ConversionError> {
    let mut stack = vec![Frame {
        handle: root.clone(),
        next_child: 0,
        node: Node::empty_document(),
        in_pre: false,
    }];
    let mut stripped = 0usize;
    let mut elements = 0usize;

    loop {
        let Some(frame) = stack.last_mut() else {
            return Err(ConversionError::Parse(
                "adapter stack emptied before reaching the root".to_string(),
            ));
        };

        let next = frame.handle.children.borrow().get(frame.next_child).cloned();
        let Some(child) = next else {
            // All children collected: close the frame and hand it to its parent
            let Some(mut finished) = stack.pop() else {
                continue;
            };
            let parent_is_block = finished.node.is_block();
            if !finished.in_pre {
                if let Some(children) = finished.node.children_mut() {
                    drop_block_whitespace(children, parent_is_block);
                }
            }
            match stack.last_mut() {
                Some(parent) => parent.node.push_child(finished.node),
                None => {
                    log::debug!(
                        "Adapted {} elements ({} stripped subtrees)",
                        elements,
                        stripped
                    );
                    return Ok(finished.node);
                }
            }
            continue;
        };
        frame.next_child += 1;
        let in_pre = frame.in_pre;

        match child.data {
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let mut element = Element::new(name.local.as_ref());
                if element.tag == Tag::Stripped {
                    stripped += 1;
                    continue;
                }
                for attr in attrs.borrow().iter() {
                    let attr_name = attr.name.local.as_ref();
                    if validator.is_event_handler(attr_name) {
                        continue;
                    }
                    element
                        .attributes
                        .insert(attr_name.to_ascii_lowercase(), attr.value.to_string());
                }

                validator.validate_depth(stack.len())?;
                elements += 1;
                let in_pre = in_pre || element.tag == Tag::Pre;
                stack.push(Frame {
                    handle: child.clone(),
                    next_child: 0,
                    node: Node::Element(element),
                    in_pre,
                });
            }
            NodeData::Text { ref contents } => {
                frame.node.push_child(Node::Text(contents.borrow().to_string()));
            }
            NodeData::Comment { ref contents } => {
                frame.node.push_child(Node::Comment(contents.to_string()));
            }
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }
}

/// Remove whitespace-only text nodes adjacent to block elements.
///
/// The first and last children count as adjacent to the parent when the
/// parent itself is a block.
fn drop_block_whitespace(children: &mut Vec<Node>, parent_is_block: bool) {
    let len = children.len();
    let keep: Vec<bool> = (0..len)
        .map(|i| {
            let Node::Text(text) = &children[i] else {
                return true;
            };
            if !text.chars().all(char::is_whitespace) {
                return true;
            }
            let prev_block = if i == 0 {
                parent_is_block
            } else {
                children[i - 1].is_block()
            };
            let next_block = if i + 1 == len {
                parent_is_block
            } else {
                children[i + 1].is_block()
            };
            !(prev_block || next_block)
        })
        .collect();

    let mut keep = keep.into_iter();
    children.retain(|_| keep.next().unwrap_or(true));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(root: &Node) -> &Element {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Node::Element(element) = node {
                if element.name == "body" {
                    return element;
                }
            }
            stack.extend(node.children().iter());
        }
        panic!("no body element in {root:?}");
    }

    #[test]
    fn test_empty_input_is_empty_document() {
        assert_eq!(adapt("").expect("adapt failed"), Node::empty_document());
        assert_eq!(adapt("  \n\t ").expect("adapt failed"), Node::empty_document());
    }

    #[test]
    fn test_script_and_style_are_stripped() {
        let root = adapt("<style>p{}</style><p>Keep<script>drop()</script></p>").expect("adapt failed");
        let text = root.text_content();
        assert_eq!(text, "Keep");
    }

    #[test]
    fn test_tag_names_are_lowercase() {
        let root = adapt("<DIV><P>Text</P></DIV>").expect("adapt failed");
        let body = body(&root);
        let Node::Element(div) = &body.children[0] else {
            panic!("expected div element");
        };
        assert_eq!(div.name, "div");
        assert_eq!(div.tag, Tag::Block);
    }

    #[test]
    fn test_event_handlers_dropped() {
        let root = adapt(r#"<a href="/x" onclick="evil()">x</a>"#).expect("adapt failed");
        let body = body(&root);
        let Node::Element(anchor) = &body.children[0] else {
            panic!("expected anchor element");
        };
        assert_eq!(anchor.attr("href"), Some("/x"));
        assert_eq!(anchor.attr("onclick"), None);
    }

    #[test]
    fn test_whitespace_between_blocks_removed() {
        let root = adapt("<div>\n  <p>a</p>\n  <p>b</p>\n</div>").expect("adapt failed");
        let body = body(&root);
        let Node::Element(div) = &body.children[0] else {
            panic!("expected div element");
        };
        assert_eq!(div.children.len(), 2);
        assert!(div.children.iter().all(Node::is_block));
    }

    #[test]
    fn test_whitespace_between_inline_elements_kept() {
        let root = adapt("<p><b>a</b> <i>b</i></p>").expect("adapt failed");
        let body = body(&root);
        let Node::Element(paragraph) = &body.children[0] else {
            panic!("expected paragraph element");
        };
        assert_eq!(paragraph.children.len(), 3);
        assert_eq!(paragraph.children[1], Node::Text(" ".to_string()));
    }

    #[test]
    fn test_whitespace_in_pre_kept() {
        let root = adapt("<pre>  <code>x</code>  </pre>").expect("adapt failed");
        assert_eq!(root.text_content(), "  x  ");
    }

    #[test]
    fn test_title_lookup() {
        let root = adapt("<html><head><title>  My\n Page </title></head><body></body></html>")
            .expect("adapt failed");
        assert_eq!(root.title().as_deref(), Some("My Page"));

        let untitled = adapt("<p>No title</p>").expect("adapt failed");
        assert_eq!(untitled.title(), None);
    }

    #[test]
    fn test_depth_limit() {
        let html = "<div>".repeat(50);
        let validator = SecurityValidator::with_max_depth(20);
        let result = adapt_with_validator(&html, &validator);
        assert!(matches!(
            result,
            Err(ConversionError::DepthExceeded { limit: 20, .. })
        ));

        let root = adapt(&html).expect("default limit allows 50 levels");
        // html > body > 50 divs
        assert_eq!(root.depth(), 52);
    }

    #[test]
    fn test_builder_helpers() {
        let element = Element::new("A").with_attr("HREF", "/x").with_text("x");
        assert_eq!(element.name, "a");
        assert_eq!(element.tag, Tag::Anchor);
        assert_eq!(element.attr("href"), Some("/x"));
        assert_eq!(Node::from(element).text_content(), "x");
    }
}
