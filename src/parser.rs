//! HTML5 parser using html5ever
//!
//! The parser uses html5ever, which implements the WHATWG HTML5 parsing
//! algorithm. Malformed markup (unclosed tags, misnested formatting, stray end
//! tags) is repaired the same way browsers repair it, so nearly every input
//! produces a usable tree.
//!
//! # Examples
//!
//! ```rust
//! use html2md_converter::parser::parse_html;
//!
//! // Parse well-formed HTML
//! let dom = parse_html("<html><body><h1>Hello</h1></body></html>").expect("Failed to parse HTML");
//!
//! // Parse malformed HTML (missing closing tags)
//! let dom = parse_html("<html><body><h1>Hello").expect("Parser handles malformed HTML");
//! ```
//!
//! # Configuration
//!
//! The parser uses default html5ever configuration:
//! - **Scripting**: Disabled (scripts are not executed)
//! - **Error Handling**: Errors are collected but parsing continues
//! - **Tree Builder**: Uses RcDom for reference-counted DOM nodes

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{NodeData, RcDom};

use crate::error::ConversionError;

/// Parse an HTML string into a DOM tree
///
/// # Errors
///
/// Returns `ConversionError::Parse` if the tree builder produced a document
/// without any element. html5ever synthesizes `html`, `head` and `body` for
/// any input, so this only happens if the parser itself misbehaves.
pub fn parse_html(html: &str) -> Result<RcDom, ConversionError> {
    // Parse directly from a UTF-8 string sink to avoid `std::io::Read`
    // overhead in the hot path.
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let has_root_element = dom
        .document
        .children
        .borrow()
        .iter()
        .any(|child| matches!(child.data, NodeData::Element { .. }));
    if !has_root_element {
        return Err(ConversionError::Parse(
            "HTML tree builder produced no root element".to_string(),
        ));
    }

    log::debug!("Parsed {} bytes of HTML", html.len());
    Ok(dom)
}
