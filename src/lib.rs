//! HTML to Markdown conversion library
//!
//! This library converts HTML documents into clean, CommonMark-compatible
//! Markdown with GitHub-style tables and strikethrough.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: HTML5 parsing using html5ever
//! - `dom`: adaptation of the parsed tree into an owned, cleaned node model
//! - `tag`: classification of element names into rendering classes
//! - `render`: Markdown generation from the node tree
//! - `table`: pipe table layout
//! - `postprocess`: whitespace normalization and line wrapping
//! - `converter`: the pipeline entry points
//! - `options`: conversion configuration
//! - `security`: depth limits and URL sanitization
//!
//! # Examples
//!
//! ```rust
//! use html2md_converter::{convert, Options};
//!
//! let outcome = convert("<h2>Intro</h2><p>Some <b>bold</b> text.</p>", &Options::default());
//! assert!(outcome.ok());
//! assert_eq!(outcome.markdown, "## Intro\n\nSome **bold** text.\n");
//! ```
//!
//! # Safety
//!
//! The library contains no `unsafe` code. Input of any shape is accepted:
//! malformed HTML is repaired by the parser, nesting is bounded by
//! [`Options::max_depth`], and panics are caught at the converter boundary.

// Module declarations
pub mod converter;
pub mod dom;
pub mod error;
pub mod options;
pub mod parser;
pub mod postprocess;
pub mod render;
pub mod security;
pub mod table;
pub mod tag;

// Re-export main types for convenience
pub use converter::{ConversionOutcome, Converter, convert, html_to_markdown};
pub use dom::{Element, Node, adapt};
pub use error::{ConversionError, ErrorKind};
pub use options::{HeadingStyle, LineBreakStyle, Options};
pub use parser::parse_html;
pub use postprocess::{PostProcessor, normalize};
pub use render::{MarkdownRenderer, render};
pub use tag::Tag;
