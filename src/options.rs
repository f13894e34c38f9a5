//! Conversion options
//!
//! `Options` is an immutable snapshot: build it once with struct-update
//! syntax and share it freely between conversions.
//!
//! ```rust
//! use html2md_converter::options::{HeadingStyle, Options};
//!
//! let options = Options {
//!     split_lines: false,
//!     heading_style: HeadingStyle::Setext,
//!     bullet_list_marker: '*',
//!     ..Default::default()
//! };
//! assert!(options.validate().is_ok());
//! ```

use crate::error::ConversionError;

/// Default column at which paragraph text is wrapped
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Default maximum element nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Heading style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Prefix with `#` characters
    #[default]
    Atx,
    /// Underline with `=` (h1) or `-` (h2); h3-h6 fall back to ATX
    Setext,
}

/// How `<br>` is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreakStyle {
    /// Two trailing spaces before the newline
    #[default]
    TrailingSpaces,
    /// A backslash before the newline
    Backslash,
}

/// Options controlling Markdown rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Wrap paragraph text at `line_width`
    pub split_lines: bool,
    /// Column used when `split_lines` is enabled
    pub line_width: usize,
    /// Heading style
    pub heading_style: HeadingStyle,
    /// Marker for unordered list items (`-`, `+` or `*`)
    pub bullet_list_marker: char,
    /// Character after ordered list numbers (`.` or `)`)
    pub ordered_list_delimiter: char,
    /// Hard line break style
    pub line_break: LineBreakStyle,
    /// Prepend the document `<title>` as a level 1 heading
    pub include_title: bool,
    /// Pad table columns to a common width
    pub format_tables: bool,
    /// Drop links and images with javascript:, data: and similar URLs
    pub sanitize_urls: bool,
    /// Maximum element nesting depth before conversion fails
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            split_lines: true,
            line_width: DEFAULT_LINE_WIDTH,
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: '-',
            ordered_list_delimiter: '.',
            line_break: LineBreakStyle::TrailingSpaces,
            include_title: true,
            format_tables: true,
            sanitize_urls: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    /// Check that the option values can produce valid Markdown
    pub fn validate(&self) -> Result<(), ConversionError> {
        if !matches!(self.bullet_list_marker, '-' | '+' | '*') {
            return Err(ConversionError::InvalidOptions(format!(
                "bullet list marker must be '-', '+' or '*', got {:?}",
                self.bullet_list_marker
            )));
        }
        if !matches!(self.ordered_list_delimiter, '.' | ')') {
            return Err(ConversionError::InvalidOptions(format!(
                "ordered list delimiter must be '.' or ')', got {:?}",
                self.ordered_list_delimiter
            )));
        }
        if self.split_lines && self.line_width == 0 {
            return Err(ConversionError::InvalidOptions(
                "line width must be positive when line splitting is enabled".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ConversionError::InvalidOptions(
                "max depth must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The Markdown emitted for a hard line break
    pub(crate) fn hard_break(&self) -> &'static str {
        match self.line_break {
            LineBreakStyle::TrailingSpaces => "  \n",
            LineBreakStyle::Backslash => "\\\n",
        }
    }
}
