//! Converter façade - runs the full HTML to Markdown pipeline
//!
//! The pipeline has four stages, each in its own module:
//!
//! 1. [`Options::validate`](crate::options::Options::validate)
//! 2. [`adapt_with_validator`]: parse with html5ever and adapt the tree
//! 3. [`MarkdownRenderer`]: render Markdown from the adapted tree
//! 4. [`PostProcessor`]: normalize whitespace and wrap lines
//!
//! Two entry points are provided:
//!
//! - [`convert`] is a pure function returning a [`ConversionOutcome`] by
//!   value. It holds no state and may be called concurrently.
//! - [`Converter`] keeps one HTML input, its options and the outcome of the
//!   last conversion, reported through [`Converter::ok`]. `convert` takes
//!   `&mut self`, so two conversions can never race on one instance.
//!
//! No error or panic crosses either entry point: failures are reported as an
//! empty result plus an error status.
//!
//! # Examples
//!
//! ```rust
//! use html2md_converter::converter::Converter;
//! use html2md_converter::options::Options;
//!
//! let options = Options {
//!     split_lines: false,
//!     ..Default::default()
//! };
//! let mut converter = Converter::new("<h1>Hello Python!</h1>", options);
//! assert_eq!(converter.convert(), "# Hello Python!\n");
//! assert!(converter.ok());
//! ```

use std::panic::{self, AssertUnwindSafe};

use crate::dom::adapt_with_validator;
use crate::error::{ConversionError, ErrorKind};
use crate::options::Options;
use crate::postprocess::PostProcessor;
use crate::render::MarkdownRenderer;
use crate::security::SecurityValidator;

/// Result of one conversion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionOutcome {
    /// Final Markdown; empty when the conversion failed
    pub markdown: String,
    pub error: Option<ConversionError>,
}

impl ConversionOutcome {
    fn success(markdown: String) -> Self {
        Self {
            markdown,
            error: None,
        }
    }

    fn failure(error: ConversionError) -> Self {
        Self {
            markdown: String::new(),
            error: Some(error),
        }
    }

    /// Whether the conversion succeeded
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ConversionError::kind)
    }
}

/// Convert HTML to Markdown
///
/// Never panics. A failure yields an empty `markdown` and the error.
///
/// # Examples
///
/// ```rust
/// use html2md_converter::converter::convert;
/// use html2md_converter::options::Options;
///
/// let outcome = convert("<p>a*b</p>", &Options::default());
/// assert!(outcome.ok());
/// assert_eq!(outcome.markdown, "a\\*b\n");
/// ```
pub fn convert(html: &str, options: &Options) -> ConversionOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| run_pipeline(html, options)));

    match result {
        Ok(Ok(markdown)) => ConversionOutcome::success(markdown),
        Ok(Err(error)) => {
            log::debug!("Conversion failed: {}", error);
            ConversionOutcome::failure(error)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("Panic during conversion: {}", message);
            ConversionOutcome::failure(ConversionError::Internal(message))
        }
    }
}

/// Convert HTML with default options, returning only the Markdown
///
/// ```rust
/// use html2md_converter::converter::html_to_markdown;
///
/// assert_eq!(html_to_markdown("<foo>bar</foo>"), "bar\n");
/// ```
pub fn html_to_markdown(html: &str) -> String {
    convert(html, &Options::default()).markdown
}

fn run_pipeline(html: &str, options: &Options) -> Result<String, ConversionError> {
    options.validate()?;
    log::debug!("Converting {} bytes of HTML", html.len());

    let validator = SecurityValidator::from_options(options);
    let root = adapt_with_validator(html, &validator)?;
    let raw = MarkdownRenderer::new(options).render(&root)?;
    let markdown = PostProcessor::new(options).normalize(&raw);

    log::debug!("Produced {} bytes of Markdown", markdown.len());
    Ok(markdown)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Internal panic during conversion".to_string()
    }
}

/// Stateful HTML to Markdown converter
///
/// Holds the HTML input, the options and the outcome of the most recent
/// [`convert`](Converter::convert) call.
#[derive(Debug, Clone)]
pub struct Converter {
    html: String,
    options: Options,
    last_result: String,
    last_error: Option<ErrorKind>,
}

impl Converter {
    /// Create a converter. No work happens until [`Converter::convert`].
    pub fn new(html: impl Into<String>, options: Options) -> Self {
        Self {
            html: html.into(),
            options,
            last_result: String::new(),
            last_error: None,
        }
    }

    /// Run the conversion and store its outcome
    ///
    /// Returns the Markdown, or `""` if the conversion failed. Each call
    /// replaces the previously stored outcome.
    pub fn convert(&mut self) -> String {
        let outcome = convert(&self.html, &self.options);
        self.last_error = outcome.error_kind();
        self.last_result = outcome.markdown;
        self.last_result.clone()
    }

    /// Whether the last conversion succeeded (`true` before the first one)
    pub fn ok(&self) -> bool {
        self.last_error.is_none()
    }

    /// Markdown produced by the last conversion
    pub fn last_result(&self) -> &str {
        &self.last_result
    }

    /// Kind of failure of the last conversion
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the HTML input; the stored outcome is kept until the next
    /// conversion.
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }
}
