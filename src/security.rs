//! Security validation for untrusted HTML input
//!
//! Two guards sit between the parsed tree and the Markdown output:
//!
//! 1. **Nesting depth**: both the DOM adapter and the render engine walk the
//!    tree with explicit stacks and fail closed with
//!    [`ConversionError::DepthExceeded`] instead of growing without bound on
//!    adversarial nesting.
//! 2. **URL schemes**: `javascript:`, `data:` and similar URLs are never
//!    emitted as link or image targets when sanitization is enabled.
//!
//! Event handler attributes (`onclick`, `onload`, ...) are dropped by the DOM
//! adapter so they never reach the render engine.

use crate::error::ConversionError;
use crate::options::DEFAULT_MAX_DEPTH;

/// Dangerous URL schemes that should be blocked
const DANGEROUS_URL_SCHEMES: &[&str] = &[
    "javascript:", // JavaScript execution
    "data:",       // Can contain executable content
    "vbscript:",   // VBScript execution (legacy IE)
    "file:",       // Local file access
    "about:",      // Browser internal URLs
];

/// Security validator for HTML input
#[derive(Debug, Clone)]
pub struct SecurityValidator {
    /// Maximum allowed nesting depth
    max_depth: usize,
    /// Whether dangerous URLs are removed
    sanitize_urls: bool,
}

impl SecurityValidator {
    /// Create a new security validator with default settings
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            sanitize_urls: true,
        }
    }

    /// Create a security validator with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::new()
        }
    }

    /// Build a validator from conversion options
    pub fn from_options(options: &crate::options::Options) -> Self {
        Self {
            max_depth: options.max_depth,
            sanitize_urls: options.sanitize_urls,
        }
    }

    /// Maximum nesting depth accepted by this validator
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Check if an attribute is an event handler
    ///
    /// # Examples
    ///
    /// ```
    /// use html2md_converter::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert!(validator.is_event_handler("onclick"));
    /// assert!(validator.is_event_handler("OnLoad"));
    /// assert!(!validator.is_event_handler("href"));
    /// ```
    pub fn is_event_handler(&self, attr_name: &str) -> bool {
        attr_name.len() > 2
            && attr_name
                .get(..2)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
    }

    /// Check if a URL uses a dangerous scheme
    ///
    /// Leading whitespace and ASCII control characters are ignored, as
    /// browsers do when resolving `href` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use html2md_converter::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert!(validator.is_dangerous_url("javascript:alert('xss')"));
    /// assert!(validator.is_dangerous_url("  JavaScript:alert(1)"));
    /// assert!(validator.is_dangerous_url("data:text/html,<script>alert('xss')</script>"));
    /// assert!(!validator.is_dangerous_url("https://example.com"));
    /// assert!(!validator.is_dangerous_url("/relative/path"));
    /// ```
    pub fn is_dangerous_url(&self, url: &str) -> bool {
        let cleaned: String = url
            .trim()
            .chars()
            .filter(|c| !c.is_ascii_control())
            .take(16)
            .collect::<String>()
            .to_ascii_lowercase();
        DANGEROUS_URL_SCHEMES
            .iter()
            .any(|scheme| cleaned.starts_with(scheme))
    }

    /// Validate nesting depth to prevent unbounded traversal
    ///
    /// # Examples
    ///
    /// ```
    /// use html2md_converter::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::with_max_depth(100);
    /// assert!(validator.validate_depth(50).is_ok());
    /// assert!(validator.validate_depth(150).is_err());
    /// ```
    pub fn validate_depth(&self, depth: usize) -> Result<(), ConversionError> {
        if depth > self.max_depth {
            log::warn!(
                "HTML nesting depth {} exceeds maximum allowed depth {}",
                depth,
                self.max_depth
            );
            Err(ConversionError::DepthExceeded {
                depth,
                limit: self.max_depth,
            })
        } else {
            Ok(())
        }
    }

    /// Sanitize a URL by removing dangerous schemes
    ///
    /// Returns `None` if the URL is dangerous and sanitization is enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use html2md_converter::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert_eq!(validator.sanitize_url("javascript:alert('xss')"), None);
    /// assert_eq!(validator.sanitize_url("https://example.com"), Some("https://example.com"));
    /// ```
    pub fn sanitize_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        if self.sanitize_urls && self.is_dangerous_url(url) {
            log::warn!("Dropping URL with unsafe scheme");
            None
        } else {
            Some(url)
        }
    }
}

impl Default for SecurityValidator {
    fn default() -> Self {
        Self::new()
    }
}
