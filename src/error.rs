//! Error types for conversion operations

use thiserror::Error;

/// Errors that can occur during HTML to Markdown conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The HTML tree builder could not produce a document tree
    #[error("Parse error: {0}")]
    Parse(String),
    /// Element nesting exceeded the configured limit
    #[error("Nesting depth {depth} exceeds limit of {limit}")]
    DepthExceeded { depth: usize, limit: usize },
    /// Options failed validation
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    /// Internal error (a panic caught at the converter boundary)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a failed conversion, as recorded by
/// [`Converter`](crate::converter::Converter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ParseFailure,
    DepthExceeded,
    InvalidOptions,
    Internal,
}

impl ConversionError {
    /// The kind of failure, without its message
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Parse(_) => ErrorKind::ParseFailure,
            ConversionError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            ConversionError::InvalidOptions(_) => ErrorKind::InvalidOptions,
            ConversionError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get numeric error code
    pub fn code(&self) -> u32 {
        match self.kind() {
            ErrorKind::ParseFailure => 1,
            ErrorKind::DepthExceeded => 2,
            ErrorKind::InvalidOptions => 3,
            ErrorKind::Internal => 99,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_and_codes() {
        let err = ConversionError::DepthExceeded {
            depth: 12,
            limit: 10,
        };
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
        assert_eq!(err.code(), 2);
        assert_eq!(err.to_string(), "Nesting depth 12 exceeds limit of 10");

        let err = ConversionError::Parse("no document".to_string());
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert_eq!(err.code(), 1);

        assert_eq!(ConversionError::Internal("boom".into()).code(), 99);
    }
}
