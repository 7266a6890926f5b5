//! Error types for Restyler operations.
//!
//! This module defines the main error type [`RestylerError`] which represents
//! every failure the pipeline reports to its callers: rejected input, fetch
//! problems, and configuration mistakes.
//!
//! Parsing never appears here. Malformed HTML always degrades to a best-effort
//! tree, and the plain-text normalizer is total.
//!
//! # Example
//!
//! ```rust
//! use restyler_core::{RestylerError, transform};
//!
//! match transform("", "# Title") {
//!     Ok(result) => println!("{}", result.transformed_html),
//!     Err(RestylerError::Validation(message)) => println!("rejected: {}", message),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for restyling operations.
#[derive(Error, Debug)]
pub enum RestylerError {
    /// Input rejected before any processing.
    ///
    /// Returned when source HTML or target content is empty or whitespace-only.
    #[error("{0}")]
    Validation(String),

    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and non-success status codes.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A Markdown signal pattern failed to compile.
    #[error("Invalid signal pattern: {0}")]
    InvalidPattern(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read and write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors.
    ///
    /// Returned when a configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RestylerError {
    /// Returns true when the error is a rejected-input error rather than a fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, RestylerError::Validation(_))
    }
}

impl From<regex::Error> for RestylerError {
    fn from(err: regex::Error) -> Self {
        RestylerError::InvalidPattern(err.to_string())
    }
}

/// Result type alias for RestylerError.
pub type Result<T> = std::result::Result<T, RestylerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RestylerError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = RestylerError::Validation("Both source HTML and target content are required".to_string());
        assert_eq!(err.to_string(), "Both source HTML and target content are required");
        assert!(err.is_validation());
    }

    #[test]
    fn test_timeout_error() {
        let err = RestylerError::Timeout { timeout: 10 };
        assert!(err.to_string().contains("10"));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: RestylerError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, RestylerError::InvalidPattern(_)));
    }
}
