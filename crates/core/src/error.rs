//! Error types for chatscribe operations.
//!
//! This module defines the main error type [`ChatscribeError`] which covers
//! reading exports, isolating conversation content, rendering, writing notes
//! and (optionally) remote title generation.
//!
//! Extraction entry points never return these errors directly: they are
//! folded into a failed [`ExtractionResult`](crate::ExtractionResult) whose
//! `message` is the error's display text.
//!
//! # Example
//!
//! ```rust
//! use chatscribe_core::{ChatscribeError, Result};
//!
//! fn require_phrase(phrase: &str) -> Result<&str> {
//!     if phrase.trim().is_empty() {
//!         return Err(ChatscribeError::PhraseNotFound(phrase.to_string()));
//!     }
//!     Ok(phrase)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for chat export operations.
#[derive(Error, Debug)]
pub enum ChatscribeError {
    /// The export file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The export file could not be decoded as UTF-8 text.
    #[error("Failed to read {}: encoding issue", .0.display())]
    EncodingError(PathBuf),

    /// The export file or folder exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    ReadError { path: PathBuf, source: std::io::Error },

    /// No text node in the document contains the search phrase.
    #[error("Phrase not found in the document: {0:?}")]
    PhraseNotFound(String),

    /// The matched text has no block-level ancestor to anchor the search.
    #[error("Could not determine the message container for the matched phrase")]
    ContainerAmbiguous,

    /// The question was located but no following block looked like an answer.
    #[error("Found the question, but could not isolate the AI answer")]
    ResponseNotIsolated,

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The Markdown renderer failed.
    #[error("Failed to render Markdown: {0}")]
    RenderError(String),

    /// File write errors.
    ///
    /// Wraps standard I/O errors for note and log files.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// Configuration file errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request errors from the title service.
    #[cfg(feature = "remote-titles")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The title service answered with something that is not a usable title.
    #[error("Invalid title response: {0}")]
    InvalidTitleResponse(String),
}

/// Result type alias for ChatscribeError.
pub type Result<T> = std::result::Result<T, ChatscribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatscribeError::PhraseNotFound("merge sort".to_string());
        assert!(err.to_string().contains("Phrase not found"));
        assert!(err.to_string().contains("merge sort"));
    }

    #[test]
    fn test_file_not_found_error() {
        let err = ChatscribeError::FileNotFound(PathBuf::from("/tmp/missing.html"));
        assert!(err.to_string().contains("missing.html"));
    }

    #[test]
    fn test_read_error_names_the_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ChatscribeError::ReadError { path: PathBuf::from("/tmp/locked.html"), source };
        assert_eq!(err.to_string(), "Failed to read /tmp/locked.html: denied");
    }

    #[test]
    fn test_timeout_error() {
        let err = ChatscribeError::Timeout { timeout: 10 };
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChatscribeError = io.into();
        assert!(matches!(err, ChatscribeError::WriteError(_)));
    }
}
