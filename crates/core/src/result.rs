//! Extraction outcome.
//!
//! This module defines [`ExtractionResult`], the single value every
//! extraction entry point returns. Failures are carried in the value rather
//! than as an `Err`, so callers handle one type.

use serde::Serialize;

use crate::{ChatscribeError, Result};

/// The outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub success: bool,

    /// Rendered Markdown, present only on success.
    pub markdown: Option<String>,

    /// Human-readable status or failure reason.
    pub message: String,

    /// Whitespace-separated words in `markdown`.
    pub word_count: usize,

    /// Sorted, unique language tags found in `markdown`.
    pub detected_languages: Vec<String>,

    /// Conversation title from page metadata, if one could be derived.
    pub title: Option<String>,
}

impl ExtractionResult {
    /// A successful result; the word count is derived from `markdown`.
    pub fn success(
        markdown: String, message: impl Into<String>, detected_languages: Vec<String>, title: Option<String>,
    ) -> Self {
        let word_count = markdown.split_whitespace().count();
        Self { success: true, markdown: Some(markdown), message: message.into(), word_count, detected_languages, title }
    }

    /// A failed result whose message is the error's display text.
    pub fn failure(error: &ChatscribeError) -> Self {
        Self {
            success: false,
            markdown: None,
            message: error.to_string(),
            word_count: 0,
            detected_languages: Vec::new(),
            title: None,
        }
    }

    /// Serializes the result as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ChatscribeError::RenderError`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ChatscribeError::RenderError(e.to_string()))
    }
}

impl From<ChatscribeError> for ExtractionResult {
    fn from(error: ChatscribeError) -> Self {
        Self::failure(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_counts_words() {
        let result = ExtractionResult::success(
            "# Title\n\nTwo  words\nand more".to_string(),
            "Extraction successful.",
            vec!["python".to_string()],
            Some("Title".to_string()),
        );

        assert!(result.success);
        assert_eq!(result.word_count, 6);
        assert_eq!(result.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_failure_from_error() {
        let result: ExtractionResult = ChatscribeError::ResponseNotIsolated.into();

        assert!(!result.success);
        assert!(result.markdown.is_none());
        assert_eq!(result.word_count, 0);
        assert_eq!(result.message, "Found the question, but could not isolate the AI answer");
    }

    #[test]
    fn test_to_json() {
        let result = ExtractionResult::success("hello world".to_string(), "ok", vec![], None);
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["word_count"], 2);
        assert_eq!(json["markdown"], "hello world");
        assert!(json["title"].is_null());
    }
}
