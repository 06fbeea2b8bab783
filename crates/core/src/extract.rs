//! Main extraction API.
//!
//! [`ChatExtractor`] runs the passes in order: title extraction, artifact
//! stripping, content isolation, rendering, post-processing and tag
//! detection. Two modes are offered:
//!
//! - **response**: one answer, located through a phrase from the question
//! - **full page**: the whole conversation, without user-pasted code
//!
//! Every entry point returns an [`ExtractionResult`]; failures are reported
//! through `success = false` and a message.
//!
//! # Example
//!
//! ```rust
//! use chatscribe_core::ChatExtractor;
//!
//! let html = r#"
//!     <html><head><title>Merge Sort Explanation - ChatGPT</title></head><body>
//!         <div><p>How does merge sort work?</p></div>
//!         <div><p>Merge sort splits the list in half, sorts both halves and merges them.</p></div>
//!     </body></html>
//! "#;
//!
//! let result = ChatExtractor::new().extract_response_html(html, "merge sort work");
//! assert!(result.success);
//! assert_eq!(result.title.as_deref(), Some("Merge Sort Explanation"));
//! ```

use std::path::Path;

use tracing::{info, warn};

use crate::Result;
use crate::classify::detect_code_language;
use crate::config::{ExporterSettings, HeadingStyle};
use crate::fetch::read_html_file;
use crate::formatters::{DefaultRenderer, MarkdownConfig, MarkdownRenderer};
use crate::isolate::{isolate_main_content, isolate_response};
use crate::parse::Document;
use crate::postprocess::{PostProcessConfig, postprocess_markdown};
use crate::result::ExtractionResult;
use crate::simplify::simplify_user_messages;
use crate::strip::{strip_decorative, strip_platform_artifacts};
use crate::tags::{BASE_TAG, detect_tags};
use crate::title::{conversation_title, conversation_title_extended};

/// Extra tags removed before a full-page export.
const FULL_PAGE_EXTRA_TAGS: &[&str] = &["header"];

/// Configuration for extraction.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::{ExtractConfig, HeadingStyle};
///
/// let config = ExtractConfig::builder()
///     .strip_buttons(false)
///     .heading_style(HeadingStyle::Setext)
///     .build();
/// assert!(config.extended_titles);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Remove copy buttons and code toolbars (default: true).
    pub strip_buttons: bool,

    /// Heading syntax of the output (default: ATX).
    pub heading_style: HeadingStyle,

    /// In full-page mode, fall back to the active sidebar item and the first
    /// user message when the page title is only branding (default: true).
    pub extended_titles: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { strip_buttons: true, heading_style: HeadingStyle::Atx, extended_titles: true }
    }
}

impl ExtractConfig {
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }

    /// Extraction options from the exporter settings.
    pub fn from_settings(settings: &ExporterSettings) -> Self {
        Self { strip_buttons: settings.strip_buttons, heading_style: settings.heading_style, ..Self::default() }
    }

    fn markdown_config(&self) -> MarkdownConfig {
        MarkdownConfig { heading_style: self.heading_style }
    }
}

/// Builder for [`ExtractConfig`].
#[derive(Debug, Default)]
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    pub fn strip_buttons(mut self, value: bool) -> Self {
        self.config.strip_buttons = value;
        self
    }

    pub fn heading_style(mut self, value: HeadingStyle) -> Self {
        self.config.heading_style = value;
        self
    }

    pub fn extended_titles(mut self, value: bool) -> Self {
        self.config.extended_titles = value;
        self
    }

    pub fn build(self) -> ExtractConfig {
        self.config
    }
}

/// Extracts conversation content from chat exports.
#[derive(Debug, Clone, Default)]
pub struct ChatExtractor<R = DefaultRenderer> {
    config: ExtractConfig,
    renderer: R,
}

impl ChatExtractor {
    /// Creates an extractor with the default configuration and renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor with custom configuration and the default renderer.
    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config, renderer: DefaultRenderer::default() }
    }
}

impl<R: MarkdownRenderer> ChatExtractor<R> {
    /// Creates an extractor with a custom renderer.
    pub fn with_renderer(config: ExtractConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts the answer to the question containing `phrase` from a file.
    pub fn extract_response(&self, path: impl AsRef<Path>, phrase: &str) -> ExtractionResult {
        let path = path.as_ref();
        match read_html_file(path) {
            Ok(html) => self.extract_response_html(&html, phrase),
            Err(e) => fail(e, path),
        }
    }

    /// Extracts the answer to the question containing `phrase` from HTML text.
    pub fn extract_response_html(&self, html: &str, phrase: &str) -> ExtractionResult {
        self.try_response(html, phrase).unwrap_or_else(ExtractionResult::from)
    }

    /// Exports a whole conversation page from a file.
    pub fn extract_full_page(&self, path: impl AsRef<Path>) -> ExtractionResult {
        let path = path.as_ref();
        match read_html_file(path) {
            Ok(html) => self.extract_full_page_html(&html),
            Err(e) => fail(e, path),
        }
    }

    /// Exports a whole conversation page from HTML text.
    pub fn extract_full_page_html(&self, html: &str) -> ExtractionResult {
        self.try_full_page(html).unwrap_or_else(ExtractionResult::from)
    }

    fn try_response(&self, html: &str, phrase: &str) -> Result<ExtractionResult> {
        let mut doc = Document::parse(html);
        let title = conversation_title(&doc);

        strip_platform_artifacts(&mut doc);
        let answer = isolate_response(&doc, phrase)?;
        strip_decorative(&mut doc, Some(answer), &[], self.config.strip_buttons)?;

        let markdown = self.render(&doc, answer, false)?;
        let languages = detected_languages(&markdown);
        info!(phrase, words = markdown.split_whitespace().count(), languages = ?languages, "extracted response");

        Ok(ExtractionResult::success(markdown, "Extraction successful.", languages, title))
    }

    fn try_full_page(&self, html: &str) -> Result<ExtractionResult> {
        let mut doc = Document::parse(html);
        let title = if self.config.extended_titles {
            conversation_title_extended(&doc)
        } else {
            conversation_title(&doc)
        };

        strip_decorative(&mut doc, None, FULL_PAGE_EXTRA_TAGS, self.config.strip_buttons)?;
        strip_platform_artifacts(&mut doc);
        simplify_user_messages(&mut doc)?;
        let main = isolate_main_content(&doc)?;

        let markdown = self.render(&doc, main, true)?;
        let languages = detected_languages(&markdown);
        info!(
            title = title.as_deref().unwrap_or("untitled"),
            words = markdown.split_whitespace().count(),
            languages = ?languages,
            "exported full page"
        );

        Ok(ExtractionResult::success(markdown, "Full-page export successful.", languages, title))
    }

    fn render(&self, doc: &Document, scope: ego_tree::NodeId, full_page: bool) -> Result<String> {
        let markdown = self
            .renderer
            .render(doc, scope, &self.config.markdown_config(), &detect_code_language)?;
        Ok(postprocess_markdown(&markdown, &PostProcessConfig { full_page }))
    }
}

/// Detected tags minus the base tag every export carries.
fn detected_languages(markdown: &str) -> Vec<String> {
    detect_tags(markdown).into_iter().filter(|tag| tag != BASE_TAG).collect()
}

fn fail(error: crate::ChatscribeError, path: &Path) -> ExtractionResult {
    warn!(path = %path.display(), error = %error, "could not read export");
    ExtractionResult::from(error)
}

/// Extracts one answer from a file with the default renderer.
///
/// # Example
///
/// ```rust,no_run
/// use chatscribe_core::{ExtractConfig, extract_response};
///
/// let result = extract_response("chat.html", "merge sort", &ExtractConfig::default());
/// if let Some(markdown) = result.markdown {
///     println!("{}", markdown);
/// }
/// ```
pub fn extract_response(path: impl AsRef<Path>, phrase: &str, config: &ExtractConfig) -> ExtractionResult {
    ChatExtractor::with_config(*config).extract_response(path, phrase)
}

/// Exports a whole conversation page from a file with the default renderer.
pub fn extract_full_page(path: impl AsRef<Path>, config: &ExtractConfig) -> ExtractionResult {
    ChatExtractor::with_config(*config).extract_full_page(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::{LanguageClassifier, TextRenderer};
    use ego_tree::NodeId;

    const CHATGPT_PAGE: &str = r#"
        <html>
        <head><title>Merge Sort Explanation - ChatGPT</title></head>
        <body>
            <nav class="sidebar"><a>Quicksort pivot choice</a></nav>
            <main>
                <h1>ChatGPT</h1>
                <div data-message-author-role="user" class="user-message">
                    <p>Can you explain merge sort? My attempt:</p>
                    <pre><code>def merge_sort(xs): pass</code></pre>
                </div>
                <div data-message-author-role="assistant">
                    <div class="markdown">
                        <p>Merge sort is a divide and conquer algorithm. Here is a Python version:</p>
                        <pre><div class="code-toolbar"><button>Copy code</button></div><code>def merge_sort(xs):
    if len(xs) &lt;= 1:
        return xs</code></pre>
                    </div>
                </div>
            </main>
        </body>
        </html>
    "#;

    struct Recording;

    impl MarkdownRenderer for Recording {
        fn render(
            &self, doc: &Document, scope: NodeId, _config: &MarkdownConfig, _classify: LanguageClassifier<'_>,
        ) -> Result<String> {
            Ok(format!("<{}>", doc.tag_name(scope).unwrap_or("?")))
        }
    }

    #[test]
    fn test_extract_response() {
        let result = ChatExtractor::with_renderer(ExtractConfig::default(), TextRenderer)
            .extract_response_html(CHATGPT_PAGE, "explain merge sort");

        assert!(result.success, "{}", result.message);
        assert_eq!(result.title.as_deref(), Some("Merge Sort Explanation"));
        assert_eq!(result.detected_languages, vec!["python"]);

        let markdown = result.markdown.unwrap();
        assert!(markdown.contains("divide and conquer"));
        assert!(markdown.contains("```python"));
        assert!(!markdown.contains("Copy code"));
        assert_eq!(result.word_count, markdown.split_whitespace().count());
    }

    #[test]
    fn test_phrase_only_in_sidebar_is_not_found() {
        let result = ChatExtractor::new().extract_response_html(CHATGPT_PAGE, "quicksort pivot");

        assert!(!result.success);
        assert!(result.markdown.is_none());
        assert!(result.message.contains("Phrase not found"));
    }

    #[test]
    fn test_extract_full_page_drops_user_code() {
        let result = ChatExtractor::with_renderer(ExtractConfig::default(), TextRenderer).extract_full_page_html(CHATGPT_PAGE);

        assert!(result.success, "{}", result.message);
        let markdown = result.markdown.unwrap();
        assert_eq!(markdown.matches("def merge_sort").count(), 1);
        assert!(markdown.contains("Can you explain merge sort?"));
        assert!(!markdown.contains("Quicksort pivot choice"));
        assert!(!markdown.contains("ChatGPT"));
    }

    #[test]
    fn test_full_page_renders_main_region() {
        let result =
            ChatExtractor::with_renderer(ExtractConfig::default(), Recording).extract_full_page_html(CHATGPT_PAGE);
        assert_eq!(result.markdown.as_deref(), Some("<main>"));
    }

    #[test]
    fn test_missing_file() {
        let result = extract_full_page("/nonexistent/chat.html", &ExtractConfig::default());
        assert!(!result.success);
        assert!(result.message.contains("File not found"));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = ExporterSettings {
            strip_buttons: false,
            heading_style: HeadingStyle::Setext,
            ..Default::default()
        };
        let config = ExtractConfig::from_settings(&settings);
        assert!(!config.strip_buttons);
        assert_eq!(config.heading_style, HeadingStyle::Setext);
        assert!(config.extended_titles);
    }
}
