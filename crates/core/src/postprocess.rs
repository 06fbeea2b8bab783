//! Markdown cleanup after rendering.

use std::sync::LazyLock;

use regex::Regex;

use crate::patterns::PLATFORM_NAMES;

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{4,}").expect("newline pattern"));

static BRAND_HEADINGS: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<String> = PLATFORM_NAMES.iter().map(|name| regex::escape(name)).collect();
    Regex::new(&format!(r"(?mi)^#+\s*(?:{})\s*$", names.join("|"))).expect("brand heading pattern")
});

static CONVERSATION_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(?:#+\s*)?Conversation\s+with\s+\S+.*$").expect("conversation line pattern")
});

/// Configuration for Markdown post-processing
#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessConfig {
    /// Drop brand-only headings and "Conversation with …" lines, trim
    /// leading blank lines
    pub full_page: bool,
}

/// Cleans rendered Markdown.
///
/// Runs of four or more newlines collapse to three. Full-page exports also
/// lose leftover brand headings and "Conversation with …" lines.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::{PostProcessConfig, postprocess_markdown};
///
/// let md = "## ChatGPT\n\nConversation with Gemini\n\nActual answer.\n\n\n\n\nMore.";
/// let cleaned = postprocess_markdown(md, &PostProcessConfig { full_page: true });
/// assert_eq!(cleaned, "Actual answer.\n\n\nMore.");
/// ```
pub fn postprocess_markdown(markdown: &str, config: &PostProcessConfig) -> String {
    let mut processed = markdown.to_string();

    if config.full_page {
        processed = BRAND_HEADINGS.replace_all(&processed, "").into_owned();
        processed = CONVERSATION_LINES.replace_all(&processed, "").into_owned();
    }

    processed = EXCESS_NEWLINES.replace_all(&processed, "\n\n\n").into_owned();

    if config.full_page {
        processed = processed.trim_start_matches('\n').to_string();
    }

    processed
}
