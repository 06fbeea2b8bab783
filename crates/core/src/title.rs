//! Conversation title extraction.
//!
//! Chat platforms put the conversation name in the page `<title>`, wrapped in
//! their own branding: `Merge Sort Explanation - ChatGPT`, `Conversation with
//! Gemini`, `Claude | Rust lifetimes`. [`clean_page_title`] peels that
//! branding off. [`conversation_title_extended`] additionally looks at the
//! sidebar's active item and the first user message when the metadata title is
//! nothing but a brand.
//!
//! All functions here read the document before the artifact stripper runs,
//! since the stripper removes both `<title>` and the sidebars.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parse::Document;
use crate::patterns::{ARTIFACT_PATTERNS, is_brand_name};
use crate::simplify::user_containers;

/// Characters trimmed from both ends of a cleaned title.
const SEPARATOR_CHARS: &[char] = &[' ', '-', '–', '—', '|'];

/// Regions that hold a conversation history list.
const SIDEBAR_SCOPES: &str = "aside, nav, [role='complementary'], [role='navigation']";

/// Markers of the currently open conversation inside a history list.
const ACTIVE_ITEM_SELECTOR: &str = "[aria-selected='true'], [aria-current], .active, .selected";

/// Sidebar and user-message titles longer than this are cut at a word boundary.
const MAX_FALLBACK_CHARS: usize = 100;

static CONVERSATION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^conversation\s+with\s+").expect("conversation prefix pattern"));

/// Per-brand (trailing segment, leading segment) patterns.
static BRAND_SEGMENTS: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
    ARTIFACT_PATTERNS
        .platform_names
        .iter()
        .map(|name| {
            let name = regex::escape(name);
            let trailing = Regex::new(&format!(r"(?i)\s*[-–—|]\s*{}\s*$", name)).expect("trailing brand pattern");
            let leading = Regex::new(&format!(r"(?i)^{}\s*[-–—|]\s*", name)).expect("leading brand pattern");
            (trailing, leading)
        })
        .collect()
});

/// Removes platform branding from a raw page title.
///
/// Returns `None` only when nothing is left after normalization. A bare brand
/// such as `Conversation with Gemini` keeps the brand itself.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::clean_page_title;
///
/// assert_eq!(clean_page_title("Merge Sort Explanation - ChatGPT").as_deref(), Some("Merge Sort Explanation"));
/// assert_eq!(clean_page_title("Conversation with Gemini").as_deref(), Some("Gemini"));
/// assert_eq!(clean_page_title(" - | "), None);
/// ```
pub fn clean_page_title(raw: &str) -> Option<String> {
    let mut cleaned = CONVERSATION_PREFIX.replace(raw.trim(), "").into_owned();

    for (trailing, leading) in BRAND_SEGMENTS.iter() {
        cleaned = trailing.replace(&cleaned, "").into_owned();
        cleaned = leading.replace(&cleaned, "").into_owned();
    }

    let cleaned = cleaned.trim_matches(SEPARATOR_CHARS);
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.to_string())
}

/// Title derived from the page `<title>` element.
pub fn conversation_title(doc: &Document) -> Option<String> {
    doc.title().as_deref().and_then(clean_page_title)
}

/// Title from page metadata, then the active sidebar item, then the first
/// user message. A metadata title that is only a brand name is skipped.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::{Document, conversation_title_extended};
///
/// let html = r#"
///     <html><head><title>Gemini</title></head><body>
///         <nav><div class="item active">Building a Stress Tester</div></nav>
///     </body></html>
/// "#;
/// let doc = Document::parse(html);
/// assert_eq!(conversation_title_extended(&doc).as_deref(), Some("Building a Stress Tester"));
/// ```
pub fn conversation_title_extended(doc: &Document) -> Option<String> {
    if let Some(title) = conversation_title(doc).filter(|title| !is_brand_name(title)) {
        return Some(title);
    }

    if let Some(title) = active_sidebar_item(doc) {
        debug!(title, "title from active sidebar item");
        return Some(title);
    }

    let title = first_user_message(doc)?;
    debug!(title, "title from first user message");
    Some(title)
}

/// Text of the selected conversation in a history sidebar.
fn active_sidebar_item(doc: &Document) -> Option<String> {
    let scopes = doc.select_ids(SIDEBAR_SCOPES).ok()?;

    scopes
        .into_iter()
        .flat_map(|scope| doc.select_ids_within(scope, ACTIVE_ITEM_SELECTOR).unwrap_or_default())
        .filter(|id| doc.element(*id).is_some_and(|el| el.attr("aria-current") != Some("false")))
        .find_map(|id| fallback_title(&doc.text(id)))
}

/// Text of the first user turn, without trailing punctuation.
fn first_user_message(doc: &Document) -> Option<String> {
    let containers = user_containers(doc).ok()?;
    containers.into_iter().find_map(|id| fallback_title(&doc.text(id)))
}

/// Normalizes whitespace, drops trailing punctuation and caps the length.
/// Brand names and empty text yield `None`.
fn fallback_title(text: &str) -> Option<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = normalized.trim_end_matches(['?', '.', '!', ':', ';', ',']).trim_end();

    if trimmed.is_empty() || is_brand_name(trimmed) {
        return None;
    }

    if trimmed.chars().count() <= MAX_FALLBACK_CHARS {
        return Some(trimmed.to_string());
    }

    let head: String = trimmed.chars().take(MAX_FALLBACK_CHARS).collect();
    let cut = head.rfind(' ').map_or(head.as_str(), |idx| &head[..idx]);
    Some(cut.trim_end_matches(SEPARATOR_CHARS).to_string())
}
