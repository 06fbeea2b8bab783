//! Locating the conversational subtree to render.
//!
//! Two modes: [`isolate_response`] anchors on a phrase from the user's
//! question and picks the answer block that follows it;
//! [`isolate_main_content`] picks the page's main region for a full export.

use ego_tree::NodeId;
use scraper::Node;
use tracing::{debug, warn};

use crate::parse::{Document, is_inside_non_text};
use crate::{ChatscribeError, Result};

/// Block elements that can anchor a matched phrase.
const CONTAINER_TAGS: &[&str] = &["div", "li", "article", "section"];

/// An answer candidate needs more visible text than this.
const MIN_RESPONSE_CHARS: usize = 20;

/// Main-region selectors in priority order.
const MAIN_REGION_SELECTORS: &[&str] = &["main", "[role='main']", "article", "body"];

/// Finds the assistant's answer to the question containing `phrase`.
///
/// The answer is assumed to be the first `div` after the question's
/// container (in document order) with more than 20 characters of trimmed
/// text. That holds for the supported chat UIs but is a heuristic, not a
/// structural guarantee.
///
/// # Errors
///
/// - [`ChatscribeError::PhraseNotFound`] if no text node contains the phrase
/// - [`ChatscribeError::ContainerAmbiguous`] if the match has no block ancestor
/// - [`ChatscribeError::ResponseNotIsolated`] if nothing after it qualifies
pub fn isolate_response(doc: &Document, phrase: &str) -> Result<NodeId> {
    let text_node = find_phrase(doc, phrase).ok_or_else(|| {
        warn!(phrase, "phrase not found");
        ChatscribeError::PhraseNotFound(phrase.to_string())
    })?;

    let container = enclosing_container(doc, text_node).ok_or(ChatscribeError::ContainerAmbiguous)?;
    debug!(?container, "question container");

    doc.following(container)
        .filter(|node| node.value().as_element().is_some_and(|el| el.name() == "div"))
        .map(|node| node.id())
        .find(|id| doc.trimmed_text_len(*id) > MIN_RESPONSE_CHARS)
        .ok_or(ChatscribeError::ResponseNotIsolated)
}

/// First text node, in document order, containing `phrase` case-insensitively.
fn find_phrase(doc: &Document, phrase: &str) -> Option<NodeId> {
    let needle = phrase.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    doc.document_order()
        .find(|node| match node.value() {
            Node::Text(text) => text.to_lowercase().contains(&needle) && !is_inside_non_text(node),
            _ => false,
        })
        .map(|node| node.id())
}

/// Nearest ancestor of `text_node` that is a container element.
fn enclosing_container(doc: &Document, text_node: NodeId) -> Option<NodeId> {
    doc.node(text_node)?
        .ancestors()
        .find(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| CONTAINER_TAGS.contains(&el.name()))
        })
        .map(|node| node.id())
}

/// The page region holding the conversation: `main`, then `[role=main]`,
/// then `article`, then `body`, falling back to the document root.
pub fn isolate_main_content(doc: &Document) -> Result<NodeId> {
    for selector in MAIN_REGION_SELECTORS {
        if let Some(id) = doc.select_ids(selector)?.into_iter().next() {
            debug!(selector, "main region");
            return Ok(id);
        }
    }

    Ok(doc.root().id())
}
