//! Platform chrome removal.
//!
//! Chat exports carry a lot of UI that is not conversation: history sidebars,
//! brand headers, prompt boxes, tooltips. [`strip_platform_artifacts`] removes
//! all of it in place; [`strip_decorative`] removes non-content tags such as
//! buttons and inline icons, optionally limited to one subtree.

use ego_tree::{NodeId, NodeRef};
use scraper::Node;
use scraper::node::Element;
use tracing::debug;

use crate::Result;
use crate::parse::{Document, node_text};
use crate::patterns::{ARTIFACT_PATTERNS, ArtifactPatterns, is_brand_name};

/// Tags that never carry conversation content.
pub const DECORATIVE_TAGS: &[&str] = &["button", "svg", "img", "nav", "footer", "script", "style"];

/// Copy buttons and code toolbars, removed when `strip_buttons` is on.
const TOOLBAR_SELECTOR: &str = "a[class*='copy'], button[class*='copy'], div[class*='toolbar']";

/// Parents a stray brand-name label may sit in.
const BRAND_PARENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "span", "div", "a", "p", "label"];

type ElementRule = fn(&Element, &ArtifactPatterns) -> bool;

/// Element-level artifact rules, checked in order.
const ELEMENT_RULES: &[(&str, ElementRule)] = &[
    ("landmark aside", |el, _| el.name() == "aside"),
    ("navigation role", |el, _| {
        matches!(el.attr("role"), Some("complementary" | "navigation"))
    }),
    ("sidebar class", |el, p| el.attr("class").is_some_and(|c| p.sidebar_class.is_match(c))),
    ("sidebar aria-label", |el, p| {
        el.attr("aria-label").is_some_and(|label| p.sidebar_aria.is_match(label))
    }),
    ("page title", |el, _| el.name() == "title"),
    ("editable region", |el, _| {
        matches!(el.attr("contenteditable"), Some("true" | "" | "plaintext-only"))
    }),
    ("text input", |el, _| matches!(el.name(), "textarea" | "input")),
    ("overlay role", |el, _| {
        matches!(el.attr("role"), Some("dialog" | "tooltip" | "alertdialog"))
    }),
    ("overlay class", |el, p| el.attr("class").is_some_and(|c| p.overlay_class.is_match(c))),
];

/// Removes platform UI chrome from the document.
///
/// Rules are re-applied until a pass removes nothing, so calling this twice
/// leaves the tree exactly as one call does. Returns the number of removed
/// elements.
pub fn strip_platform_artifacts(doc: &mut Document) -> usize {
    let patterns = &*ARTIFACT_PATTERNS;
    let mut removed = 0;

    loop {
        let targets = artifact_targets(doc, patterns);
        let count = doc.remove_all(targets);
        if count == 0 {
            break;
        }
        removed += count;
    }

    debug!(removed, "stripped platform artifacts");
    removed
}

fn artifact_targets(doc: &Document, patterns: &ArtifactPatterns) -> Vec<NodeId> {
    let mut targets = Vec::new();

    for node in doc.document_order() {
        match node.value() {
            Node::Element(el) => {
                if let Some((rule, _)) = ELEMENT_RULES.iter().find(|(_, matches)| matches(el, patterns)) {
                    debug!(rule, tag = el.name(), "artifact");
                    targets.push(node.id());
                }
            }
            Node::Text(text) if is_brand_name(text) => {
                if let Some(parent) = branded_parent(&node) {
                    targets.push(parent);
                }
            }
            _ => {}
        }
    }

    targets
}

/// The parent of a brand-name text node, if that parent is nothing but the
/// brand label.
fn branded_parent(text_node: &NodeRef<'_, Node>) -> Option<NodeId> {
    let parent = text_node.parent()?;
    let el = parent.value().as_element()?;

    if !BRAND_PARENTS.contains(&el.name()) {
        return None;
    }

    is_brand_name(&node_text(&parent)).then(|| parent.id())
}

/// Removes decorative tags, plus `extra_tags`, from `scope` (or the whole
/// document when `scope` is `None`).
///
/// With `strip_buttons` copy buttons and toolbars go as well. Returns the
/// number of removed elements.
pub fn strip_decorative(
    doc: &mut Document, scope: Option<NodeId>, extra_tags: &[&str], strip_buttons: bool,
) -> Result<usize> {
    let mut selectors: Vec<&str> = DECORATIVE_TAGS.iter().chain(extra_tags).copied().collect();
    if strip_buttons {
        selectors.push(TOOLBAR_SELECTOR);
    }
    let selector = selectors.join(", ");

    let targets = match scope {
        Some(id) => doc.select_ids_within(id, &selector)?,
        None => doc.select_ids(&selector)?,
    };

    let removed = doc.remove_all(targets);
    debug!(removed, strip_buttons, "stripped decorative elements");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEMINI_PAGE: &str = r#"
        <html>
        <head><title>Google Gemini</title></head>
        <body>
            <aside><a href="/c/1">Old chat about sorting</a></aside>
            <div role="navigation"><a>Recent</a></div>
            <div class="side-nav-panel"><a>Python decorators</a></div>
            <div aria-label="Chat history"><a>Graph theory</a></div>
            <header><span>✨ Gemini</span></header>
            <main>
                <h1>Google Gemini</h1>
                <p>Gemini is a model family, and this sentence stays.</p>
                <div class="conversation-container">
                    <p>What is merge sort?</p>
                    <p>Merge sort is a divide and conquer algorithm.</p>
                </div>
                <div contenteditable="true">Enter a prompt here</div>
                <textarea>draft</textarea>
                <input type="text" value="x">
                <div role="tooltip">Copy</div>
                <div class="cdk-overlay-backdrop"></div>
            </main>
        </body>
        </html>
    "#;

    #[test]
    fn test_strip_removes_sidebars_and_navigation() {
        let mut doc = Document::parse(GEMINI_PAGE);
        strip_platform_artifacts(&mut doc);
        let html = doc.as_string();

        assert!(!html.contains("Old chat about sorting"));
        assert!(!html.contains("Recent"));
        assert!(!html.contains("Python decorators"));
        assert!(!html.contains("Graph theory"));
        assert!(!html.contains("<title>"));
    }

    #[test]
    fn test_strip_removes_brand_labels_only() {
        let mut doc = Document::parse(GEMINI_PAGE);
        strip_platform_artifacts(&mut doc);
        let html = doc.as_string();

        assert!(!html.contains("✨ Gemini"));
        assert!(!html.contains("<h1>"));
        assert!(html.contains("Gemini is a model family, and this sentence stays."));
    }

    #[test]
    fn test_strip_removes_inputs_and_overlays() {
        let mut doc = Document::parse(GEMINI_PAGE);
        strip_platform_artifacts(&mut doc);
        let html = doc.as_string();

        assert!(!html.contains("Enter a prompt here"));
        assert!(!html.contains("<textarea"));
        assert!(!html.contains("<input"));
        assert!(!html.contains("role=\"tooltip\""));
        assert!(!html.contains("cdk-overlay-backdrop"));
        assert!(html.contains("Merge sort is a divide and conquer algorithm."));
    }

    #[test]
    fn test_strip_is_idempotent() {
        let mut doc = Document::parse(GEMINI_PAGE);
        strip_platform_artifacts(&mut doc);
        let once = doc.as_string();

        assert_eq!(strip_platform_artifacts(&mut doc), 0);
        assert_eq!(doc.as_string(), once);
    }

    #[test]
    fn test_strip_nested_brand_labels_reach_fixpoint() {
        let html = "<html><body><div>Claude<span>Claude</span></div><p>Keep me</p></body></html>";
        let mut doc = Document::parse(html);

        assert_eq!(strip_platform_artifacts(&mut doc), 2);
        let result = doc.as_string();
        assert!(!result.contains("Claude"));
        assert!(result.contains("Keep me"));
    }

    #[test]
    fn test_strip_without_matches_is_noop() {
        let html = "<html><head></head><body><p>Plain content</p></body></html>";
        let mut doc = Document::parse(html);
        let before = doc.as_string();

        assert_eq!(strip_platform_artifacts(&mut doc), 0);
        assert_eq!(doc.as_string(), before);
    }

    #[test]
    fn test_strip_decorative_within_scope() {
        let html = r##"
            <html><body>
                <button>Outside</button>
                <div id="answer">
                    <button>Copy code</button>
                    <svg><path d="M0"/></svg>
                    <img src="icon.png">
                    <a class="copy-link" href="#">copy</a>
                    <div class="code-toolbar">python</div>
                    <p>Answer text</p>
                </div>
            </body></html>
        "##;
        let mut doc = Document::parse(html);
        let scope = doc.select_ids("#answer").unwrap()[0];

        let removed = strip_decorative(&mut doc, Some(scope), &[], true).unwrap();
        assert_eq!(removed, 5);

        let result = doc.as_string();
        assert!(result.contains("Outside"));
        assert!(!result.contains("Copy code"));
        assert!(!result.contains("code-toolbar"));
        assert!(result.contains("Answer text"));
    }

    #[test]
    fn test_strip_decorative_keeps_toolbars_without_strip_buttons() {
        let html = r#"<html><body><div class="code-toolbar">python</div><nav>menu</nav></body></html>"#;
        let mut doc = Document::parse(html);

        let removed = strip_decorative(&mut doc, None, &["header"], false).unwrap();
        assert_eq!(removed, 1);
        assert!(doc.as_string().contains("code-toolbar"));
    }
}
