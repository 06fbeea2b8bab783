//! HTML parsing and DOM manipulation.
//!
//! This module provides the [`Document`] type, a thin owner of a parsed
//! `scraper::Html` tree. Extraction passes address nodes by [`NodeId`] and
//! remove them in place; parent and sibling links are only used to walk the
//! tree, never to own it.
//!
//! # Example
//!
//! ```rust
//! use chatscribe_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Merge Sort - ChatGPT</title></head>
//!         <body><p class="content">Paragraph</p></body>
//!     </html>
//! "#;
//!
//! let mut doc = Document::parse(html);
//! assert_eq!(doc.title(), Some("Merge Sort - ChatGPT".to_string()));
//!
//! let ids = doc.select_ids("p.content").unwrap();
//! assert_eq!(doc.remove_all(ids), 1);
//! ```

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};

use crate::{ChatscribeError, Result};

/// Elements whose text never counts as visible content.
const NON_TEXT_CONTAINERS: &[&str] = &["script", "style", "noscript", "template"];

/// A parsed HTML document that extraction passes mutate in place.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html);
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// html5ever recovers from malformed markup, so parsing itself never fails.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Gets the underlying `scraper::Html` instance.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the entire (current) document as an HTML string.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// The document node every other node descends from.
    pub fn root(&self) -> NodeRef<'_, Node> {
        self.html.tree.root()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    /// Looks up an element by id.
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.node(id).and_then(ElementRef::wrap)
    }

    /// Lowercase tag name of the element with the given id.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.value().as_element().map(|el| el.name())
    }

    /// Selects attached elements matching a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatscribeError::HtmlParseError`] if the selector is invalid.
    pub fn select_ids(&self, selector: &str) -> Result<Vec<NodeId>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.root_element().select(&sel).map(|el| el.id()).collect())
    }

    /// Selects elements matching a CSS selector below `scope` (exclusive).
    ///
    /// # Errors
    ///
    /// Returns [`ChatscribeError::HtmlParseError`] if the selector is invalid.
    pub fn select_ids_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let sel = parse_selector(selector)?;
        Ok(self
            .element(scope)
            .map(|el| el.select(&sel).map(|found| found.id()).collect())
            .unwrap_or_default())
    }

    /// Attached nodes in document order (pre-order), the document node first.
    pub fn document_order(&self) -> impl Iterator<Item = NodeRef<'_, Node>> {
        self.root().descendants()
    }

    /// Nodes that start after `id` in document order, descendants of `id`
    /// included.
    pub fn following(&self, id: NodeId) -> impl Iterator<Item = NodeRef<'_, Node>> {
        self.document_order().skip_while(move |node| node.id() != id).skip(1)
    }

    /// Nodes that start before `id` in document order, nearest first.
    ///
    /// Ancestors of `id` are included since their start tags precede it.
    pub fn preceding(&self, id: NodeId) -> impl Iterator<Item = NodeRef<'_, Node>> {
        let mut before: Vec<_> = self.document_order().take_while(|node| node.id() != id).collect();
        before.reverse();
        before.into_iter()
    }

    /// Concatenated text of a node and its descendants.
    pub fn text(&self, id: NodeId) -> String {
        self.node(id).map(|node| node_text(&node)).unwrap_or_default()
    }

    /// Length in characters of the node's visible text, each text run trimmed.
    pub fn trimmed_text_len(&self, id: NodeId) -> usize {
        let Some(node) = self.node(id) else {
            return 0;
        };

        node.descendants()
            .filter(|child| !is_inside_non_text(child))
            .filter_map(|child| child.value().as_text().map(|text| text.trim().chars().count()))
            .sum()
    }

    /// Gets the content of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let id = self.select_ids("title").ok()?.into_iter().next()?;
        Some(self.text(id))
    }

    /// Detaches a node (and its subtree) from the document.
    ///
    /// Returns false if the node is unknown or no longer reachable from the
    /// document root (itself or an ancestor already detached).
    pub fn remove(&mut self, id: NodeId) -> bool {
        let root_id = self.root().id();
        let attached = self
            .node(id)
            .is_some_and(|node| node.ancestors().any(|ancestor| ancestor.id() == root_id));
        if !attached {
            return false;
        }

        match self.html.tree.get_mut(id) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    /// Detaches every node in `ids`, returning how many were still attached.
    pub fn remove_all(&mut self, ids: impl IntoIterator<Item = NodeId>) -> usize {
        ids.into_iter().filter(|id| self.remove(*id)).count()
    }
}

/// Parses a CSS selector, mapping failures into [`ChatscribeError`].
pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ChatscribeError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Concatenated text of a node and its descendants.
pub(crate) fn node_text(node: &NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => (**text).to_owned(),
        _ => node
            .descendants()
            .filter_map(|child| child.value().as_text().map(|text| &**text))
            .collect(),
    }
}

/// Returns true if the node sits inside a script, style or similar element.
pub(crate) fn is_inside_non_text(node: &NodeRef<'_, Node>) -> bool {
    node.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .is_some_and(|el| NON_TEXT_CONTAINERS.contains(&el.name()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
            <style>p { color: red; }</style>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_select_ids() {
        let doc = Document::parse(SAMPLE_HTML);
        let ids = doc.select_ids("p.content").unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(doc.text(ids[0]), "Paragraph 1");
        assert_eq!(doc.text(ids[1]), "Paragraph 2");
        assert_eq!(doc.tag_name(ids[0]), Some("p"));
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select_ids("[[invalid");

        assert!(matches!(result, Err(ChatscribeError::HtmlParseError(_))));
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut doc = Document::parse(SAMPLE_HTML);
        let ids = doc.select_ids("p.content").unwrap();

        assert!(doc.remove(ids[0]));
        assert!(!doc.remove(ids[0]));
        assert_eq!(doc.select_ids("p.content").unwrap().len(), 1);
        assert!(!doc.as_string().contains("Paragraph 1"));
    }

    #[test]
    fn test_following_and_preceding() {
        let doc = Document::parse(SAMPLE_HTML);
        let heading = doc.select_ids("h1").unwrap()[0];

        let next_p = doc
            .following(heading)
            .find(|node| node.value().as_element().is_some_and(|el| el.name() == "p"))
            .map(|node| node.id());
        assert_eq!(next_p, doc.select_ids("p").unwrap().first().copied());

        let nearest_before = doc.preceding(heading).find_map(|node| node.value().as_element().map(|el| el.name()));
        assert_eq!(nearest_before, Some("body"));
    }

    #[test]
    fn test_trimmed_text_len_ignores_styles() {
        let doc = Document::parse(SAMPLE_HTML);
        let head = doc.select_ids("head").unwrap()[0];
        assert_eq!(doc.trimmed_text_len(head), "Test Page".len());
    }
}
