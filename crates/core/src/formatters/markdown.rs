use ego_tree::{NodeId, NodeRef};
use scraper::Node;

use crate::Result;
use crate::config::HeadingStyle;
use crate::parse::{Document, node_text};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Callback resolving the language of one code element.
pub type LanguageClassifier<'a> = &'a dyn Fn(&Document, NodeId) -> Option<String>;

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConfig {
    /// ATX (`# Title`) or Setext (underlined) headings
    pub heading_style: HeadingStyle,
}

/// Converts an isolated subtree of a [`Document`] to Markdown.
///
/// Implementations call `classify` once per code block and label the
/// resulting fence with its answer.
pub trait MarkdownRenderer {
    fn render(
        &self, doc: &Document, scope: NodeId, config: &MarkdownConfig, classify: LanguageClassifier<'_>,
    ) -> Result<String>;
}

/// Renderer backed by the `htmd` converter.
///
/// The subtree is serialized to HTML first, with every `<pre>` rewritten to
/// `<pre><code class="language-…">` so that htmd emits labelled fences.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::formatters::{HtmdRenderer, MarkdownConfig, MarkdownRenderer};
/// use chatscribe_core::{Document, detect_code_language};
///
/// let doc = Document::parse("<div><h2>Intro</h2><pre><code>console.log(1)</code></pre></div>");
/// let scope = doc.select_ids("div").unwrap()[0];
/// let md = HtmdRenderer.render(&doc, scope, &MarkdownConfig::default(), &detect_code_language).unwrap();
///
/// assert!(md.contains("## Intro"));
/// assert!(md.contains("```javascript"));
/// ```
#[cfg(feature = "markdown")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmdRenderer;

#[cfg(feature = "markdown")]
impl MarkdownRenderer for HtmdRenderer {
    fn render(
        &self, doc: &Document, scope: NodeId, config: &MarkdownConfig, classify: LanguageClassifier<'_>,
    ) -> Result<String> {
        use htmd::options::{CodeBlockStyle, Options};

        let html = annotated_html(doc, scope, classify);
        let heading_style = match config.heading_style {
            HeadingStyle::Atx => htmd::options::HeadingStyle::Atx,
            HeadingStyle::Setext => htmd::options::HeadingStyle::Setex,
        };

        let converter = htmd::HtmlToMarkdown::builder()
            .options(Options { heading_style, code_block_style: CodeBlockStyle::Fenced, ..Default::default() })
            .build();

        converter
            .convert(&html)
            .map_err(|e| crate::ChatscribeError::RenderError(e.to_string()))
    }
}

/// Serializes `scope` to HTML with classified code blocks.
pub fn annotated_html(doc: &Document, scope: NodeId, classify: LanguageClassifier<'_>) -> String {
    let mut out = String::new();
    if let Some(node) = doc.node(scope) {
        write_node(doc, node, classify, &mut out);
    }
    out
}

fn write_node(doc: &Document, node: NodeRef<'_, Node>, classify: LanguageClassifier<'_>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Element(el) if el.name() == "pre" => write_code_block(doc, node, classify, out),
        Node::Element(el) => {
            out.push('<');
            out.push_str(el.name());
            for (name, value) in el.attrs() {
                out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&el.name()) {
                return;
            }

            for child in node.children() {
                write_node(doc, child, classify, out);
            }
            out.push_str(&format!("</{}>", el.name()));
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(doc, child, classify, out);
            }
        }
        _ => {}
    }
}

/// Writes a `<pre>` as a single `<code>` block labelled with its language.
fn write_code_block(doc: &Document, pre: NodeRef<'_, Node>, classify: LanguageClassifier<'_>, out: &mut String) {
    let target = pre
        .descendants()
        .find(|n| n.value().as_element().is_some_and(|el| el.name() == "code"))
        .map_or(pre.id(), |code| code.id());

    let code = escape_text(&node_text(&pre));
    match classify(doc, target) {
        Some(language) => out.push_str(&format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_attr(&language),
            code
        )),
        None => out.push_str(&format!("<pre><code>{}</code></pre>", code)),
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
