use ego_tree::{NodeId, NodeRef};
use scraper::Node;

use crate::Result;
use crate::formatters::markdown::{LanguageClassifier, MarkdownConfig, MarkdownRenderer};
use crate::parse::{Document, node_text};

const BLOCK_ELEMENTS: [&str; 14] = [
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "blockquote",
    "td",
    "th",
    "tr",
    "section",
];

/// Plain-text renderer used when the `markdown` feature is disabled.
///
/// Block elements become paragraphs separated by blank lines; code blocks are
/// still fenced and labelled, so tag detection keeps working.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl MarkdownRenderer for TextRenderer {
    fn render(
        &self, doc: &Document, scope: NodeId, _config: &MarkdownConfig, classify: LanguageClassifier<'_>,
    ) -> Result<String> {
        let mut blocks = Vec::new();
        let mut line = String::new();

        if let Some(node) = doc.node(scope) {
            collect_blocks(doc, node, classify, &mut blocks, &mut line);
        }
        flush(&mut blocks, &mut line);

        Ok(blocks.join("\n\n"))
    }
}

fn collect_blocks(
    doc: &Document, node: NodeRef<'_, Node>, classify: LanguageClassifier<'_>, blocks: &mut Vec<String>,
    line: &mut String,
) {
    match node.value() {
        Node::Text(text) => {
            let words: Vec<&str> = text.split_whitespace().collect();
            if words.is_empty() {
                return;
            }
            if !line.is_empty() && !line.ends_with(char::is_whitespace) && text.starts_with(char::is_whitespace) {
                line.push(' ');
            }
            line.push_str(&words.join(" "));
            if text.ends_with(char::is_whitespace) {
                line.push(' ');
            }
        }
        Node::Element(el) if el.name() == "pre" => {
            flush(blocks, line);
            let target = node
                .descendants()
                .find(|n| n.value().as_element().is_some_and(|el| el.name() == "code"))
                .map_or(node.id(), |code| code.id());
            let language = classify(doc, target).unwrap_or_default();
            let code = node_text(&node);
            blocks.push(format!("```{}\n{}\n```", language, code.trim_end_matches('\n')));
        }
        Node::Element(el) if el.name() == "br" => line.push('\n'),
        Node::Element(el) => {
            let is_block = BLOCK_ELEMENTS.contains(&el.name());
            if is_block {
                flush(blocks, line);
            }
            for child in node.children() {
                collect_blocks(doc, child, classify, blocks, line);
            }
            if is_block {
                flush(blocks, line);
            }
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                collect_blocks(doc, child, classify, blocks, line);
            }
        }
        _ => {}
    }
}

fn flush(blocks: &mut Vec<String>, line: &mut String) {
    let trimmed = line.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
    line.clear();
}
