//! Code block language detection.
//!
//! [`detect_code_language`] runs a three-stage cascade over one code element
//! and its surroundings:
//!
//! 1. **Class inspection**: a `language-*` / `lang-*` class on the element or
//!    its parent.
//! 2. **Proximity**: a language named in one of the four closest preceding
//!    text blocks ("Here's the C++ version:").
//! 3. **Syntax**: language-specific signatures in the code itself.
//!
//! Each stage and each syntax signature is an entry in an ordered table, so
//! priority is data, not control flow. The first hit wins; no hit means the
//! language is unknown, which is not an error.

use std::sync::LazyLock;

use ego_tree::NodeId;
use regex::Regex;
use tracing::trace;

use crate::parse::{Document, node_text};
use crate::patterns::LABEL_MAP;

/// Class prefixes that carry a language name after the first `-`.
const CLASS_PREFIXES: &[&str] = &["language-", "lang-"];

/// Block elements the proximity stage reads labels from.
const PROXIMITY_TAGS: &[&str] = &["p", "div", "h3", "h4", "h5", "li", "span"];

/// How many preceding blocks the proximity stage inspects.
const PROXIMITY_LIMIT: usize = 4;

/// Long blocks are cut down to their tail, where a label is most likely.
const PROXIMITY_MAX_CHARS: usize = 120;
const PROXIMITY_TAIL_CHARS: usize = 60;

static CPP_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\b(int|void|double|float|bool|char)\s+\w+\s*\(.*?\)\s*\{").expect("C function pattern")
});

static SQL_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bSELECT\b.*\bFROM\b").expect("SQL query pattern"));

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?[a-z]+[^>]*>").expect("HTML tag pattern"));

type Stage = fn(&Document, NodeId) -> Option<String>;

/// Detection stages, highest priority first.
const STAGES: &[(&str, Stage)] = &[("class", class_marker), ("proximity", proximity_label), ("syntax", syntax_signature)];

type Signature = fn(&str) -> bool;

/// Syntax signatures, checked in order against the code's text.
const SYNTAX_SIGNATURES: &[(Signature, &str)] = &[
    (|code| code.contains("#include") || code.contains("std::"), "cpp"),
    (|code| code.contains("cout") && code.contains("<<"), "cpp"),
    (|code| code.contains("public static void main") || code.contains("System.out.print"), "java"),
    (|code| code.contains("Console.Write") || code.contains("using System;"), "csharp"),
    (|code| CPP_FUNCTION.is_match(code), "cpp"),
    (|code| code.contains("def ") && code.contains(':'), "python"),
    (|code| code.contains("import ") && code.contains("from "), "python"),
    (|code| code.contains("fn ") && code.contains("let ") && code.contains("->"), "rust"),
    (|code| code.contains("func ") && code.contains("fmt."), "go"),
    (|code| code.contains("interface ") && code.contains(':') && code.contains("export "), "typescript"),
    (|code| code.contains("console.log") || code.contains("document."), "javascript"),
    (|code| code.contains("<?php"), "php"),
    (|code| {
        let first_line = code.trim_start().lines().next().unwrap_or_default();
        first_line.starts_with("#!") && (first_line.ends_with("sh") || first_line.contains("bash"))
    }, "bash"),
    (|code| SQL_QUERY.is_match(code), "sql"),
    (|code| HTML_TAG.is_match(code), "html"),
];

/// Detects the language of the code element `code`.
///
/// Pure with respect to the document: the same element in the same context
/// always yields the same answer, and nothing shared is mutated, so it can be
/// called once per block in any order.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::{Document, detect_code_language};
///
/// let doc = Document::parse(r#"<pre><code class="language-python">x = 1</code></pre>"#);
/// let code = doc.select_ids("code").unwrap()[0];
/// assert_eq!(detect_code_language(&doc, code).as_deref(), Some("python"));
/// ```
pub fn detect_code_language(doc: &Document, code: NodeId) -> Option<String> {
    STAGES.iter().find_map(|(stage, detect)| {
        let language = detect(doc, code)?;
        trace!(stage, language, "code language detected");
        Some(language)
    })
}

/// Stage 1: `language-*` or `lang-*` class on the element or its parent.
fn class_marker(doc: &Document, code: NodeId) -> Option<String> {
    let node = doc.node(code)?;
    let parent = node.parent();

    [Some(node), parent]
        .into_iter()
        .flatten()
        .filter_map(|n| n.value().as_element())
        .flat_map(|el| el.classes())
        .find_map(|class| {
            CLASS_PREFIXES
                .iter()
                .find_map(|prefix| class.strip_prefix(prefix))
                .filter(|language| !language.is_empty())
        })
        .map(str::to_string)
}

/// Stage 2: a language named in the closest preceding text blocks.
fn proximity_label(doc: &Document, code: NodeId) -> Option<String> {
    let node = doc.node(code)?;
    let anchor = node.parent().map_or(code, |parent| parent.id());

    doc.preceding(anchor)
        .filter(|n| n.value().as_element().is_some_and(|el| PROXIMITY_TAGS.contains(&el.name())))
        .take(PROXIMITY_LIMIT)
        .find_map(|block| LABEL_MAP.lookup(&label_window(&node_text(&block))))
        .map(str::to_string)
}

/// Normalized, lowercased text of a block, cut to its tail when long.
fn label_window(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let len = text.chars().count();

    if len > PROXIMITY_MAX_CHARS {
        text.chars().skip(len - PROXIMITY_TAIL_CHARS).collect()
    } else {
        text
    }
}

/// Stage 3: language signatures in the code text itself.
fn syntax_signature(doc: &Document, code: NodeId) -> Option<String> {
    let text = doc.text(code);
    detect_from_syntax(&text).map(str::to_string)
}

/// Matches `code` against the syntax signature table.
pub fn detect_from_syntax(code: &str) -> Option<&'static str> {
    SYNTAX_SIGNATURES
        .iter()
        .find(|(matches, _)| matches(code))
        .map(|(_, language)| *language)
}
