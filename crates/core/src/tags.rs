//! Topic tags and frontmatter for exported notes.

use std::collections::BTreeSet;

use crate::patterns::{CODE_FENCE_MARKERS, contains_token};

/// Tag present on every export.
pub const BASE_TAG: &str = "ai-chat";

type Heuristic = fn(&str) -> bool;

/// Secondary (predicate, tag) rules over the lowercased Markdown.
const HEURISTICS: &[(Heuristic, &str)] = &[
    (|text| text.contains("def ") && text.contains(':'), "python"),
    (|text| text.contains("#include") || text.contains("std::"), "cpp"),
    (|text| text.contains("console.log"), "javascript"),
    (|text| text.contains("fmt.println") || text.contains("func "), "go"),
    (|text| text.contains("fn ") && text.contains("let mut"), "rust"),
    (|text| text.contains("public static void main"), "java"),
];

/// Derives a sorted, deduplicated tag list from rendered Markdown.
///
/// Always contains [`BASE_TAG`]. Fenced code markers such as ```` ```py ````
/// contribute their canonical language; a marker only counts as a whole
/// token, so ```` ```json ```` does not yield `javascript`.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::detect_tags;
///
/// let tags = detect_tags("```py\nprint(1)\n```\n\n```python\nx = 2\n```");
/// assert_eq!(tags, vec!["ai-chat", "python"]);
/// ```
pub fn detect_tags(markdown: &str) -> Vec<String> {
    let lower = markdown.to_lowercase();
    let mut tags = BTreeSet::from([BASE_TAG]);

    for (marker, tag) in CODE_FENCE_MARKERS {
        if contains_token(&lower, &format!("```{}", marker)) {
            tags.insert(*tag);
        }
    }

    for (matches, tag) in HEURISTICS {
        if matches(&lower) {
            tags.insert(*tag);
        }
    }

    tags.into_iter().map(str::to_string).collect()
}

/// Builds the YAML frontmatter block, terminated by a blank line.
///
/// `date` is already formatted; tags come from [`detect_tags`] on `content`.
pub fn generate_frontmatter(title: &str, content: &str, source: &str, date: &str) -> String {
    let tags = detect_tags(content).join(", ");

    format!(
        "---\ntitle: \"{}\"\ndate: {}\ntags: [{}]\nsource: \"{}\"\n---\n\n",
        escape_quoted(title),
        date,
        tags,
        escape_quoted(source)
    )
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tag_always_present() {
        assert_eq!(detect_tags(""), vec!["ai-chat"]);
        assert_eq!(detect_tags("Just prose about nothing in particular."), vec!["ai-chat"]);
    }

    #[test]
    fn test_fence_markers() {
        let md = "```rust\nlet x = 1;\n```\n\n```SQL\nselect 1;\n```\n\n```c++\nint x;\n```";
        assert_eq!(detect_tags(md), vec!["ai-chat", "cpp", "rust", "sql"]);
    }

    #[test]
    fn test_fence_marker_requires_whole_token() {
        let md = "```json\n{\"a\": 1}\n```\n\n```rust\nlet a = 1;\n```";
        let tags = detect_tags(md);
        assert!(!tags.contains(&"javascript".to_string()));
        assert!(!tags.contains(&"r".to_string()));
        assert!(tags.contains(&"rust".to_string()));
    }

    #[test]
    fn test_heuristics() {
        let md = "Use `std::sort` and then `console.log(result)`.\n\npublic static void main is the entry point.";
        assert_eq!(detect_tags(md), vec!["ai-chat", "cpp", "java", "javascript"]);

        let md = "fn main() {\n    let mut v = Vec::new();\n}";
        assert_eq!(detect_tags(md), vec!["ai-chat", "rust"]);
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let md = "```python\ndef f(x):\n    return x\n```\n\n```py\ndef g(): pass\n```";
        assert_eq!(detect_tags(md), vec!["ai-chat", "python"]);
    }

    #[test]
    fn test_generate_frontmatter() {
        let fm = generate_frontmatter("Merge \"Sort\"", "```go\nfunc main() {}\n```", "Local File", "2024-05-01");
        assert_eq!(
            fm,
            "---\ntitle: \"Merge \\\"Sort\\\"\"\ndate: 2024-05-01\ntags: [ai-chat, go]\nsource: \"Local File\"\n---\n\n"
        );
    }
}
