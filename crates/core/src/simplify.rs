//! Dropping pasted code from user turns.
//!
//! In a full-page export the code a user pasted into a question usually
//! reappears, formatted, in the assistant's answer. Keeping only the
//! assistant's copy avoids duplicated blocks in the note.

use std::collections::HashSet;

use ego_tree::NodeId;
use tracing::debug;

use crate::Result;
use crate::parse::Document;
use crate::patterns::{ARTIFACT_PATTERNS, USER_ROLE_ATTRIBUTES};

/// Removes every `<pre>` block nested in a user-turn container.
///
/// Containers are found by author-role attributes and by user-message
/// classes; an element matched both ways is processed once. Returns the
/// number of removed blocks. A second call removes nothing.
pub fn simplify_user_messages(doc: &mut Document) -> Result<usize> {
    let containers = user_containers(doc)?;

    let mut removed = 0;
    for container in containers {
        let blocks = doc.select_ids_within(container, "pre")?;
        removed += doc.remove_all(blocks);
    }

    if removed > 0 {
        debug!(removed, "removed code blocks from user messages");
    }
    Ok(removed)
}

/// User-turn containers in document order, without duplicates.
pub(crate) fn user_containers(doc: &Document) -> Result<Vec<NodeId>> {
    let mut seen = HashSet::new();
    let mut containers = Vec::new();

    for (attr, value) in USER_ROLE_ATTRIBUTES {
        for id in doc.select_ids(&format!("[{}='{}']", attr, value))? {
            if seen.insert(id) {
                containers.push(id);
            }
        }
    }

    let class_pattern = &ARTIFACT_PATTERNS.user_message_class;
    for node in doc.document_order() {
        let is_user_turn = node
            .value()
            .as_element()
            .and_then(|el| el.attr("class"))
            .is_some_and(|class| class_pattern.is_match(class));

        if is_user_turn && seen.insert(node.id()) {
            containers.push(node.id());
        }
    }

    Ok(containers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><body><main>
            <div data-message-author-role="user" class="user-message">
                <p>Why does this loop never end?</p>
                <pre><code>while (i &lt; 10) { console.log(i); }</code></pre>
            </div>
            <div data-message-author-role="assistant">
                <p>You never increment i:</p>
                <pre><code>while (i &lt; 10) { console.log(i); i++; }</code></pre>
            </div>
            <div class="human-turn"><pre>SELECT 1;</pre><p>And this query?</p></div>
        </main></body></html>
    "#;

    #[test]
    fn test_simplify_removes_user_code_only() {
        let mut doc = Document::parse(FULL_PAGE);
        let removed = simplify_user_messages(&mut doc).unwrap();

        assert_eq!(removed, 2);
        let html = doc.as_string();
        assert!(html.contains("Why does this loop never end?"));
        assert!(html.contains("And this query?"));
        assert!(html.contains("i++"));
        assert!(!html.contains("SELECT 1;"));
        assert_eq!(doc.select_ids("pre").unwrap().len(), 1);
    }

    #[test]
    fn test_simplify_deduplicates_containers() {
        let doc = Document::parse(FULL_PAGE);
        let containers = user_containers(&doc).unwrap();
        assert_eq!(containers.len(), 2);
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let mut doc = Document::parse(FULL_PAGE);
        simplify_user_messages(&mut doc).unwrap();
        let once = doc.as_string();

        assert_eq!(simplify_user_messages(&mut doc).unwrap(), 0);
        assert_eq!(doc.as_string(), once);
    }
}
