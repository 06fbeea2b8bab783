//! Static label, alias and UI-artifact tables.
//!
//! Everything here is process-wide read-only data. Regexes are compiled once
//! on first use through [`LazyLock`]; the alias tables are plain ordered
//! slices because lookup order is part of their meaning (the first alias that
//! matches wins).

use regex::Regex;
use std::sync::LazyLock;

/// Platform brand names that leak into exports as headings, labels and titles.
pub const PLATFORM_NAMES: &[&str] = &[
    "Google Gemini",
    "Gemini",
    "ChatGPT",
    "GPT-4o",
    "GPT-4",
    "Claude",
    "Copilot",
    "Perplexity",
    "DeepSeek",
];

/// Decorative glyphs some platforms put in front of their brand name.
pub const BRAND_GLYPHS: &[char] = &['✨', '✦', '★', '◆', '•'];

/// Ordered alias table used by the proximity stage of the classifier.
///
/// Keys are lowercase phrases as they appear in prose ("here's the C++
/// code"), values are canonical language identifiers.
#[derive(Debug)]
pub struct LabelMap {
    entries: &'static [(&'static str, &'static str)],
}

impl LabelMap {
    /// Returns the first canonical language whose alias occurs as a whole
    /// token in `text`.
    ///
    /// `text` is expected to be lowercase. The "java" alias is skipped when
    /// the text also mentions "script" so that prose about JavaScript never
    /// resolves to Java.
    pub fn lookup(&self, text: &str) -> Option<&'static str> {
        self.entries.iter().find_map(|(alias, lang)| {
            if *alias == "java" && text.contains("script") {
                return None;
            }
            contains_token(text, alias).then_some(*lang)
        })
    }
}

/// The proximity alias table.
pub static LABEL_MAP: LabelMap = LabelMap {
    entries: &[
        ("c++", "cpp"),
        ("cpp", "cpp"),
        ("c plus plus", "cpp"),
        ("python", "python"),
        ("py", "python"),
        ("javascript", "javascript"),
        ("js", "javascript"),
        ("js code", "javascript"),
        ("typescript", "typescript"),
        ("ts", "typescript"),
        ("java", "java"),
        ("rust", "rust"),
        ("go", "go"),
        ("golang", "go"),
        ("ruby", "ruby"),
        ("sql", "sql"),
        ("bash", "bash"),
        ("shell", "bash"),
        ("terminal", "bash"),
        ("html", "html"),
        ("css", "css"),
        ("c#", "csharp"),
        ("csharp", "csharp"),
        ("kotlin", "kotlin"),
        ("swift", "swift"),
        ("r code", "r"),
        ("php", "php"),
        ("dart", "dart"),
    ],
};

/// Fenced-code markers recognised by the tag generator, without the fence.
pub const CODE_FENCE_MARKERS: &[(&str, &str)] = &[
    ("python", "python"),
    ("py", "python"),
    ("cpp", "cpp"),
    ("c++", "cpp"),
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("typescript", "typescript"),
    ("ts", "typescript"),
    ("java", "java"),
    ("rust", "rust"),
    ("rs", "rust"),
    ("go", "go"),
    ("ruby", "ruby"),
    ("rb", "ruby"),
    ("sql", "sql"),
    ("bash", "bash"),
    ("sh", "bash"),
    ("html", "html"),
    ("css", "css"),
    ("csharp", "csharp"),
    ("c#", "csharp"),
    ("kotlin", "kotlin"),
    ("kt", "kotlin"),
    ("swift", "swift"),
    ("r", "r"),
    ("php", "php"),
    ("dart", "dart"),
];

/// The five artifact pattern groups consulted by the stripper and simplifier.
#[derive(Debug)]
pub struct ArtifactPatterns {
    /// Sidebar, drawer and conversation-history panel classes.
    pub sidebar_class: Regex,
    /// Aria labels that reveal navigation or history panels.
    pub sidebar_aria: Regex,
    /// Tooltip, popover, modal and similar overlay classes.
    pub overlay_class: Regex,
    /// Classes marking a user (human) turn.
    pub user_message_class: Regex,
    /// Known platform brand names.
    pub platform_names: &'static [&'static str],
}

pub static ARTIFACT_PATTERNS: LazyLock<ArtifactPatterns> = LazyLock::new(|| ArtifactPatterns {
    sidebar_class: Regex::new(concat!(
        r"(?i)sidebar|side-bar|sidenav|side.nav|drawer|nav[-_]?rail|",
        r"chat[-_]?list|conversation[-_]?list|history[-_]?panel|",
        r"left[-_]?panel|left[-_]?nav|menu[-_]?panel|",
        r"threads[-_]?list|thread[-_]?list"
    ))
    .expect("sidebar class pattern"),
    sidebar_aria: Regex::new(
        r"(?i)conversation|recent chat|chat history|sidebar|navigation|threads|previous chat|menu",
    )
    .expect("sidebar aria pattern"),
    overlay_class: Regex::new(r"(?i)tooltip|popover|modal|overlay|backdrop|snackbar").expect("overlay class pattern"),
    user_message_class: Regex::new(concat!(
        r"(?i)user[-_]?message|human[-_]?message|query[-_]?message|",
        r"user[-_]?turn|human[-_]?turn|request[-_]?row|",
        r"user[-_]?row|prompt[-_]?row"
    ))
    .expect("user message class pattern"),
    platform_names: PLATFORM_NAMES,
});

/// Attribute/value pairs that mark an element as a user turn.
pub const USER_ROLE_ATTRIBUTES: &[(&str, &str)] = &[
    ("data-message-author-role", "user"),
    ("data-turn-role", "human"),
    ("data-role", "user"),
];

/// Returns true if `needle` occurs in `haystack` with no alphanumeric
/// character directly before or after it.
pub(crate) fn contains_token(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(is_identifier_char)
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

/// Returns true if `text` is exactly one of the platform brand names,
/// ignoring case, surrounding whitespace and a leading decorative glyph.
pub fn is_brand_name(text: &str) -> bool {
    let trimmed = text.trim().trim_start_matches(BRAND_GLYPHS).trim();
    ARTIFACT_PATTERNS.platform_names.iter().any(|name| name.eq_ignore_ascii_case(trimmed))
}
