//! Clean Markdown notes from saved AI-chat pages.
//!
//! `chatscribe-core` takes the HTML of a saved ChatGPT, Gemini, Claude or
//! similar conversation and turns it into portable Markdown: platform chrome
//! is stripped, the relevant part of the conversation is isolated, code
//! blocks are labelled with their language, and a title and topic tags are
//! derived for the frontmatter.
//!
//! # Example
//!
//! ```rust
//! use chatscribe_core::{ChatExtractor, ExtractConfig};
//!
//! let html = r#"
//!     <html><head><title>Conversation with Gemini</title></head><body>
//!         <aside><a>Older chat</a></aside>
//!         <main>
//!             <div data-message-author-role="user"><p>How do I reverse a list in Python?</p></div>
//!             <div data-message-author-role="assistant">
//!                 <p>Use slicing, which returns a reversed copy:</p>
//!                 <pre><code class="language-python">xs[::-1]</code></pre>
//!             </div>
//!         </main>
//!     </body></html>
//! "#;
//!
//! let result = ChatExtractor::with_config(ExtractConfig::default()).extract_full_page_html(html);
//! assert!(result.success);
//! assert_eq!(result.title.as_deref(), Some("How do I reverse a list in Python"));
//! assert_eq!(result.detected_languages, vec!["python"]);
//! ```
//!
//! # Feature flags
//!
//! - `markdown` (default): render with `htmd`; without it a plain-text
//!   renderer is used
//! - `remote-titles` (default): OpenAI-compatible title generation via
//!   `reqwest`

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod isolate;
pub mod parse;
pub mod patterns;
pub mod postprocess;
pub mod result;
pub mod simplify;
pub mod strip;
pub mod tags;
pub mod title;
pub mod titlegen;

pub use classify::{detect_code_language, detect_from_syntax};
pub use config::{AiSettings, AppConfig, ExporterSettings, HeadingStyle};
pub use error::{ChatscribeError, Result};
pub use export::{NoteWriter, WriteMode, format_date, save_markdown};
pub use extract::{ChatExtractor, ExtractConfig, ExtractConfigBuilder, extract_full_page, extract_response};
pub use fetch::{is_html_file, list_html_files, read_html_file};
pub use formatters::{DefaultRenderer, MarkdownConfig, MarkdownRenderer, TextRenderer};
#[cfg(feature = "markdown")]
pub use formatters::HtmdRenderer;
pub use isolate::{isolate_main_content, isolate_response};
pub use parse::Document;
pub use patterns::{LABEL_MAP, LabelMap, PLATFORM_NAMES};
pub use postprocess::{PostProcessConfig, postprocess_markdown};
pub use result::ExtractionResult;
pub use simplify::simplify_user_messages;
pub use strip::{strip_decorative, strip_platform_artifacts};
pub use tags::{detect_tags, generate_frontmatter};
pub use title::{clean_page_title, conversation_title, conversation_title_extended};
#[cfg(feature = "remote-titles")]
pub use titlegen::RemoteTitler;
pub use titlegen::{HeuristicTitler, TitleGenerator, sanitize_filename};
