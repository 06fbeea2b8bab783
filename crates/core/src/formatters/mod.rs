pub mod markdown;
pub mod text;

#[cfg(feature = "markdown")]
pub use markdown::HtmdRenderer;
pub use markdown::{LanguageClassifier, MarkdownConfig, MarkdownRenderer, annotated_html};
pub use text::TextRenderer;

/// The renderer extraction uses unless another one is supplied.
#[cfg(feature = "markdown")]
pub type DefaultRenderer = HtmdRenderer;

/// The renderer extraction uses unless another one is supplied.
#[cfg(not(feature = "markdown"))]
pub type DefaultRenderer = TextRenderer;
