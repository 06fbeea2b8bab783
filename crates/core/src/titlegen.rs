//! Note titles and file names from search phrases.
//!
//! A phrase like "can you explain merge sort in detail?" becomes the heading
//! "Merge Sort". [`HeuristicTitler`] does this locally; with the
//! `remote-titles` feature, [`RemoteTitler`] asks an OpenAI-compatible chat
//! endpoint instead and falls back to the heuristic on any failure.
//! [`TitleGenerator`] picks the strategy from configuration.

use std::sync::LazyLock;

use tracing::warn;

use crate::config::{AiSettings, ExporterSettings};

/// Conversational openers dropped from the start of a phrase.
const FILLER_STARTS: &[&str] = &[
    "can you ",
    "could you ",
    "please ",
    "i want to ",
    "i need to ",
    "i want you to ",
    "i need you to ",
    "i would like to ",
    "help me ",
    "tell me ",
    "show me ",
    "write me ",
    "give me ",
    "explain to me ",
    "explain me ",
    "explain ",
    "what is ",
    "what are ",
    "how to ",
    "how do i ",
    "how can i ",
    "how do you ",
    "what does ",
    "what do ",
    "i am ",
    "i'm ",
    "we need to ",
    "let's ",
    "let us ",
];

/// Politeness and scope tails dropped from the end of a phrase.
const FILLER_ENDS: &[&str] = &[
    " please",
    " thanks",
    " thank you",
    " for me",
    " asap",
    " in detail",
    " with examples",
    " with example",
    " step by step",
    " briefly",
];

/// Words kept lowercase in title case unless they open the title.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "for", "nor", "on", "at", "to", "by", "in", "of", "is", "it", "vs", "with",
];

/// Stripped from both ends of a phrase, and before tail fillers are matched.
const TRAILING_PUNCTUATION: &[char] = &[' ', '?', '.', '!', ',', ';', ':'];

/// Characters removed from file names.
const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

static FILLER_STARTS_BY_LEN: LazyLock<Vec<&'static str>> = LazyLock::new(|| longest_first(FILLER_STARTS));
static FILLER_ENDS_BY_LEN: LazyLock<Vec<&'static str>> = LazyLock::new(|| longest_first(FILLER_ENDS));

fn longest_first(fillers: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = fillers.to_vec();
    sorted.sort_by_key(|filler| std::cmp::Reverse(filler.len()));
    sorted
}

/// Local title cleanup.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::HeuristicTitler;
///
/// let titler = HeuristicTitler::new(50);
/// assert_eq!(titler.generate("can you explain merge sort in detail?"), "Merge Sort");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicTitler {
    max_length: usize,
}

impl HeuristicTitler {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Strips filler, trailing punctuation and excess length, then applies
    /// title case. Falls back to the raw phrase when nothing is left.
    pub fn generate(&self, question: &str) -> String {
        let mut text = question.trim();

        for filler in FILLER_STARTS_BY_LEN.iter() {
            if let Some(head) = text.get(..filler.len())
                && head.eq_ignore_ascii_case(filler)
            {
                text = &text[filler.len()..];
            }
        }

        text = text.trim_end_matches(TRAILING_PUNCTUATION);
        for filler in FILLER_ENDS_BY_LEN.iter() {
            if let Some(start) = text.len().checked_sub(filler.len())
                && let Some(tail) = text.get(start..)
                && tail.eq_ignore_ascii_case(filler)
            {
                text = &text[..start];
            }
        }

        let text = text.trim_matches(TRAILING_PUNCTUATION);
        let text = truncate_on_word(text, self.max_length);
        let titled = title_case(&text);

        if titled.is_empty() { question.chars().take(self.max_length).collect() } else { titled }
    }
}

/// Cuts `text` to at most `max` characters, backing off to the last space.
fn truncate_on_word(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let head: String = text.chars().take(max).collect();
    let cut = head.rsplit_once(' ').map_or(head.as_str(), |(before, _)| before);
    cut.trim_end_matches([' ', ',', '.', ';', ':', '-']).to_string()
}

/// Title case that keeps small words lowercase and leaves the rest of each
/// word untouched (so "C++", "gRPC" and "API" survive).
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && SMALL_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                let mut chars = word.chars();
                chars
                    .next()
                    .map(|first| first.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Turns a title into a safe Markdown file name.
///
/// Removes `<>:"/\|?*`, turns spaces into underscores, trims underscores,
/// caps the length and appends `.md`.
///
/// # Example
///
/// ```rust
/// use chatscribe_core::sanitize_filename;
///
/// assert_eq!(sanitize_filename("What is C/C++? A: Intro", 50), "What_is_CC++_A_Intro.md");
/// ```
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let safe: String = name
        .chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    let safe: String = safe.trim_matches('_').chars().take(max_length).collect();
    format!("{}.md", safe)
}

/// Title strategy chosen from configuration.
#[derive(Debug, Clone)]
pub enum TitleGenerator {
    /// Smart titles off: the phrase is used as is.
    Verbatim,
    Heuristic(HeuristicTitler),
    #[cfg(feature = "remote-titles")]
    Remote(RemoteTitler),
}

impl TitleGenerator {
    /// Remote when AI titles are enabled with a key (and the feature is
    /// compiled in), heuristic when smart titles are on, verbatim otherwise.
    pub fn from_settings(settings: &ExporterSettings, ai: &AiSettings) -> Self {
        if !settings.smart_titles {
            return Self::Verbatim;
        }

        let heuristic = HeuristicTitler::new(settings.max_filename_length);

        #[cfg(feature = "remote-titles")]
        if ai.is_usable() {
            match RemoteTitler::new(ai, heuristic) {
                Ok(remote) => return Self::Remote(remote),
                Err(e) => warn!(error = %e, "remote titles unavailable, using heuristic"),
            }
        }

        #[cfg(not(feature = "remote-titles"))]
        if ai.is_usable() {
            warn!("remote titles requested but not compiled in, using heuristic");
        }

        Self::Heuristic(heuristic)
    }

    /// Produces a title for `question`. Never fails.
    pub async fn generate(&self, question: &str) -> String {
        match self {
            Self::Verbatim => question.to_string(),
            Self::Heuristic(titler) => titler.generate(question),
            #[cfg(feature = "remote-titles")]
            Self::Remote(titler) => titler.generate(question).await,
        }
    }
}

#[cfg(feature = "remote-titles")]
pub use remote::RemoteTitler;

#[cfg(feature = "remote-titles")]
mod remote {
    use std::time::Duration;

    use reqwest::Client;
    use serde::{Deserialize, Serialize};
    use tracing::{info, warn};

    use super::HeuristicTitler;
    use crate::config::AiSettings;
    use crate::{ChatscribeError, Result};

    const SYSTEM_PROMPT: &str = "You are a title generator. Given a user's question or message from an AI chat, \
        generate a short, concise title (3-8 words) suitable as a Markdown heading. \
        Return ONLY the title text, no quotes, no punctuation at the end, no explanation.";

    const MAX_TOKENS: u32 = 30;
    const TEMPERATURE: f32 = 0.3;

    #[derive(Debug, Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: [ChatMessage<'a>; 2],
        max_tokens: u32,
        temperature: f32,
    }

    #[derive(Debug, Serialize)]
    struct ChatMessage<'a> {
        role: &'a str,
        content: &'a str,
    }

    #[derive(Debug, Deserialize)]
    struct ChatResponse {
        choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    struct Choice {
        message: ResponseMessage,
    }

    #[derive(Debug, Deserialize)]
    struct ResponseMessage {
        #[serde(default)]
        content: String,
    }

    /// Titles from an OpenAI-compatible `/chat/completions` endpoint.
    #[derive(Debug, Clone)]
    pub struct RemoteTitler {
        client: Client,
        endpoint: String,
        api_key: String,
        model: String,
        timeout: u64,
        fallback: HeuristicTitler,
    }

    impl RemoteTitler {
        /// # Errors
        ///
        /// Returns [`ChatscribeError::HttpError`] if the HTTP client cannot
        /// be built.
        pub fn new(ai: &AiSettings, fallback: HeuristicTitler) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(ai.timeout_secs))
                .build()
                .map_err(ChatscribeError::HttpError)?;

            Ok(Self {
                client,
                endpoint: format!("{}/chat/completions", ai.api_base.trim_end_matches('/')),
                api_key: ai.api_key.clone(),
                model: ai.model.clone(),
                timeout: ai.timeout_secs,
                fallback,
            })
        }

        /// Remote title, or the heuristic one if the request fails.
        pub async fn generate(&self, question: &str) -> String {
            match self.request(question).await {
                Ok(title) => {
                    info!(title, "remote title generated");
                    title
                }
                Err(e) => {
                    warn!(error = %e, "remote title failed, falling back to heuristic");
                    self.fallback.generate(question)
                }
            }
        }

        /// Sends one completion request and extracts the title.
        pub async fn request(&self, question: &str) -> Result<String> {
            let body = ChatRequest {
                model: &self.model,
                messages: [
                    ChatMessage { role: "system", content: SYSTEM_PROMPT },
                    ChatMessage { role: "user", content: question },
                ],
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            };

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| self.map_error(e))?
                .error_for_status()?;

            let parsed: ChatResponse = response.json().await.map_err(|e| self.map_error(e))?;
            let content = parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| ChatscribeError::InvalidTitleResponse("response has no choices".to_string()))?;

            let title = content.trim().trim_matches(['"', '\'']).trim();
            if title.is_empty() {
                return Err(ChatscribeError::InvalidTitleResponse("empty title".to_string()));
            }
            Ok(title.to_string())
        }

        fn map_error(&self, e: reqwest::Error) -> ChatscribeError {
            if e.is_timeout() { ChatscribeError::Timeout { timeout: self.timeout } } else { ChatscribeError::HttpError(e) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("can you explain merge sort in detail?", "Merge Sort")]
    #[case("How do I sort a vector in C++?", "Sort a Vector in C++")]
    #[case("please tell me what is a closure in javascript thanks", "Tell Me What is a Closure in Javascript")]
    #[case("what is the difference between TCP and UDP", "The Difference Between TCP and UDP")]
    #[case("explain gRPC streaming step by step!!", "GRPC Streaming")]
    #[case("   ???   ", "   ???   ")]
    fn test_heuristic_titles(#[case] question: &str, #[case] expected: &str) {
        assert_eq!(HeuristicTitler::new(50).generate(question), expected);
    }

    #[test]
    fn test_heuristic_truncates_on_word_boundary() {
        let title = HeuristicTitler::new(20).generate("binary search trees and their balancing strategies");
        assert_eq!(title, "Binary Search Trees");
    }

    #[test]
    fn test_title_case_small_words() {
        assert_eq!(title_case("the art of war"), "The Art of War");
        assert_eq!(title_case("rust vs go"), "Rust vs Go");
        assert_eq!(title_case("AND then"), "AND Then");
    }

    #[rstest]
    #[case("Merge Sort", 50, "Merge_Sort.md")]
    #[case("  Why? <Because>  ", 50, "Why_Because.md")]
    #[case("a/b\\c|d*e", 50, "abcde.md")]
    #[case("Long title here", 4, "Long.md")]
    fn test_sanitize_filename(#[case] name: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(sanitize_filename(name, max), expected);
    }

    #[tokio::test]
    async fn test_generator_strategies() {
        let ai = AiSettings::default();

        let settings = ExporterSettings { smart_titles: false, ..Default::default() };
        let generator = TitleGenerator::from_settings(&settings, &ai);
        assert_eq!(generator.generate("can you explain heaps?").await, "can you explain heaps?");

        let generator = TitleGenerator::from_settings(&ExporterSettings::default(), &ai);
        assert!(matches!(generator, TitleGenerator::Heuristic(_)));
        assert_eq!(generator.generate("can you explain heaps?").await, "Heaps");
    }

    #[cfg(feature = "remote-titles")]
    mod remote_tests {
        use super::*;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        /// Serves one HTTP response to the first connection and returns the
        /// raw request.
        async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());

            let handle = tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];

                loop {
                    let n = stream.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);

                    let text = String::from_utf8_lossy(&request);
                    if let Some(header_end) = text.find("\r\n\r\n") {
                        let content_length = text[..header_end]
                            .lines()
                            .find_map(|line| {
                                let (name, value) = line.split_once(':')?;
                                name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                            })
                            .unwrap_or(0);
                        if request.len() >= header_end + 4 + content_length {
                            break;
                        }
                    }
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
                String::from_utf8_lossy(&request).into_owned()
            });

            (base, handle)
        }

        fn ai_settings(api_base: String) -> AiSettings {
            AiSettings { enabled: true, api_key: "sk-test".to_string(), api_base, timeout_secs: 5, ..Default::default() }
        }

        #[tokio::test]
        async fn test_remote_title() {
            let (base, server) =
                serve_once(r#"{"choices":[{"message":{"role":"assistant","content":" \"Merge Sort Basics\" "}}]}"#).await;

            let generator = TitleGenerator::from_settings(&ExporterSettings::default(), &ai_settings(base));
            assert!(matches!(generator, TitleGenerator::Remote(_)));
            assert_eq!(generator.generate("can you explain merge sort?").await, "Merge Sort Basics");

            let request = server.await.unwrap();
            assert!(request.starts_with("POST /chat/completions"));
            assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
            assert!(request.contains("\"max_tokens\":30"));
            assert!(request.contains("gpt-4o-mini"));
        }

        #[tokio::test]
        async fn test_remote_empty_choices_is_invalid() {
            let (base, _server) = serve_once(r#"{"choices":[]}"#).await;
            let titler = RemoteTitler::new(&ai_settings(base), HeuristicTitler::new(50)).unwrap();

            let result = titler.request("anything").await;
            assert!(matches!(result, Err(crate::ChatscribeError::InvalidTitleResponse(_))));
        }

        #[tokio::test]
        async fn test_remote_failure_falls_back_to_heuristic() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            drop(listener);

            let titler = RemoteTitler::new(&ai_settings(base), HeuristicTitler::new(50)).unwrap();
            assert_eq!(titler.generate("can you explain merge sort in detail?").await, "Merge Sort");
        }
    }
}
