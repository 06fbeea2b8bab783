use std::io::Write;

use anyhow::Context;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented questions on stdin.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self { lines: BufReader::new(tokio::io::stdin()).lines() }
    }

    /// Asks `question` and returns the trimmed answer, or `None` once stdin
    /// is closed.
    pub async fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        print!("{}", format!("  ▸ {} ", question).cyan());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = self.lines.next_line().await.context("Failed to read from stdin")?;
        Ok(line.map(|answer| answer.trim().to_string()))
    }

    /// Like [`Prompt::ask`], but end of input reads as an empty answer.
    pub async fn ask_or_empty(&mut self, question: &str) -> anyhow::Result<String> {
        Ok(self.ask(question).await?.unwrap_or_default())
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}
