//! Extraction runs driven from the command line.

use std::path::Path;

use anyhow::Context;
use chatscribe_core::{
    AppConfig, ChatExtractor, ExtractConfig, ExtractionResult, NoteWriter, TitleGenerator, WriteMode,
    list_html_files, sanitize_filename,
};
use tracing::debug;

use crate::echo::{print_detail, print_divider, print_error, print_info, print_success, print_warning};
use crate::prompt::Prompt;

/// Appends `.md` unless the name already ends with it.
pub fn merge_target(name: &str) -> String {
    if name.ends_with(".md") { name.to_string() } else { format!("{}.md", name) }
}

/// Title seed for a full-page export: the file stem with `_` and `-` read as spaces.
pub fn title_from_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
}

/// Shared state of one CLI run.
pub struct Session {
    extractor: ChatExtractor,
    writer: NoteWriter,
    titles: TitleGenerator,
    max_filename_length: usize,
    merge: Option<String>,
    phrases: Vec<String>,
}

impl Session {
    /// `phrases` are searched in every file; when empty, phrases are asked for.
    pub fn new(config: &AppConfig, merge: Option<String>, phrases: Vec<String>) -> Self {
        Self {
            extractor: ChatExtractor::with_config(ExtractConfig::from_settings(&config.settings)),
            writer: NoteWriter::from_config(config),
            titles: TitleGenerator::from_settings(&config.settings, &config.ai),
            max_filename_length: config.settings.max_filename_length,
            merge,
            phrases,
        }
    }

    /// Extracts one answer per phrase from `path`, returning how many were saved.
    pub async fn process_file(&self, path: &Path, prompt: &mut Prompt) -> anyhow::Result<usize> {
        println!();
        print_info(&format!("Opened: {}", display_name(path)));

        if !path.is_file() {
            print_error("File not found.");
            return Ok(0);
        }

        let mut count = 0;
        if self.phrases.is_empty() {
            loop {
                print_divider();
                let phrase = prompt.ask_or_empty("Search phrase (ENTER to finish):").await?;
                if phrase.is_empty() {
                    break;
                }
                count += usize::from(self.extract_phrase(path, &phrase).await?);
            }
        } else {
            for phrase in &self.phrases {
                print_divider();
                print_detail("Search", phrase);
                count += usize::from(self.extract_phrase(path, phrase).await?);
            }
        }

        print_success(&format!("Done, {} extraction(s) from this file.", count));
        Ok(count)
    }

    async fn extract_phrase(&self, path: &Path, phrase: &str) -> anyhow::Result<bool> {
        debug!(phrase, path = %path.display(), "searching");
        let result = self.extractor.extract_response(path, phrase);
        self.save(&result, phrase).await
    }

    /// Exports the whole conversation in `path`.
    pub async fn process_full_page(&self, path: &Path) -> anyhow::Result<bool> {
        println!();
        print_info(&format!("Full-page export: {}", display_name(path)));

        if !path.is_file() {
            print_error("File not found.");
            return Ok(false);
        }

        let result = self.extractor.extract_full_page(path);
        let seed = result.title.clone().unwrap_or_else(|| title_from_stem(path));
        self.save(&result, &seed).await
    }

    /// Runs [`Session::process_file`] over every saved page in `dir`.
    pub async fn batch(&self, dir: &Path, prompt: &mut Prompt) -> anyhow::Result<()> {
        let files = html_files(dir)?;
        if files.is_empty() {
            print_warning(&format!("No HTML files found in {}", dir.display()));
            return Ok(());
        }

        print_info(&format!("Found {} HTML file(s) in {}", files.len(), dir.display()));
        for file in &files {
            self.process_file(file, prompt).await?;
        }
        Ok(())
    }

    /// Runs [`Session::process_full_page`] over every saved page in `dir`.
    pub async fn batch_full_page(&self, dir: &Path) -> anyhow::Result<()> {
        let files = html_files(dir)?;
        if files.is_empty() {
            print_warning(&format!("No HTML files found in {}", dir.display()));
            return Ok(());
        }

        print_info(&format!("Full-page export: {} file(s) in {}", files.len(), dir.display()));
        let mut exported = 0;
        for file in &files {
            exported += usize::from(self.process_full_page(file).await?);
        }

        println!();
        print_success(&format!("Batch complete: {}/{} file(s) exported.", exported, files.len()));
        Ok(())
    }

    /// Writes a successful result and reports it; failures are only reported.
    async fn save(&self, result: &ExtractionResult, seed: &str) -> anyhow::Result<bool> {
        let Some(markdown) = result.markdown.as_deref().filter(|_| result.success) else {
            print_warning(&result.message);
            return Ok(false);
        };

        let title = self.titles.generate(seed).await;
        if title != seed {
            print_detail("Title", &title);
        }

        match &self.merge {
            Some(target) => {
                self.writer
                    .save(markdown, target, &title, WriteMode::Append)
                    .with_context(|| format!("Failed to append to {}", target))?;
                print_success(&format!("Appended to {}  ({} words)", target, result.word_count));
            }
            None => {
                let filename = sanitize_filename(&title, self.max_filename_length);
                self.writer
                    .save(markdown, &filename, &title, WriteMode::Write)
                    .with_context(|| format!("Failed to write {}", filename))?;
                print_success(&format!("Saved → {}  ({} words)", filename, result.word_count));
            }
        }

        if !result.detected_languages.is_empty() {
            print_detail("Languages detected", &result.detected_languages.join(", "));
        }
        Ok(true)
    }
}

fn html_files(dir: &Path) -> anyhow::Result<Vec<std::path::PathBuf>> {
    list_html_files(dir).with_context(|| format!("Failed to list {}", dir.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
