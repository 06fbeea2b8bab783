//! Writing Markdown notes to the save folder.
//!
//! A new note starts with YAML frontmatter (unless disabled) and a level-1
//! heading. Appending to an existing note adds a horizontal rule and a
//! level-2 heading instead, so several extractions can share one file.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::Result;
use crate::config::AppConfig;
use crate::tags::generate_frontmatter;

/// Fallback when the configured date format is invalid.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Source label written to the frontmatter of local exports.
pub const LOCAL_SOURCE: &str = "Local File";

/// How [`NoteWriter::save`] treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create or overwrite, with frontmatter and a `#` heading.
    Write,
    /// Add a section to the end; behaves like [`WriteMode::Write`] for a new file.
    Append,
}

/// Writes notes into one folder.
///
/// # Example
///
/// ```rust,no_run
/// use chatscribe_core::{AppConfig, NoteWriter, WriteMode};
///
/// let writer = NoteWriter::from_config(&AppConfig::default());
/// let path = writer.save("Merge sort splits the list.", "Merge_Sort.md", "Merge Sort", WriteMode::Write).unwrap();
/// println!("saved {}", path.display());
/// ```
#[derive(Debug, Clone)]
pub struct NoteWriter {
    folder: PathBuf,
    include_metadata: bool,
    date_format: String,
    source: String,
    date: Option<NaiveDate>,
}

impl NoteWriter {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            folder: config.save_folder(),
            include_metadata: config.settings.include_metadata,
            date_format: config.settings.date_format.clone(),
            source: LOCAL_SOURCE.to_string(),
            date: None,
        }
    }

    /// Writes into `folder` instead of the configured save folder.
    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Uses a fixed frontmatter date instead of today.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Saves `content` under `filename`, creating the folder on demand.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`ChatscribeError::WriteError`](crate::ChatscribeError::WriteError)
    /// if the folder or file cannot be written.
    pub fn save(&self, content: &str, filename: &str, title: &str, mode: WriteMode) -> Result<PathBuf> {
        fs::create_dir_all(&self.folder)?;
        let path = self.folder.join(filename);

        let is_new = mode == WriteMode::Write || !path.exists();
        let text = if is_new { self.new_note(content, title) } else { appended_section(content, title) };

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!is_new)
            .truncate(is_new)
            .open(&path)?;
        file.write_all(text.as_bytes())?;

        info!(path = %path.display(), appended = !is_new, "note saved");
        Ok(path)
    }

    fn new_note(&self, content: &str, title: &str) -> String {
        let mut note = String::new();
        if self.include_metadata {
            let date = format_date(self.date.unwrap_or_else(|| Local::now().date_naive()), &self.date_format);
            note.push_str(&generate_frontmatter(title, content, &self.source, &date));
        }
        note.push_str(&format!("# {}\n\n{}", title, content));
        note
    }
}

fn appended_section(content: &str, title: &str) -> String {
    format!("\n\n---\n\n## {}\n\n{}", title, content)
}

/// Saves a note using the configured folder and metadata settings.
pub fn save_markdown(config: &AppConfig, content: &str, filename: &str, title: &str, mode: WriteMode) -> Result<PathBuf> {
    NoteWriter::from_config(config).save(content, filename, title, mode)
}

/// Formats `date` with a strftime pattern, falling back to `%Y-%m-%d` if the
/// pattern is invalid.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut formatted = String::new();
    if write!(formatted, "{}", date.format(format)).is_ok() {
        return formatted;
    }

    warn!(format, "invalid date format, using {}", DEFAULT_DATE_FORMAT);
    date.format(DEFAULT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn writer(dir: &TempDir) -> NoteWriter {
        NoteWriter::from_config(&AppConfig::default())
            .with_folder(dir.path().join("notes"))
            .with_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn test_new_note_has_frontmatter_and_heading() {
        let dir = TempDir::new().unwrap();
        let path = writer(&dir)
            .save("```python\nprint(1)\n```", "Merge_Sort.md", "Merge Sort", WriteMode::Write)
            .unwrap();

        assert_eq!(path, dir.path().join("notes").join("Merge_Sort.md"));
        let note = fs::read_to_string(path).unwrap();
        assert_eq!(
            note,
            "---\ntitle: \"Merge Sort\"\ndate: 2024-05-01\ntags: [ai-chat, python]\nsource: \"Local File\"\n---\n\n# Merge Sort\n\n```python\nprint(1)\n```"
        );
    }

    #[test]
    fn test_append_adds_separator_section() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);
        writer.save("First answer.", "Notes.md", "First", WriteMode::Append).unwrap();
        let path = writer.save("Second answer.", "Notes.md", "Second", WriteMode::Append).unwrap();

        let note = fs::read_to_string(path).unwrap();
        assert!(note.starts_with("---\ntitle: \"First\""));
        assert!(note.ends_with("# First\n\nFirst answer.\n\n---\n\n## Second\n\nSecond answer."));
        assert_eq!(note.matches("title:").count(), 1);
    }

    #[test]
    fn test_write_mode_overwrites() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);
        writer.save("Old body that is longer.", "Note.md", "Old", WriteMode::Write).unwrap();
        let path = writer.save("New.", "Note.md", "New", WriteMode::Write).unwrap();

        let note = fs::read_to_string(path).unwrap();
        assert!(note.ends_with("# New\n\nNew."));
        assert!(!note.contains("Old"));
    }

    #[test]
    fn test_metadata_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.settings.include_metadata = false;
        config.default_save_folder = dir.path().to_string_lossy().into_owned();

        let path = save_markdown(&config, "Body.", "Plain.md", "Plain", WriteMode::Write).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# Plain\n\nBody.");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(date, "%d/%m/%Y"), "01/05/2024");
        assert_eq!(format_date(date, "%Q"), "2024-05-01");
    }
}
