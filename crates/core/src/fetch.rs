//! Reading saved chat pages from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{ChatscribeError, Result};

/// Extensions recognised as saved HTML pages.
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Reads an HTML export as UTF-8 text.
///
/// # Errors
///
/// - [`ChatscribeError::FileNotFound`] if the path does not exist
/// - [`ChatscribeError::EncodingError`] if the bytes are not valid UTF-8
/// - [`ChatscribeError::ReadError`] for other I/O failures, such as a
///   directory path or missing permissions
pub fn read_html_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ChatscribeError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| read_error(path, source))?;
    String::from_utf8(bytes).map_err(|_| ChatscribeError::EncodingError(path.to_path_buf()))
}

/// Returns true if the path has an `.html` or `.htm` extension.
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// HTML files directly inside `dir`, sorted by path.
pub fn list_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| read_error(dir, source))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_html_file(path))
        .collect();
    files.sort();
    Ok(files)
}

fn read_error(path: &Path, source: std::io::Error) -> ChatscribeError {
    ChatscribeError::ReadError { path: path.to_path_buf(), source }
}
