//! Interactive menu shown when no mode flag is given.

use std::path::{Path, PathBuf};

use chatscribe_core::AppConfig;
use owo_colors::OwoColorize;

use crate::echo::{print_banner, print_choice, print_error, print_info, print_success};
use crate::prompt::Prompt;
use crate::session::{Session, merge_target};
use crate::watch::watch;

pub async fn run(
    config: &AppConfig, merge: Option<String>, phrases: Vec<String>, prompt: &mut Prompt,
) -> anyhow::Result<()> {
    print_banner();

    let merge = match merge {
        Some(target) => Some(target),
        None => ask_merge(prompt).await?,
    };
    let session = Session::new(config, merge, phrases);

    println!("\n  {}", "Select mode:".bold());
    print_choice("1", "Live Watch", "auto-detect new HTML files");
    print_choice("2", "Manual", "search & extract from a file");
    print_choice("3", "Batch", "process all HTML files in a folder");
    print_choice("4", "Full Page", "convert an entire HTML page to Markdown");
    print_choice("5", "Full Batch", "full-page export all HTML in a folder");
    println!();

    let downloads = config.downloads_dir();
    match prompt.ask_or_empty("Choice [1/2/3/4/5]:").await?.as_str() {
        "1" => watch(&session, &downloads, false, prompt).await,
        "2" => {
            let path = ask_file(&downloads, prompt).await?;
            session.process_file(&path, prompt).await.map(drop)
        }
        "3" => {
            let dir = ask_folder(&downloads, prompt).await?;
            session.batch(&dir, prompt).await
        }
        "4" => {
            let path = ask_file(&downloads, prompt).await?;
            session.process_full_page(&path).await.map(drop)
        }
        "5" => {
            let dir = ask_folder(&downloads, prompt).await?;
            session.batch_full_page(&dir).await
        }
        _ => {
            print_error("Invalid choice.");
            Ok(())
        }
    }
}

async fn ask_merge(prompt: &mut Prompt) -> anyhow::Result<Option<String>> {
    println!("  {}", "Merge all notes into one file?".bold());
    let answer = prompt
        .ask_or_empty("Filename (e.g. MyNotes.md) or ENTER for separate files:")
        .await?;

    if answer.is_empty() {
        print_info("Individual mode, one file per question.");
        return Ok(None);
    }

    let target = merge_target(&answer);
    print_success(&format!("Merge mode → {}", target));
    Ok(Some(target))
}

async fn ask_file(downloads: &Path, prompt: &mut Prompt) -> anyhow::Result<PathBuf> {
    let answer = prompt.ask_or_empty("HTML file path (or filename in Downloads):").await?;
    Ok(resolve_input(&answer, downloads))
}

async fn ask_folder(downloads: &Path, prompt: &mut Prompt) -> anyhow::Result<PathBuf> {
    let answer = prompt.ask_or_empty("Folder path (ENTER for Downloads):").await?;
    if answer.is_empty() { Ok(downloads.to_path_buf()) } else { Ok(PathBuf::from(answer)) }
}

/// Relative names that do not exist here are looked up in the downloads folder.
fn resolve_input(answer: &str, downloads: &Path) -> PathBuf {
    let path = PathBuf::from(answer);
    if path.is_absolute() || path.exists() { path } else { downloads.join(path) }
}
