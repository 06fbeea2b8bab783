//! Live watch of the downloads folder.
//!
//! A poller task compares directory listings every [`POLL_INTERVAL`] and
//! queues new saved pages on a channel; the session handles them one at a
//! time. New files are found by listing the folder, not by filesystem events,
//! so a page saved under a temporary name is only queued once renamed to
//! `.html`.
//!
//! Ctrl+C is honoured at every await point, including while a file's phrase
//! prompt is waiting for input.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use chatscribe_core::list_html_files;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::echo::{print_info, print_success, print_warning};
use crate::prompt::Prompt;
use crate::session::Session;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Wait before reading a new file so the browser can finish writing it.
const SETTLE_DELAY: Duration = Duration::from_secs(1);

const QUEUE_CAPACITY: usize = 64;

/// Processes every page that appears in `dir` until Ctrl+C.
pub async fn watch(session: &Session, dir: &Path, full_page: bool, prompt: &mut Prompt) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Watch folder does not exist: {}", dir.display());
    }

    let (tx, mut rx) = mpsc::channel(QUEUE_CAPACITY);
    let poller = tokio::spawn(poll_new_files(dir.to_path_buf(), tx));

    print_success(&format!("Live watcher running on: {}", dir.display()));
    println!("{}\n", "Press Ctrl+C to stop.".dimmed());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let Some(next) = until_shutdown(shutdown.as_mut(), rx.recv()).await else { break };
        let Some(path) = next else {
            poller.abort();
            return Ok(());
        };

        println!();
        print_info(&format!("Detected: {}", path.display()));

        let handled = until_shutdown(shutdown.as_mut(), async {
            tokio::time::sleep(SETTLE_DELAY).await;
            if full_page {
                session.process_full_page(&path).await.map(drop)
            } else {
                session.process_file(&path, prompt).await.map(drop)
            }
        })
        .await;

        match handled {
            Some(outcome) => outcome?,
            None => break,
        }
        println!("\n{}", "Listening for new files…".dimmed());
    }

    println!();
    print_warning("Shutting down watcher…");
    poller.abort();
    Ok(())
}

/// Runs `work` unless `shutdown` resolves first, in which case `work` is
/// dropped and `None` returned.
async fn until_shutdown<S, T>(shutdown: Pin<&mut S>, work: impl Future<Output = T>) -> Option<T>
where
    S: Future,
{
    tokio::select! {
        _ = shutdown => None,
        output = work => Some(output),
    }
}

async fn poll_new_files(dir: PathBuf, tx: mpsc::Sender<PathBuf>) {
    let mut seen: HashSet<PathBuf> = list_html_files(&dir).unwrap_or_default().into_iter().collect();
    debug!(dir = %dir.display(), existing = seen.len(), "watch started");

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        interval.tick().await;

        let files = match list_html_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "could not scan watch folder");
                continue;
            }
        };

        for file in new_files(&mut seen, files) {
            if tx.send(file).await.is_err() {
                return;
            }
        }
    }
}

/// Files not seen before, in listing order; `seen` is updated.
fn new_files(seen: &mut HashSet<PathBuf>, listing: Vec<PathBuf>) -> Vec<PathBuf> {
    listing.into_iter().filter(|file| seen.insert(file.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_files_reports_each_file_once() {
        let mut seen: HashSet<PathBuf> = [PathBuf::from("a.html")].into_iter().collect();

        let first = new_files(&mut seen, vec![PathBuf::from("a.html"), PathBuf::from("b.htm")]);
        assert_eq!(first, vec![PathBuf::from("b.htm")]);

        let second = new_files(&mut seen, vec![PathBuf::from("a.html"), PathBuf::from("b.htm")]);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_until_shutdown_cancels_pending_work() {
        let shutdown = std::future::ready(());
        tokio::pin!(shutdown);

        let outcome = until_shutdown(shutdown.as_mut(), std::future::pending::<usize>()).await;
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn test_until_shutdown_returns_finished_work() {
        let shutdown = std::future::pending::<()>();
        tokio::pin!(shutdown);

        assert_eq!(until_shutdown(shutdown.as_mut(), async { 3 }).await, Some(3));
        assert_eq!(until_shutdown(shutdown.as_mut(), async { 4 }).await, Some(4));
    }

    #[tokio::test]
    async fn test_poller_queues_new_pages() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("old.html"), "<p>old</p>").unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        let poller = tokio::spawn(poll_new_files(dir.path().to_path_buf(), tx));

        tokio::time::sleep(Duration::from_millis(100)).await;
        std::fs::write(dir.path().join("new.html"), "<p>new</p>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let queued = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert_eq!(queued, Some(dir.path().join("new.html")));
        poller.abort();
    }
}
