use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chatscribe_core::AppConfig;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod echo;
mod menu;
mod prompt;
mod session;
mod watch;

use prompt::Prompt;
use session::{Session, merge_target};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert saved AI-chat pages into clean Markdown notes
#[derive(Parser, Debug)]
#[command(name = "chatscribe")]
#[command(author = "Chatscribe Contributors")]
#[command(version = VERSION)]
#[command(about = "Convert saved AI-chat pages into clean Markdown notes", long_about = None)]
struct Args {
    /// Single HTML file to process
    #[arg(short, long, value_name = "FILE", conflicts_with = "batch")]
    file: Option<PathBuf>,

    /// Folder whose HTML files are all processed
    #[arg(short, long, value_name = "DIR")]
    batch: Option<PathBuf>,

    /// Export entire pages instead of searching for phrases
    #[arg(short = 'p', long)]
    full_page: bool,

    /// Phrase from the question to extract; repeatable, prompted for when absent
    #[arg(short, long = "search", value_name = "PHRASE")]
    search: Vec<String>,

    /// Merge all extractions into this single .md file
    #[arg(short, long, value_name = "NAME")]
    merge: Option<String>,

    /// Watch the downloads folder for new pages
    #[arg(short, long, conflicts_with_all = ["file", "batch"])]
    watch: bool,

    /// Override the downloads folder
    #[arg(long, value_name = "DIR")]
    downloads: Option<PathBuf>,

    /// Override the folder notes are saved to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Configuration file (default: ./config.json, then the user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Also append log lines to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_tracing(debug: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug, args.log_file.as_deref())?;

    let mut config = AppConfig::load(args.config.as_deref());
    if let Some(downloads) = &args.downloads {
        config.downloads_path = downloads.to_string_lossy().into_owned();
    }
    if let Some(output_dir) = &args.output_dir {
        config.default_save_folder = output_dir.to_string_lossy().into_owned();
    }

    let merge = args.merge.as_deref().map(merge_target);
    let mut prompt = Prompt::new();

    if !(args.file.is_some() || args.batch.is_some() || args.watch) {
        return menu::run(&config, merge, args.search, &mut prompt).await;
    }

    let session = Session::new(&config, merge, args.search);
    match (args.file, args.batch) {
        (Some(file), _) if args.full_page => session.process_full_page(&file).await.map(drop),
        (_, Some(dir)) if args.full_page => session.batch_full_page(&dir).await,
        (Some(file), _) => session.process_file(&file, &mut prompt).await.map(drop),
        (_, Some(dir)) => session.batch(&dir, &mut prompt).await,
        (None, None) => watch::watch(&session, &config.downloads_dir(), args.full_page, &mut prompt).await,
    }
}
