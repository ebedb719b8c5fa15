use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use wayback_archiver::{
    install_interrupt_handler, load_targets, run, ArchiveClient, ConsoleProgress, Credentials,
    HistoryLog, Settings,
};

/// Save pages to the Wayback Machine and record the outcome in a CSV history
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URLs to archive, processed in order
    urls: Vec<String>,

    /// File with one URL per line (blank lines and # comments are ignored)
    #[arg(long)]
    urls_file: Option<PathBuf>,

    /// History file to append results to
    #[arg(long, default_value = "archive_history.csv")]
    history: PathBuf,

    /// Base URL of the Save Page Now API
    #[arg(long)]
    api_base: Option<String>,

    /// Status checks before giving up on a capture
    #[arg(long, default_value_t = 12)]
    max_attempts: u32,

    /// Seconds between status checks
    #[arg(long, default_value_t = 10)]
    poll_interval_secs: u64,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Missing keys are reported, not treated as a failed run
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("❌ ERROR: API keys not found: {}", err);
            return Ok(());
        }
    };

    let targets = load_targets(&cli.urls, cli.urls_file.as_deref())
        .context("Failed to collect URLs to archive")?;

    let mut settings = Settings {
        max_attempts: cli.max_attempts,
        poll_interval: Duration::from_secs(cli.poll_interval_secs),
        request_timeout: Duration::from_secs(cli.timeout_secs),
        history_path: cli.history,
        ..Settings::default()
    };
    if let Some(api_base) = cli.api_base {
        settings.api_base = api_base;
    }

    let history = HistoryLog::new(settings.history_path.clone());
    let client = ArchiveClient::new(credentials, settings).context("Failed to build HTTP client")?;
    let stop = install_interrupt_handler().context("Failed to install Ctrl+C handler")?;

    log::info!("Archiving {} URL(s)", targets.len());
    let summary = run(&client, &history, &targets, &stop, &ConsoleProgress);

    if summary.interrupted {
        println!("\n\n🛑 Script stopped by user.");
        return Ok(());
    }

    println!(
        "\n🏁 All tasks complete ({} ok, {} failed, {} dropped). History saved to '{}'",
        summary.succeeded,
        summary.failed,
        summary.dropped,
        history.path().display()
    );
    match history.read_all() {
        Ok(rows) => println!("📒 {} row(s) in history", rows.len()),
        Err(err) => log::warn!("Could not read back history: {}", err),
    }

    Ok(())
}
