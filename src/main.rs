use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use rss_reader::feed::build_client;
use rss_reader::{read_feed, Config, ReaderError, UnhandledError};

#[derive(Parser, Debug)]
#[command(name = "rss_reader", about = "Command-line RSS reader")]
struct Args {
    /// RSS URL
    source: Option<String>,

    /// Print result as JSON in stdout
    #[arg(long)]
    json: bool,

    /// Limit news topics if this parameter provided
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Configuration file (defaults to ~/.config/rss_reader/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path.or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display())),
        None => {
            tracing::debug!("HOME not set and no --config given, using defaults");
            Ok(Config::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the feed
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config)?;

    let source = args
        .source
        .ok_or(UnhandledError(ReaderError::MissingSource))?;

    let client = build_client(config.user_agent.as_deref())
        .map_err(|e| UnhandledError(ReaderError::from(e)))
        .context("Failed to create HTTP client")?;

    let lines = read_feed(&client, &source, &config, args.limit, args.json).await?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", lines.join("\n")).context("Failed to write output")?;
    stdout.flush().context("Failed to flush output")?;

    Ok(())
}
