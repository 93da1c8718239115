use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use odds_scraper_api::export::{archive_name, build_export_files, bundle, group_by_league};
use odds_scraper_api::data::{write_archive, write_exports};
use odds_scraper_api::{build_orchestrator, init_logging, league_counts, Config, MatchSource};
use std::path::PathBuf;
use std::time::Duration;

/// Run one scrape and write the per-league and consolidated exports to disk
#[derive(Debug, Parser)]
#[command(name = "cli", version, about)]
struct Args {
    /// HTTP endpoint serving a JSON array of raw matches (overrides FEED_URL)
    #[arg(long)]
    feed_url: Option<String>,

    /// JSON file of raw matches to replay (overrides FEED_FILE; --feed-url wins)
    #[arg(long)]
    feed_file: Option<PathBuf>,

    /// Directory the export files are written to
    #[arg(long, default_value = "cache")]
    out_dir: PathBuf,

    /// Write a single zip archive instead of loose files
    #[arg(long)]
    archive: bool,

    /// Give up on the source after this many seconds (overrides FETCH_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Args {
    /// Command-line flags take precedence over the environment configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = self.feed_url.as_ref().filter(|url| !url.trim().is_empty()) {
            config.source = MatchSource::Feed(url.clone());
        } else if let Some(path) = &self.feed_file {
            config.source = MatchSource::File(path.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging();

    let args = Args::parse();
    let config = args.apply(Config::from_env().context("Invalid configuration")?);

    println!("Odds Scraper\n");
    println!("Fetching matches from {:?}...\n", config.source);

    let orchestrator = build_orchestrator(&config);

    let matches = orchestrator
        .start_sync()
        .await
        .context("Scrape failed")?;

    println!("Scraped {} matches\n", matches.len());
    println!("LEAGUE BREAKDOWN\n");
    for count in league_counts(&matches) {
        println!("  {}: {} matches", count.league, count.count);
    }

    let generated_at = Local::now().naive_local();
    let groups = group_by_league(&matches);

    if args.archive {
        let bytes = bundle(&groups, &matches, generated_at).context("Failed to build archive")?;
        let path = write_archive(&bytes, &args.out_dir, &archive_name(generated_at))?;
        println!("\nSaved archive to {}", path.display());
    } else {
        let files = build_export_files(&groups, &matches, generated_at)
            .context("Failed to build export files")?;
        let written = write_exports(&files, &args.out_dir)?;
        println!("\nSaved {} files to {}", written.len(), args.out_dir.display());
        for path in written {
            println!("  - {}", path.display());
        }
    }

    Ok(())
}
