#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use playlist_length::{
    extract::{Extractor, PageScraper},
    fetch::{fetch_page, init_http_client},
    report::summarize,
};
use reqwest::Url;
use tracing::{Level, debug, info};

/// Calculates the total watch time of a YouTube playlist
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Playlist URL to analyze
    url: Url,

    /// Prints the report as JSON
    #[arg(long)]
    json: bool,

    /// Logs debug output, including skipped duration labels
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only logs warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let client = init_http_client(Duration::from_secs(args.timeout))?;

    info!("Fetching playlist page {}", args.url);
    let spinner = fetch_spinner(args.quiet || args.json);
    let page = fetch_page(&client, args.url.as_str()).await;
    spinner.finish_and_clear();
    let page = page.context("An error occurred while trying to fetch the playlist data")?;

    let scraper = PageScraper;
    let item_count = scraper.count_items(&page);
    if item_count == 0 {
        println!("No videos found in the playlist, or the playlist is private/invalid.");
        return Ok(());
    }

    let durations = scraper.extract_durations(&page);
    info!(
        "Found {item_count} videos and {} duration labels",
        durations.len()
    );
    if durations.len() as u64 != item_count {
        debug!("Video count and duration label count differ; the average may be skewed");
    }

    let report = summarize(item_count, &durations);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Serializing report")?
        );
    } else {
        print!("{report}");
    }

    Ok(())
}

fn init_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    // stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn fetch_spinner(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message("Downloading playlist page");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_url_required() {
        let err = Args::try_parse_from(["playlist-length"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_url_validated() {
        assert!(Args::try_parse_from(["playlist-length", "not a url"]).is_err());

        let args = Args::try_parse_from([
            "playlist-length",
            "https://www.youtube.com/playlist?list=PL123",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.url.host_str(), Some("www.youtube.com"));
        assert!(args.json);
        assert_eq!(args.timeout, 10);
    }
}
