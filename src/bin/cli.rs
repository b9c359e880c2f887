use anyhow::{Context, Result};
use cbb_stats::{run_all_scrapes, RunOptions, ScrapeConfig, Season};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Run the college basketball scrapers and save CSVs
#[derive(Debug, Parser)]
#[command(name = "cli", version)]
struct Args {
    /// First season to scrape
    #[arg(long, default_value_t = 2022)]
    start: Season,

    /// Last season to scrape (inclusive)
    #[arg(long, default_value_t = 2025)]
    end: Season,

    /// Output root directory
    #[arg(long, default_value = "DataFrames")]
    out: PathBuf,

    /// Scrape only season stats
    #[arg(long, conflicts_with = "gamelogs_only")]
    seasons_only: bool,

    /// Scrape only team gamelogs
    #[arg(long)]
    gamelogs_only: bool,

    /// Also save a betting odds snapshot (needs ODDS_API_KEY)
    #[arg(long)]
    odds: bool,
}

impl Args {
    fn into_options(self) -> Result<RunOptions> {
        if self.start > self.end {
            anyhow::bail!(
                "--start ({}) must not be after --end ({})",
                self.start,
                self.end
            );
        }
        Ok(RunOptions {
            seasons: (self.start..=self.end).collect(),
            out_root: self.out,
            seasons_only: self.seasons_only,
            gamelogs_only: self.gamelogs_only,
            odds: self.odds,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = Args::parse().into_options()?;
    let config = ScrapeConfig::from_env().context("Invalid scraper configuration")?;

    println!("College Basketball Stats Scraper\n");
    println!(
        "Seasons {}..={} -> {}\n",
        options.seasons.first().copied().unwrap_or_default(),
        options.seasons.last().copied().unwrap_or_default(),
        options.out_root.display()
    );

    let summary = run_all_scrapes(&config, &options).await?;

    println!("\nSeason stats rows: {}", summary.season_rows);
    println!("Team gamelog rows: {}", summary.gamelog_rows);
    if options.odds {
        println!("Odds snapshot rows: {}", summary.odds_rows);
    }
    println!("Files written: {}", summary.files_written.len());

    Ok(())
}
