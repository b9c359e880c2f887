pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod utils;

pub use api::*;
pub use config::{ConfigError, ScrapeConfig};
pub use error::DataError;
pub use models::*;
pub use scrapers::*;
pub use utils::*;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// What a single run should scrape and where to put it
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub seasons: Vec<Season>,
    pub out_root: PathBuf,
    pub seasons_only: bool,
    pub gamelogs_only: bool,
    pub odds: bool,
}

/// Row counts and files produced by a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub season_rows: usize,
    pub gamelog_rows: usize,
    pub odds_rows: usize,
    pub files_written: Vec<PathBuf>,
}

/// Scrape, clean and persist every requested dataset.
///
/// Requests run one at a time. A dataset that comes back empty is reported and not
/// written. The output root should have a single writer; files are overwritten in place
/// and an interrupted run can leave the combined file and its partitions out of step.
pub async fn run_all_scrapes(config: &ScrapeConfig, options: &RunOptions) -> Result<RunSummary> {
    let fetcher = TableFetcher::new(config)?;
    let writer = PartitionedWriter::new(&options.out_root);
    let mut summary = RunSummary::default();

    if !options.gamelogs_only {
        let season_stats = SeasonStatsScraper::new(fetcher.clone(), config)
            .scrape(&options.seasons)
            .await;
        summary.season_rows = season_stats.len();
        if season_stats.is_empty() {
            warn!("Season stats scraper returned no rows; skipping save.");
        } else {
            let files = writer
                .write_season_stats(&season_stats)
                .context("Failed to save season stats")?;
            summary.files_written.extend(files);
        }
    }

    if !options.seasons_only {
        let gamelogs = GamelogsScraper::new(fetcher.clone(), config)
            .scrape(&options.seasons)
            .await;
        summary.gamelog_rows = gamelogs.len();
        if gamelogs.is_empty() {
            warn!("Team gamelogs scraper returned no rows; skipping save.");
        } else {
            let files = writer
                .write_team_gamelogs(&gamelogs)
                .context("Failed to save team gamelogs")?;
            summary.files_written.extend(files);
        }
    }

    if options.odds {
        match fetch_odds_snapshot(config).await {
            Some(odds) if !odds.is_empty() => {
                summary.odds_rows = odds.len();
                let files = writer
                    .write_odds_snapshot(&odds)
                    .context("Failed to save odds snapshot")?;
                summary.files_written.extend(files);
            }
            _ => warn!("Betting odds scraper returned no rows; skipping save."),
        }
    }

    info!(
        "Run complete: {} season rows, {} gamelog rows, {} odds rows, {} files written",
        summary.season_rows,
        summary.gamelog_rows,
        summary.odds_rows,
        summary.files_written.len()
    );
    Ok(summary)
}

/// The odds snapshot is optional; a missing key or a failed request only skips it
async fn fetch_odds_snapshot(config: &ScrapeConfig) -> Option<Table> {
    let Some(api_key) = config.odds_api_key.clone() else {
        warn!("ODDS_API_KEY not set; skipping odds snapshot");
        return None;
    };

    let client = OddsApiClient::new(api_key).with_base_url(config.odds_api_url.clone());
    match client.fetch_snapshot().await {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("Odds snapshot failed: {:#}", e);
            None
        }
    }
}
