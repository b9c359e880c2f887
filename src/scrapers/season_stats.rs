use crate::config::ScrapeConfig;
use crate::models::{Season, Table, TableAccumulator, SEASON_COLUMN};
use crate::scrapers::table_fetcher::{FetchOutcome, TableFetcher, Throttle, DEFAULT_HEADER_ROWS};
use crate::utils::cleaning::clean_season_stats;
use tracing::{info, warn};

pub fn season_stats_url(base_url: &str, season: Season) -> String {
    format!("{}/seasons/{}-school-stats.html", base_url, season)
}

/// Scrapes the per-school season stats table for a range of seasons
pub struct SeasonStatsScraper {
    fetcher: TableFetcher,
    base_url: String,
    throttle: Throttle,
}

impl SeasonStatsScraper {
    pub fn new(fetcher: TableFetcher, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
            throttle: Throttle::new(config.page_delay_secs.clone()),
        }
    }

    /// One cleaned, Season-stamped table covering every season that returned data
    pub async fn scrape(&self, seasons: &[Season]) -> Table {
        let mut acc = TableAccumulator::new();

        for &season in seasons {
            let url = season_stats_url(&self.base_url, season);
            info!("Scraping season stats: {}", url);

            let outcome = self.fetcher.fetch(&url, DEFAULT_HEADER_ROWS).await;
            match outcome {
                FetchOutcome::Table(raw) => {
                    let mut table = clean_season_stats(raw);
                    table.set_column(SEASON_COLUMN, &season.to_string());
                    info!("Season {}: {} schools", season, table.len());
                    acc.push(table);
                }
                other => warn!("No table returned for season {} ({})", season, other.describe()),
            }

            self.throttle.pause().await;
        }

        info!(
            "Season stats scrape finished: {} rows from {} seasons",
            acc.row_count(),
            acc.batch_count()
        );
        acc.finish()
    }
}
