use crate::config::ScrapeConfig;
use crate::models::{SchoolSlug, Season, Table, TableAccumulator, SCHOOL_COLUMN, SEASON_COLUMN};
use crate::scrapers::school_list::SchoolListFetcher;
use crate::scrapers::table_fetcher::{FetchOutcome, TableFetcher, Throttle, DEFAULT_HEADER_ROWS};
use crate::utils::cleaning::clean_gamelogs;
use tracing::{info, warn};

pub fn gamelog_url(base_url: &str, school: &SchoolSlug, season: Season) -> String {
    format!("{}/schools/{}/men/{}-gamelogs.html", base_url, school, season)
}

/// Scrapes every school's game log for each season
pub struct GamelogsScraper {
    fetcher: TableFetcher,
    schools: SchoolListFetcher,
    base_url: String,
    throttle: Throttle,
}

impl GamelogsScraper {
    pub fn new(fetcher: TableFetcher, config: &ScrapeConfig) -> Self {
        Self {
            schools: SchoolListFetcher::new(fetcher.clone(), config),
            fetcher,
            base_url: config.base_url.clone(),
            throttle: Throttle::new(config.page_delay_secs.clone()),
        }
    }

    /// One cleaned table of games, stamped with Season and School
    pub async fn scrape(&self, seasons: &[Season]) -> Table {
        let mut acc = TableAccumulator::new();
        let mut skipped = 0usize;

        for &season in seasons {
            let schools = self.schools.fetch(season).await;
            for school in &schools {
                match self.scrape_school(school, season).await {
                    Some(table) => acc.push(table),
                    None => skipped += 1,
                }
            }
            info!(
                "Season {} done: {} rows so far across {} school logs",
                season,
                acc.row_count(),
                acc.batch_count()
            );
        }

        if skipped > 0 {
            warn!("Skipped {} school gamelogs with no table", skipped);
        }
        acc.finish()
    }

    /// Fetch and clean one school's log. The polite delay applies whatever the outcome.
    pub async fn scrape_school(&self, school: &SchoolSlug, season: Season) -> Option<Table> {
        let url = gamelog_url(&self.base_url, school, season);
        info!("Scraping gamelog: {}", url);

        let outcome = self.fetcher.fetch(&url, DEFAULT_HEADER_ROWS).await;
        self.throttle.pause().await;

        match outcome {
            FetchOutcome::Table(mut raw) => {
                raw.set_column(SEASON_COLUMN, &season.to_string());
                raw.set_column(SCHOOL_COLUMN, school.as_str());
                Some(clean_gamelogs(raw))
            }
            other => {
                warn!("No table for {}, {} ({})", school, season, other.describe());
                None
            }
        }
    }
}
