use crate::config::ScrapeConfig;
use crate::models::{SchoolSlug, Season};
use crate::scrapers::school_names::school_slug;
use crate::scrapers::table_fetcher::{FetchOutcome, TableFetcher, Throttle, DEFAULT_HEADER_ROWS};
use tracing::{info, warn};

/// The roster table puts the school name in its second column
const SCHOOL_COLUMN_INDEX: usize = 1;

pub fn school_list_url(base_url: &str, season: Season) -> String {
    format!("{}/seasons/men/{}-school-stats.html", base_url, season)
}

/// Fetches the schools that played in a season, as URL slugs
pub struct SchoolListFetcher {
    fetcher: TableFetcher,
    base_url: String,
    throttle: Throttle,
}

impl SchoolListFetcher {
    pub fn new(fetcher: TableFetcher, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
            throttle: Throttle::new(config.roster_delay_secs.clone()),
        }
    }

    /// Slugs in page order. An unavailable roster page yields an empty list.
    pub async fn fetch(&self, season: Season) -> Vec<SchoolSlug> {
        let url = school_list_url(&self.base_url, season);
        info!("Gathering school list for {}: {}", season, url);

        let outcome = self.fetcher.fetch(&url, DEFAULT_HEADER_ROWS).await;
        self.throttle.pause().await;

        let table = match outcome {
            FetchOutcome::Table(table) => table,
            other => {
                warn!("No school list for {} ({})", season, other.describe());
                return Vec::new();
            }
        };

        let mut schools: Vec<SchoolSlug> = Vec::new();
        for row in &table.rows {
            let Some(Some(name)) = row.get(SCHOOL_COLUMN_INDEX) else {
                continue;
            };
            let slug = school_slug(name);
            // repeated header rows
            if slug.as_str().eq_ignore_ascii_case("school") {
                continue;
            }
            if !schools.contains(&slug) {
                schools.push(slug);
            }
        }

        info!("Found {} schools for {}", schools.len(), season);
        schools
    }
}
