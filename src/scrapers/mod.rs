pub mod gamelogs;
pub mod school_list;
pub mod school_names;
pub mod season_stats;
pub mod table_fetcher;

#[cfg(test)]
pub(crate) mod test_server;

pub use gamelogs::GamelogsScraper;
pub use school_list::SchoolListFetcher;
pub use school_names::{normalize_school_name, SlugRule};
pub use season_stats::SeasonStatsScraper;
pub use table_fetcher::{FetchOutcome, RetryPolicy, TableFetcher, Throttle};
