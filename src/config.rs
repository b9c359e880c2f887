use crate::api::odds_api::ODDS_API_BASE_URL;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://www.sports-reference.com/cbb";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
    #[error("{min_var} ({min}) must not exceed {max_var} ({max})")]
    InvertedRange {
        min_var: &'static str,
        min: u64,
        max_var: &'static str,
        max: u64,
    },
}

/// Settings shared by every scraper in a run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Polite delay after each stats/gamelog page, in whole seconds
    pub page_delay_secs: RangeInclusive<u64>,
    /// Polite delay after each school-roster page, in whole seconds
    pub roster_delay_secs: RangeInclusive<u64>,
    /// Extra attempts for transient fetch failures. Zero keeps the one-shot behaviour.
    pub max_retries: u32,
    pub odds_api_key: Option<String>,
    pub odds_api_url: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            page_delay_secs: 5..=10,
            roster_delay_secs: 3..=6,
            max_retries: 0,
            odds_api_key: None,
            odds_api_url: ODDS_API_BASE_URL.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Read configuration from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("CBB_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let user_agent = lookup("CBB_USER_AGENT").unwrap_or(defaults.user_agent);
        let timeout = Duration::from_secs(parse_var(
            &lookup,
            "CBB_TIMEOUT_SECS",
            defaults.timeout.as_secs(),
        )?);

        let page_min = parse_var(&lookup, "CBB_DELAY_MIN_SECS", *defaults.page_delay_secs.start())?;
        let page_max = parse_var(&lookup, "CBB_DELAY_MAX_SECS", *defaults.page_delay_secs.end())?;
        if page_min > page_max {
            return Err(ConfigError::InvertedRange {
                min_var: "CBB_DELAY_MIN_SECS",
                min: page_min,
                max_var: "CBB_DELAY_MAX_SECS",
                max: page_max,
            });
        }

        let roster_min = parse_var(
            &lookup,
            "CBB_ROSTER_DELAY_MIN_SECS",
            *defaults.roster_delay_secs.start(),
        )?;
        let roster_max = parse_var(
            &lookup,
            "CBB_ROSTER_DELAY_MAX_SECS",
            *defaults.roster_delay_secs.end(),
        )?;
        if roster_min > roster_max {
            return Err(ConfigError::InvertedRange {
                min_var: "CBB_ROSTER_DELAY_MIN_SECS",
                min: roster_min,
                max_var: "CBB_ROSTER_DELAY_MAX_SECS",
                max: roster_max,
            });
        }

        let max_retries = parse_var(&lookup, "CBB_MAX_RETRIES", defaults.max_retries)?;
        let odds_api_key = lookup("ODDS_API_KEY").filter(|key| !key.trim().is_empty());
        let odds_api_url = lookup("ODDS_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.odds_api_url);

        Ok(Self {
            base_url,
            user_agent,
            timeout,
            page_delay_secs: page_min..=page_max,
            roster_delay_secs: roster_min..=roster_max,
            max_retries,
            odds_api_key,
            odds_api_url,
        })
    }

    /// Same settings with every polite delay disabled
    pub fn without_delays(mut self) -> Self {
        self.page_delay_secs = 0..=0;
        self.roster_delay_secs = 0..=0;
        self
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
