use crate::models::Table;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

pub const ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const SPORT_KEY: &str = "basketball_ncaab"; // Men's college basketball

/// Columns of the raw odds snapshot, one row per outcome of each bookmaker's markets
pub const ODDS_SNAPSHOT_COLUMNS: &[&str] = &[
    "game_id",
    "commence_time",
    "home_team",
    "away_team",
    "bookmaker",
    "last_update",
    "market",
    "outcome",
    "price",
    "point",
];

/// Response from The Odds API for a single game
#[derive(Debug, Deserialize)]
struct OddsApiGame {
    id: String,
    commence_time: DateTime<Utc>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<OddsApiBookmaker>,
}

/// Bookmaker data from The Odds API
#[derive(Debug, Deserialize)]
struct OddsApiBookmaker {
    title: String,
    last_update: DateTime<Utc>,
    markets: Vec<OddsApiMarket>,
}

/// Market data (e.g., moneyline, spread) from The Odds API
#[derive(Debug, Deserialize)]
struct OddsApiMarket {
    key: String,
    outcomes: Vec<OddsApiOutcome>,
}

/// Outcome data for a specific team
#[derive(Debug, Deserialize)]
struct OddsApiOutcome {
    name: String,
    price: f64,
    point: Option<f64>,
}

pub struct OddsApiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OddsApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: ODDS_API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch current college basketball moneyline and spread odds as a flat table
    pub async fn fetch_snapshot(&self) -> Result<Table> {
        let url = format!("{}/sports/{}/odds", self.base_url, SPORT_KEY);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "us"),
                ("markets", "h2h,spreads"),
                ("oddsFormat", "american"),
            ])
            .send()
            .await
            .context("Failed to fetch odds from The Odds API")?;

        if !response.status().is_success() {
            anyhow::bail!("Odds API returned error: {}", response.status());
        }

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            info!("Odds API requests remaining: {:?}", remaining);
        }

        let games: Vec<OddsApiGame> = response
            .json()
            .await
            .context("Failed to parse Odds API response")?;

        Ok(snapshot_table(games))
    }
}

fn snapshot_table(games: Vec<OddsApiGame>) -> Table {
    let mut table = Table::new(ODDS_SNAPSHOT_COLUMNS.iter().map(|c| c.to_string()).collect());

    for game in games {
        let commence_time = game.commence_time.to_rfc3339();
        for bookmaker in &game.bookmakers {
            let last_update = bookmaker.last_update.to_rfc3339();
            for market in &bookmaker.markets {
                for outcome in &market.outcomes {
                    table.push_row(vec![
                        Some(game.id.clone()),
                        Some(commence_time.clone()),
                        Some(game.home_team.clone()),
                        Some(game.away_team.clone()),
                        Some(bookmaker.title.clone()),
                        Some(last_update.clone()),
                        Some(market.key.clone()),
                        Some(outcome.name.clone()),
                        Some(outcome.price.to_string()),
                        outcome.point.map(|p| p.to_string()),
                    ]);
                }
            }
        }
    }

    table
}
