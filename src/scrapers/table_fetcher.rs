use crate::config::ScrapeConfig;
use crate::models::{normalize_cell, Table};
use anyhow::{Context, Result};
use rand::Rng;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, warn};

/// sports-reference tables carry an over-header row; the real column names are on row 1
pub const DEFAULT_HEADER_ROWS: &[usize] = &[1];

/// Result of fetching one page's first table
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Table(Table),
    /// 404, or the page has no table
    NotFound,
    /// Network error, timeout, or a non-404 error status
    TransientError(String),
}

impl FetchOutcome {
    /// Collapse both failure kinds into `None`
    pub fn into_table(self) -> Option<Table> {
        match self {
            FetchOutcome::Table(table) => Some(table),
            FetchOutcome::NotFound | FetchOutcome::TransientError(_) => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FetchOutcome::Table(table) => format!("table with {} rows", table.len()),
            FetchOutcome::NotFound => "no table found".to_string(),
            FetchOutcome::TransientError(reason) => format!("fetch failed: {}", reason),
        }
    }
}

/// How many extra attempts a transient failure gets. `NotFound` is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

/// Randomized pause between requests, in whole seconds
#[derive(Debug, Clone)]
pub struct Throttle {
    secs: RangeInclusive<u64>,
}

impl Throttle {
    pub fn new(secs: RangeInclusive<u64>) -> Self {
        Self { secs }
    }

    pub fn next_delay(&self) -> Duration {
        let (min, max) = (*self.secs.start(), *self.secs.end());
        if max <= min {
            return Duration::from_secs(min);
        }
        Duration::from_secs(rand::thread_rng().gen_range(min..=max))
    }

    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!("Sleeping {:?} before the next request", delay);
        tokio::time::sleep(delay).await;
    }
}

/// Fetches the first HTML table on a page
#[derive(Clone)]
pub struct TableFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
    retry_throttle: Throttle,
}

impl TableFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            retry: RetryPolicy {
                max_retries: config.max_retries,
            },
            retry_throttle: Throttle::new(config.page_delay_secs.clone()),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch `url` and parse its first table using the given header row offsets
    pub async fn fetch(&self, url: &str, header_rows: &[usize]) -> FetchOutcome {
        let mut attempt = 0;
        loop {
            let outcome = self.fetch_once(url, header_rows).await;
            match &outcome {
                FetchOutcome::TransientError(reason) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(
                        "Retrying {} after transient failure ({}), attempt {} of {}",
                        url, reason, attempt, self.retry.max_retries
                    );
                    self.retry_throttle.pause().await;
                }
                _ => return outcome,
            }
        }
    }

    /// Historical behaviour: any failure is just "no table"
    pub async fn fetch_optional(&self, url: &str, header_rows: &[usize]) -> Option<Table> {
        self.fetch(url, header_rows).await.into_table()
    }

    async fn fetch_once(&self, url: &str, header_rows: &[usize]) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::TransientError(e.to_string()),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }
        if !status.is_success() {
            return FetchOutcome::TransientError(format!("HTTP status {}", status));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => return FetchOutcome::TransientError(e.to_string()),
        };
        debug!("Fetched {} ({} bytes)", url, html.len());

        match parse_first_table(&html, header_rows) {
            Some(table) => FetchOutcome::Table(table),
            None => FetchOutcome::NotFound,
        }
    }
}

/// Parse the first `<table>` in `html`. Returns `None` when the page has no table or the
/// header offsets point past the table's rows.
pub fn parse_first_table(html: &str, header_rows: &[usize]) -> Option<Table> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").ok()?;
    let table = document.select(&table_selector).next()?;

    let rows = collect_rows(table);
    let header_rows: Vec<usize> = if header_rows.is_empty() {
        vec![0]
    } else {
        header_rows.to_vec()
    };
    let last_header = *header_rows.iter().max()?;
    if last_header >= rows.len() {
        return None;
    }

    let width = header_rows
        .iter()
        .map(|&i| rows[i].len())
        .max()
        .unwrap_or(0);
    let mut names = Vec::with_capacity(width);
    for col in 0..width {
        let levels: Vec<&str> = header_rows
            .iter()
            .filter_map(|&i| rows[i].get(col))
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        if levels.is_empty() {
            names.push(format!("Unnamed: {}", col));
        } else {
            names.push(levels.join("_"));
        }
    }

    let mut out = Table::new(dedupe_column_names(names));
    for row in rows.into_iter().skip(last_header + 1) {
        let cells: Vec<_> = row.iter().map(|text| normalize_cell(text)).collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        out.push_row(cells);
    }
    Some(out)
}

/// Rows of a table section by section (thead, tbody, tfoot), colspans expanded
fn collect_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let mut sections: HashMap<&str, Vec<ElementRef<'_>>> = HashMap::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        let name = child.value().name();
        match name {
            "thead" | "tbody" | "tfoot" => sections.entry(name).or_default().push(child),
            // bare rows directly under <table>
            "tr" => sections.entry("tbody").or_default().push(child),
            _ => {}
        }
    }

    let mut rows = Vec::new();
    for section in ["thead", "tbody", "tfoot"] {
        for element in sections.remove(section).unwrap_or_default() {
            if element.value().name() == "tr" {
                rows.push(row_cells(element));
                continue;
            }
            for tr in element.children().filter_map(ElementRef::wrap) {
                if tr.value().name() == "tr" {
                    rows.push(row_cells(tr));
                }
            }
        }
    }
    rows.retain(|row| !row.is_empty());
    rows
}

fn row_cells(tr: ElementRef<'_>) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in tr.children().filter_map(ElementRef::wrap) {
        let name = cell.value().name();
        if name != "th" && name != "td" {
            continue;
        }
        let text = cell.text().collect::<String>().trim().to_string();
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        for _ in 0..span {
            cells.push(text.clone());
        }
    }
    cells
}

/// Disambiguate repeated header names as `X`, `X.1`, `X.2`, ...
fn dedupe_column_names(names: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let count = counts.entry(name.clone()).or_insert(0);
        while out.contains(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::test_server::{serve, serve_router, NO_TABLE, STATS_2023};
    use axum::{http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const STATS_PAGE: &str = r#"
        <html><body>
        <table id="basic_school_stats">
          <thead>
            <tr class="over_header">
              <th colspan="2"></th><th colspan="3">Overall</th><th></th><th colspan="2">Conf.</th>
            </tr>
            <tr>
              <th>Rk</th><th>School</th><th>G</th><th>W</th><th>L</th><th></th><th>W</th><th>L</th>
            </tr>
          </thead>
          <tbody>
            <tr><th>1</th><td>Duke</td><td>34</td><td>27</td><td>7</td><td></td><td>14</td><td>6</td></tr>
            <tr class="thead"><th>Rk</th><td>School</td><td>G</td><td>W</td><td>L</td><td></td><td>W</td><td>L</td></tr>
            <tr><th>2</th><td>Kansas</td><td>33</td><td>23</td><td>10</td><td></td><td>10</td><td>8</td></tr>
          </tbody>
        </table>
        <table><tr><td>second table is ignored</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_parse_uses_second_header_row() {
        let table = parse_first_table(STATS_PAGE, DEFAULT_HEADER_ROWS).unwrap();
        assert_eq!(
            table.columns,
            vec!["Rk", "School", "G", "W", "L", "Unnamed: 5", "W.1", "L.1"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0, "School"), Some("Duke"));
        assert_eq!(table.get(0, "Unnamed: 5"), None);
        assert_eq!(table.get(1, "School"), Some("School"));
        assert_eq!(table.get(2, "W.1"), Some("10"));
    }

    #[test]
    fn test_parse_expands_colspan_in_header_levels() {
        let table = parse_first_table(STATS_PAGE, &[0, 1]).unwrap();
        assert_eq!(table.columns[0], "Rk");
        assert_eq!(table.columns[3], "Overall_W");
        assert_eq!(table.columns[6], "Conf._W");
    }

    #[test]
    fn test_parse_without_table_is_none() {
        assert!(parse_first_table("<html><body><p>nothing</p></body></html>", &[1]).is_none());
    }

    #[test]
    fn test_parse_header_offset_out_of_range_is_none() {
        let html = "<table><tr><th>Only</th></tr></table>";
        assert!(parse_first_table(html, &[1]).is_none());
        assert_eq!(parse_first_table(html, &[0]).unwrap().columns, vec!["Only"]);
    }

    #[test]
    fn test_dedupe_column_names() {
        let names = ["FG", "FGA", "FG", "Opp", "FG", "Opp"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dedupe_column_names(names),
            vec!["FG", "FGA", "FG.1", "Opp", "FG.2", "Opp.1"]
        );
    }

    #[test]
    fn test_throttle_zero_range_has_no_delay() {
        assert!(Throttle::new(0..=0).next_delay().is_zero());
        let delay = Throttle::new(3..=6).next_delay();
        assert!(delay >= Duration::from_secs(3) && delay <= Duration::from_secs(6));
    }

    #[test]
    fn test_outcome_into_table() {
        let table = Table::from_rows(&["School"], &[&["Duke"]]);
        assert_eq!(FetchOutcome::Table(table.clone()).into_table(), Some(table));
        assert_eq!(FetchOutcome::NotFound.into_table(), None);
        assert_eq!(FetchOutcome::TransientError("timeout".into()).into_table(), None);
    }

    #[tokio::test]
    async fn test_fetch_outcomes() {
        let base_url = serve(vec![("/stats.html", STATS_2023), ("/empty.html", NO_TABLE)]).await;
        let config = ScrapeConfig::default().without_delays();
        let fetcher = TableFetcher::new(&config).unwrap();

        let found = fetcher
            .fetch(&format!("{}/stats.html", base_url), DEFAULT_HEADER_ROWS)
            .await;
        assert!(matches!(found, FetchOutcome::Table(ref t) if t.len() == 2));

        let empty = fetcher
            .fetch(&format!("{}/empty.html", base_url), DEFAULT_HEADER_ROWS)
            .await;
        assert_eq!(empty, FetchOutcome::NotFound);

        let missing = fetcher
            .fetch_optional(&format!("{}/missing.html", base_url), DEFAULT_HEADER_ROWS)
            .await;
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_only_transient_errors_are_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/busy.html",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::SERVICE_UNAVAILABLE, "try later")
                }
            }),
        );
        let base_url = serve_router(app).await;
        let config = ScrapeConfig::default().without_delays();
        let fetcher = TableFetcher::new(&config)
            .unwrap()
            .with_retry_policy(RetryPolicy { max_retries: 2 });

        let outcome = fetcher
            .fetch(&format!("{}/busy.html", base_url), DEFAULT_HEADER_ROWS)
            .await;
        assert!(matches!(outcome, FetchOutcome::TransientError(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        let outcome = fetcher
            .fetch(&format!("{}/gone.html", base_url), DEFAULT_HEADER_ROWS)
            .await;
        assert_eq!(outcome, FetchOutcome::NotFound);
    }
}
