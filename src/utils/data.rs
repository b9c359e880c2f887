use crate::error::DataError;
use crate::models::{normalize_cell, Table, SCHOOL_COLUMN, SEASON_COLUMN};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The persisted datasets and where each lives under the output root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    SeasonStats,
    TeamGamelogs,
    OddsSnapshot,
}

impl Dataset {
    pub fn label(&self) -> &'static str {
        match self {
            Dataset::SeasonStats => "season stats",
            Dataset::TeamGamelogs => "team gamelogs",
            Dataset::OddsSnapshot => "betting odds",
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Dataset::SeasonStats => "Overall-Data",
            Dataset::TeamGamelogs => "Team-Gamelogs",
            Dataset::OddsSnapshot => "Betting-Odds",
        }
    }

    pub fn combined_file(&self) -> &'static str {
        match self {
            Dataset::SeasonStats => "season_stats.csv",
            Dataset::TeamGamelogs => "all_team_gamelogs.csv",
            Dataset::OddsSnapshot => "odds_snapshot.csv",
        }
    }

    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(self.dir_name())
    }

    pub fn combined_path(&self, root: &Path) -> PathBuf {
        self.dir(root).join(self.combined_file())
    }
}

pub const SEASON_FILE_SUFFIX: &str = "_stats.csv";
pub const GAMELOG_FILE_SUFFIX: &str = "-gamelogs.csv";

pub fn season_file_name(season: &str) -> String {
    format!("{}{}", season, SEASON_FILE_SUFFIX)
}

pub fn gamelog_file_name(school: &str) -> String {
    format!("{}{}", school, GAMELOG_FILE_SUFFIX)
}

/// Write a table as CSV with a header row. Missing cells become empty fields.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| DataError::csv(path, e))?;
    writer
        .write_record(&table.columns)
        .map_err(|e| DataError::csv(path, e))?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
            .map_err(|e| DataError::csv(path, e))?;
    }
    writer.flush().map_err(|e| DataError::io(path, e))?;
    Ok(())
}

/// Read a CSV file with a header row. Empty fields become missing cells.
pub fn read_csv(path: &Path) -> Result<Table, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::csv(path, e))?;

    let columns = reader
        .headers()
        .map_err(|e| DataError::csv(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut table = Table::new(columns);

    for record in reader.records() {
        let record = record.map_err(|e| DataError::csv(path, e))?;
        table.push_row(record.iter().map(normalize_cell).collect());
    }
    debug!("Read {} rows from {}", table.len(), path.display());
    Ok(table)
}

fn create_dir(path: &Path) -> Result<(), DataError> {
    fs::create_dir_all(path).map_err(|e| DataError::io(path, e))
}

/// Persists datasets as a combined file plus season (and season + school) partitions
pub struct PartitionedWriter {
    root: PathBuf,
}

impl PartitionedWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write any dataset with its standard partitioning. Returns every file written.
    pub fn write(&self, dataset: Dataset, table: &Table) -> Result<Vec<PathBuf>, DataError> {
        match dataset {
            Dataset::SeasonStats => self.write_season_stats(table),
            Dataset::TeamGamelogs => self.write_team_gamelogs(table),
            Dataset::OddsSnapshot => self.write_odds_snapshot(table),
        }
    }

    /// `Overall-Data/season_stats.csv` plus `Overall-Data/{season}_stats.csv` per season
    pub fn write_season_stats(&self, table: &Table) -> Result<Vec<PathBuf>, DataError> {
        let dataset = Dataset::SeasonStats;
        let dir = dataset.dir(&self.root);
        create_dir(&dir)?;

        let mut written = Vec::new();
        let combined = dataset.combined_path(&self.root);
        write_csv(table, &combined)?;
        info!("Saved combined season stats to {}", combined.display());
        written.push(combined);

        for season in partition_keys(table, SEASON_COLUMN) {
            let path = dir.join(season_file_name(&season));
            write_csv(&table.filter_eq(SEASON_COLUMN, &season), &path)?;
            info!("Saved {} season stats to {}", season, path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// `Team-Gamelogs/all_team_gamelogs.csv` plus `Team-Gamelogs/{season}/{school}-gamelogs.csv`
    pub fn write_team_gamelogs(&self, table: &Table) -> Result<Vec<PathBuf>, DataError> {
        let dataset = Dataset::TeamGamelogs;
        let dir = dataset.dir(&self.root);
        create_dir(&dir)?;

        let mut written = Vec::new();
        let combined = dataset.combined_path(&self.root);
        write_csv(table, &combined)?;
        info!("Saved combined team gamelogs to {}", combined.display());
        written.push(combined);

        for season in partition_keys(table, SEASON_COLUMN) {
            let season_dir = dir.join(&season);
            create_dir(&season_dir)?;
            let season_rows = table.filter_eq(SEASON_COLUMN, &season);

            let mut schools = season_rows.distinct(SCHOOL_COLUMN);
            schools.sort();
            for school in &schools {
                let path = season_dir.join(gamelog_file_name(school));
                write_csv(&season_rows.filter_eq(SCHOOL_COLUMN, school), &path)?;
                written.push(path);
            }
            info!(
                "Saved {} gamelog files for {} under {}",
                schools.len(),
                season,
                season_dir.display()
            );
        }
        Ok(written)
    }

    /// `Betting-Odds/odds_snapshot.csv`, no partitioning
    pub fn write_odds_snapshot(&self, table: &Table) -> Result<Vec<PathBuf>, DataError> {
        let dataset = Dataset::OddsSnapshot;
        create_dir(&dataset.dir(&self.root))?;
        let path = dataset.combined_path(&self.root);
        write_csv(table, &path)?;
        info!("Saved odds snapshot to {}", path.display());
        Ok(vec![path])
    }
}

/// Distinct partition values of `column`. Rows lacking the column value are only in the
/// combined file.
fn partition_keys(table: &Table, column: &str) -> Vec<String> {
    if !table.has_column(column) {
        warn!("No {} column; writing the combined file only", column);
        return Vec::new();
    }
    let keys = table.distinct(column);
    let unkeyed = table
        .column(column)
        .map(|values| values.filter(|v| v.is_none()).count())
        .unwrap_or(0);
    if unkeyed > 0 {
        warn!("{} rows have no {} and are not partitioned", unkeyed, column);
    }
    keys
}
