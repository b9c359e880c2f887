use crate::error::DataError;
use crate::models::{Table, TableAccumulator, SCHOOL_COLUMN, SEASON_COLUMN};
use crate::utils::data::{read_csv, Dataset, GAMELOG_FILE_SUFFIX, SEASON_FILE_SUFFIX};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads datasets back from an output root, whichever layout it was written in
pub struct DatasetLoader {
    root: PathBuf,
}

impl DatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, dataset: Dataset) -> Result<Table, DataError> {
        match dataset {
            Dataset::SeasonStats => self.season_stats(),
            Dataset::TeamGamelogs => self.team_gamelogs(),
            Dataset::OddsSnapshot => self.odds_snapshot(),
        }
    }

    /// Combined `season_stats.csv` if present, otherwise every `{season}_stats.csv`
    pub fn season_stats(&self) -> Result<Table, DataError> {
        let dataset = Dataset::SeasonStats;
        if let Some(table) = self.combined(dataset)? {
            return Ok(table);
        }

        let dir = dataset.dir(&self.root);
        let mut acc = TableAccumulator::new();
        for path in sorted_entries(&dir)? {
            let Some(name) = file_name(&path) else {
                continue;
            };
            if !path.is_file()
                || !name.ends_with(SEASON_FILE_SUFFIX)
                || name == dataset.combined_file()
            {
                continue;
            }
            acc.push(read_csv(&path)?);
        }

        finish(acc, dataset, &dir, "'season_stats.csv' or files like '2022_stats.csv'")
    }

    /// Combined `all_team_gamelogs.csv` if present, otherwise every
    /// `{season}/{school}-gamelogs.csv`, filling in Season and School from the path
    /// when a partition lacks them
    pub fn team_gamelogs(&self) -> Result<Table, DataError> {
        let dataset = Dataset::TeamGamelogs;
        if let Some(table) = self.combined(dataset)? {
            return Ok(table);
        }

        let dir = dataset.dir(&self.root);
        let mut acc = TableAccumulator::new();
        for season_dir in sorted_entries(&dir)? {
            if !season_dir.is_dir() {
                continue;
            }
            let Some(season) = file_name(&season_dir) else {
                continue;
            };

            for path in sorted_entries(&season_dir)? {
                let Some(name) = file_name(&path) else {
                    continue;
                };
                let Some(school) = name.strip_suffix(GAMELOG_FILE_SUFFIX) else {
                    continue;
                };
                if !path.is_file() {
                    continue;
                }

                let mut table = read_csv(&path)?;
                if !table.has_column(SEASON_COLUMN) {
                    table.set_column(SEASON_COLUMN, &season);
                }
                if !table.has_column(SCHOOL_COLUMN) {
                    table.set_column(SCHOOL_COLUMN, school);
                }
                acc.push(table);
            }
        }

        finish(
            acc,
            dataset,
            &dir,
            "'all_team_gamelogs.csv' or per-season folders with '<school>-gamelogs.csv' files",
        )
    }

    pub fn odds_snapshot(&self) -> Result<Table, DataError> {
        let dataset = Dataset::OddsSnapshot;
        let path = dataset.combined_path(&self.root);
        self.combined(dataset)?.ok_or_else(|| DataError::MissingData {
            dataset: dataset.label(),
            path,
            expected: format!("'{}'", dataset.combined_file()),
        })
    }

    fn combined(&self, dataset: Dataset) -> Result<Option<Table>, DataError> {
        let path = dataset.combined_path(&self.root);
        if !path.is_file() {
            debug!("No combined {} file at {}", dataset.label(), path.display());
            return Ok(None);
        }
        let table = read_csv(&path)?;
        info!(
            "Loaded {} {} rows from {}",
            table.len(),
            dataset.label(),
            path.display()
        );
        Ok(Some(table))
    }
}

fn finish(
    acc: TableAccumulator,
    dataset: Dataset,
    dir: &Path,
    expected: &str,
) -> Result<Table, DataError> {
    if acc.batch_count() == 0 {
        return Err(DataError::MissingData {
            dataset: dataset.label(),
            path: dir.to_path_buf(),
            expected: expected.to_string(),
        });
    }
    info!(
        "Rebuilt {} from {} partition files ({} rows)",
        dataset.label(),
        acc.batch_count(),
        acc.row_count()
    );
    Ok(acc.finish())
}

/// Directory entries sorted by path. A missing directory yields no entries.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, DataError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DataError::io(dir, e)),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::io(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}
