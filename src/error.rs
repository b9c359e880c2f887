use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing persisted datasets
#[derive(Debug, Error)]
pub enum DataError {
    /// Neither a combined file nor any partition exists for the dataset
    #[error("no {dataset} data found under {}: expected {expected}", .path.display())]
    MissingData {
        dataset: &'static str,
        path: PathBuf,
        expected: String,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error at {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DataError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn is_missing_data(&self) -> bool {
        matches!(self, DataError::MissingData { .. })
    }
}
