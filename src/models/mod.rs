pub mod table;

pub use table::{normalize_cell, Cell, Table, TableAccumulator};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Competition season, identified by the calendar year it ends in (e.g. 2024 for 2023-24)
pub type Season = i32;

/// Column names shared between scrapers, writer and loader
pub const SEASON_COLUMN: &str = "Season";
pub const SCHOOL_COLUMN: &str = "School";

/// URL-safe school identifier used in fetch URLs and partition filenames
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchoolSlug(String);

impl SchoolSlug {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SchoolSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
