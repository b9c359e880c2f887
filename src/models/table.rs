use std::collections::HashMap;

/// A single cell. `None` stands for a missing value (empty HTML cell, empty CSV field).
pub type Cell = Option<String>;

/// Column-oriented view over scraped rows, addressed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals, treating empty strings as missing
    pub fn from_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|v| normalize_cell(v)).collect());
        }
        table
    }

    /// Append a row, padding or truncating it to the column count
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of one column, or `None` if the column does not exist
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                self.columns.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
                true
            }
            None => false,
        }
    }

    /// Drop every column whose name matches `pred`, returning the dropped names
    pub fn drop_columns_where<F>(&mut self, pred: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .columns
            .iter()
            .filter(|c| pred(c.as_str()))
            .cloned()
            .collect();
        for name in &doomed {
            self.drop_column(name);
        }
        doomed
    }

    /// Rename columns per `(from, to)` pairs. Pairs whose source is absent are ignored.
    pub fn rename_columns(&mut self, mapping: &[(&str, &str)]) {
        let lookup: HashMap<&str, &str> = mapping.iter().copied().collect();
        for column in &mut self.columns {
            if let Some(to) = lookup.get(column.as_str()) {
                *column = to.to_string();
            }
        }
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Set a column to a constant, appending it if it does not exist yet
    pub fn set_column(&mut self, name: &str, value: &str) {
        let value = normalize_cell(value);
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// Rewrite every cell of a column in place. Returns false if the column is absent.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(Cell) -> Cell,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            let cell = row[idx].take();
            row[idx] = f(cell);
        }
        true
    }

    /// Rows whose `column` equals `value`, with the same columns
    pub fn filter_eq(&self, column: &str, value: &str) -> Table {
        let mut out = Table::new(self.columns.clone());
        if let Some(idx) = self.column_index(column) {
            out.rows = self
                .rows
                .iter()
                .filter(|row| row[idx].as_deref() == Some(value))
                .cloned()
                .collect();
        }
        out
    }

    /// Distinct non-missing values of a column, in order of first appearance
    pub fn distinct(&self, column: &str) -> Vec<String> {
        let mut seen = Vec::new();
        if let Some(values) = self.column(column) {
            for value in values.flatten() {
                if !seen.contains(value) {
                    seen.push(value.clone());
                }
            }
        }
        seen
    }

    /// Stack tables vertically. Columns are the union of all inputs in order of first
    /// appearance; cells for columns a table lacks are missing.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let total = tables.iter().map(Table::len).sum();
        let mut out = Table::new(columns);
        out.rows.reserve(total);
        for table in tables {
            let positions: Vec<Option<usize>> = out
                .columns
                .iter()
                .map(|c| table.column_index(c))
                .collect();
            for mut row in table.rows {
                let reordered = positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get_mut(i).and_then(Option::take)))
                    .collect();
                out.rows.push(reordered);
            }
        }
        out
    }

    /// Same column set and the same multiset of rows, ignoring row and column order
    pub fn equivalent(&self, other: &Table) -> bool {
        if self.len() != other.len() || self.columns.len() != other.columns.len() {
            return false;
        }
        let mut ours = self.columns.clone();
        let mut theirs = other.columns.clone();
        ours.sort();
        theirs.sort();
        if ours != theirs {
            return false;
        }

        let mut left = self.canonical_rows(&ours);
        let mut right = other.canonical_rows(&ours);
        left.sort();
        right.sort();
        left == right
    }

    fn canonical_rows(&self, order: &[String]) -> Vec<Vec<Cell>> {
        let positions: Vec<usize> = order
            .iter()
            .filter_map(|c| self.column_index(c))
            .collect();
        self.rows
            .iter()
            .map(|row| positions.iter().map(|&i| row[i].clone()).collect())
            .collect()
    }
}

/// Trim a raw value and map blanks to a missing cell
pub fn normalize_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collects per-page batches and concatenates them once at the end of a scrape
#[derive(Debug, Default)]
pub struct TableAccumulator {
    batches: Vec<Table>,
    rows: usize,
}

impl TableAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, batch: Table) {
        if batch.is_empty() {
            return;
        }
        self.rows += batch.len();
        self.batches.push(batch);
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> Table {
        Table::concat(self.batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_ignores_missing_columns() {
        let mut table = Table::from_rows(&["W", "L"], &[&["20", "5"]]);
        table.rename_columns(&[("W", "W_Tot"), ("SRS", "Simple_Rating_System")]);
        assert_eq!(table.columns, vec!["W_Tot", "L"]);
    }

    #[test]
    fn test_set_column_appends_then_overwrites() {
        let mut table = Table::from_rows(&["School"], &[&["Duke"], &["Kansas"]]);
        table.set_column("Season", "2023");
        assert_eq!(table.get(1, "Season"), Some("2023"));
        table.set_column("Season", "2024");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.get(0, "Season"), Some("2024"));
    }

    #[test]
    fn test_distinct_keeps_first_appearance_order() {
        let table = Table::from_rows(
            &["Season"],
            &[&["2024"], &["2023"], &["2024"], &[""], &["2022"]],
        );
        assert_eq!(table.distinct("Season"), vec!["2024", "2023", "2022"]);
    }

    #[test]
    fn test_concat_unions_columns() {
        let a = Table::from_rows(&["School", "W"], &[&["Duke", "20"]]);
        let b = Table::from_rows(&["School", "L"], &[&["Kansas", "4"]]);
        let merged = Table::concat(vec![a, b]);

        assert_eq!(merged.columns, vec!["School", "W", "L"]);
        assert_eq!(merged.rows[0], vec![Some("Duke".into()), Some("20".into()), None]);
        assert_eq!(merged.rows[1], vec![Some("Kansas".into()), None, Some("4".into())]);
    }

    #[test]
    fn test_equivalent_ignores_row_and_column_order() {
        let a = Table::from_rows(&["School", "W"], &[&["Duke", "20"], &["Kansas", "25"]]);
        let b = Table::from_rows(&["W", "School"], &[&["25", "Kansas"], &["20", "Duke"]]);
        assert!(a.equivalent(&b));

        let c = Table::from_rows(&["W", "School"], &[&["25", "Kansas"], &["21", "Duke"]]);
        assert!(!a.equivalent(&c));
    }

    #[test]
    fn test_accumulator_skips_empty_batches() {
        let mut acc = TableAccumulator::new();
        acc.push(Table::from_rows(&["School"], &[&["Duke"]]));
        acc.push(Table::new(vec!["School".into()]));
        acc.push(Table::from_rows(&["School"], &[&["Gonzaga"], &["Baylor"]]));

        assert_eq!(acc.batch_count(), 2);
        assert_eq!(acc.row_count(), 3);
        assert_eq!(acc.finish().len(), 3);
    }
}
