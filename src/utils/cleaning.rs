use crate::models::{Cell, Table, SCHOOL_COLUMN, SEASON_COLUMN};
use tracing::{debug, warn};

/// Rows whose `column` is missing or equals `header` are repeated header rows
#[derive(Debug, Clone, Copy)]
pub struct Sentinel {
    pub column: &'static str,
    pub header: &'static str,
}

/// Known layout of one source table: what to drop, what to rename, what passes through
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub drop_prefixes: &'static [&'static str],
    pub drop_columns: &'static [&'static str],
    pub renames: &'static [(&'static str, &'static str)],
    pub passthrough: &'static [&'static str],
    pub sentinel: Sentinel,
}

impl TableSchema {
    fn is_known(&self, column: &str) -> bool {
        self.drop_prefixes.iter().any(|p| column.starts_with(p))
            || self.drop_columns.contains(&column)
            || self.renames.iter().any(|(from, to)| *from == column || *to == column)
            || self.passthrough.contains(&column)
    }

    /// Columns in `table` this schema does not account for
    pub fn drift(&self, table: &Table) -> Vec<String> {
        table
            .columns
            .iter()
            .filter(|c| !self.is_known(c))
            .cloned()
            .collect()
    }

    /// Drop and rename columns. Absent columns are tolerated.
    pub fn apply(&self, table: &mut Table) {
        let drift = self.drift(table);
        if !drift.is_empty() {
            warn!("{} table has unexpected columns: {:?}", self.name, drift);
        }

        let dropped = table.drop_columns_where(|c| {
            self.drop_prefixes.iter().any(|p| c.starts_with(p)) || self.drop_columns.contains(&c)
        });
        if !dropped.is_empty() {
            debug!("{}: dropped columns {:?}", self.name, dropped);
        }

        table.rename_columns(self.renames);
    }

    /// Remove rows whose sentinel column is missing or repeats the header text
    pub fn drop_header_rows(&self, table: &mut Table) -> usize {
        let Some(idx) = table.column_index(self.sentinel.column) else {
            return 0;
        };
        let before = table.len();
        let header = self.sentinel.header;
        table.retain_rows(|row| matches!(&row[idx], Some(v) if v != header));
        before - table.len()
    }
}

pub const SEASON_STATS_SCHEMA: TableSchema = TableSchema {
    name: "season stats",
    drop_prefixes: &["Unnamed"],
    drop_columns: &["Rk", "Unnamed: 0"],
    renames: &[
        ("W", "W_Tot"),
        ("L", "L_Tot"),
        ("W.1", "W_Conf"),
        ("L.1", "L_Conf"),
        ("W.2", "W_Home"),
        ("L.2", "L_Home"),
        ("W.3", "W_Away"),
        ("L.3", "L_Away"),
        ("Tm.", "Tm_Pts"),
        ("Opp.", "Opp_Pts"),
        ("SRS", "Simple_Rating_System"),
        ("SOS", "Strength_Of_Schedule"),
        ("W-L%", "W_L_Percentage"),
        ("FG%", "FG_Percentage"),
        ("3P", "ThreeP"),
        ("3PA", "ThreePA"),
        ("3P%", "ThreeP_Percentage"),
        ("FT%", "FT_Percentage"),
    ],
    passthrough: &[
        SCHOOL_COLUMN,
        SEASON_COLUMN,
        "G",
        "MP",
        "FG",
        "FGA",
        "FT",
        "FTA",
        "ORB",
        "TRB",
        "AST",
        "STL",
        "BLK",
        "TOV",
        "PF",
    ],
    sentinel: Sentinel {
        column: SCHOOL_COLUMN,
        header: "School",
    },
};

pub const GAMELOG_SCHEMA: TableSchema = TableSchema {
    name: "gamelog",
    drop_prefixes: &[],
    drop_columns: &["Unnamed: 0", "Rk", "Gtm"],
    renames: &[
        ("Unnamed: 3", "Location"),
        ("Rslt", "Result"),
        ("Tm", "TeamPts"),
        ("Opp.1", "AwayPts"),
        // Team stats
        ("FG", "Team_FG"),
        ("FGA", "Team_FGA"),
        ("FG%", "Team_FG_Percentage"),
        ("3P", "Team_ThreeP"),
        ("3PA", "Team_ThreePA"),
        ("3P%", "Team_ThreeP_Percentage"),
        ("2P", "Team_TwoP"),
        ("2PA", "Team_TwoPA"),
        ("2P%", "Team_TwoP_Percentage"),
        ("eFG%", "Team_eFG_Percentage"),
        ("FT", "Team_FT"),
        ("FTA", "Team_FTA"),
        ("FT%", "Team_FT_Percentage"),
        ("ORB", "Team_ORB"),
        ("DRB", "Team_DRB"),
        ("TRB", "Team_TRB"),
        ("AST", "Team_AST"),
        ("STL", "Team_STL"),
        ("BLK", "Team_BLK"),
        ("TOV", "Team_TOV"),
        ("PF", "Team_PF"),
        // Opponent stats
        ("FG.1", "Away_FG"),
        ("FGA.1", "Away_FGA"),
        ("FG%.1", "Away_FG_Percentage"),
        ("3P.1", "Away_ThreeP"),
        ("3PA.1", "Away_ThreePA"),
        ("3P%.1", "Away_ThreeP_Percentage"),
        ("2P.1", "Away_TwoP"),
        ("2PA.1", "Away_TwoPA"),
        ("2P%.1", "Away_TwoP_Percentage"),
        ("eFG%.1", "Away_eFG_Percentage"),
        ("FT.1", "Away_FT"),
        ("FTA.1", "Away_FTA"),
        ("FT%.1", "Away_FT_Percentage"),
        ("ORB.1", "Away_ORB"),
        ("DRB.1", "Away_DRB"),
        ("TRB.1", "Away_TRB"),
        ("AST.1", "Away_AST"),
        ("STL.1", "Away_STL"),
        ("BLK.1", "Away_BLK"),
        ("TOV.1", "Away_TOV"),
        ("PF.1", "Away_PF"),
    ],
    passthrough: &[
        SCHOOL_COLUMN,
        SEASON_COLUMN,
        "Date",
        OPPONENT_COLUMN,
        TYPE_COLUMN,
        OVERTIME_COLUMN,
    ],
    sentinel: Sentinel {
        column: OPPONENT_COLUMN,
        header: "Opp",
    },
};

pub const LOCATION_COLUMN: &str = "Location";
pub const TYPE_COLUMN: &str = "Type";
pub const OVERTIME_COLUMN: &str = "OT";
pub const OPPONENT_COLUMN: &str = "Opp";

/// Clean a season school-stats table
pub fn clean_season_stats(mut table: Table) -> Table {
    SEASON_STATS_SCHEMA.apply(&mut table);
    let removed = SEASON_STATS_SCHEMA.drop_header_rows(&mut table);
    if removed > 0 {
        debug!("season stats: removed {} repeated header rows", removed);
    }
    table
}

/// Clean one school's gamelog table
pub fn clean_gamelogs(mut table: Table) -> Table {
    if table.is_empty() {
        return table;
    }

    GAMELOG_SCHEMA.apply(&mut table);
    table.map_column(LOCATION_COLUMN, normalize_location);
    table.map_column(TYPE_COLUMN, normalize_game_type);
    normalize_overtime(&mut table);

    let removed = GAMELOG_SCHEMA.drop_header_rows(&mut table);
    if removed > 0 {
        debug!("gamelog: removed {} repeated header rows", removed);
    }
    table
}

/// Missing becomes Home, then "@" becomes Away, then "N" becomes Neutral. Each rule sees
/// the output of the previous one, so the "N" test runs against "Away" rather than the
/// raw marker.
pub fn normalize_location(cell: Cell) -> Cell {
    let mut value = cell.unwrap_or_else(|| "Home".to_string());
    if value.contains('@') {
        value = "Away".to_string();
    }
    if value.contains('N') {
        value = "Neutral".to_string();
    }
    Some(value)
}

pub fn normalize_game_type(cell: Cell) -> Cell {
    let value = cell?;
    if value.contains("REG (Conf)") {
        Some("Conference".to_string())
    } else if value.contains("REG (Non-Conf)") {
        Some("Non-Conference".to_string())
    } else {
        Some(value)
    }
}

/// Turn the overtime marker column into 0/1 integers
pub fn normalize_overtime(table: &mut Table) {
    let all_missing = match table.column(OVERTIME_COLUMN) {
        Some(mut values) => values.all(Option::is_none),
        None => return,
    };

    table.map_column(OVERTIME_COLUMN, |cell| {
        if all_missing {
            return Some("0".to_string());
        }
        Some(overtime_flag(cell.as_deref()).to_string())
    });
}

fn overtime_flag(value: Option<&str>) -> i64 {
    let Some(value) = value else {
        return 0;
    };
    if value.contains("OT") {
        return 1;
    }
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64)
        .unwrap_or(0)
}
