//! Season statistics table - `Seasons_Stats.csv` → [`SeasonTable`]
//!
//! The header row decides which [`StatColumn`] sits at which position, so the
//! loader never depends on column order. Empty cells are missing values
//! (`None`), never zero.

use super::ensure_exists;
use crate::error::{CoreError, Result};
use crate::legend::{ColumnLegend, StatColumn};
use log::debug;
use std::path::Path;

/// Anything the aggregation engine can read a numeric column from.
pub trait StatRow {
    fn value(&self, column: StatColumn) -> Option<f64>;
}

impl<T: StatRow + ?Sized> StatRow for &T {
    fn value(&self, column: StatColumn) -> Option<f64> {
        (**self).value(column)
    }
}

/// One row per (player, year, team).
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonStatRow {
    pub player: String,
    pub position: String,
    pub team: String,
    values: [Option<f64>; StatColumn::COUNT],
}

impl SeasonStatRow {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            position: String::new(),
            team: String::new(),
            values: [None; StatColumn::COUNT],
        }
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, column: StatColumn, value: f64) -> Self {
        self.set(column, Some(value));
        self
    }

    pub fn set(&mut self, column: StatColumn, value: Option<f64>) {
        self.values[column.index()] = value;
    }

    pub fn get(&self, column: StatColumn) -> Option<f64> {
        self.values[column.index()]
    }

    pub fn year(&self) -> Option<i32> {
        self.get(StatColumn::Year).map(|y| y as i32)
    }
}

impl StatRow for SeasonStatRow {
    fn value(&self, column: StatColumn) -> Option<f64> {
        self.get(column)
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Player,
    Position,
    Team,
    Stat(StatColumn),
    Ignored,
}

fn field_for(header: &str) -> Field {
    match header {
        "Player" => Field::Player,
        "Pos" => Field::Position,
        "Tm" => Field::Team,
        code => match StatColumn::from_code(code) {
            Some(column) => Field::Stat(column),
            None => Field::Ignored,
        },
    }
}

/// The loaded season table, rows in file order.
#[derive(Debug, Clone, Default)]
pub struct SeasonTable {
    pub headers: Vec<String>,
    pub rows: Vec<SeasonStatRow>,
}

impl SeasonTable {
    pub fn from_rows(rows: Vec<SeasonStatRow>) -> Self {
        let mut headers = vec!["Player".to_string(), "Pos".to_string(), "Tm".to_string()];
        headers.extend(StatColumn::ALL.iter().map(|c| c.code().to_string()));
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Legend for the columns this file actually carries.
    pub fn legend(&self) -> ColumnLegend {
        ColumnLegend::from_headers(&self.headers)
    }

    /// Non-missing values of one column, in row order.
    pub fn column_values(&self, column: StatColumn) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.get(column)).collect()
    }

    pub fn column_min(&self, column: StatColumn) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.get(column))
            .filter(|v| !v.is_nan())
            .reduce(f64::min)
    }

    pub fn column_max(&self, column: StatColumn) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.get(column))
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }

    pub fn rows_in_year(&self, year: i32) -> Vec<&SeasonStatRow> {
        self.rows.iter().filter(|r| r.year() == Some(year)).collect()
    }

    pub fn rows_for_player<'a>(
        &'a self,
        player: &'a str,
    ) -> impl Iterator<Item = &'a SeasonStatRow> + 'a {
        self.rows.iter().filter(move |r| r.player == player)
    }

    /// First row of `player` in `year`.
    ///
    /// A traded player has several rows for one year; the first in file
    /// order is the season total.
    pub fn player_season(&self, player: &str, year: i32) -> Result<&SeasonStatRow> {
        self.rows
            .iter()
            .find(|r| r.player == player && r.year() == Some(year))
            .ok_or_else(|| CoreError::PlayerSeasonNotFound {
                player: player.to_string(),
                year,
            })
    }
}

fn parse_cell(raw: &str, row: usize, column: StatColumn) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| CoreError::Parse {
            row,
            column: column.code().to_string(),
            value: trimmed.to_string(),
        })
}

/// Parse `Seasons_Stats.csv`.
///
/// # Errors
/// * `FileNotFound` - path does not exist
/// * `MissingColumn` - no `Player` header
/// * `Parse` - non-empty numeric cell that is not a number
/// * `Csv` - malformed CSV (e.g. ragged rows)
pub fn load_seasons(path: &Path) -> Result<SeasonTable> {
    ensure_exists(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let fields: Vec<Field> = headers.iter().map(|h| field_for(h)).collect();
    for (header, field) in headers.iter().zip(&fields) {
        if matches!(field, Field::Ignored) {
            debug!("Ignoring season column '{}'", header);
        }
    }

    if !fields.iter().any(|f| matches!(f, Field::Player)) {
        return Err(CoreError::MissingColumn {
            column: "Player".to_string(),
            file: path.display().to_string(),
        });
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // 1-based data row number, header excluded
        let row_number = i + 1;
        let mut row = SeasonStatRow::new(String::new());

        for (field, raw) in fields.iter().zip(record.iter()) {
            match field {
                Field::Player => row.player = raw.trim().to_string(),
                Field::Position => row.position = raw.trim().to_string(),
                Field::Team => row.team = raw.trim().to_string(),
                Field::Stat(column) => row.set(*column, parse_cell(raw, row_number, *column)?),
                Field::Ignored => {}
            }
        }

        rows.push(row);
    }

    debug!("Parsed {} season rows from {}", rows.len(), path.display());

    Ok(SeasonTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_load_seasons_header_driven() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write(&dir, "s.csv", fixtures::SEASONS_CSV);
        let table = load_seasons(&path).unwrap();

        assert_eq!(table.len(), 5);
        let first = &table.rows[0];
        assert_eq!(first.player, "Alpha One");
        assert_eq!(first.position, "PG");
        assert_eq!(first.team, "GSW");
        assert_eq!(first.year(), Some(2016));
        assert_eq!(first.get(StatColumn::ThreePointAttempts), Some(600.0));
        // Columns absent from the file stay missing
        assert_eq!(first.get(StatColumn::Per), None);
    }

    #[test]
    fn test_empty_cell_is_missing_not_zero() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write(&dir, "s.csv", fixtures::SEASONS_CSV);
        let table = load_seasons(&path).unwrap();

        let beta_2017 = table.player_season("Beta Two", 2017).unwrap();
        assert_eq!(beta_2017.get(StatColumn::ThreePointAttempts), Some(0.0));
        assert_eq!(beta_2017.get(StatColumn::ThreePointPct), None);
    }

    #[test]
    fn test_legend_follows_file_headers() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write(&dir, "s.csv", fixtures::SEASONS_CSV);
        let legend = load_seasons(&path).unwrap().legend();

        assert_eq!(legend.label("3P%"), Some("Three Point Percentage"));
        assert_eq!(legend.label(""), Some("ID"));
        assert!(legend.unlabeled().is_empty());
    }

    #[test]
    fn test_parse_error_reports_cell() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write(&dir, "s.csv", "Player,Year,PTS\nA,2017,abc\n");
        let err = load_seasons(&path).unwrap_err();

        match err {
            CoreError::Parse { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "PTS");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_player_column() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write(&dir, "s.csv", "Year,PTS\n2017,10\n");
        assert!(matches!(
            load_seasons(&path),
            Err(CoreError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_player_season_lookup() {
        let table = SeasonTable::from_rows(vec![
            SeasonStatRow::new("A").with(StatColumn::Year, 2000.0).with(StatColumn::Points, 10.0),
            SeasonStatRow::new("A").with(StatColumn::Year, 2000.0).with(StatColumn::Points, 4.0),
        ]);

        let row = table.player_season("A", 2000).unwrap();
        assert_eq!(row.get(StatColumn::Points), Some(10.0));
        assert!(matches!(
            table.player_season("A", 2001),
            Err(CoreError::PlayerSeasonNotFound { year: 2001, .. })
        ));
    }

    #[test]
    fn test_column_min_max_skip_missing() {
        let table = SeasonTable::from_rows(vec![
            SeasonStatRow::new("A").with(StatColumn::Points, 3.0),
            SeasonStatRow::new("B"),
            SeasonStatRow::new("C").with(StatColumn::Points, 9.0),
        ]);
        assert_eq!(table.column_min(StatColumn::Points), Some(3.0));
        assert_eq!(table.column_max(StatColumn::Points), Some(9.0));
        assert_eq!(table.column_max(StatColumn::Blocks), None);
        assert_eq!(table.column_values(StatColumn::Points), vec![3.0, 9.0]);
    }
}
