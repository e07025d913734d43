//! Player tables - `Players.csv` and `player_data.csv`
//!
//! Both are deserialized by header name; columns not listed here (such as the
//! unnamed row index) are ignored.

use super::ensure_exists;
use crate::error::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of `Players.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "Player")]
    pub name: String,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    /// Spelled `collage` in the source header
    #[serde(rename = "collage")]
    pub college: Option<String>,
    /// Birth year
    pub born: Option<f64>,
    pub birth_city: Option<String>,
    pub birth_state: Option<String>,
}

/// One row of `player_data.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiographyRecord {
    pub name: String,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub position: Option<String>,
    /// Feet-inches, e.g. "6-10"
    pub height: Option<String>,
    pub weight: Option<f64>,
    pub birth_date: Option<String>,
    pub college: Option<String>,
}

impl BiographyRecord {
    /// Number of seasons between first and last year, inclusive.
    pub fn career_span(&self) -> Option<i32> {
        match (self.year_start, self.year_end) {
            (Some(start), Some(end)) if end >= start => Some(end - start + 1),
            _ => None,
        }
    }
}

fn load_records<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    ensure_exists(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }

    debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_players(path: &Path) -> Result<Vec<PlayerRecord>> {
    load_records(path)
}

pub fn load_biographies(path: &Path) -> Result<Vec<BiographyRecord>> {
    load_records(path)
}
