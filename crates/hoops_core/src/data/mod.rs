//! # Data Module
//!
//! Loaders for the three input tables and the [`Datasets`] bundle that every
//! analysis pipeline receives explicitly.
//!
//! - `season` - `Seasons_Stats.csv`, header-driven, one row per (player, year, team)
//! - `people` - `Players.csv` and `player_data.csv`, serde-deserialized

pub mod people;
pub mod season;

pub use people::{load_biographies, load_players, BiographyRecord, PlayerRecord};
pub use season::{load_seasons, SeasonStatRow, SeasonTable, StatRow};

use crate::error::{CoreError, Result};
use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    pub players: PathBuf,
    pub seasons: PathBuf,
    pub biographies: PathBuf,
}

impl DataPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            players: dir.join("Players.csv"),
            seasons: dir.join("Seasons_Stats.csv"),
            biographies: dir.join("player_data.csv"),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(Path::new("data"))
    }
}

/// The loaded input tables.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub players: Vec<PlayerRecord>,
    pub seasons: SeasonTable,
    pub biographies: Vec<BiographyRecord>,
}

impl Datasets {
    /// Season rows whose player appears in the players table.
    ///
    /// Semi-join on the player name: a name listed twice in `Players.csv`
    /// still yields each season row once.
    pub fn seasons_with_known_players(&self) -> Vec<&SeasonStatRow> {
        let known: FxHashSet<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        self.seasons
            .rows
            .iter()
            .filter(|row| known.contains(row.player.as_str()))
            .collect()
    }
}

pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

/// Load all three tables. Any failure is fatal for the run.
pub fn load_datasets(paths: &DataPaths) -> Result<Datasets> {
    let players = load_players(&paths.players)?;
    let seasons = load_seasons(&paths.seasons)?;
    let biographies = load_biographies(&paths.biographies)?;

    info!(
        "Loaded {} players, {} season rows, {} biographies",
        players.len(),
        seasons.len(),
        biographies.len()
    );

    Ok(Datasets {
        players,
        seasons,
        biographies,
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_datasets() {
        let datasets = fixtures::datasets();
        assert_eq!(datasets.players.len(), 3);
        assert_eq!(datasets.seasons.len(), 5);
        assert_eq!(datasets.biographies.len(), 2);
    }

    #[test]
    fn test_semi_join_does_not_duplicate() {
        let datasets = fixtures::datasets();
        let joined = datasets.seasons_with_known_players();
        // Gamma Three has no players entry, Beta Two is listed twice
        assert_eq!(joined.len(), 4);
        assert!(joined.iter().all(|r| r.player != "Gamma Three"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_datasets(&DataPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, CoreError::FileNotFound { .. }));
        assert!(err.is_input_error());
    }
}
