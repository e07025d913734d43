//! # Analysis Configuration
//!
//! Every constant the pipelines use, with defaults that reproduce the
//! published charts. A JSON file may override any subset of fields.
//!
//! ## Usage
//! ```rust
//! use hoops_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default();
//! assert_eq!(config.eras.newer_year, 2017);
//!
//! let custom = AnalysisConfig::from_json(r#"{ "eras": { "older_year": 1985 } }"#).unwrap();
//! assert_eq!(custom.eras.older_year, 1985);
//! assert_eq!(custom.eras.newer_year, 2017);
//! ```

use crate::aggregate::YearRange;
use crate::data::DataPaths;
use crate::error::{CoreError, Result};
use crate::legend::StatColumn;
use crate::model::CountRounding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "HOOPS_CONFIG_PATH";

/// A labeled vertical marker on the year axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearMarker {
    pub year: i32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    pub columns: Vec<StatColumn>,
    pub markers: Vec<YearMarker>,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            columns: vec![
                StatColumn::TwoPointAttempts,
                StatColumn::ThreePointAttempts,
                StatColumn::FieldGoalAttempts,
                StatColumn::FieldGoalPct,
                StatColumn::FreeThrowAttempts,
                StatColumn::PersonalFouls,
                StatColumn::Assists,
                StatColumn::TrueShootingPct,
            ],
            markers: vec![
                YearMarker {
                    year: 1980,
                    label: "Three Point Rule Introduced".to_string(),
                },
                YearMarker {
                    year: 1999,
                    label: "Player's Association\nStrike".to_string(),
                },
            ],
        }
    }
}

/// One player-season in the shooter comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterSpec {
    /// Name as written in the season table
    pub player: String,
    pub year: i32,
    /// Legend label
    pub display_name: String,
    /// Used in the output file name
    pub short_name: String,
}

/// Attempts column and the percentage column derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotPair {
    pub attempts: StatColumn,
    pub percentage: StatColumn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootersConfig {
    pub first: ShooterSpec,
    pub second: ShooterSpec,
    pub pairs: Vec<ShotPair>,
    pub grid_points: usize,
    /// Lower x-limit quantile; the upper one is `1 - tail_quantile`
    pub tail_quantile: f64,
    pub rounding: CountRounding,
}

impl Default for ShootersConfig {
    fn default() -> Self {
        Self {
            first: ShooterSpec {
                player: "Stephen Curry".to_string(),
                year: 2017,
                display_name: "Steph Curry".to_string(),
                short_name: "Steph".to_string(),
            },
            second: ShooterSpec {
                player: "Brian Taylor".to_string(),
                year: 1981,
                display_name: "Brian Taylor".to_string(),
                short_name: "Brian".to_string(),
            },
            pairs: vec![
                ShotPair {
                    attempts: StatColumn::ThreePointAttempts,
                    percentage: StatColumn::ThreePointPct,
                },
                ShotPair {
                    attempts: StatColumn::TwoPointAttempts,
                    percentage: StatColumn::TwoPointPct,
                },
                ShotPair {
                    attempts: StatColumn::FreeThrowAttempts,
                    percentage: StatColumn::FreeThrowPct,
                },
            ],
            grid_points: 301,
            tail_quantile: 0.001,
            rounding: CountRounding::Round,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErasConfig {
    pub older_year: i32,
    pub newer_year: i32,
    pub columns: Vec<StatColumn>,
    pub grid_points: usize,
}

impl Default for ErasConfig {
    fn default() -> Self {
        Self {
            older_year: 1980,
            newer_year: 2017,
            columns: vec![
                StatColumn::ThreePointAttempts,
                StatColumn::ThreePointPct,
                StatColumn::TwoPointAttempts,
                StatColumn::TwoPointPct,
                StatColumn::Assists,
                StatColumn::Blocks,
                StatColumn::Steals,
                StatColumn::TotalRebounds,
                StatColumn::Turnovers,
                StatColumn::FreeThrowAttempts,
                StatColumn::Points,
                StatColumn::Per,
            ],
            grid_points: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decade {
    pub label: String,
    pub range: YearRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecadesConfig {
    pub decades: Vec<Decade>,
    /// Column that ranks the leaders
    pub ranking_column: StatColumn,
    pub percentile: f64,
    pub top_n: usize,
    /// Columns averaged per leader
    pub columns: Vec<StatColumn>,
    /// Subset of `columns` that gets a chart panel
    pub plot_columns: Vec<StatColumn>,
    /// Upper y-limit as a fraction of the league maximum
    pub y_max_fraction: f64,
}

impl Default for DecadesConfig {
    fn default() -> Self {
        let decades = [(1980, 1990), (1990, 2000), (2000, 2010), (2010, 2018)]
            .into_iter()
            .map(|(start, end)| Decade {
                label: format!("{}'s", start),
                range: YearRange::new(start, end),
            })
            .collect();

        let plot_columns = vec![
            StatColumn::ThreePointAttempts,
            StatColumn::ThreePointPct,
            StatColumn::TwoPointAttempts,
            StatColumn::TwoPointPct,
            StatColumn::Assists,
            StatColumn::Blocks,
            StatColumn::FreeThrowAttempts,
            StatColumn::Steals,
            StatColumn::TurnoverPct,
            StatColumn::Points,
        ];
        let mut columns = vec![StatColumn::Per];
        columns.extend(plot_columns.iter().copied());

        Self {
            decades,
            ranking_column: StatColumn::Points,
            percentile: 90.0,
            top_n: 10,
            columns,
            plot_columns,
            y_max_fraction: 0.85,
        }
    }
}

/// Full configuration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataPaths,
    pub output_dir: PathBuf,
    pub trends: TrendsConfig,
    pub shooters: ShootersConfig,
    pub eras: ErasConfig,
    pub decades: DecadesConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data: DataPaths::default(),
            output_dir: PathBuf::from("."),
            trends: TrendsConfig::default(),
            shooters: ShootersConfig::default(),
            eras: ErasConfig::default(),
            decades: DecadesConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        let config = Self::from_json(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config named by `HOOPS_CONFIG_PATH`, if the variable is set and non-empty.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(None);
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }

        Self::load(Path::new(path))
            .map(Some)
            .map_err(|e| CoreError::Config(format!("{CONFIG_PATH_ENV}='{path}': {e}")))
    }

    /// Point the data paths at the standard files inside `dir`.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data = DataPaths::in_dir(dir);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(CoreError::Config(msg));

        if self.trends.columns.is_empty() {
            return invalid("trends.columns must not be empty".to_string());
        }
        if self.shooters.pairs.is_empty() {
            return invalid("shooters.pairs must not be empty".to_string());
        }
        if self.shooters.grid_points < 2 {
            return invalid(format!(
                "shooters.grid_points must be >= 2, got {}",
                self.shooters.grid_points
            ));
        }
        if !(self.shooters.tail_quantile > 0.0 && self.shooters.tail_quantile < 0.5) {
            return invalid(format!(
                "shooters.tail_quantile must be in (0, 0.5), got {}",
                self.shooters.tail_quantile
            ));
        }
        if self.eras.older_year == self.eras.newer_year {
            return invalid(format!(
                "eras must differ, both are {}",
                self.eras.older_year
            ));
        }
        if self.eras.columns.is_empty() {
            return invalid("eras.columns must not be empty".to_string());
        }
        if self.eras.grid_points < 2 {
            return invalid(format!(
                "eras.grid_points must be >= 2, got {}",
                self.eras.grid_points
            ));
        }
        if self.decades.decades.is_empty() {
            return invalid("decades.decades must not be empty".to_string());
        }
        if let Some(d) = self.decades.decades.iter().find(|d| d.range.start >= d.range.end) {
            return invalid(format!("decade '{}' has an empty year range", d.label));
        }
        if !(0.0..=100.0).contains(&self.decades.percentile) {
            return invalid(format!(
                "decades.percentile must be in [0, 100], got {}",
                self.decades.percentile
            ));
        }
        if self.decades.top_n == 0 {
            return invalid("decades.top_n must be positive".to_string());
        }
        if let Some(c) = self
            .decades
            .plot_columns
            .iter()
            .find(|c| !self.decades.columns.contains(*c))
        {
            return invalid(format!(
                "decades.plot_columns contains {} which is not in decades.columns",
                c
            ));
        }

        Ok(())
    }
}
