//! # hoops_core - Three-Point Era Season Analysis
//!
//! Loads the basketball player, season statistics and biography tables and
//! turns them into the aggregates and fitted distributions behind the
//! three-point era charts.
//!
//! ## Features
//! - Header-driven CSV loading with explicit missing values
//! - Keyed column legend (code → label)
//! - Group means, percentile filters, top-N and mean-of-means aggregation
//! - Beta / Normal fits and the Mann-Whitney U test
//! - Four independent analysis pipelines that never render

// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod legend;
pub mod model;

pub use analysis::{
    decade_leaders, era_comparison, shooter_comparison, yearly_trends, DecadeLeaders,
    EraComparison, ShooterComparison, YearlyTrends,
};
pub use config::AnalysisConfig;
pub use data::{load_datasets, DataPaths, Datasets, SeasonStatRow, SeasonTable};
pub use error::{CoreError, Result};
pub use legend::{ColumnLegend, StatColumn};
pub use model::{mann_whitney_u, CountRounding, EraNormal, MannWhitney, ShootingBeta};
