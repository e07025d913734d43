//! # Analysis Module
//!
//! The four chart pipelines. Each one takes the loaded [`Datasets`] and its
//! config section and returns a plain result value; rendering lives in
//! `chart_builder`.
//!
//! - `yearly_trends` - league mean of selected columns per season
//! - `shooter_comparison` - Beta models of two players' shooting seasons
//! - `era_comparison` - Normal overlays and Mann-Whitney U between two seasons
//! - `decade_leaders` - mean-of-means of each decade's top scorers
//!
//! [`Datasets`]: crate::data::Datasets

pub mod decade_leaders;
pub mod era_comparison;
pub mod shooter_comparison;
pub mod yearly_trends;

pub use decade_leaders::{decade_leaders, DecadeLeader, DecadeLeaders, DecadeSummary};
pub use era_comparison::{era_comparison, EraComparison, EraPanel, EraSample};
pub use shooter_comparison::{shooter_comparison, ShooterComparison, ShooterFit, ShotPanel};
pub use yearly_trends::{yearly_trends, TrendSeries, YearlyTrends};

use crate::legend::StatColumn;
use serde::Serialize;

/// League-wide extent of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnExtent {
    pub column: StatColumn,
    pub min: f64,
    pub max: f64,
}

pub(crate) fn finite_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max)
}

pub(crate) fn finite_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_extent_skips_nan() {
        let values = [f64::NAN, 3.0, -1.0, f64::INFINITY];
        assert_eq!(finite_max(&values), 3.0);
        assert_eq!(finite_min(&values), -1.0);
        assert!(finite_max(&[f64::NAN]).is_nan());
    }
}
