//! League mean of each selected column, season by season.

use super::finite_max;
use crate::aggregate::{group_means, series};
use crate::config::{TrendsConfig, YearMarker};
use crate::data::{Datasets, SeasonStatRow};
use crate::error::{CoreError, Result};
use crate::legend::StatColumn;
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub column: StatColumn,
    pub label: String,
    /// One mean per entry of [`YearlyTrends::years`]
    pub means: Vec<f64>,
    /// Largest finite yearly mean
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTrends {
    pub years: Vec<i32>,
    pub series: Vec<TrendSeries>,
    pub markers: Vec<YearMarker>,
}

impl YearlyTrends {
    pub fn series(&self, column: StatColumn) -> Option<&TrendSeries> {
        self.series.iter().find(|s| s.column == column)
    }
}

pub fn yearly_trends(datasets: &Datasets, config: &TrendsConfig) -> Result<YearlyTrends> {
    let groups = group_means(
        &datasets.seasons.rows,
        SeasonStatRow::year,
        &config.columns,
    );
    if groups.is_empty() {
        return Err(CoreError::EmptySelection(
            "no season rows with a year".to_string(),
        ));
    }

    let years: Vec<i32> = groups.iter().map(|g| g.key).collect();
    let trend_series = config
        .columns
        .iter()
        .map(|&column| {
            let means = series(&groups, column);
            TrendSeries {
                column,
                label: column.label().to_string(),
                max: finite_max(&means),
                means,
            }
        })
        .collect();

    info!(
        "Yearly trends: {} seasons ({}-{}), {} columns",
        years.len(),
        years[0],
        years[years.len() - 1],
        config.columns.len()
    );

    Ok(YearlyTrends {
        years,
        series: trend_series,
        markers: config.markers.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn test_yearly_trends_on_fixture() {
        let datasets = fixtures::datasets();
        let config = TrendsConfig {
            columns: vec![StatColumn::ThreePointAttempts, StatColumn::Points],
            markers: vec![],
        };
        let trends = yearly_trends(&datasets, &config).unwrap();

        assert_eq!(trends.years, vec![2016, 2017]);
        let three = trends.series(StatColumn::ThreePointAttempts).unwrap();
        assert_eq!(three.means, vec![305.0, 889.0 / 3.0]);
        assert_eq!(three.max, 305.0);
        assert_eq!(three.label, "Three Point Attempts");
    }

    #[test]
    fn test_column_absent_from_file_is_nan() {
        let datasets = fixtures::datasets();
        let config = TrendsConfig {
            columns: vec![StatColumn::Per],
            markers: vec![],
        };
        let trends = yearly_trends(&datasets, &config).unwrap();
        let per = trends.series(StatColumn::Per).unwrap();
        assert!(per.means.iter().all(|m| m.is_nan()));
        assert!(per.max.is_nan());
    }
}
