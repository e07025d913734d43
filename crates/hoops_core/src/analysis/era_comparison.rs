//! Two single seasons compared column by column.
//!
//! Every column gets a Normal overlay per season and a Mann-Whitney U test
//! (older season first). The raw p-values are not corrected for the number of
//! columns tested; the Bonferroni value is reported next to each one.

use super::{finite_max, finite_min};
use crate::config::ErasConfig;
use crate::data::{Datasets, SeasonStatRow};
use crate::error::Result;
use crate::legend::StatColumn;
use crate::model::{bonferroni, linspace, mann_whitney_u, EraNormal, MannWhitney};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraSample {
    pub year: i32,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Normal density on [`EraPanel::grid`]; `NaN` for a degenerate fit
    pub density: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraPanel {
    pub column: StatColumn,
    pub label: String,
    pub grid: Vec<f64>,
    pub older: EraSample,
    pub newer: EraSample,
    pub test: MannWhitney,
    pub bonferroni_p: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraComparison {
    pub older_year: i32,
    pub newer_year: i32,
    pub panels: Vec<EraPanel>,
}

impl EraComparison {
    /// Output file stem, e.g. `stats_2017_v_1980`.
    pub fn file_stem(&self) -> String {
        format!("stats_{}_v_{}", self.newer_year, self.older_year)
    }

    pub fn panel(&self, column: StatColumn) -> Option<&EraPanel> {
        self.panels.iter().find(|p| p.column == column)
    }
}

fn sample(rows: &[&SeasonStatRow], column: StatColumn) -> Vec<f64> {
    rows.iter().filter_map(|r| r.get(column)).collect()
}

fn era_sample(year: i32, values: &[f64], grid: &[f64], column: StatColumn) -> EraSample {
    let fit = EraNormal::fit(values);
    if fit.is_degenerate() {
        warn!(
            "{} in {}: degenerate Normal fit (n={}, std={})",
            column, year, fit.n, fit.std_dev
        );
    }
    EraSample {
        year,
        n: fit.n,
        mean: fit.mean,
        std_dev: fit.std_dev,
        density: grid.iter().map(|&x| fit.pdf(x)).collect(),
    }
}

pub fn era_comparison(datasets: &Datasets, config: &ErasConfig) -> Result<EraComparison> {
    let older_rows = datasets.seasons.rows_in_year(config.older_year);
    let newer_rows = datasets.seasons.rows_in_year(config.newer_year);
    let tests = config.columns.len();

    warn!(
        "Running {} Mann-Whitney U tests without multiple-comparison correction; \
         Bonferroni-adjusted values are reported alongside",
        tests
    );

    let mut panels = Vec::with_capacity(tests);
    for &column in &config.columns {
        let older = sample(&older_rows, column);
        let newer = sample(&newer_rows, column);

        let test = mann_whitney_u(&older, &newer)?;

        let lo = finite_min(&older).min(finite_min(&newer));
        let hi = finite_max(&older).max(finite_max(&newer));
        let grid = linspace(lo, hi, config.grid_points);

        info!(
            "{} {} vs {}: U={:.1}, p={:.5}",
            column, config.older_year, config.newer_year, test.u_statistic, test.p_value
        );

        panels.push(EraPanel {
            column,
            label: column.label().to_string(),
            older: era_sample(config.older_year, &older, &grid, column),
            newer: era_sample(config.newer_year, &newer, &grid, column),
            grid,
            bonferroni_p: bonferroni(test.p_value, tests),
            test,
        });
    }

    Ok(EraComparison {
        older_year: config.older_year,
        newer_year: config.newer_year,
        panels,
    })
}
