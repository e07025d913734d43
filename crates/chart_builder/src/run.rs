//! Run orchestration: load once, run the selected pipelines in order, render
//! each chart and collect a JSON-serializable report.

use crate::charts;
use anyhow::{Context, Result};
use hoops_core::analysis::{DecadeLeaders, EraComparison, ShooterComparison};
use hoops_core::model::UTestMethod;
use hoops_core::{
    decade_leaders, era_comparison, load_datasets, shooter_comparison, yearly_trends,
    AnalysisConfig, DataPaths, Datasets, StatColumn,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which pipelines a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisSelection {
    #[default]
    All,
    Trends,
    Shooters,
    Eras,
    Decades,
}

impl AnalysisSelection {
    pub fn includes(self, other: AnalysisSelection) -> bool {
        self == AnalysisSelection::All || self == other
    }
}

/// Row counts of the loaded inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCounts {
    pub players: usize,
    pub season_rows: usize,
    pub biographies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraTestSummary {
    pub column: StatColumn,
    pub u_statistic: f64,
    pub p_value: f64,
    pub bonferroni_p: f64,
    pub method: UTestMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterMedian {
    pub shot: String,
    pub player: String,
    pub year: i32,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderSummary {
    pub player: String,
    pub ranking_mean: f64,
    /// Seasons between first and last year in player_data.csv
    pub career_seasons: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeSummaryReport {
    pub decade: String,
    pub threshold: f64,
    pub leaders: Vec<LeaderSummary>,
}

/// Summary of one run, written with `--report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Creation time (RFC3339)
    pub created_at: String,
    pub inputs: DataPaths,
    pub counts: InputCounts,
    pub charts: Vec<PathBuf>,
    pub era_tests: Vec<EraTestSummary>,
    pub shooter_medians: Vec<ShooterMedian>,
    pub decades: Vec<DecadeSummaryReport>,
}

impl RunReport {
    pub fn new(inputs: DataPaths, datasets: &Datasets) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            inputs,
            counts: InputCounts {
                players: datasets.players.len(),
                season_rows: datasets.seasons.len(),
                biographies: datasets.biographies.len(),
            },
            charts: Vec::new(),
            era_tests: Vec::new(),
            shooter_medians: Vec::new(),
            decades: Vec::new(),
        }
    }

    pub fn record_shooters(&mut self, comparison: &ShooterComparison) {
        for panel in &comparison.panels {
            for (spec, fit) in [
                (&comparison.first, &panel.first),
                (&comparison.second, &panel.second),
            ] {
                self.shooter_medians.push(ShooterMedian {
                    shot: panel.title.clone(),
                    player: spec.player.clone(),
                    year: spec.year,
                    median: fit.median,
                });
            }
        }
    }

    pub fn record_eras(&mut self, comparison: &EraComparison) {
        self.era_tests
            .extend(comparison.panels.iter().map(|panel| EraTestSummary {
                column: panel.column,
                u_statistic: panel.test.u_statistic,
                p_value: panel.test.p_value,
                bonferroni_p: panel.bonferroni_p,
                method: panel.test.method,
            }));
    }

    pub fn record_decades(&mut self, leaders: &DecadeLeaders, datasets: &Datasets) {
        let career = |player: &str| {
            datasets
                .biographies
                .iter()
                .find(|b| b.name == player)
                .and_then(|b| b.career_span())
        };

        self.decades
            .extend(leaders.decades.iter().map(|decade| DecadeSummaryReport {
                decade: decade.label.clone(),
                threshold: decade.threshold,
                leaders: decade
                    .leaders
                    .iter()
                    .map(|l| LeaderSummary {
                        player: l.player.clone(),
                        ranking_mean: l.ranking_mean,
                        career_seasons: career(&l.player),
                    })
                    .collect(),
            }));
    }
}

/// Load the configured inputs and run [`run_on`].
pub fn run_analyses(config: &AnalysisConfig, selection: AnalysisSelection) -> Result<RunReport> {
    config.validate().context("Invalid configuration")?;
    let datasets = load_datasets(&config.data).with_context(|| {
        format!(
            "Failed to load datasets ({}, {}, {})",
            config.data.players.display(),
            config.data.seasons.display(),
            config.data.biographies.display()
        )
    })?;
    run_on(&datasets, config, selection)
}

/// Run the selected pipelines on already loaded datasets.
pub fn run_on(
    datasets: &Datasets,
    config: &AnalysisConfig,
    selection: AnalysisSelection,
) -> Result<RunReport> {
    let out_dir = &config.output_dir;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut report = RunReport::new(config.data.clone(), datasets);

    if selection.includes(AnalysisSelection::Trends) {
        info!("Running yearly trends");
        let trends = yearly_trends(datasets, &config.trends).context("Yearly trends failed")?;
        report.charts.push(charts::render_trends(&trends, out_dir)?);
    }

    if selection.includes(AnalysisSelection::Shooters) {
        info!("Running shooter comparison");
        let shooters =
            shooter_comparison(datasets, &config.shooters).context("Shooter comparison failed")?;
        report.charts.push(charts::render_shooters(&shooters, out_dir)?);
        report.record_shooters(&shooters);
    }

    if selection.includes(AnalysisSelection::Eras) {
        info!("Running era comparison");
        let eras = era_comparison(datasets, &config.eras).context("Era comparison failed")?;
        report.charts.push(charts::render_eras(&eras, out_dir)?);
        report.record_eras(&eras);
    }

    if selection.includes(AnalysisSelection::Decades) {
        info!("Running decade leaders");
        let leaders = decade_leaders(datasets, &config.decades).context("Decade leaders failed")?;
        report.charts.push(charts::render_decades(&leaders, out_dir)?);
        report.record_decades(&leaders, datasets);
    }

    Ok(report)
}

pub fn save_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
