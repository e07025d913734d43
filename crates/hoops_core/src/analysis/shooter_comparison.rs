//! Two player-seasons side by side: one Beta model per shot type.

use crate::config::{ShooterSpec, ShootersConfig, ShotPair};
use crate::data::{Datasets, SeasonStatRow};
use crate::error::Result;
use crate::model::{linspace, CountRounding, ShootingBeta};
use log::{info, warn};
use serde::Serialize;

/// One player's model for one shot type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShooterFit {
    pub name: String,
    pub attempts: f64,
    pub percentage: Option<f64>,
    pub alpha: f64,
    pub beta: f64,
    pub median: f64,
    pub lower: f64,
    pub upper: f64,
    /// Density on [`ShotPanel::grid`]
    pub density: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotPanel {
    pub pair: ShotPair,
    pub title: String,
    pub grid: Vec<f64>,
    pub first: ShooterFit,
    pub second: ShooterFit,
    /// `[min lower quantile, max upper quantile]` of the two fits
    pub x_limits: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShooterComparison {
    pub first: ShooterSpec,
    pub second: ShooterSpec,
    pub panels: Vec<ShotPanel>,
}

impl ShooterComparison {
    /// Output file stem, e.g. `Steph_versus_Brian`.
    pub fn file_stem(&self) -> String {
        format!("{}_versus_{}", self.first.short_name, self.second.short_name)
    }
}

fn fit_shooter(
    spec: &ShooterSpec,
    row: &SeasonStatRow,
    pair: ShotPair,
    grid: &[f64],
    tail: f64,
    rounding: CountRounding,
) -> Result<ShooterFit> {
    let attempts = match row.get(pair.attempts) {
        Some(a) => a,
        None => {
            warn!(
                "{} {} has no {} recorded, modeling zero attempts",
                spec.player, spec.year, pair.attempts
            );
            0.0
        }
    };
    let percentage = row.get(pair.percentage);
    let beta = ShootingBeta::fit(attempts, percentage, rounding)?;

    Ok(ShooterFit {
        name: spec.display_name.clone(),
        attempts,
        percentage,
        alpha: beta.alpha(),
        beta: beta.beta(),
        median: beta.median(),
        lower: beta.quantile(tail),
        upper: beta.quantile(1.0 - tail),
        density: grid.iter().map(|&x| beta.pdf(x)).collect(),
    })
}

pub fn shooter_comparison(datasets: &Datasets, config: &ShootersConfig) -> Result<ShooterComparison> {
    let first_row = datasets
        .seasons
        .player_season(&config.first.player, config.first.year)?;
    let second_row = datasets
        .seasons
        .player_season(&config.second.player, config.second.year)?;

    let grid = linspace(0.0, 1.0, config.grid_points);

    let mut panels = Vec::with_capacity(config.pairs.len());
    for &pair in &config.pairs {
        let first = fit_shooter(
            &config.first,
            first_row,
            pair,
            &grid,
            config.tail_quantile,
            config.rounding,
        )?;
        let second = fit_shooter(
            &config.second,
            second_row,
            pair,
            &grid,
            config.tail_quantile,
            config.rounding,
        )?;

        info!(
            "{}: {} median {:.3} vs {} median {:.3}",
            pair.attempts.rate_label(),
            first.name,
            first.median,
            second.name,
            second.median
        );

        panels.push(ShotPanel {
            pair,
            title: pair.attempts.rate_label().to_string(),
            grid: grid.clone(),
            x_limits: (first.lower.min(second.lower), first.upper.max(second.upper)),
            first,
            second,
        });
    }

    Ok(ShooterComparison {
        first: config.first.clone(),
        second: config.second.clone(),
        panels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::error::CoreError;

    fn config() -> ShootersConfig {
        let mut config = ShootersConfig::default();
        config.first = ShooterSpec {
            player: "Alpha One".to_string(),
            year: 2017,
            display_name: "Alpha".to_string(),
            short_name: "A".to_string(),
        };
        config.second = ShooterSpec {
            player: "Beta Two".to_string(),
            year: 2017,
            display_name: "Beta".to_string(),
            short_name: "B".to_string(),
        };
        config
    }

    #[test]
    fn test_panels_per_shot_type() {
        let datasets = fixtures::datasets();
        let result = shooter_comparison(&datasets, &config()).unwrap();

        assert_eq!(result.file_stem(), "A_versus_B");
        assert_eq!(result.panels.len(), 3);
        let three = &result.panels[0];
        assert_eq!(three.title, "Three Point");
        assert_eq!(three.grid.len(), 301);
        assert_eq!(three.first.density.len(), 301);

        // 789 attempts at .411 -> 324 makes
        assert_eq!(three.first.alpha, 325.0);
        assert_eq!(three.first.beta, 466.0);
        assert!((three.first.median - 0.411).abs() < 0.01);

        // Zero attempts, missing percentage -> uniform
        assert_eq!(three.second.alpha, 1.0);
        assert_eq!(three.second.beta, 1.0);
        assert!(three.x_limits.0 < 0.01 && three.x_limits.1 > 0.99);
    }

    #[test]
    fn test_x_limits_cover_both_fits() {
        let datasets = fixtures::datasets();
        let result = shooter_comparison(&datasets, &config()).unwrap();
        for panel in &result.panels {
            assert!(panel.x_limits.0 <= panel.first.median);
            assert!(panel.x_limits.0 <= panel.second.median);
            assert!(panel.x_limits.1 >= panel.first.median);
            assert!(panel.x_limits.1 >= panel.second.median);
        }
    }

    #[test]
    fn test_unknown_player_season() {
        let datasets = fixtures::datasets();
        let mut config = config();
        config.second.year = 1950;
        assert!(matches!(
            shooter_comparison(&datasets, &config),
            Err(CoreError::PlayerSeasonNotFound { year: 1950, .. })
        ));
    }
}
