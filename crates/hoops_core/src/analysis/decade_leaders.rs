//! Top scorers of each decade and how their averages moved.
//!
//! Per decade:
//! 1. rows of known players inside the decade
//! 2. rows at or above the ranking percentile (inclusive)
//! 3. mean of the ranking column per player, top N
//! 4. each leader's seasons in the decade, averaged per player
//! 5. the mean of those per-player means
//!
//! Step 5 weights every leader equally regardless of seasons played.

use super::ColumnExtent;
use crate::aggregate::{
    filter_range, group_means, mean_of_means, percentile_filter, top_n, GroupMean, YearRange,
};
use crate::config::DecadesConfig;
use crate::data::{Datasets, SeasonStatRow};
use crate::error::{CoreError, Result};
use crate::legend::StatColumn;
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeLeader {
    pub player: String,
    /// Mean of the ranking column over the player's qualifying rows
    pub ranking_mean: f64,
    /// Per-column means over all of the player's seasons in the decade
    pub season_means: GroupMean<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeSummary {
    pub label: String,
    pub range: YearRange,
    /// Ranking-column value at the percentile cut
    pub threshold: f64,
    pub leaders: Vec<DecadeLeader>,
    means: Vec<(StatColumn, f64)>,
}

impl DecadeSummary {
    /// Mean-of-means of `column` across the decade's leaders.
    pub fn mean(&self, column: StatColumn) -> Option<f64> {
        self.means
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeLeaders {
    pub decades: Vec<DecadeSummary>,
    pub plot_columns: Vec<StatColumn>,
    /// League-wide min / max of each plotted column, for axis ranging
    pub extents: Vec<ColumnExtent>,
    pub y_max_fraction: f64,
}

impl DecadeLeaders {
    /// One value per decade, in decade order.
    pub fn series(&self, column: StatColumn) -> Vec<f64> {
        self.decades
            .iter()
            .map(|d| d.mean(column).unwrap_or(f64::NAN))
            .collect()
    }

    pub fn extent(&self, column: StatColumn) -> Option<ColumnExtent> {
        self.extents.iter().copied().find(|e| e.column == column)
    }
}

fn by_player(row: &&SeasonStatRow) -> Option<String> {
    Some(row.player.clone())
}

fn summarize_decade(
    datasets: &Datasets,
    known: &[&SeasonStatRow],
    label: &str,
    range: YearRange,
    config: &DecadesConfig,
) -> Result<DecadeSummary> {
    let in_decade = filter_range(known, StatColumn::Year, range);
    let (threshold, qualifying) =
        percentile_filter(&in_decade, config.ranking_column, config.percentile);
    let threshold = threshold.ok_or_else(|| {
        CoreError::EmptySelection(format!(
            "no {} values for decade {}",
            config.ranking_column, label
        ))
    })?;

    let ranked = group_means(&qualifying, by_player, &[config.ranking_column]);
    let top = top_n(&ranked, config.ranking_column, config.top_n);

    debug!(
        "{}: {} rows, cut {:.1}, {} qualifying rows, {} players",
        label,
        in_decade.len(),
        threshold,
        qualifying.len(),
        ranked.len()
    );

    let mut leaders = Vec::with_capacity(top.len());
    for group in top {
        let seasons: Vec<&SeasonStatRow> = datasets.seasons.rows_for_player(&group.key).collect();
        let seasons = filter_range(&seasons, StatColumn::Year, range);
        let season_means = group_means(&seasons, by_player, &config.columns)
            .into_iter()
            .next()
            .ok_or_else(|| {
                CoreError::EmptySelection(format!("{} has no seasons in {}", group.key, label))
            })?;

        leaders.push(DecadeLeader {
            ranking_mean: group.mean(config.ranking_column).unwrap_or(f64::NAN),
            player: group.key,
            season_means,
        });
    }

    let per_player: Vec<GroupMean<String>> =
        leaders.iter().map(|l| l.season_means.clone()).collect();
    let means = config
        .columns
        .iter()
        .map(|&c| (c, mean_of_means(&per_player, c)))
        .collect();

    info!(
        "{}: top {} scorers {}",
        label,
        leaders.len(),
        leaders
            .iter()
            .map(|l| l.player.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(DecadeSummary {
        label: label.to_string(),
        range,
        threshold,
        leaders,
        means,
    })
}

pub fn decade_leaders(datasets: &Datasets, config: &DecadesConfig) -> Result<DecadeLeaders> {
    let known = datasets.seasons_with_known_players();

    let decades = config
        .decades
        .iter()
        .map(|d| summarize_decade(datasets, &known, &d.label, d.range, config))
        .collect::<Result<Vec<_>>>()?;

    let extents = config
        .plot_columns
        .iter()
        .map(|&column| ColumnExtent {
            column,
            min: datasets.seasons.column_min(column).unwrap_or(f64::NAN),
            max: datasets.seasons.column_max(column).unwrap_or(f64::NAN),
        })
        .collect();

    Ok(DecadeLeaders {
        decades,
        plot_columns: config.plot_columns.clone(),
        extents,
        y_max_fraction: config.y_max_fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::mean;
    use crate::config::Decade;
    use crate::data::{PlayerRecord, SeasonTable};

    fn season(player: &str, year: f64, pts: f64, ast: f64) -> SeasonStatRow {
        SeasonStatRow::new(player)
            .with(StatColumn::Year, year)
            .with(StatColumn::Points, pts)
            .with(StatColumn::Assists, ast)
    }

    fn player(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            height: None,
            weight: None,
            college: None,
            born: None,
            birth_city: None,
            birth_state: None,
        }
    }

    fn datasets() -> Datasets {
        let mut rows = vec![
            // Star: one big season, one quiet season
            season("Star", 1981.0, 2500.0, 400.0),
            season("Star", 1982.0, 100.0, 100.0),
            // Steady: three big seasons
            season("Steady", 1981.0, 2000.0, 200.0),
            season("Steady", 1982.0, 2000.0, 200.0),
            season("Steady", 1983.0, 2000.0, 200.0),
            // Outside the decade
            season("Star", 1995.0, 3000.0, 900.0),
            // Not in the players table
            season("Ghost", 1984.0, 5000.0, 50.0),
        ];
        rows.extend((0..20).map(|i| season(&format!("Bench{i}"), 1985.0, 10.0 + i as f64, 5.0)));

        let mut players: Vec<PlayerRecord> = ["Star", "Steady"].into_iter().map(player).collect();
        players.extend((0..20).map(|i| player(&format!("Bench{i}"))));

        Datasets {
            players,
            seasons: SeasonTable::from_rows(rows),
            biographies: vec![],
        }
    }

    fn config() -> DecadesConfig {
        DecadesConfig {
            decades: vec![Decade {
                label: "1980's".to_string(),
                range: YearRange::new(1980, 1990),
            }],
            ranking_column: StatColumn::Points,
            percentile: 90.0,
            top_n: 10,
            columns: vec![StatColumn::Points, StatColumn::Assists],
            plot_columns: vec![StatColumn::Points, StatColumn::Assists],
            y_max_fraction: 0.85,
        }
    }

    #[test]
    fn test_leaders_ranked_and_join_applied() {
        let result = decade_leaders(&datasets(), &config()).unwrap();
        let decade = &result.decades[0];

        let names: Vec<&str> = decade.leaders.iter().map(|l| l.player.as_str()).collect();
        // 25 rows in the decade; the 90th percentile cut lands on 2000
        assert_eq!(names, vec!["Star", "Steady"]);
        assert!(!names.contains(&"Ghost"));
        assert_eq!(decade.threshold, 2000.0);
        assert_eq!(decade.leaders[0].ranking_mean, 2500.0);
        assert_eq!(decade.leaders[1].ranking_mean, 2000.0);
    }

    #[test]
    fn test_mean_of_means_not_row_mean() {
        let result = decade_leaders(&datasets(), &config()).unwrap();
        let decade = &result.decades[0];

        // Star averages (2500 + 100) / 2 = 1300 over the decade, Steady 2000
        assert_eq!(decade.leaders[0].season_means.mean(StatColumn::Points), Some(1300.0));
        assert_eq!(decade.mean(StatColumn::Points), Some(1650.0));

        let rows = [2500.0, 100.0, 2000.0, 2000.0, 2000.0];
        assert_eq!(mean(&rows), 1720.0);
        assert_eq!(result.series(StatColumn::Assists), vec![(250.0 + 200.0) / 2.0]);
    }

    #[test]
    fn test_extents_cover_whole_table() {
        let result = decade_leaders(&datasets(), &config()).unwrap();
        let pts = result.extent(StatColumn::Points).unwrap();
        assert_eq!(pts.min, 10.0);
        assert_eq!(pts.max, 5000.0);
    }

    #[test]
    fn test_top_n_limits_leaders() {
        let mut cfg = config();
        cfg.top_n = 1;
        let result = decade_leaders(&datasets(), &cfg).unwrap();
        assert_eq!(result.decades[0].leaders.len(), 1);
    }

    #[test]
    fn test_empty_decade_fails() {
        let mut cfg = config();
        cfg.decades[0].range = YearRange::new(1950, 1960);
        assert!(matches!(
            decade_leaders(&datasets(), &cfg),
            Err(CoreError::EmptySelection(_))
        ));
    }
}
