//! End-to-end pipeline tests on small synthetic CSV files.

use hoops_core::config::{ErasConfig, TrendsConfig};
use hoops_core::{era_comparison, load_datasets, yearly_trends, DataPaths, StatColumn};
use std::fs;
use tempfile::TempDir;

const SEASONS: &str = "\
,Year,Player,Pos,Age,Tm,G,FGA,PTS
0,1999.0,Ann Archer,PG,25.0,AAA,50,900,1200
1,1999.0,Bob Baker,C,28.0,BBB,60,700,800
2,2000.0,Ann Archer,PG,26.0,AAA,70,1000,1500
3,2000.0,Bob Baker,C,29.0,BBB,20,300,
";

const PLAYERS: &str = "\
,Player,height,weight,collage,born,birth_city,birth_state
0,Ann Archer,180.0,75.0,,1974.0,,
1,Bob Baker,210.0,110.0,,1971.0,,
";

const BIOGRAPHIES: &str = "\
name,year_start,year_end,position,height,weight,birth_date,college
Ann Archer,1996,2004,G,5-11,165.0,,
Bob Baker,1993,2001,C,6-11,240.0,,
";

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Seasons_Stats.csv"), SEASONS).unwrap();
    fs::write(dir.path().join("Players.csv"), PLAYERS).unwrap();
    fs::write(dir.path().join("player_data.csv"), BIOGRAPHIES).unwrap();
    dir
}

#[test]
fn test_year_grouped_mean_one_row_per_year() {
    let dir = data_dir();
    let datasets = load_datasets(&DataPaths::in_dir(dir.path())).unwrap();

    let config = TrendsConfig {
        columns: vec![StatColumn::FieldGoalAttempts],
        markers: vec![],
    };
    let trends = yearly_trends(&datasets, &config).unwrap();

    assert_eq!(trends.years, vec![1999, 2000]);
    let fga = trends.series(StatColumn::FieldGoalAttempts).unwrap();
    assert_eq!(fga.means, vec![800.0, 650.0]);
}

#[test]
fn test_missing_cells_do_not_count_as_zero() {
    let dir = data_dir();
    let datasets = load_datasets(&DataPaths::in_dir(dir.path())).unwrap();

    let config = TrendsConfig {
        columns: vec![StatColumn::Points],
        markers: vec![],
    };
    let trends = yearly_trends(&datasets, &config).unwrap();
    // Bob's 2000 points are missing, so 2000 averages Ann alone
    assert_eq!(trends.series(StatColumn::Points).unwrap().means, vec![1000.0, 1500.0]);
}

#[test]
fn test_era_comparison_end_to_end() {
    let dir = data_dir();
    let datasets = load_datasets(&DataPaths::in_dir(dir.path())).unwrap();

    let config = ErasConfig {
        older_year: 1999,
        newer_year: 2000,
        columns: vec![StatColumn::FieldGoalAttempts],
        grid_points: 10,
    };
    let result = era_comparison(&datasets, &config).unwrap();
    let panel = &result.panels[0];

    assert_eq!(panel.older.mean, 800.0);
    assert_eq!(panel.newer.mean, 650.0);
    assert_eq!(panel.grid.len(), 10);
    assert!(panel.test.p_value > 0.0 && panel.test.p_value <= 1.0);
}
