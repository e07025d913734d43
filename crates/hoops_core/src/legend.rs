//! # Column Legend
//!
//! Keyed table of season-stat column codes and their human-readable labels.
//!
//! Each numeric column is a [`StatColumn`] variant whose code and label live in
//! the same `match` arm, so a label can never slide onto the wrong column when
//! the source file gains or loses a field. [`ColumnLegend::from_headers`] applies
//! the table to the header order of a loaded file and reports every header it
//! cannot label.

use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric columns of `Seasons_Stats.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatColumn {
    Year,
    Age,
    Games,
    GamesStarted,
    MinutesPlayed,
    Per,
    TrueShootingPct,
    ThreePointAttemptRate,
    FreeThrowRate,
    OffReboundPct,
    DefReboundPct,
    TotalReboundPct,
    AssistPct,
    StealPct,
    BlockPct,
    TurnoverPct,
    UsagePct,
    OffWinShares,
    DefWinShares,
    WinShares,
    WinSharesPer48,
    OffBoxPlusMinus,
    DefBoxPlusMinus,
    BoxPlusMinus,
    Vorp,
    FieldGoals,
    FieldGoalAttempts,
    FieldGoalPct,
    ThreePointers,
    ThreePointAttempts,
    ThreePointPct,
    TwoPointers,
    TwoPointAttempts,
    TwoPointPct,
    EffectiveFgPct,
    FreeThrows,
    FreeThrowAttempts,
    FreeThrowPct,
    OffRebounds,
    DefRebounds,
    TotalRebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    PersonalFouls,
    Points,
}

impl StatColumn {
    /// Number of numeric columns.
    pub const COUNT: usize = 47;

    /// All numeric columns in source file order.
    pub const ALL: [StatColumn; Self::COUNT] = [
        StatColumn::Year,
        StatColumn::Age,
        StatColumn::Games,
        StatColumn::GamesStarted,
        StatColumn::MinutesPlayed,
        StatColumn::Per,
        StatColumn::TrueShootingPct,
        StatColumn::ThreePointAttemptRate,
        StatColumn::FreeThrowRate,
        StatColumn::OffReboundPct,
        StatColumn::DefReboundPct,
        StatColumn::TotalReboundPct,
        StatColumn::AssistPct,
        StatColumn::StealPct,
        StatColumn::BlockPct,
        StatColumn::TurnoverPct,
        StatColumn::UsagePct,
        StatColumn::OffWinShares,
        StatColumn::DefWinShares,
        StatColumn::WinShares,
        StatColumn::WinSharesPer48,
        StatColumn::OffBoxPlusMinus,
        StatColumn::DefBoxPlusMinus,
        StatColumn::BoxPlusMinus,
        StatColumn::Vorp,
        StatColumn::FieldGoals,
        StatColumn::FieldGoalAttempts,
        StatColumn::FieldGoalPct,
        StatColumn::ThreePointers,
        StatColumn::ThreePointAttempts,
        StatColumn::ThreePointPct,
        StatColumn::TwoPointers,
        StatColumn::TwoPointAttempts,
        StatColumn::TwoPointPct,
        StatColumn::EffectiveFgPct,
        StatColumn::FreeThrows,
        StatColumn::FreeThrowAttempts,
        StatColumn::FreeThrowPct,
        StatColumn::OffRebounds,
        StatColumn::DefRebounds,
        StatColumn::TotalRebounds,
        StatColumn::Assists,
        StatColumn::Steals,
        StatColumn::Blocks,
        StatColumn::Turnovers,
        StatColumn::PersonalFouls,
        StatColumn::Points,
    ];

    /// Position of this column inside a row's value array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column code as it appears in the CSV header.
    pub fn code(self) -> &'static str {
        self.entry().0
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        self.entry().1
    }

    /// Label of an attempts column without the " Attempts" suffix
    /// ("Three Point Attempts" → "Three Point").
    pub fn rate_label(self) -> &'static str {
        let label = self.label();
        label.strip_suffix(" Attempts").unwrap_or(label)
    }

    pub fn from_code(code: &str) -> Option<StatColumn> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    fn entry(self) -> (&'static str, &'static str) {
        match self {
            StatColumn::Year => ("Year", "Year"),
            StatColumn::Age => ("Age", "Age"),
            StatColumn::Games => ("G", "Games"),
            StatColumn::GamesStarted => ("GS", "Games Started"),
            StatColumn::MinutesPlayed => ("MP", "Minutes Played"),
            StatColumn::Per => ("PER", "Player Efficiency Rating"),
            StatColumn::TrueShootingPct => ("TS%", "True Shooting Percentage"),
            StatColumn::ThreePointAttemptRate => ("3PAr", "Three Point Attempt Rate"),
            StatColumn::FreeThrowRate => ("FTr", "Free Throw Rate"),
            StatColumn::OffReboundPct => ("ORB%", "Offensive Rebound Percentage"),
            StatColumn::DefReboundPct => ("DRB%", "Defensive Rebound Percentage"),
            StatColumn::TotalReboundPct => ("TRB%", "Total Rebounds Percentage"),
            StatColumn::AssistPct => ("AST%", "Assist Percentage"),
            StatColumn::StealPct => ("STL%", "Steal Percentage"),
            StatColumn::BlockPct => ("BLK%", "Block Percentage"),
            StatColumn::TurnoverPct => ("TOV%", "Turnover Percentage"),
            StatColumn::UsagePct => ("USG%", "Usage Percentage"),
            StatColumn::OffWinShares => ("OWS", "Offensive Win Shares"),
            StatColumn::DefWinShares => ("DWS", "Defensive Win Shares"),
            StatColumn::WinShares => ("WS", "Win Shares"),
            StatColumn::WinSharesPer48 => ("WS/48", "Win Share per 48 Minutes"),
            StatColumn::OffBoxPlusMinus => ("OBPM", "Offensive Box Plus/Minus"),
            StatColumn::DefBoxPlusMinus => ("DBPM", "Defensive Box Plus/Minus"),
            StatColumn::BoxPlusMinus => ("BPM", "Box Plus/Minus"),
            StatColumn::Vorp => ("VORP", "Value Over Replacement Player"),
            StatColumn::FieldGoals => ("FG", "Field Goals"),
            StatColumn::FieldGoalAttempts => ("FGA", "Field Goal Attempts"),
            StatColumn::FieldGoalPct => ("FG%", "Field Goal Percentage"),
            StatColumn::ThreePointers => ("3P", "Three Pointers"),
            StatColumn::ThreePointAttempts => ("3PA", "Three Point Attempts"),
            StatColumn::ThreePointPct => ("3P%", "Three Point Percentage"),
            StatColumn::TwoPointers => ("2P", "Two Pointers"),
            StatColumn::TwoPointAttempts => ("2PA", "Two Pointer Attempts"),
            StatColumn::TwoPointPct => ("2P%", "Two Pointer Percentage"),
            StatColumn::EffectiveFgPct => ("eFG%", "Effective Field Goal Percentage"),
            StatColumn::FreeThrows => ("FT", "Free Throws"),
            StatColumn::FreeThrowAttempts => ("FTA", "Free Throw Attempts"),
            StatColumn::FreeThrowPct => ("FT%", "Free Throw Percentage"),
            StatColumn::OffRebounds => ("ORB", "Offensive Rebounds"),
            StatColumn::DefRebounds => ("DRB", "Defensive Rebounds"),
            StatColumn::TotalRebounds => ("TRB", "Total Rebounds"),
            StatColumn::Assists => ("AST", "Assists"),
            StatColumn::Steals => ("STL", "Steals"),
            StatColumn::Blocks => ("BLK", "Blocks"),
            StatColumn::Turnovers => ("TOV", "Turnovers"),
            StatColumn::PersonalFouls => ("PF", "Personal Fouls"),
            StatColumn::Points => ("PTS", "Points"),
        }
    }
}

impl fmt::Display for StatColumn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for StatColumn {
    type Error = String;

    fn try_from(code: String) -> std::result::Result<Self, Self::Error> {
        StatColumn::from_code(&code).ok_or_else(|| format!("unknown stat column code: {}", code))
    }
}

impl From<StatColumn> for String {
    fn from(column: StatColumn) -> Self {
        column.code().to_string()
    }
}

/// Text columns carried by every season row.
pub const TEXT_COLUMNS: [(&str, &str); 4] = [
    ("", "ID"),
    ("Player", "Player"),
    ("Pos", "Position"),
    ("Tm", "Team"),
];

/// Always-empty placeholder columns of the source file.
pub const PLACEHOLDER_COLUMNS: [&str; 2] = ["blanl", "blank2"];

fn label_for(code: &str) -> Option<&'static str> {
    if let Some(column) = StatColumn::from_code(code) {
        return Some(column.label());
    }
    TEXT_COLUMNS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Code → label mapping for the columns of one loaded file.
#[derive(Debug, Clone, Default)]
pub struct ColumnLegend {
    labels: FxHashMap<String, &'static str>,
    order: Vec<String>,
    unlabeled: Vec<String>,
}

impl ColumnLegend {
    /// Build the legend for a header row.
    ///
    /// Headers with no entry in the keyed table are collected in
    /// [`ColumnLegend::unlabeled`] and logged; placeholder columns are skipped.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut legend = ColumnLegend::default();

        for header in headers {
            let code = header.as_ref().trim();
            if PLACEHOLDER_COLUMNS.contains(&code) {
                continue;
            }
            match label_for(code) {
                Some(label) => {
                    if legend.labels.insert(code.to_string(), label).is_none() {
                        legend.order.push(code.to_string());
                    }
                }
                None => {
                    warn!("Column '{}' has no legend entry", code);
                    legend.unlabeled.push(code.to_string());
                }
            }
        }

        legend
    }

    /// Legend covering every known column, independent of any file.
    pub fn full() -> Self {
        let mut headers: Vec<&str> = TEXT_COLUMNS.iter().map(|(c, _)| *c).collect();
        headers.extend(StatColumn::ALL.iter().map(|c| c.code()));
        Self::from_headers(&headers)
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.labels.get(code).copied()
    }

    pub fn label_or_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.label(code).unwrap_or(code)
    }

    /// Labeled codes in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|code| (code.as_str(), self.labels[code.as_str()]))
    }

    pub fn unlabeled(&self) -> &[String] {
        &self.unlabeled
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_round_trip() {
        for column in StatColumn::ALL {
            assert_eq!(StatColumn::from_code(column.code()), Some(column));
        }
        let mut codes: Vec<&str> = StatColumn::ALL.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), StatColumn::COUNT);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, column) in StatColumn::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
        }
    }

    #[test]
    fn test_rate_label_strips_attempts() {
        assert_eq!(StatColumn::ThreePointAttempts.rate_label(), "Three Point");
        assert_eq!(StatColumn::TwoPointAttempts.rate_label(), "Two Pointer");
        assert_eq!(StatColumn::FreeThrowAttempts.rate_label(), "Free Throw");
        assert_eq!(StatColumn::Points.rate_label(), "Points");
    }

    #[test]
    fn test_legend_from_reordered_headers() {
        // Reordering the file must not move labels between columns
        let legend = ColumnLegend::from_headers(&["PTS", "Player", "3PA", "Year"]);
        assert_eq!(legend.label("PTS"), Some("Points"));
        assert_eq!(legend.label("3PA"), Some("Three Point Attempts"));
        assert_eq!(legend.label("Player"), Some("Player"));
        assert_eq!(legend.len(), 4);
        assert!(legend.unlabeled().is_empty());
    }

    #[test]
    fn test_legend_reports_unknown_headers() {
        let legend = ColumnLegend::from_headers(&["Year", "blanl", "XYZ", "blank2"]);
        assert_eq!(legend.len(), 1);
        assert_eq!(legend.unlabeled(), &["XYZ".to_string()]);
        assert_eq!(legend.label_or_code("XYZ"), "XYZ");
    }

    #[test]
    fn test_full_legend() {
        let legend = ColumnLegend::full();
        assert_eq!(legend.len(), StatColumn::COUNT + TEXT_COLUMNS.len());
        assert_eq!(legend.label(""), Some("ID"));
        assert_eq!(legend.label("Tm"), Some("Team"));
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&StatColumn::ThreePointPct).unwrap();
        assert_eq!(json, "\"3P%\"");
        let back: StatColumn = serde_json::from_str("\"TOV%\"").unwrap();
        assert_eq!(back, StatColumn::TurnoverPct);
        assert!(serde_json::from_str::<StatColumn>("\"nope\"").is_err());
    }
}
