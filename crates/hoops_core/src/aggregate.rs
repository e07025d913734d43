//! # Aggregation Engine
//!
//! Pure grouping / filtering / ranking over rows that implement [`StatRow`].
//!
//! Missing values follow data-frame semantics: a mean skips missing cells, and
//! a group with no value at all for a column reports `NaN` for that column.

use crate::data::StatRow;
use crate::legend::StatColumn;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); `NaN` below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n as f64 - 1.0)).sqrt()
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in percent (0..=100). Returns `None` for an empty input.
///
/// # Examples
/// ```
/// use hoops_core::aggregate::percentile;
///
/// assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 50.0), Some(2.5));
/// assert_eq!(percentile(&[10.0], 90.0), Some(10.0));
/// ```
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Half-open range `[start, end)` over a numeric column (usually `Year`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Single season `[year, year + 1)`.
    pub fn season(year: i32) -> Self {
        Self::new(year, year + 1)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start as f64 && value < self.end as f64
    }
}

/// Keep rows whose `column` value lies in `range`. Missing values never match.
pub fn filter_range<R: StatRow + Clone>(rows: &[R], column: StatColumn, range: YearRange) -> Vec<R> {
    rows.iter()
        .filter(|r| r.value(column).is_some_and(|v| range.contains(v)))
        .cloned()
        .collect()
}

/// Keep rows at or above the `q`-th percentile of `column`.
///
/// The threshold is computed over every non-missing value of the input and the
/// boundary is inclusive. Returns the threshold alongside the kept rows.
pub fn percentile_filter<R: StatRow + Clone>(
    rows: &[R],
    column: StatColumn,
    q: f64,
) -> (Option<f64>, Vec<R>) {
    let values: Vec<f64> = rows.iter().filter_map(|r| r.value(column)).collect();
    let Some(threshold) = percentile(&values, q) else {
        return (None, Vec::new());
    };

    let kept = rows
        .iter()
        .filter(|r| r.value(column).is_some_and(|v| v >= threshold))
        .cloned()
        .collect();

    (Some(threshold), kept)
}

/// Per-group column means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    /// Rows in the group
    pub rows: usize,
    means: Vec<(StatColumn, f64)>,
}

impl<K> GroupMean<K> {
    /// Mean of `column`; `None` if the column was not aggregated,
    /// `Some(NaN)` if the group had no value for it.
    pub fn mean(&self, column: StatColumn) -> Option<f64> {
        self.means
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
    }

    pub fn columns(&self) -> impl Iterator<Item = StatColumn> + '_ {
        self.means.iter().map(|(c, _)| *c)
    }
}

impl<K> StatRow for GroupMean<K> {
    fn value(&self, column: StatColumn) -> Option<f64> {
        self.mean(column).filter(|v| !v.is_nan())
    }
}

/// Group rows by `key` and average each of `columns`.
///
/// One entry per distinct key, ascending by key. Rows whose key is `None`
/// are dropped; a group only exists if at least one row maps to it.
pub fn group_means<R, K, F>(rows: &[R], key: F, columns: &[StatColumn]) -> Vec<GroupMean<K>>
where
    R: StatRow,
    K: Ord + Clone,
    F: Fn(&R) -> Option<K>,
{
    // key -> (row count, per-column (sum, n))
    let mut groups: BTreeMap<K, (usize, Vec<(f64, usize)>)> = BTreeMap::new();

    for row in rows {
        let Some(k) = key(row) else {
            continue;
        };
        let entry = groups
            .entry(k)
            .or_insert_with(|| (0, vec![(0.0, 0); columns.len()]));
        entry.0 += 1;
        for (i, column) in columns.iter().enumerate() {
            if let Some(v) = row.value(*column) {
                entry.1[i].0 += v;
                entry.1[i].1 += 1;
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, (count, sums))| GroupMean {
            key,
            rows: count,
            means: columns
                .iter()
                .zip(sums)
                .map(|(c, (sum, n))| {
                    let m = if n == 0 { f64::NAN } else { sum / n as f64 };
                    (*c, m)
                })
                .collect(),
        })
        .collect()
}

/// Mean series of one column across groups, in group order.
pub fn series<K>(groups: &[GroupMean<K>], column: StatColumn) -> Vec<f64> {
    groups
        .iter()
        .map(|g| g.mean(column).unwrap_or(f64::NAN))
        .collect()
}

/// First `n` groups by descending `column` mean.
///
/// Stable: ties keep their input order. Groups without a value sort last.
pub fn top_n<K: Clone>(groups: &[GroupMean<K>], column: StatColumn, n: usize) -> Vec<GroupMean<K>> {
    let mut ranked: Vec<&GroupMean<K>> = groups.iter().collect();
    ranked.sort_by(|a, b| match (a.value(column), b.value(column)) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked.into_iter().take(n).cloned().collect()
}

/// Average of the per-group means of `column`.
///
/// Each group counts once no matter how many rows it had, which is what
/// separates this from a flat mean over the underlying rows. Groups with no
/// value for the column are skipped; `NaN` if none remain.
pub fn mean_of_means<K>(groups: &[GroupMean<K>], column: StatColumn) -> f64 {
    let means: Vec<f64> = groups.iter().filter_map(|g| g.value(column)).collect();
    mean(&means)
}
