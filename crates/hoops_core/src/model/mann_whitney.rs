//! # Mann-Whitney U Test
//!
//! Two-sided test of H0 "both samples come from the same distribution".
//!
//! Method selection matches the common reference implementation:
//! - exact null distribution when the smaller sample has at most 8
//!   observations and there are no ties
//! - otherwise the normal approximation with tie-corrected variance and a
//!   continuity correction
//!
//! The p-value is computed from `max(U1, U2)`, so it does not depend on the
//! order of the two samples, and it is clipped to 1.0.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::cmp::Ordering;

const EXACT_MAX_SMALL_SAMPLE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UTestMethod {
    Exact,
    Asymptotic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitney {
    /// U statistic of the first sample
    pub u_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    pub method: UTestMethod,
}

/// Bonferroni-adjusted p-value for `m` simultaneous tests.
pub fn bonferroni(p_value: f64, m: usize) -> f64 {
    (p_value * m as f64).min(1.0)
}

/// Average ranks (1-based) of `values`, plus the size of every tie group.
fn rank_with_ties(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut ties = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j share the average of ranks i+1..=j
        let avg = (i + 1 + j) as f64 / 2.0;
        for k in i..j {
            ranks[order[k]] = avg;
        }
        ties.push(j - i);
        i = j;
    }

    (ranks, ties)
}

/// Number of arrangements giving each U in 0..=n1*n2, i.e. the coefficients
/// of the Gaussian binomial [n1 + n2 choose n1].
fn exact_u_counts(n1: usize, n2: usize) -> Vec<i128> {
    let k = n1.min(n2);
    let total = n1 + n2;
    let max_u = n1 * n2;

    let mut poly = vec![0i128; max_u + k + 1];
    poly[0] = 1;
    let mut degree = 0;

    for i in 1..=k {
        let s = total - k + i;
        // multiply by (1 - q^s)
        for j in (s..=degree + s).rev() {
            poly[j] -= poly[j - s];
        }
        degree += s;
        // divide by (1 - q^i), exact at every step
        for j in i..=degree {
            poly[j] += poly[j - i];
        }
        degree -= i;
    }

    poly.truncate(max_u + 1);
    poly
}

fn exact_p_value(u_max: f64, n1: usize, n2: usize) -> f64 {
    let counts = exact_u_counts(n1, n2);
    let total: i128 = counts.iter().sum();
    let start = (u_max.ceil() as usize).min(counts.len());
    let upper: i128 = counts[start..].iter().sum();
    2.0 * upper as f64 / total as f64
}

fn asymptotic_p_value(u_max: f64, n1: usize, n2: usize, ties: &[usize]) -> f64 {
    let n = (n1 + n2) as f64;
    let n1n2 = (n1 * n2) as f64;
    let mu = n1n2 / 2.0;
    let tie_term: f64 = ties
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let sigma = (n1n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))).sqrt();

    if sigma.is_nan() || sigma <= 0.0 {
        // every observation tied
        return 1.0;
    }

    let z = (u_max - mu - 0.5) / sigma;
    match Normal::new(0.0, 1.0) {
        Ok(std_normal) => 2.0 * std_normal.sf(z),
        Err(_) => f64::NAN,
    }
}

/// Run the two-sided Mann-Whitney U test.
///
/// # Errors
/// * `EmptySelection` - either sample is empty
/// * `InvalidParameter` - a sample contains NaN
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<MannWhitney> {
    if x.is_empty() || y.is_empty() {
        return Err(CoreError::EmptySelection(format!(
            "Mann-Whitney U needs two non-empty samples (got {} and {})",
            x.len(),
            y.len()
        )));
    }
    if x.iter().chain(y).any(|v| v.is_nan()) {
        return Err(CoreError::InvalidParameter(
            "Mann-Whitney U samples must not contain NaN".to_string(),
        ));
    }

    let (n1, n2) = (x.len(), y.len());
    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let (ranks, ties) = rank_with_ties(&combined);

    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u_max = u1.max(u2);

    let has_ties = ties.iter().any(|&t| t > 1);
    let method = if !has_ties && n1.min(n2) <= EXACT_MAX_SMALL_SAMPLE {
        UTestMethod::Exact
    } else {
        UTestMethod::Asymptotic
    };

    let p = match method {
        UTestMethod::Exact => exact_p_value(u_max, n1, n2),
        UTestMethod::Asymptotic => asymptotic_p_value(u_max, n1, n2, &ties),
    };

    Ok(MannWhitney {
        u_statistic: u1,
        p_value: p.clamp(0.0, 1.0),
        method,
    })
}
