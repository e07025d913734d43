//! # Statistical Modeling Module
//!
//! Distribution fits and hypothesis tests used by the analysis pipelines.
//!
//! - `beta_fit` - Laplace-smoothed Beta model of a shooting percentage
//! - `normal_fit` - Normal fit of one era's sample (density overlay only)
//! - `mann_whitney` - two-sided Mann-Whitney U test between two eras

pub mod beta_fit;
pub mod mann_whitney;
pub mod normal_fit;

pub use beta_fit::{CountRounding, ShootingBeta};
pub use mann_whitney::{bonferroni, mann_whitney_u, MannWhitney, UTestMethod};
pub use normal_fit::EraNormal;

/// `n` evenly spaced points from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
