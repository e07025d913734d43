//! # Shooting Beta Model
//!
//! Models a player's true success rate for one shot type in one season.
//!
//! Makes are reconstructed from the recorded percentage and attempts, then
//! Laplace-smoothed: `α = makes + 1`, `β = misses + 1`. With no attempts the
//! model is the uniform Beta(1, 1).

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta, Continuous, ContinuousCDF};

// 2^-60 resolution on [0, 1]
const QUANTILE_ITERATIONS: usize = 60;

/// How `percentage × attempts` becomes a make count.
///
/// Percentages in the source are rounded to three decimals, so the product
/// is rarely an integer even though the true count was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountRounding {
    /// Nearest integer (recovers the recorded count)
    #[default]
    Round,
    /// Round toward zero
    Truncate,
    /// Keep the fractional product
    Exact,
}

impl CountRounding {
    pub fn apply(self, count: f64) -> f64 {
        match self {
            CountRounding::Round => count.round(),
            CountRounding::Truncate => count.trunc(),
            CountRounding::Exact => count,
        }
    }
}

/// Beta posterior of a shooting percentage.
#[derive(Debug, Clone, Copy)]
pub struct ShootingBeta {
    pub attempts: f64,
    pub makes: f64,
    pub misses: f64,
    dist: Beta,
}

impl ShootingBeta {
    /// Fit from attempts and the recorded percentage (0.0-1.0).
    ///
    /// A missing percentage is only accepted with zero attempts.
    ///
    /// # Errors
    /// `InvalidParameter` for negative / non-finite attempts, a percentage
    /// outside [0, 1], or a missing percentage with attempts recorded.
    pub fn fit(attempts: f64, percentage: Option<f64>, rounding: CountRounding) -> Result<Self> {
        if !attempts.is_finite() || attempts < 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "attempts must be a non-negative number, got {}",
                attempts
            )));
        }

        let pct = match percentage {
            Some(p) if (0.0..=1.0).contains(&p) => p,
            Some(p) => {
                return Err(CoreError::InvalidParameter(format!(
                    "percentage must be within [0, 1], got {}",
                    p
                )))
            }
            None if attempts == 0.0 => 0.0,
            None => {
                return Err(CoreError::InvalidParameter(format!(
                    "missing percentage for {} attempts",
                    attempts
                )))
            }
        };

        let makes = rounding.apply(pct * attempts).clamp(0.0, attempts);
        let misses = attempts - makes;

        let dist = Beta::new(makes + 1.0, misses + 1.0)
            .map_err(|e| CoreError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            attempts,
            makes,
            misses,
            dist,
        })
    }

    /// Shape α (makes + 1)
    pub fn alpha(&self) -> f64 {
        self.makes + 1.0
    }

    /// Shape β (misses + 1)
    pub fn beta(&self) -> f64 {
        self.misses + 1.0
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.dist.pdf(x)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.dist.cdf(x)
    }

    /// Inverse CDF by bisection on [0, 1].
    pub fn quantile(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return 0.0;
        }
        if p >= 1.0 {
            return 1.0;
        }

        let (mut low, mut high) = (0.0f64, 1.0f64);
        for _ in 0..QUANTILE_ITERATIONS {
            let mid = 0.5 * (low + high);
            if self.dist.cdf(mid) >= p {
                high = mid;
            } else {
                low = mid;
            }
        }
        0.5 * (low + high)
    }

    pub fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// Posterior mean α / (α + β)
    pub fn mean(&self) -> f64 {
        self.alpha() / (self.alpha() + self.beta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_from_counts() {
        // 789 attempts at .411 -> 324.279 makes -> 324
        let fit = ShootingBeta::fit(789.0, Some(0.411), CountRounding::Round).unwrap();
        assert_eq!(fit.makes, 324.0);
        assert_eq!(fit.alpha(), 325.0);
        assert_eq!(fit.beta(), 466.0);

        let exact = ShootingBeta::fit(789.0, Some(0.411), CountRounding::Exact).unwrap();
        assert!((exact.alpha() - 325.279).abs() < 1e-9);

        let trunc = ShootingBeta::fit(10.0, Some(0.37), CountRounding::Truncate).unwrap();
        assert_eq!(trunc.makes, 3.0);
    }

    #[test]
    fn test_zero_attempts_is_uniform() {
        let fit = ShootingBeta::fit(0.0, None, CountRounding::Round).unwrap();
        assert_eq!(fit.alpha(), 1.0);
        assert_eq!(fit.beta(), 1.0);
        assert!((fit.pdf(0.3) - 1.0).abs() < 1e-9);
        assert!((fit.median() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_median_near_percentage() {
        let fit = ShootingBeta::fit(500.0, Some(0.4), CountRounding::Round).unwrap();
        assert!((fit.median() - 0.4).abs() < 0.01);
        assert!(fit.quantile(0.001) < fit.median());
        assert!(fit.quantile(0.999) > fit.median());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(ShootingBeta::fit(-1.0, Some(0.5), CountRounding::Round).is_err());
        assert!(ShootingBeta::fit(f64::NAN, Some(0.5), CountRounding::Round).is_err());
        assert!(ShootingBeta::fit(10.0, Some(1.5), CountRounding::Round).is_err());
        assert!(ShootingBeta::fit(10.0, None, CountRounding::Round).is_err());
    }

    #[test]
    fn test_rounding_serde() {
        let r: CountRounding = serde_json::from_str("\"truncate\"").unwrap();
        assert_eq!(r, CountRounding::Truncate);
        assert_eq!(CountRounding::default(), CountRounding::Round);
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: Laplace smoothing keeps both shapes at or above one
            #[test]
            fn prop_shapes_at_least_one(
                attempts in 0u32..2000,
                pct in 0.0f64..=1.0,
                mode in 0usize..3
            ) {
                let rounding = [CountRounding::Round, CountRounding::Truncate, CountRounding::Exact][mode];
                let fit = ShootingBeta::fit(attempts as f64, Some(pct), rounding).unwrap();
                prop_assert!(fit.alpha() >= 1.0);
                prop_assert!(fit.beta() >= 1.0);
                prop_assert!((fit.makes + fit.misses - attempts as f64).abs() < 1e-9);
            }
        }
    }
}
