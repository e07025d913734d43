//! Normal fit of one era's sample, used for density overlays only.
//!
//! A sample with zero or undefined spread still produces an `EraNormal`; its
//! density is `NaN` everywhere instead of failing the run.

use crate::aggregate::{mean, sample_std};
use statrs::distribution::{Continuous, Normal};

#[derive(Debug, Clone, Copy)]
pub struct EraNormal {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1)
    pub std_dev: f64,
    dist: Option<Normal>,
}

impl EraNormal {
    pub fn fit(samples: &[f64]) -> Self {
        let m = mean(samples);
        let sd = sample_std(samples);
        let dist = if m.is_finite() && sd.is_finite() && sd > 0.0 {
            Normal::new(m, sd).ok()
        } else {
            None
        };

        Self {
            n: samples.len(),
            mean: m,
            std_dev: sd,
            dist,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.dist.is_none()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        match &self.dist {
            Some(d) => d.pdf(x),
            None => f64::NAN,
        }
    }
}
