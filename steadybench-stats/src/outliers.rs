//! Outlier Rejection
//!
//! Keeps only samples within `multiplier * spread` of the median, where the
//! spread is computed over the full sample set. The bound is strict: a sample
//! exactly on the boundary is rejected.
//!
//! When the reference spread is zero (more than half the samples share the
//! median value) the bound collapses to the median itself, and only samples
//! equal to it are kept.

use crate::robust::{SpreadFn, median};

/// Result of filtering one sample set
#[derive(Debug, Clone)]
pub struct OutlierAnalysis {
    /// Samples that survived the filter, in acquisition order
    pub kept: Vec<f64>,
    /// Number of samples that were rejected
    pub rejected: usize,
    /// Median of the full sample set
    pub center: f64,
    /// Spread of the full sample set (the reference sigma)
    pub reference_spread: f64,
    /// Half-width of the acceptance window; infinite when rejection is off
    pub bound: f64,
}

impl OutlierAnalysis {
    /// Number of kept samples
    pub fn n_good(&self) -> usize {
        self.kept.len()
    }

    /// Fraction of samples rejected, in percent
    pub fn rejected_percentage(&self) -> f64 {
        let total = self.kept.len() + self.rejected;
        if total == 0 {
            return 0.0;
        }
        (self.rejected as f64 / total as f64) * 100.0
    }
}

/// Filter `samples` around their median.
///
/// `multiplier` of `None` disables rejection and keeps everything.
pub fn reject_outliers(
    samples: &[f64],
    multiplier: Option<f64>,
    spread: SpreadFn,
) -> OutlierAnalysis {
    let center = median(samples);
    let reference_spread = spread(samples);

    let Some(k) = multiplier else {
        return OutlierAnalysis {
            kept: samples.to_vec(),
            rejected: 0,
            center,
            reference_spread,
            bound: f64::INFINITY,
        };
    };

    let bound = k * reference_spread;
    let mut kept: Vec<f64> = if bound > 0.0 {
        samples
            .iter()
            .copied()
            .filter(|x| (x - center).abs() < bound)
            .collect()
    } else {
        samples.iter().copied().filter(|&x| x == center).collect()
    };

    // Only reachable with non-finite samples; never hand back an empty set.
    if kept.is_empty() {
        kept = samples.to_vec();
    }

    OutlierAnalysis {
        rejected: samples.len() - kept.len(),
        kept,
        center,
        reference_spread,
        bound,
    }
}
