//! Robust Estimators
//!
//! Location and spread estimators over timing samples.
//!
//! Timing distributions are asymmetric: a narrow central peak contaminated by
//! rare, one-sided slow runs. The median and the scaled MAD stay put under that
//! contamination, so they are used to decide what counts as an outlier. The
//! mean is only taken once the contamination has been filtered out.
//!
//! All functions are pure and never reorder the caller's slice.

/// Scale factor turning the raw median absolute deviation into a consistent
/// estimator of the standard deviation for normally distributed data.
pub const MAD_SCALE: f64 = 1.4826;

/// A spread statistic over a sample set (MAD, standard deviation, ...).
pub type SpreadFn = fn(&[f64]) -> f64;

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Middle value of the sorted samples; the average of the two central values
/// for an even count. Returns 0.0 for an empty slice.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation from the median, scaled by [`MAD_SCALE`].
///
/// A single sample has no spread: the result is exactly 0.0. Callers must not
/// divide by it.
pub fn mad(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let center = median(samples);
    let deviations: Vec<f64> = samples.iter().map(|x| (x - center).abs()).collect();
    median(&deviations) * MAD_SCALE
}

/// Sample standard deviation (n - 1 denominator). 0.0 below two samples.
pub fn std_dev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let m = mean(samples);
    let variance =
        samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    variance.sqrt()
}
