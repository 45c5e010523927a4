#![warn(missing_docs)]
//! Steadybench Statistical Primitives
//!
//! Provides the small set of robust statistics the measurement engine needs:
//! - Mean, median and scaled median absolute deviation (MAD)
//! - Median-centered outlier rejection with a pluggable spread statistic
//! - `Measurement`, a value with uncertainty supporting baseline subtraction
//!   and precision-aware formatting

mod measurement;
mod outliers;
mod robust;

pub use measurement::{Measurement, MeasurementError};
pub use outliers::{OutlierAnalysis, reject_outliers};
pub use robust::{MAD_SCALE, SpreadFn, mad, mean, median, std_dev};

/// Default outlier rejection multiplier applied to the reference spread
pub const DEFAULT_OUTLIER_REJECTION: f64 = 2.5;
