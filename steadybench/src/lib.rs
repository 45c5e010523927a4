#![warn(missing_docs)]
//! # Steadybench
//!
//! Adaptive timing of repeatable operations with statistically robust results.
//!
//! Steadybench keeps sampling an operation until the uncertainty of its
//! estimate is small enough:
//! - **Robust statistics**: median-centered outlier rejection with a scaled
//!   MAD (or standard deviation) spread
//! - **Adaptive sampling**: stops as soon as the relative or absolute
//!   precision target holds, never before `initial_runs`, never past
//!   `max_iterations`
//! - **Overhead subtraction**: a dry pass measures the launch cost and is
//!   subtracted with errors added in quadrature
//! - **Reports**: human, raw and JSON output including every timing
//!
//! ## Quick Start
//!
//! ```no_run
//! use steadybench::prelude::*;
//!
//! # fn main() -> Result<(), BenchError> {
//! let mut bench = Benchmark::new(BenchConfig::default())?;
//! bench.add(CommandInstance::new(["sleep", "0.01"]))?;
//! bench.add(FnInstance::new("sum", || (0..10_000u64).sum::<u64>()))?;
//! bench.run()?;
//!
//! for measured in bench.instances() {
//!     if let Some(result) = measured.result() {
//!         println!("{}: {} s", measured.name(), result);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use steadybench_core::{
    BenchConfig, BenchError, Benchmark, CommandError, CommandInstance, ConvergenceController,
    Estimate, FnInstance, Instance, MeasuredInstance, PassKind, PassOutcome, PassSettings,
    SampleError, VariabilityMeasure,
};

// Re-export stats
pub use steadybench_stats::{
    DEFAULT_OUTLIER_REJECTION, MAD_SCALE, Measurement, MeasurementError, OutlierAnalysis, mad,
    mean, median, reject_outliers, std_dev,
};

// Re-export reporting
pub use steadybench_report::{OutputFormat, Report, build_report, generate_json_report};

// Re-export CLI entry point
pub use steadybench_cli::run;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchConfig, BenchError, Benchmark, CommandInstance, FnInstance, Instance, Measurement,
        VariabilityMeasure,
    };
}
