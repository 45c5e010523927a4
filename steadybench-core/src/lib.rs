#![warn(missing_docs)]
//! Steadybench Core - Adaptive Measurement Engine
//!
//! This crate turns repeated, noisy timings of an operation into a single
//! robust estimate with an honest uncertainty:
//! - `Instance` trait for anything that can be timed, with a dry (overhead
//!   only) counterpart
//! - `CommandInstance` for external programs and `FnInstance` for closures
//! - `ConvergenceController`, which samples until the precision targets hold
//!   or the iteration cap is reached
//! - `Benchmark`, a session running a dry pass then a real pass per instance
//!   and subtracting the baseline

mod closure;
mod command;
mod config;
mod converge;
mod error;
mod instance;
mod measure;
mod session;

#[cfg(test)]
mod test_support;

pub use closure::FnInstance;
pub use command::{CommandError, CommandInstance, DEFAULT_DRY_PROGRAM};
pub use config::{BenchConfig, RECOMMENDED_MIN_INITIAL_RUNS, VariabilityMeasure};
pub use converge::{
    ConvergenceController, DRY_WARMUP_RUNS, Estimate, PassSettings, REAL_WARMUP_RUNS,
};
pub use error::{BenchError, SampleError};
pub use instance::{Instance, MeasuredInstance, PassKind, PassOutcome};
pub use measure::{Timer, time_secs};
pub use session::Benchmark;
pub use steadybench_stats::Measurement;
