//! Convergence Controller
//!
//! Turns repeated noisy samples of one instance into a single
//! `(value, uncertainty, n_good)` estimate, drawing samples until the
//! configured precision is reached or the iteration cap forces a stop.
//!
//! ## Algorithm
//!
//! ```text
//! warm-up (1 real / 3 dry, discarded)
//!        │
//!        ▼
//! initial_runs samples, unconditionally
//!        │
//!        ▼
//! ┌───────────────────────────────┐
//! │ median + spread over all      │◄──────────┐
//! │ keep |x - median| < k * spread│           │
//! │ mean, spread/√n over kept     │           │
//! └──────────────┬────────────────┘           │
//!                │ precision met? ── no ──► one more sample
//!                ▼ yes (or cap reached)
//!          Measurement
//! ```
//!
//! The median/spread pair only decides which samples are outliers. Once the
//! slow tail is gone, the mean of what remains is the estimate.

use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::instance::{Instance, PassKind, PassOutcome};
use steadybench_stats::{Measurement, SpreadFn, mean, reject_outliers};
use tracing::{debug, info, warn};

/// Warm-up runs discarded before a real pass
pub const REAL_WARMUP_RUNS: usize = 1;

/// Warm-up runs discarded before a dry pass
pub const DRY_WARMUP_RUNS: usize = 3;

/// Effective settings for one pass
#[derive(Debug, Clone, Copy)]
pub struct PassSettings {
    /// Which pass these settings drive
    pub kind: PassKind,
    /// Discarded warm-up samples
    pub warmup_runs: usize,
    /// Unconditional samples, and the floor for `n_good`
    pub initial_runs: usize,
    /// Relative precision target (0 disables)
    pub target_rel_precision: f64,
    /// Absolute precision target (0 disables)
    pub target_abs_precision: f64,
    /// Hard cap on recorded samples
    pub max_iterations: usize,
    /// Outlier window multiplier, `None` to keep every sample
    pub outlier_rejection: Option<f64>,
    /// Spread statistic
    pub spread: SpreadFn,
}

impl PassSettings {
    /// Derive settings for `kind` from a session config.
    ///
    /// Dry passes measure a cheap, steady operation, so they take five times
    /// the initial runs, ten times the cap, a relative target twice as tight,
    /// and no absolute target.
    pub fn new(config: &BenchConfig, spread: SpreadFn, kind: PassKind) -> Self {
        let real = Self {
            kind,
            warmup_runs: REAL_WARMUP_RUNS,
            initial_runs: config.initial_runs,
            target_rel_precision: config.target_rel_precision,
            target_abs_precision: config.target_abs_precision,
            max_iterations: config.max_iterations,
            outlier_rejection: config.outlier_multiplier(),
            spread,
        };

        match kind {
            PassKind::Real => real,
            PassKind::Dry => Self {
                warmup_runs: DRY_WARMUP_RUNS,
                initial_runs: real.initial_runs.saturating_mul(5),
                target_rel_precision: real.target_rel_precision / 2.0,
                target_abs_precision: 0.0,
                max_iterations: real.max_iterations.saturating_mul(10),
                ..real
            },
        }
    }
}

/// Candidate estimate for the current sample set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Mean of the kept samples
    pub mean: f64,
    /// Spread of the kept samples divided by √n_good
    pub sigma: f64,
    /// Samples kept after outlier rejection
    pub n_good: usize,
    /// Samples considered
    pub total: usize,
    /// Median of all samples, the center of the outlier window
    pub center: f64,
    /// Half-width of the outlier window; infinite when rejection is off
    pub bound: f64,
    /// Share of samples rejected, in percent
    pub rejected_pct: f64,
}

impl Estimate {
    /// `sigma / |mean|`. Zero spread is exactly zero even at a zero mean;
    /// otherwise a zero mean has no relative precision and yields `None`.
    pub fn relative_precision(&self) -> Option<f64> {
        if self.sigma == 0.0 {
            Some(0.0)
        } else if self.mean == 0.0 {
            None
        } else {
            Some(self.sigma / self.mean.abs())
        }
    }
}

/// Samples one instance until its estimate converges
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceController {
    settings: PassSettings,
}

impl ConvergenceController {
    /// Create a controller for one pass
    pub fn new(settings: PassSettings) -> Self {
        Self { settings }
    }

    /// Settings in effect
    pub fn settings(&self) -> &PassSettings {
        &self.settings
    }

    /// Outlier-filtered estimate over `timings`.
    pub fn estimate(&self, timings: &[f64]) -> Estimate {
        let analysis = reject_outliers(
            timings,
            self.settings.outlier_rejection,
            self.settings.spread,
        );
        let n_good = analysis.n_good();
        let sigma = if n_good > 0 {
            (self.settings.spread)(&analysis.kept) / (n_good as f64).sqrt()
        } else {
            0.0
        };

        Estimate {
            mean: mean(&analysis.kept),
            sigma,
            n_good,
            total: timings.len(),
            center: analysis.center,
            bound: analysis.bound,
            rejected_pct: analysis.rejected_percentage(),
        }
    }

    /// Whether `estimate` satisfies every stop condition except the cap.
    pub fn is_converged(&self, estimate: &Estimate) -> bool {
        let s = &self.settings;

        if s.target_rel_precision > 0.0 {
            match estimate.relative_precision() {
                Some(rel) if rel <= s.target_rel_precision => {}
                _ => return false,
            }
        }
        if s.target_abs_precision > 0.0 && estimate.sigma > s.target_abs_precision {
            return false;
        }
        estimate.n_good >= s.initial_runs
    }

    /// Run one full pass against `instance`.
    pub fn run(&self, instance: &mut dyn Instance) -> Result<PassOutcome, BenchError> {
        let s = &self.settings;
        let name = instance.name().to_string();

        debug!(instance = %name, pass = %s.kind, runs = s.warmup_runs, "warming up");
        for _ in 0..s.warmup_runs {
            self.sample(instance, &name)?;
        }

        let initial = s.initial_runs.min(s.max_iterations);
        info!(instance = %name, pass = %s.kind, initial, "taking initial timings");
        let mut timings = Vec::with_capacity(initial);
        for _ in 0..initial {
            timings.push(self.sample(instance, &name)?);
        }

        let (estimate, converged) = loop {
            let estimate = self.estimate(&timings);
            debug!(
                instance = %name,
                pass = %s.kind,
                mean = estimate.mean,
                sigma = estimate.sigma,
                n_good = estimate.n_good,
                total = estimate.total,
                center = estimate.center,
                bound = estimate.bound,
                rejected_pct = estimate.rejected_pct,
                rel = ?estimate.relative_precision(),
                "iteration"
            );

            if self.is_converged(&estimate) {
                break (estimate, true);
            }
            if timings.len() >= s.max_iterations {
                break (estimate, false);
            }
            timings.push(self.sample(instance, &name)?);
        };

        if !converged && s.kind == PassKind::Real {
            warn!(
                instance = %name,
                iterations = timings.len(),
                "reached maximum number of iterations, precision not reached"
            );
        }

        let result = Measurement::new(estimate.mean, estimate.sigma, estimate.n_good)?;
        info!(
            instance = %name,
            pass = %s.kind,
            %result,
            samples = timings.len(),
            "pass finished"
        );

        Ok(PassOutcome {
            result,
            timings,
            converged,
        })
    }

    fn sample(&self, instance: &mut dyn Instance, name: &str) -> Result<f64, BenchError> {
        let sample = match self.settings.kind {
            PassKind::Real => instance.single_run(),
            PassKind::Dry => instance.single_dry_run(),
        };
        sample.map_err(|source| BenchError::Sample {
            instance: name.to_string(),
            source,
        })
    }
}
