//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::Serialize;
use steadybench_core::{BenchConfig, Benchmark, MeasuredInstance, PassOutcome};
use steadybench_stats::Measurement;

/// Complete benchmark report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Tool version, run time and settings
    pub meta: ReportMeta,
    /// One entry per instance, in session order
    pub results: Vec<InstanceReport>,
    /// Totals over all instances
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    /// Steadybench version that produced the report
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Settings the session ran with
    pub config: BenchConfig,
}

/// Result of one measured instance
#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    /// Instance name
    pub name: String,
    /// Real result with the dry baseline subtracted
    pub result: Option<Measurement>,
    /// `result` rounded to its own precision
    pub formatted: Option<String>,
    /// Real pass, before baseline subtraction
    pub real: Option<PassReport>,
    /// Dry pass, absent when dry runs are disabled
    pub dry: Option<PassReport>,
}

impl InstanceReport {
    /// Whether the real pass reached its precision targets
    pub fn converged(&self) -> bool {
        self.real.as_ref().is_some_and(|p| p.converged)
    }
}

/// Details of one pass
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    /// Estimate produced by the pass
    pub result: Measurement,
    /// Recorded samples, warm-up excluded
    pub iterations: usize,
    /// Samples kept after outlier rejection
    pub n_good: usize,
    /// Samples rejected as outliers
    pub rejected: usize,
    /// Whether the precision targets were met before the cap
    pub converged: bool,
    /// Every recorded sample in seconds, in acquisition order
    pub timings: Vec<f64>,
}

impl From<&PassOutcome> for PassReport {
    fn from(pass: &PassOutcome) -> Self {
        Self {
            result: pass.result,
            iterations: pass.timings.len(),
            n_good: pass.n_good(),
            rejected: pass.rejected(),
            converged: pass.converged,
            timings: pass.timings.clone(),
        }
    }
}

impl From<&MeasuredInstance> for InstanceReport {
    fn from(measured: &MeasuredInstance) -> Self {
        let result = measured.result();
        Self {
            name: measured.name().to_string(),
            result,
            formatted: result.map(|r| r.to_string()),
            real: measured.real().map(PassReport::from),
            dry: measured.dry().map(PassReport::from),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    /// Number of instances measured
    pub instances: usize,
    /// Instances whose real pass converged
    pub converged: usize,
    /// Instances stopped by the iteration cap, or not measured
    pub not_converged: usize,
    /// Recorded samples over every pass
    pub total_iterations: usize,
    /// Wall time of the whole session
    pub total_duration_ms: f64,
}

/// Build a report from a finished session
pub fn build_report(bench: &Benchmark, total_duration_ms: f64) -> Report {
    let results: Vec<InstanceReport> = bench.instances().iter().map(InstanceReport::from).collect();

    let converged = results.iter().filter(|r| r.converged()).count();
    let total_iterations = results
        .iter()
        .flat_map(|r| r.real.iter().chain(r.dry.iter()))
        .map(|p| p.iterations)
        .sum();

    Report {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            config: bench.config().clone(),
        },
        summary: ReportSummary {
            instances: results.len(),
            converged,
            not_converged: results.len() - converged,
            total_iterations,
            total_duration_ms,
        },
        results,
    }
}
