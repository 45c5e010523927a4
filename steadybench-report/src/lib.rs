#![warn(missing_docs)]
//! Steadybench Report - Output Formats
//!
//! Generates:
//! - Human-readable terminal output
//! - Raw tab-separated `name value uncertainty` lines
//! - JSON (machine-readable, with full timing sequences)

mod human;
mod json;
mod report;

pub use human::{format_human_output, format_raw_output};
pub use json::generate_json_report;
pub use report::{InstanceReport, PassReport, Report, ReportMeta, ReportSummary, build_report};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// Unrounded value and uncertainty per instance
    Raw,
    /// JSON with full timing sequences
    Json,
}

impl OutputFormat {
    /// Render `report` in this format
    pub fn render(self, report: &Report) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Human => Ok(format_human_output(report)),
            OutputFormat::Raw => Ok(format_raw_output(report)),
            OutputFormat::Json => generate_json_report(report),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "raw" => Ok(OutputFormat::Raw),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steadybench_core::{BenchConfig, Benchmark, FnInstance};

    fn finished_bench() -> Benchmark {
        let config = BenchConfig {
            initial_runs: 6,
            target_rel_precision: 0.5,
            max_iterations: 200,
            ..BenchConfig::default()
        };
        let mut bench = Benchmark::new(config).unwrap();
        bench
            .add(FnInstance::new("spin", || (0..2_000u64).map(std::hint::black_box).sum::<u64>()))
            .unwrap();
        bench.run().unwrap();
        bench
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert_eq!("raw".parse::<OutputFormat>(), Ok(OutputFormat::Raw));
        assert!("html".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_build_report() {
        let bench = finished_bench();
        let report = build_report(&bench, 12.0);

        assert_eq!(report.summary.instances, 1);
        let result = &report.results[0];
        assert_eq!(result.name, "spin");
        assert!(result.result.is_some());
        assert!(result.dry.is_some());

        let real = result.real.as_ref().unwrap();
        assert_eq!(real.iterations, real.timings.len());
        assert_eq!(real.n_good + real.rejected, real.iterations);
    }

    #[test]
    fn test_human_output() {
        let report = build_report(&finished_bench(), 1.0);
        let output = format_human_output(&report);

        assert!(output.contains("Steadybench Results"));
        assert!(output.contains("spin"));
        assert!(output.contains("spin: "));
        assert!(output.contains("good of"));
        assert!(output.contains("baseline: "));
    }

    #[test]
    fn test_raw_output() {
        let report = build_report(&finished_bench(), 1.0);
        let output = format_raw_output(&report);

        let fields: Vec<&str> = output.trim_end().split('\t').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "spin");
        assert!(fields[1].parse::<f64>().is_ok());
        assert!(fields[2].parse::<f64>().unwrap() >= 0.0);
    }

    #[test]
    fn test_json_output() {
        let report = build_report(&finished_bench(), 1.0);
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["results"][0]["name"], "spin");
        assert!(value["results"][0]["real"]["timings"].is_array());
        assert_eq!(value["meta"]["config"]["initial_runs"], 6);
    }
}
