//! Measurement Configuration
//!
//! `BenchConfig` is fixed when a session is built and validated exactly once.
//! It deserializes from the `[runner]` table of `steadybench.toml`; every field
//! has a default so partial tables are fine.

use crate::error::BenchError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use steadybench_stats::{DEFAULT_OUTLIER_REJECTION, SpreadFn, mad, std_dev};
use tracing::warn;

/// Below this many initial runs the spread estimate is unreliable.
pub const RECOMMENDED_MIN_INITIAL_RUNS: usize = 6;

/// Spread statistic used both as the outlier reference and for the
/// reported uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariabilityMeasure {
    /// Scaled median absolute deviation
    #[default]
    Mad,
    /// Sample standard deviation
    StdDev,
}

impl VariabilityMeasure {
    /// Resolve to the statistic itself.
    pub fn spread_fn(self) -> SpreadFn {
        match self {
            VariabilityMeasure::Mad => mad,
            VariabilityMeasure::StdDev => std_dev,
        }
    }
}

impl fmt::Display for VariabilityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariabilityMeasure::Mad => f.write_str("mad"),
            VariabilityMeasure::StdDev => f.write_str("std-dev"),
        }
    }
}

impl FromStr for VariabilityMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mad" => Ok(VariabilityMeasure::Mad),
            "std-dev" | "stddev" | "std_dev" => Ok(VariabilityMeasure::StdDev),
            other => Err(format!("Unknown variability measure: {}", other)),
        }
    }
}

/// Settings for one benchmark session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Stop once `sigma / mean` is at most this (0 disables)
    #[serde(default = "default_rel_precision")]
    pub target_rel_precision: f64,
    /// Stop once `sigma` is at most this, in seconds (0 disables)
    #[serde(default)]
    pub target_abs_precision: f64,
    /// Samples taken unconditionally before any stop check
    #[serde(default = "default_initial_runs")]
    pub initial_runs: usize,
    /// Hard cap on samples per pass
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Spread statistic
    #[serde(default)]
    pub variability_measure: VariabilityMeasure,
    /// Outlier window in units of the reference spread; 0 or `false` disables
    #[serde(
        default = "default_outlier_rejection",
        deserialize_with = "deserialize_outlier_rejection"
    )]
    pub outlier_rejection: f64,
    /// Measure and subtract the launch overhead
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    /// Diagnostic narration level
    #[serde(default)]
    pub verbosity: u8,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            target_rel_precision: default_rel_precision(),
            target_abs_precision: 0.0,
            initial_runs: default_initial_runs(),
            max_iterations: default_max_iterations(),
            variability_measure: VariabilityMeasure::default(),
            outlier_rejection: default_outlier_rejection(),
            dry_run: default_dry_run(),
            verbosity: 0,
        }
    }
}

fn default_rel_precision() -> f64 {
    0.05
}
fn default_initial_runs() -> usize {
    20
}
fn default_max_iterations() -> usize {
    10_000
}
fn default_outlier_rejection() -> f64 {
    DEFAULT_OUTLIER_REJECTION
}
fn default_dry_run() -> bool {
    true
}

fn deserialize_outlier_rejection<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Multiplier(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(true) => DEFAULT_OUTLIER_REJECTION,
        Raw::Flag(false) => 0.0,
        Raw::Multiplier(k) => k,
    })
}

impl BenchConfig {
    /// Check the settings, warning about weak but legal choices.
    pub fn validate(&self) -> Result<(), BenchError> {
        let precisions = [
            ("target_rel_precision", self.target_rel_precision),
            ("target_abs_precision", self.target_abs_precision),
            ("outlier_rejection", self.outlier_rejection),
        ];
        for (name, value) in precisions {
            if !value.is_finite() || value < 0.0 {
                return Err(BenchError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.target_rel_precision <= 0.0 && self.target_abs_precision <= 0.0 {
            return Err(BenchError::Config(
                "need a positive target_rel_precision or target_abs_precision".to_string(),
            ));
        }
        if self.initial_runs == 0 {
            return Err(BenchError::Config(
                "initial_runs must be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(BenchError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        for warning in self.warnings() {
            warn!("{}", warning);
        }

        Ok(())
    }

    /// Legal settings that will still give poor results.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.initial_runs < RECOMMENDED_MIN_INITIAL_RUNS {
            warnings.push(format!(
                "initial_runs = {} is below {}, the spread estimate will be unreliable",
                self.initial_runs, RECOMMENDED_MIN_INITIAL_RUNS
            ));
        }
        if self.initial_runs > self.max_iterations {
            warnings.push(format!(
                "initial_runs = {} exceeds max_iterations = {}; passes stop at the cap \
                 with fewer than initial_runs good samples and never converge",
                self.initial_runs, self.max_iterations
            ));
        }

        warnings
    }

    /// Outlier multiplier, or `None` when rejection is disabled.
    pub fn outlier_multiplier(&self) -> Option<f64> {
        (self.outlier_rejection > 0.0).then_some(self.outlier_rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_runs, 20);
        assert_eq!(config.max_iterations, 10_000);
        assert_eq!(config.outlier_multiplier(), Some(2.5));
    }

    #[test]
    fn test_no_precision_target_rejected() {
        let config = BenchConfig {
            target_rel_precision: 0.0,
            target_abs_precision: 0.0,
            ..BenchConfig::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_absolute_target_alone_is_enough() {
        let config = BenchConfig {
            target_rel_precision: 0.0,
            target_abs_precision: 1e-4,
            ..BenchConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_values_rejected() {
        let config = BenchConfig {
            target_rel_precision: -0.1,
            ..BenchConfig::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));

        let config = BenchConfig {
            max_iterations: 0,
            ..BenchConfig::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_few_initial_runs_only_warns() {
        let config = BenchConfig {
            initial_runs: 3,
            ..BenchConfig::default()
        };
        assert!(config.validate().is_ok());

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("initial_runs = 3"));
    }

    #[test]
    fn test_initial_runs_above_cap_warns() {
        let config = BenchConfig {
            initial_runs: 50,
            max_iterations: 20,
            ..BenchConfig::default()
        };
        assert!(config.validate().is_ok());

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exceeds max_iterations = 20"));
        assert!(BenchConfig::default().warnings().is_empty());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: BenchConfig = toml::from_str(
            r#"
            target_rel_precision = 0.01
            variability_measure = "std-dev"
            "#,
        )
        .unwrap();

        assert_eq!(config.target_rel_precision, 0.01);
        assert_eq!(config.variability_measure, VariabilityMeasure::StdDev);
        assert_eq!(config.initial_runs, 20);
        assert!(config.dry_run);
    }

    #[test]
    fn test_outlier_rejection_accepts_bool_and_number() {
        let off: BenchConfig = toml::from_str("outlier_rejection = false").unwrap();
        assert_eq!(off.outlier_multiplier(), None);

        let on: BenchConfig = toml::from_str("outlier_rejection = true").unwrap();
        assert_eq!(on.outlier_multiplier(), Some(2.5));

        let custom: BenchConfig = toml::from_str("outlier_rejection = 3").unwrap();
        assert_eq!(custom.outlier_multiplier(), Some(3.0));

        let zero: BenchConfig = toml::from_str("outlier_rejection = 0.0").unwrap();
        assert_eq!(zero.outlier_multiplier(), None);
    }

    #[test]
    fn test_variability_measure_from_str() {
        assert_eq!("MAD".parse::<VariabilityMeasure>(), Ok(VariabilityMeasure::Mad));
        assert_eq!(
            "stddev".parse::<VariabilityMeasure>(),
            Ok(VariabilityMeasure::StdDev)
        );
        assert!("iqr".parse::<VariabilityMeasure>().is_err());
    }
}
