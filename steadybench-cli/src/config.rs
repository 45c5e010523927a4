//! Configuration loading from steadybench.toml
//!
//! Settings can be kept in a `steadybench.toml` file in the project root.
//! The file is discovered by walking up from the current directory, and
//! command-line flags override whatever it sets.

use serde::{Deserialize, Serialize};
use std::path::Path;
use steadybench_core::BenchConfig;

/// File name searched for by [`SteadyConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "steadybench.toml";

/// Steadybench file configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SteadyConfig {
    /// Measurement settings
    #[serde(default)]
    pub runner: BenchConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "raw" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Print unrounded `value uncertainty` pairs instead of the human layout
    #[serde(default)]
    pub raw: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            raw: false,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl SteadyConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> anyhow::Result<Option<Self>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Self::load(&config_path).map(Some);
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Steadybench Configuration

[runner]
# Target relative precision of the result (0.05 = 5%)
target_rel_precision = 0.05
# Target absolute precision in seconds (0 disables it)
target_abs_precision = 0.0
# Samples taken before convergence is first checked
initial_runs = 20
# Hard cap on samples per pass
max_iterations = 10000
# Spread estimator: "mad" or "std-dev"
variability_measure = "mad"
# Outlier cut in units of the spread (0 or false disables rejection)
outlier_rejection = 2.5
# Measure and subtract the launch overhead baseline
dry_run = true
# Diagnostic verbosity (0-3)
verbosity = 0

[output]
# Default output format: human, raw, json
format = "human"
# Unrounded value and uncertainty only
raw = false
"#
        .to_string()
    }
}
