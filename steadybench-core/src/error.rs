//! Error types for the measurement engine

use steadybench_stats::MeasurementError;
use thiserror::Error;

/// Error returned by an [`Instance`](crate::Instance) when a sample cannot be taken.
///
/// The engine never retries; the error reaches the caller inside
/// [`BenchError::Sample`] with its source intact.
pub type SampleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by benchmark sessions and the convergence controller
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid or missing precision targets and other bad settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// The session was already run, or a pass was already finalized
    #[error("Already started: {0}")]
    AlreadyStarted(String),

    /// The instance cannot be measured
    #[error("Invalid instance '{name}': {reason}")]
    InvalidInstance {
        /// Instance name
        name: String,
        /// Why the instance was refused
        reason: String,
    },

    /// A measurement with negative uncertainty was constructed
    #[error(transparent)]
    InvalidResult(#[from] MeasurementError),

    /// The measured operation itself failed
    #[error("Sample failed for '{instance}': {source}")]
    Sample {
        /// Instance name
        instance: String,
        /// Error reported by the instance
        #[source]
        source: SampleError,
    },
}
