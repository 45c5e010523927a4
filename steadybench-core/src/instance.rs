//! Measured Instances
//!
//! An [`Instance`] is the thing being timed. It knows how to take one real
//! sample and one dry (overhead-only) sample. [`MeasuredInstance`] pairs an
//! instance with the outcome of each pass; outcomes are written once and then
//! frozen.

use crate::error::{BenchError, SampleError};
use serde::Serialize;
use std::fmt;
use steadybench_stats::Measurement;

/// Something that can be timed repeatedly
pub trait Instance {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Run the measured operation once and return its duration in seconds.
    fn single_run(&mut self) -> Result<f64, SampleError>;

    /// Run the same scaffolding without the measured work and return its
    /// duration in seconds.
    fn single_dry_run(&mut self) -> Result<f64, SampleError>;

    /// Reject instances that cannot be measured.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// A new, not-yet-run handle equivalent to this one.
    fn fresh(&self) -> Box<dyn Instance>;
}

/// Which measurement a pass produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassKind {
    /// Overhead-only baseline
    Dry,
    /// The operation under test
    Real,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Dry => f.write_str("dry"),
            PassKind::Real => f.write_str("real"),
        }
    }
}

/// Finalized outcome of one measurement pass
#[derive(Debug, Clone, Serialize)]
pub struct PassOutcome {
    /// Estimate from the final iteration
    pub result: Measurement,
    /// Every recorded sample, in acquisition order (warm-up runs excluded)
    pub timings: Vec<f64>,
    /// Whether the precision targets were met before the iteration cap
    pub converged: bool,
}

impl PassOutcome {
    /// Samples that survived outlier rejection
    pub fn n_good(&self) -> usize {
        self.result.sample_count()
    }

    /// Samples rejected as outliers in the final iteration
    pub fn rejected(&self) -> usize {
        self.timings.len().saturating_sub(self.n_good())
    }
}

/// An instance together with its frozen pass outcomes
pub struct MeasuredInstance {
    instance: Box<dyn Instance>,
    dry: Option<PassOutcome>,
    real: Option<PassOutcome>,
    result: Option<Measurement>,
}

impl MeasuredInstance {
    /// Wrap an unrun instance
    pub fn new(instance: Box<dyn Instance>) -> Self {
        Self {
            instance,
            dry: None,
            real: None,
            result: None,
        }
    }

    /// Instance name
    pub fn name(&self) -> &str {
        self.instance.name()
    }

    /// The wrapped instance
    pub fn instance(&self) -> &dyn Instance {
        self.instance.as_ref()
    }

    pub(crate) fn instance_mut(&mut self) -> &mut dyn Instance {
        self.instance.as_mut()
    }

    /// Dry pass outcome, if measured
    pub fn dry(&self) -> Option<&PassOutcome> {
        self.dry.as_ref()
    }

    /// Real pass outcome, if measured
    pub fn real(&self) -> Option<&PassOutcome> {
        self.real.as_ref()
    }

    /// Outcome of the given pass, if measured
    pub fn pass(&self, kind: PassKind) -> Option<&PassOutcome> {
        match kind {
            PassKind::Dry => self.dry(),
            PassKind::Real => self.real(),
        }
    }

    /// Real result with the dry baseline removed
    pub fn result(&self) -> Option<Measurement> {
        self.result
    }

    /// Whether the real pass reached its precision targets
    pub fn converged(&self) -> Option<bool> {
        self.real.as_ref().map(|p| p.converged)
    }

    /// Store a pass outcome. A pass can only be recorded once.
    pub fn record(&mut self, kind: PassKind, outcome: PassOutcome) -> Result<(), BenchError> {
        let slot = match kind {
            PassKind::Dry => &mut self.dry,
            PassKind::Real => &mut self.real,
        };
        if slot.is_some() {
            return Err(BenchError::AlreadyStarted(format!(
                "{} pass of '{}' is already finalized",
                kind,
                self.instance.name()
            )));
        }
        *slot = Some(outcome);
        Ok(())
    }

    /// Compute the corrected result once the real pass exists.
    pub(crate) fn finalize(&mut self) {
        if self.result.is_some() {
            return;
        }
        if let Some(real) = &self.real {
            let baseline = self.dry.as_ref().map(|d| &d.result);
            self.result = Some(real.result.subtract_baseline(baseline));
        }
    }

    /// A fresh, unrun copy
    pub fn fresh(&self) -> MeasuredInstance {
        MeasuredInstance::new(self.instance.fresh())
    }
}

impl fmt::Debug for MeasuredInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasuredInstance")
            .field("name", &self.name())
            .field("dry", &self.dry)
            .field("real", &self.real)
            .field("result", &self.result)
            .finish()
    }
}

impl<I: Instance + 'static> From<I> for MeasuredInstance {
    fn from(instance: I) -> Self {
        MeasuredInstance::new(Box::new(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedInstance;

    fn outcome(value: f64, uncertainty: f64) -> PassOutcome {
        PassOutcome {
            result: Measurement::new(value, uncertainty, 3).unwrap(),
            timings: vec![value; 4],
            converged: true,
        }
    }

    #[test]
    fn test_record_only_once() {
        let mut measured: MeasuredInstance = ScriptedInstance::constant(1.0).into();
        assert!(measured.record(PassKind::Dry, outcome(0.1, 0.0)).is_ok());
        assert!(matches!(
            measured.record(PassKind::Dry, outcome(0.2, 0.0)),
            Err(BenchError::AlreadyStarted(_))
        ));
        assert_eq!(measured.dry().unwrap().result.value(), 0.1);
    }

    #[test]
    fn test_finalize_subtracts_dry() {
        let mut measured: MeasuredInstance = ScriptedInstance::constant(1.0).into();
        measured.record(PassKind::Dry, outcome(0.01, 0.001)).unwrap();
        measured.record(PassKind::Real, outcome(1.0, 0.01)).unwrap();
        measured.finalize();

        let result = measured.result().unwrap();
        assert!((result.value() - 0.99).abs() < 1e-12);
        assert!((result.uncertainty() - 0.010_049_875).abs() < 1e-8);
    }

    #[test]
    fn test_finalize_without_dry_is_identity() {
        let mut measured: MeasuredInstance = ScriptedInstance::constant(1.0).into();
        measured.record(PassKind::Real, outcome(1.0, 0.01)).unwrap();
        measured.finalize();
        assert_eq!(measured.result(), Some(measured.real().unwrap().result));
    }

    #[test]
    fn test_pass_outcome_counts() {
        let pass = outcome(1.0, 0.0);
        assert_eq!(pass.n_good(), 3);
        assert_eq!(pass.rejected(), 1);
    }

    #[test]
    fn test_fresh_copy_is_unrun() {
        let mut measured: MeasuredInstance = ScriptedInstance::constant(1.0).into();
        measured.record(PassKind::Real, outcome(1.0, 0.01)).unwrap();
        let copy = measured.fresh();
        assert!(copy.real().is_none());
        assert!(copy.result().is_none());
        assert_eq!(copy.name(), measured.name());
    }
}
