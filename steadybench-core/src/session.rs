//! Benchmark Session
//!
//! Holds the instances to measure and runs each one through a dry pass
//! (launch overhead) and a real pass, then stores the real result with the
//! baseline subtracted.
//!
//! A session runs once. Instances that arrive with finalized passes (adopted
//! from an earlier session) keep them: those passes are skipped, never redone.

use crate::config::BenchConfig;
use crate::converge::{ConvergenceController, PassSettings};
use crate::error::BenchError;
use crate::instance::{Instance, MeasuredInstance, PassKind};
use steadybench_stats::SpreadFn;
use tracing::info;

/// A set of instances measured under one configuration
#[derive(Debug)]
pub struct Benchmark {
    config: BenchConfig,
    spread: SpreadFn,
    instances: Vec<MeasuredInstance>,
    started: bool,
}

impl Benchmark {
    /// Validate `config` and create an empty session.
    pub fn new(config: BenchConfig) -> Result<Self, BenchError> {
        config.validate()?;
        let spread = config.variability_measure.spread_fn();
        Ok(Self {
            config,
            spread,
            instances: Vec::new(),
            started: false,
        })
    }

    /// Configuration in effect
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Whether `run` has been called
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Instances in insertion order
    pub fn instances(&self) -> &[MeasuredInstance] {
        &self.instances
    }

    /// Take the instances, with whatever passes they carry
    pub fn into_instances(self) -> Vec<MeasuredInstance> {
        self.instances
    }

    /// Add an unrun instance.
    pub fn add<I: Instance + 'static>(&mut self, instance: I) -> Result<(), BenchError> {
        self.adopt(MeasuredInstance::new(Box::new(instance)))
    }

    /// Add an instance that may already carry finalized passes.
    pub fn adopt(&mut self, measured: MeasuredInstance) -> Result<(), BenchError> {
        if self.started {
            return Err(BenchError::AlreadyStarted(
                "cannot add instances to a running benchmark".to_string(),
            ));
        }
        measured
            .instance()
            .validate()
            .map_err(|reason| BenchError::InvalidInstance {
                name: measured.name().to_string(),
                reason,
            })?;

        self.instances.push(measured);
        Ok(())
    }

    /// Measure every instance.
    pub fn run(&mut self) -> Result<(), BenchError> {
        self.run_with(|_| {})
    }

    /// Measure every instance, calling `on_measured` after each one finishes.
    pub fn run_with<F>(&mut self, mut on_measured: F) -> Result<(), BenchError>
    where
        F: FnMut(&MeasuredInstance),
    {
        if self.started {
            return Err(BenchError::AlreadyStarted(
                "benchmark has already been run".to_string(),
            ));
        }
        self.started = true;

        let dry = ConvergenceController::new(PassSettings::new(
            &self.config,
            self.spread,
            PassKind::Dry,
        ));
        let real = ConvergenceController::new(PassSettings::new(
            &self.config,
            self.spread,
            PassKind::Real,
        ));

        info!(
            instances = self.instances.len(),
            dry_run = self.config.dry_run,
            "running benchmark"
        );

        for measured in &mut self.instances {
            if self.config.dry_run && measured.dry().is_none() {
                let outcome = dry.run(measured.instance_mut())?;
                measured.record(PassKind::Dry, outcome)?;
            }
            if measured.real().is_none() {
                let outcome = real.run(measured.instance_mut())?;
                measured.record(PassKind::Real, outcome)?;
            }
            measured.finalize();
            on_measured(measured);
        }

        Ok(())
    }
}

impl Clone for Benchmark {
    /// A not-yet-started copy with fresh instances.
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            spread: self.spread,
            instances: self.instances.iter().map(MeasuredInstance::fresh).collect(),
            started: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedInstance;

    fn config() -> BenchConfig {
        BenchConfig {
            initial_runs: 6,
            target_rel_precision: 0.05,
            ..BenchConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BenchConfig {
            target_rel_precision: 0.0,
            target_abs_precision: 0.0,
            ..BenchConfig::default()
        };
        assert!(matches!(Benchmark::new(config), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_run_subtracts_dry_baseline() {
        let mut bench = Benchmark::new(config()).unwrap();
        bench.add(ScriptedInstance::new(vec![1.0], vec![0.25])).unwrap();
        bench.run().unwrap();

        let measured = &bench.instances()[0];
        assert_eq!(measured.dry().unwrap().result.value(), 0.25);
        assert_eq!(measured.real().unwrap().result.value(), 1.0);
        assert_eq!(measured.result().unwrap().value(), 0.75);
        assert_eq!(measured.result().unwrap().sample_count(), 6);
        assert_eq!(measured.converged(), Some(true));
    }

    #[test]
    fn test_dry_run_disabled() {
        let config = BenchConfig {
            dry_run: false,
            ..config()
        };
        let instance = ScriptedInstance::new(vec![1.0], vec![0.25]);
        let dry_calls = instance.dry_calls.clone();

        let mut bench = Benchmark::new(config).unwrap();
        bench.add(instance).unwrap();
        bench.run().unwrap();

        let measured = &bench.instances()[0];
        assert!(measured.dry().is_none());
        assert_eq!(dry_calls.get(), 0);
        assert_eq!(measured.result().unwrap().value(), 1.0);
    }

    #[test]
    fn test_run_twice_fails() {
        let mut bench = Benchmark::new(config()).unwrap();
        bench.add(ScriptedInstance::constant(1.0)).unwrap();
        bench.run().unwrap();

        assert!(bench.is_started());
        assert!(matches!(bench.run(), Err(BenchError::AlreadyStarted(_))));
    }

    #[test]
    fn test_add_after_start_fails() {
        let mut bench = Benchmark::new(config()).unwrap();
        bench.run().unwrap();

        assert!(matches!(
            bench.add(ScriptedInstance::constant(1.0)),
            Err(BenchError::AlreadyStarted(_))
        ));
    }

    #[test]
    fn test_invalid_instance_rejected() {
        let mut bench = Benchmark::new(config()).unwrap();
        let err = bench
            .add(ScriptedInstance::new(vec![], vec![0.0]).named("broken"))
            .unwrap_err();

        match err {
            BenchError::InvalidInstance { name, reason } => {
                assert_eq!(name, "broken");
                assert_eq!(reason, "empty script");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(bench.instances().is_empty());
    }

    #[test]
    fn test_adopted_passes_are_not_repeated() {
        let instance = ScriptedInstance::new(vec![1.0], vec![0.25]);
        let real_calls = instance.real_calls.clone();
        let dry_calls = instance.dry_calls.clone();

        let mut first = Benchmark::new(config()).unwrap();
        first.add(instance).unwrap();
        first.run().unwrap();
        let calls_after_first = (real_calls.get(), dry_calls.get());
        let previous = first.instances()[0].result();

        let tighter = BenchConfig {
            target_rel_precision: 0.001,
            ..config()
        };
        let mut second = Benchmark::new(tighter).unwrap();
        for measured in first.into_instances() {
            second.adopt(measured).unwrap();
        }
        second.run().unwrap();

        assert_eq!((real_calls.get(), dry_calls.get()), calls_after_first);
        assert_eq!(second.instances()[0].result(), previous);
    }

    #[test]
    fn test_clone_resets_run_state() {
        let mut bench = Benchmark::new(config()).unwrap();
        bench.add(ScriptedInstance::constant(1.0).named("a")).unwrap();
        bench.add(ScriptedInstance::constant(2.0).named("b")).unwrap();
        bench.run().unwrap();

        let mut copy = bench.clone();
        assert!(!copy.is_started());
        assert_eq!(copy.instances().len(), 2);
        assert!(copy.instances().iter().all(|m| m.real().is_none()));

        copy.run().unwrap();
        assert_eq!(copy.instances()[1].result().unwrap().value(), 2.0);
    }

    #[test]
    fn test_observer_sees_each_instance() {
        let mut bench = Benchmark::new(config()).unwrap();
        bench.add(ScriptedInstance::constant(1.0).named("a")).unwrap();
        bench.add(ScriptedInstance::constant(2.0).named("b")).unwrap();

        let mut seen = Vec::new();
        bench
            .run_with(|m| seen.push((m.name().to_string(), m.result().is_some())))
            .unwrap();

        assert_eq!(seen, vec![("a".to_string(), true), ("b".to_string(), true)]);
    }

    #[test]
    fn test_sample_failure_stops_run() {
        let mut bench = Benchmark::new(config()).unwrap();
        bench.add(ScriptedInstance::constant(1.0).failing_on(2)).unwrap();

        assert!(matches!(bench.run(), Err(BenchError::Sample { .. })));
    }
}
