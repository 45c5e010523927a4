//! Deterministic instances for unit tests

use crate::error::SampleError;
use crate::instance::Instance;
use std::cell::Cell;
use std::rc::Rc;

/// Replays fixed sample sequences; past the end, the last value repeats.
#[derive(Clone)]
pub(crate) struct ScriptedInstance {
    name: String,
    real: Vec<f64>,
    dry: Vec<f64>,
    real_pos: usize,
    dry_pos: usize,
    fail_on_call: Option<usize>,
    pub(crate) real_calls: Rc<Cell<usize>>,
    pub(crate) dry_calls: Rc<Cell<usize>>,
}

impl ScriptedInstance {
    pub(crate) fn new(real: Vec<f64>, dry: Vec<f64>) -> Self {
        Self {
            name: "scripted".to_string(),
            real,
            dry,
            real_pos: 0,
            dry_pos: 0,
            fail_on_call: None,
            real_calls: Rc::new(Cell::new(0)),
            dry_calls: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn constant(value: f64) -> Self {
        Self::new(vec![value], vec![0.0])
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Make the n-th real call (1-based) fail.
    pub(crate) fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }
}

fn replay(seq: &[f64], pos: &mut usize) -> f64 {
    let value = seq[(*pos).min(seq.len() - 1)];
    *pos += 1;
    value
}

impl Instance for ScriptedInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn single_run(&mut self) -> Result<f64, SampleError> {
        self.real_calls.set(self.real_calls.get() + 1);
        if self.fail_on_call == Some(self.real_calls.get()) {
            return Err("scripted failure".into());
        }
        Ok(replay(&self.real, &mut self.real_pos))
    }

    fn single_dry_run(&mut self) -> Result<f64, SampleError> {
        self.dry_calls.set(self.dry_calls.get() + 1);
        Ok(replay(&self.dry, &mut self.dry_pos))
    }

    fn validate(&self) -> Result<(), String> {
        if self.real.is_empty() || self.dry.is_empty() {
            return Err("empty script".to_string());
        }
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Instance> {
        Box::new(Self {
            real_pos: 0,
            dry_pos: 0,
            ..self.clone()
        })
    }
}
