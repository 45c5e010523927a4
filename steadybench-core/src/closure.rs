//! In-Process Closure Instance

use crate::error::SampleError;
use crate::instance::Instance;
use crate::measure::time_secs;

/// Benchmarks a closure. The dry run times an empty call through the same path.
#[derive(Clone)]
pub struct FnInstance<F> {
    name: String,
    routine: F,
}

impl<F, T> FnInstance<F>
where
    F: FnMut() -> T + Clone + 'static,
{
    /// Wrap `routine` under `name`
    pub fn new(name: impl Into<String>, routine: F) -> Self {
        Self {
            name: name.into(),
            routine,
        }
    }
}

impl<F, T> Instance for FnInstance<F>
where
    F: FnMut() -> T + Clone + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn single_run(&mut self) -> Result<f64, SampleError> {
        let (_, secs) = time_secs(&mut self.routine);
        Ok(secs)
    }

    fn single_dry_run(&mut self) -> Result<f64, SampleError> {
        let (_, secs) = time_secs(|| ());
        Ok(secs)
    }

    fn fresh(&self) -> Box<dyn Instance> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_runs_routine() {
        let counter = std::rc::Rc::new(std::cell::Cell::new(0));
        let seen = counter.clone();
        let mut instance = FnInstance::new("count", move || seen.set(seen.get() + 1));

        instance.single_run().unwrap();
        instance.single_run().unwrap();
        instance.single_dry_run().unwrap();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_dry_run_is_cheaper() {
        let mut instance =
            FnInstance::new("sleep", || std::thread::sleep(Duration::from_millis(2)));
        let real = instance.single_run().unwrap();
        let dry = instance.single_dry_run().unwrap();
        assert!(real > dry);
    }
}
