//! Wall-Clock Timing
//!
//! Monotonic timing for a single sample. Samples are reported in seconds.

use std::time::{Duration, Instant};

/// Timer for one measured operation
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since `start`
    #[inline(always)]
    pub fn stop(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time since `start`, in seconds
    #[inline(always)]
    pub fn stop_secs(&self) -> f64 {
        self.stop().as_secs_f64()
    }
}

/// Time one call of `f`, returning its output and the elapsed seconds.
#[inline]
pub fn time_secs<T, F>(f: F) -> (T, f64)
where
    F: FnOnce() -> T,
{
    let timer = Timer::start();
    let output = std::hint::black_box(f());
    (output, timer.stop_secs())
}
