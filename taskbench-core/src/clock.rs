//! Clocks
//!
//! The harness reads time through a zero-argument closure returning seconds
//! since an arbitrary reference point. Only differences between readings are
//! used, so any monotonic source works, including the fakes below.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Boxed clock as stored by the harness
pub type Clock = Box<dyn FnMut() -> f64>;

/// Wall clock anchored at the moment of the call
pub fn monotonic_clock() -> impl FnMut() -> f64 {
    let origin = Instant::now();
    move || origin.elapsed().as_secs_f64()
}

/// Fake clock that advances by `increment` seconds on every reading.
///
/// The n-th reading returns `n * increment`, so differences do not drift.
pub fn step_clock(increment: f64) -> impl FnMut() -> f64 {
    let mut readings: u64 = 0;
    move || {
        readings += 1;
        readings as f64 * increment
    }
}

/// Fake clock advanced explicitly, typically from inside a task to simulate cost
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `secs`
    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    /// Current reading
    pub fn now(&self) -> f64 {
        self.now.get()
    }

    /// Closure reading this clock, for [`PerfHarness::configure`](crate::PerfHarness::configure)
    pub fn reader(&self) -> impl FnMut() -> f64 {
        let now = Rc::clone(&self.now);
        move || now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clock_is_exact() {
        let mut clock = step_clock(0.01);
        let readings: Vec<f64> = (0..3).map(|_| clock()).collect();
        assert_eq!(readings, vec![0.01, 0.02, 0.03]);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let mut read = clock.reader();
        assert_eq!(read(), 0.0);
        clock.clone().advance(0.5);
        assert_eq!(read(), 0.5);
        assert_eq!(clock.now(), 0.5);
    }

    #[test]
    fn test_monotonic_clock() {
        let mut clock = monotonic_clock();
        let a = clock();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = clock();
        assert!(b - a >= 0.004);
    }
}
