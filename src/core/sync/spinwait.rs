/*!
 * Adaptive Spin With Exponential Backoff
 *
 * Bounded spinning used by readers before they park on an entry.
 *
 * 1. **Tight spin phase**: `spin_loop()` hint
 * 2. **Yield phase**: `yield_now()` every iteration
 * 3. **Sleep phase**: exponentially increasing sleep, capped
 *
 * The spinner never blocks indefinitely; when the budget runs out the
 * caller falls back to its condvar.
 */

use crate::core::limits::{MAX_SPIN_BACKOFF, TIGHT_SPIN_ITERATIONS, YIELD_SPIN_ITERATIONS};
use std::thread;
use std::time::{Duration, Instant};

/// Bounded adaptive spinner
#[derive(Debug, Clone, Copy)]
pub struct SpinWait {
    /// Wall-clock budget
    spin_duration: Duration,
    /// Iteration budget
    max_spins: u32,
}

impl SpinWait {
    pub fn new(spin_duration: Duration, max_spins: u32) -> Self {
        Self {
            spin_duration,
            max_spins,
        }
    }

    /// Spin until `check` returns true or the budget is exhausted
    ///
    /// Returns true if the condition was observed, false if the caller should park.
    pub fn spin_until(&self, check: impl Fn() -> bool) -> bool {
        let start = Instant::now();
        let mut spin_count = 0u32;
        let mut backoff = Duration::from_nanos(1);

        loop {
            if check() {
                return true;
            }

            if spin_count >= self.max_spins || start.elapsed() >= self.spin_duration {
                return false;
            }

            if spin_count < TIGHT_SPIN_ITERATIONS {
                std::hint::spin_loop();
            } else if spin_count < YIELD_SPIN_ITERATIONS {
                thread::yield_now();
            } else {
                thread::sleep(backoff);
                backoff = (backoff * 2).min(MAX_SPIN_BACKOFF);
            }

            spin_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_spin_observes_ready_condition() {
        let spinner = SpinWait::new(Duration::from_millis(10), 100);
        assert!(spinner.spin_until(|| true));
    }

    #[test]
    fn test_spin_gives_up_on_iteration_budget() {
        let spinner = SpinWait::new(Duration::from_secs(10), 20);
        let calls = AtomicU32::new(0);

        let observed = spinner.spin_until(|| {
            calls.fetch_add(1, Ordering::Relaxed);
            false
        });

        assert!(!observed);
        // One check per iteration plus the final one that hits the budget
        assert_eq!(calls.load(Ordering::Relaxed), 21);
    }

    #[test]
    fn test_spin_gives_up_on_time_budget() {
        let spinner = SpinWait::new(Duration::from_millis(5), u32::MAX);
        let start = Instant::now();

        assert!(!spinner.spin_until(|| false));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_spin_sees_flag_from_other_thread() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(1));
            flag_clone.store(true, Ordering::Release);
        });

        let spinner = SpinWait::new(Duration::from_secs(5), u32::MAX);
        assert!(spinner.spin_until(|| flag.load(Ordering::Acquire)));
        handle.join().unwrap();
    }
}
