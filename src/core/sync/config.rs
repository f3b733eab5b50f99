/*!
 * Wait Map Configuration
 *
 * Construction-time configuration: capacity hint and wait strategy selection
 */

use crate::core::limits::{
    DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_SPINS, DEFAULT_SPIN_DURATION, LOW_LATENCY_MAX_SPINS,
    LOW_LATENCY_SPIN_DURATION,
};
use std::time::Duration;

/// How a reader waits for an unset key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitStrategy {
    /// Park on the entry's condvar straight away
    #[default]
    Park,
    /// Spin on the entry state for a bounded budget, then park
    SpinThenPark,
}

/// Wait map configuration
#[derive(Debug, Clone)]
pub struct WaitMapConfig {
    /// Initial capacity hint for the key map (no semantic effect)
    pub initial_capacity: usize,
    /// Preferred wait strategy
    pub strategy: WaitStrategy,
    /// Spin duration before parking (for SpinThenPark)
    pub spin_duration: Duration,
    /// Maximum spin iterations before parking (for SpinThenPark)
    pub max_spins: u32,
}

impl Default for WaitMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            strategy: WaitStrategy::Park,
            spin_duration: DEFAULT_SPIN_DURATION,
            max_spins: DEFAULT_MAX_SPINS,
        }
    }
}

impl WaitMapConfig {
    /// Configuration optimized for setters that arrive shortly after readers
    pub const fn low_latency() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            strategy: WaitStrategy::SpinThenPark,
            spin_duration: LOW_LATENCY_SPIN_DURATION,
            max_spins: LOW_LATENCY_MAX_SPINS,
        }
    }

    /// Default configuration with a capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            ..Self::default()
        }
    }

    /// Whether readers should spin before parking
    #[inline]
    pub fn spins(&self) -> bool {
        self.strategy == WaitStrategy::SpinThenPark && self.max_spins > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parks() {
        let config = WaitMapConfig::default();
        assert_eq!(config.strategy, WaitStrategy::Park);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert!(!config.spins());
    }

    #[test]
    fn test_low_latency_spins() {
        let config = WaitMapConfig::low_latency();
        assert_eq!(config.strategy, WaitStrategy::SpinThenPark);
        assert!(config.spins());
    }

    #[test]
    fn test_zero_spin_budget_parks() {
        let config = WaitMapConfig {
            max_spins: 0,
            ..WaitMapConfig::low_latency()
        };
        assert!(!config.spins());
    }

    #[test]
    fn test_with_capacity_keeps_defaults() {
        let config = WaitMapConfig::with_capacity(64);
        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.strategy, WaitStrategy::Park);
    }
}
