/*!
 * Limits and Constants
 *
 * Centralized defaults for map sizing and the wait strategies.
 *
 * ## Conventions
 * - Performance-critical constants are marked with [PERF]
 */

use std::time::Duration;

// =============================================================================
// MAP SIZING
// =============================================================================

/// Default initial capacity of the key map
/// Zero defers allocation until the first key is inserted
pub const DEFAULT_INITIAL_CAPACITY: usize = 0;

// =============================================================================
// SPIN-THEN-PARK
// =============================================================================

/// Default spin budget before parking (10µs)
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_micros(10);

/// Default maximum spin iterations before parking
pub const DEFAULT_MAX_SPINS: u32 = 100;

/// Low-latency spin budget (50µs)
/// [PERF] Worth it when setters usually arrive within tens of microseconds
pub const LOW_LATENCY_SPIN_DURATION: Duration = Duration::from_micros(50);

/// Low-latency maximum spin iterations
pub const LOW_LATENCY_MAX_SPINS: u32 = 500;

/// Iterations spent in the tight `spin_loop` phase
pub const TIGHT_SPIN_ITERATIONS: u32 = 10;

/// Iterations (cumulative) after which spinning switches from yielding to sleeping
pub const YIELD_SPIN_ITERATIONS: u32 = 50;

/// Cap for the exponential sleep backoff (1ms)
pub const MAX_SPIN_BACKOFF: Duration = Duration::from_millis(1);
