/*!
 * Wait Map
 *
 * Write-once concurrent map with blocking reads:
 * - `get` blocks until the key is written
 * - `set` succeeds exactly once per key
 * - `check` reports readiness without blocking
 */

mod entry;
mod stats;
mod waitmap;

pub use stats::WaitMapStats;
pub use waitmap::WaitMap;
