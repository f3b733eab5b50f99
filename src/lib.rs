/*!
 * WaitMap
 *
 * Concurrent key-value map whose reads block until a value exists and whose
 * writes succeed exactly once per key.
 */

pub mod core;
pub mod map;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{WaitError, WaitResult};
pub use crate::core::sync::{WaitMapConfig, WaitStrategy};
pub use map::{WaitMap, WaitMapStats};
pub use monitoring::init_tracing;
