/*!
 * Synchronization Primitives
 *
 * Wait strategy selection and the adaptive spinner used by readers
 * before they park on an entry.
 */

mod config;
mod spinwait;

pub use config::{WaitMapConfig, WaitStrategy};
pub use spinwait::SpinWait;
