/*!
 * Error Types
 * Error handling with thiserror and miette
 *
 * The core map operations cannot fail. Errors only arise from the
 * wait variants that are layered on top of `get`.
 */

use miette::Diagnostic;
use std::time::Duration;
use thiserror::Error;

/// Result type for wait operations
pub type WaitResult<T> = Result<T, WaitError>;

/// Wait operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum WaitError {
    #[error("Wait operation timed out after {0:?}")]
    #[diagnostic(
        code(waitmap::timeout),
        help("No writer set the key before the deadline. Retry, or use a blocking get.")
    )]
    Timeout(Duration),
}

impl WaitError {
    /// Check if this error is a timeout
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout(_))
    }
}
