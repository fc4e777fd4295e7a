//! Domain errors for the calculator.

use calculator_sdk::MAX_FIBONACCI_INDEX;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("fibonacci position must be between 0 and {max}, got {0}", max = MAX_FIBONACCI_INDEX)]
    PositionOutOfRange(i64),

    /// Server shutdown interrupted a stream after `sent` of `total` terms.
    #[error("server shutting down: stream stopped after {sent} of {total} terms")]
    Cancelled { sent: usize, total: usize },
}
