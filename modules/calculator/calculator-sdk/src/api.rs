//! Calculator API trait and types
//!
//! Contract trait and types for the calculator service.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

/// Ordered stream of Fibonacci terms, index 0 first.
///
/// Ends with `None` on normal completion; an `Err` item means the stream was
/// broken and no further items follow.
pub type FibonacciStream = Pin<Box<dyn Stream<Item = Result<i64, CalculatorError>> + Send>>;

/// Calculator API trait
///
/// A unary sum and a server-streaming Fibonacci sequence.
#[async_trait]
pub trait CalculatorClientV1: Send + Sync {
    /// Add two numbers and return the sum.
    async fn sum(&self, a: i64, b: i64) -> Result<i64, CalculatorError>;

    /// Request the Fibonacci terms for indices `0..=n`.
    async fn get_fibonacci(&self, n: i64) -> Result<FibonacciStream, CalculatorError>;
}

/// Error type for Calculator operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("gRPC transport error: {0}")]
    Transport(String),

    #[error("stream broken: {0}")]
    Stream(String),
}
