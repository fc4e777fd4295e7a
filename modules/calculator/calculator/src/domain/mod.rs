//! Domain layer for calculator module
//!
//! Contains the business logic: addition and the paced Fibonacci producer.

pub mod error;
pub mod fibonacci;
pub mod service;

pub use error::DomainError;
pub use fibonacci::FibonacciMemo;
pub use service::{Emission, FibonacciTerms, STREAM_BUFFER, Service, emit_fibonacci};
