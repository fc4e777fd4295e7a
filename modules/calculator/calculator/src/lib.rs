#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Calculator Module
//!
//! A small gRPC service with a unary `Sum` and a server-streaming
//! `GetFibonacci`.
//!
//! ## Architecture
//!
//! - `domain/service.rs` - Core business logic and the Fibonacci producer
//! - `domain/fibonacci.rs` - Per-call memoization cache
//! - `api/grpc/server.rs` - gRPC server implementation
//! - `module.rs` - Service wiring and server lifecycle
//!
//! External consumers should use the `calculator-sdk` crate which provides
//! the gRPC client.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === MODULE DEFINITION ===
mod module;
pub use module::{CalculatorModule, run_server};

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
