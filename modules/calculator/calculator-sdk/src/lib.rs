//! Calculator SDK
//!
//! This crate provides everything needed to consume the calculator service:
//! - API trait (`CalculatorClientV1`)
//! - Error types (`CalculatorError`)
//! - gRPC client (`CalculatorGrpcClient`)
//! - Proto stubs for server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use calc_transport_grpc::GrpcClientConfig;
//! use calculator_sdk::{CalculatorClientV1, CalculatorGrpcClient};
//! use futures::StreamExt;
//!
//! let cfg = GrpcClientConfig::new("calculator");
//! let client = CalculatorGrpcClient::connect_with_config("http://localhost:50051", &cfg).await?;
//! let sum = client.sum(3, 10).await?;
//!
//! let mut terms = client.get_fibonacci(9).await?;
//! while let Some(term) = terms.next().await {
//!     println!("{}", term?);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === API TRAIT AND TYPES ===
mod api;
pub use api::{CalculatorClientV1, CalculatorError, FibonacciStream};

// === GRPC CLIENT ===
mod client;
pub use client::CalculatorGrpcClient;

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for CalculatorService
#[allow(clippy::pedantic)]
pub mod proto {
    tonic::include_proto!("calculator.v1");
}

// Re-export proto types needed by server
pub use proto::calculator_service_server::{CalculatorService, CalculatorServiceServer};
pub use proto::{CalculatorRequest, CalculatorResponse, GetFibonacciRequest, GetFibonacciResponse};

/// Fully qualified gRPC service name
pub const SERVICE_NAME: &str = "calculator.v1.CalculatorService";

/// Largest sequence index whose Fibonacci term fits in an `i64`.
pub const MAX_FIBONACCI_INDEX: i64 = 92;
