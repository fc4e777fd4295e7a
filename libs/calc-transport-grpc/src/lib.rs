//! gRPC transport plumbing shared by the calculator server and its clients.
//!
//! - [`client`]: endpoint configuration and connection helpers
//! - [`server`]: TCP binding and a tonic server loop with graceful shutdown

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod server;

pub use client::{GrpcClientConfig, connect_with_stack};
pub use server::{bind_tcp, parse_listen_addr, serve_tcp};
