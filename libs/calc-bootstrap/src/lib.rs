//! Bootstrap helpers shared by the calculator binaries.
//!
//! ## Modules
//!
//! - [`config`]: layered configuration (defaults, YAML, env, CLI)
//! - [`logging`]: `tracing-subscriber` initialization

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod logging;

pub use config::{AppConfig, CliArgs, ClientConfig, ENV_PREFIX, LogFormat, LoggingConfig, ServerConfig};
pub use logging::init_logging;
