//! Logging initialization.
//!
//! Filter precedence: `-v` flags, then `RUST_LOG`, then `logging.level`.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Map the `-v` count to a filter directive (`-v` info, `-vv` debug, `-vvv` trace).
fn verbosity_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn filter_directive(cfg: &LoggingConfig, verbose: u8, rust_log: Option<&str>) -> String {
    if let Some(level) = verbosity_directive(verbose) {
        return level.to_owned();
    }
    match rust_log {
        Some(env) if !env.trim().is_empty() => env.to_owned(),
        _ => cfg.level.clone(),
    }
}

fn build_filter(cfg: &LoggingConfig, verbose: u8) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(cfg, verbose, rust_log.as_deref());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global `tracing` subscriber writing to stdout.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(cfg: &LoggingConfig, verbose: u8) {
    let filter = build_filter(cfg, verbose);
    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = match cfg.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if result.is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}
