//! Calculator gRPC server binary.
//!
//! Configuration is loaded from defaults, an optional `--config` YAML file,
//! `CALCULATOR__*` environment variables and CLI flags, in that order.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use calc_bootstrap::{AppConfig, CliArgs, init_logging};

/// Calculator gRPC server
#[derive(Parser)]
#[command(name = "calculator-server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override, `host:port`
    #[arg(short, long)]
    listen: Option<String>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let args = CliArgs {
        config: cli.config,
        verbose: cli.verbose,
        listen_addr: cli.listen,
        endpoint: None,
    };

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    config.apply_cli_overrides(&args);
    init_logging(&config.logging, args.verbose);

    tracing::info!(listen_addr = %config.server.listen_addr, "starting gRPC server...");

    let cancel = CancellationToken::new();
    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        tracing::info!("shutdown: signal received");
        cancel_for_signals.cancel();
    });

    if let Err(e) = calculator::run_server(&config.server, cancel).await {
        tracing::error!(error = %e, "failed to serve");
        return Err(e);
    }

    Ok(())
}
