//! Calculator demo client.
//!
//! Issues one unary `Sum` and one server-streaming `GetFibonacci` call and
//! logs every result. Any failure is fatal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;

use calc_bootstrap::{AppConfig, CliArgs, init_logging};
use calc_transport_grpc::GrpcClientConfig;
use calculator_sdk::{CalculatorClientV1, CalculatorGrpcClient};

/// Calculator demo client
#[derive(Parser)]
#[command(name = "calculator-client")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server endpoint override, e.g. `http://localhost:50051`
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

async fn do_unary(client: &dyn CalculatorClientV1, a: i64, b: i64) -> Result<i64> {
    let result = client
        .sum(a, b)
        .await
        .context("error while calling CalculatorService")?;

    tracing::info!(result, "Response from CalculatorService");
    Ok(result)
}

async fn do_server_streaming(client: &dyn CalculatorClientV1, target: i64) -> Result<Vec<i64>> {
    let mut stream = client
        .get_fibonacci(target)
        .await
        .context("error while calling GetFibonacci")?;

    let mut received = Vec::new();
    // `None` is the normal end of the server stream; an `Err` item is fatal.
    while let Some(item) = stream.next().await {
        let num = item.context("error while receiving server stream")?;
        tracing::info!(num, "Response from GetFibonacci");
        received.push(num);
    }

    tracing::debug!(count = received.len(), "GetFibonacci stream ended");
    Ok(received)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let args = CliArgs {
        config: cli.config,
        verbose: cli.verbose,
        listen_addr: None,
        endpoint: cli.endpoint,
    };

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    config.apply_cli_overrides(&args);
    init_logging(&config.logging, args.verbose);

    let client_cfg = &config.client;
    let transport = GrpcClientConfig::new("calculator")
        .with_connect_timeout(client_cfg.connect_timeout())
        .with_rpc_timeout(client_cfg.rpc_timeout());

    let client = match CalculatorGrpcClient::connect_with_config(&client_cfg.endpoint, &transport)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(endpoint = %client_cfg.endpoint, error = %e, "failed to dial");
            return Err(e);
        }
    };

    let outcome = async {
        do_unary(&client, client_cfg.sum_a, client_cfg.sum_b).await?;
        do_server_streaming(&client, client_cfg.fibonacci_target).await?;
        anyhow::Ok(())
    }
    .await;

    if let Err(e) = &outcome {
        tracing::error!("call failed: {e:#}");
    }
    outcome
}
