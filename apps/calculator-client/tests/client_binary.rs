//! Runs the `calculator-client` binary against an in-process server.

use std::error::Error;
use std::time::Duration;

use calc_bootstrap::ServerConfig;
use calc_transport_grpc::bind_tcp;
use calculator::CalculatorModule;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

const CLIENT_BIN: &str = env!("CARGO_BIN_EXE_calculator-client");

#[tokio::test(flavor = "multi_thread")]
async fn client_performs_sum_and_fibonacci() -> Result<(), Box<dyn Error>> {
    let cfg = ServerConfig {
        listen_addr: "127.0.0.1:0".to_owned(),
        fibonacci_interval_ms: 10,
    };
    let listener = bind_tcp(cfg.listen_addr.parse()?).await?;
    let addr = listener.local_addr()?;
    let cancel = CancellationToken::new();
    let module = CalculatorModule::new(&cfg, cancel.clone());
    let server = tokio::spawn(async move { module.serve(listener).await });

    let output = tokio::time::timeout(
        Duration::from_secs(30),
        Command::new(CLIENT_BIN)
            .arg("--endpoint")
            .arg(format!("http://{addr}"))
            .env("CALCULATOR__LOGGING__FORMAT", "json")
            .env("CALCULATOR__LOGGING__LEVEL", "info")
            .env_remove("RUST_LOG")
            .output(),
    )
    .await??;

    assert!(
        output.status.success(),
        "client exited with failure: {output:?}"
    );

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("\"result\":13"), "stdout: {stdout}");

    let fib_lines: Vec<&str> = stdout
        .lines()
        .filter(|line| line.contains("Response from GetFibonacci"))
        .collect();
    assert_eq!(fib_lines.len(), 10, "stdout: {stdout}");
    assert!(fib_lines[0].contains("\"num\":0"));
    assert!(fib_lines[9].contains("\"num\":34"));

    cancel.cancel();
    server.await??;
    Ok(())
}

#[tokio::test]
async fn client_fails_without_server() -> Result<(), Box<dyn Error>> {
    let listener = bind_tcp("127.0.0.1:0".parse()?).await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let output = Command::new(CLIENT_BIN)
        .arg("--endpoint")
        .arg(format!("http://{addr}"))
        .env("CALCULATOR__CLIENT__CONNECT_TIMEOUT_MS", "500")
        .output()
        .await?;

    assert!(
        !output.status.success(),
        "client should fail when nothing is listening"
    );
    Ok(())
}
