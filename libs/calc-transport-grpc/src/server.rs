//! Hosting of a tonic server over TCP.
//!
//! Binding and serving are split so callers can learn the bound address
//! (e.g. when listening on port `0`) before the server loop starts.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::{service::Routes, transport::Server};

/// Parse a `host:port` listen address.
///
/// `localhost` is accepted as an alias for `127.0.0.1`.
///
/// # Errors
/// Returns an error if the address is not a valid socket address.
pub fn parse_listen_addr(listen_addr: &str) -> anyhow::Result<SocketAddr> {
    let normalized = match listen_addr.strip_prefix("localhost:") {
        Some(port) => format!("127.0.0.1:{port}"),
        None => listen_addr.to_owned(),
    };
    normalized
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid listen_addr '{listen_addr}'"))
}

/// Bind a TCP listener for the gRPC server.
///
/// # Errors
/// Returns an error if the address is already in use or cannot be bound.
pub async fn bind_tcp(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind gRPC listener at {addr}"))?;
    Ok(listener)
}

/// Serve `routes` on an already bound listener until `cancel` fires.
///
/// # Errors
/// Returns an error if the tonic server fails while running.
pub async fn serve_tcp(
    listener: TcpListener,
    routes: Routes,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let bound_addr = listener.local_addr()?;
    tracing::info!(%bound_addr, transport = "tcp", "gRPC server listening");

    let incoming = TcpListenerStream::new(listener);
    Server::builder()
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await
        .context("gRPC server terminated with error")?;

    tracing::info!(%bound_addr, "gRPC server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ipv4_addr() {
        let addr = parse_listen_addr("127.0.0.1:50051").unwrap();
        assert_eq!(addr.port(), 50051);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn parses_localhost_alias() {
        let addr = parse_listen_addr("localhost:50051").unwrap();
        assert_eq!(addr, "127.0.0.1:50051".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_listen_addr("not an address").unwrap_err();
        assert!(err.to_string().contains("invalid listen_addr"));
    }

    #[tokio::test]
    async fn bind_reports_addr_in_use() {
        let first = bind_tcp("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let taken = first.local_addr().unwrap();

        let err = bind_tcp(taken).await.unwrap_err();
        assert!(err.to_string().contains("failed to bind"));
    }

    #[tokio::test]
    async fn serve_stops_on_cancel() {
        let listener = bind_tcp("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let cancel = CancellationToken::new();
        let routes = tonic::service::RoutesBuilder::default().routes();

        let handle = tokio::spawn(serve_tcp(listener, routes, cancel.clone()));
        cancel.cancel();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked");
        assert!(result.is_ok());
    }
}
