//! Calculator Module definition
//!
//! Builds the domain service, exposes it as a tonic route set and runs the
//! server until the shutdown token fires.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tonic::service::{Routes, RoutesBuilder};

use calc_bootstrap::ServerConfig;
use calc_transport_grpc::server::{bind_tcp, parse_listen_addr, serve_tcp};
use calculator_sdk::{CalculatorServiceServer, SERVICE_NAME};

use crate::api::grpc::CalculatorServiceImpl;
use crate::domain::Service;

/// Calculator module.
///
/// Owns the domain service and the shutdown token shared by the server loop
/// and every in-flight Fibonacci stream.
pub struct CalculatorModule {
    service: Arc<Service>,
    cancel: CancellationToken,
}

impl CalculatorModule {
    #[must_use]
    pub fn new(cfg: &ServerConfig, cancel: CancellationToken) -> Self {
        let service = Service::new(cfg.fibonacci_interval(), cancel.clone());
        tracing::info!(
            emit_interval_ms = cfg.fibonacci_interval_ms,
            "calculator module initialized"
        );
        Self {
            service: Arc::new(service),
            cancel,
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// Route set containing the `CalculatorService`.
    #[must_use]
    pub fn routes(&self) -> Routes {
        let svc = CalculatorServiceServer::new(CalculatorServiceImpl::new(self.service()));
        let mut routes = RoutesBuilder::default();
        routes.add_service(svc);
        tracing::debug!(service = SERVICE_NAME, "gRPC service registered");
        routes.routes()
    }

    /// Serve on an already bound listener until shutdown.
    ///
    /// # Errors
    /// Returns an error if the tonic server fails.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        serve_tcp(listener, self.routes(), self.cancel.clone()).await
    }
}

/// Bind `cfg.listen_addr` and serve until `cancel` fires.
///
/// # Errors
/// Returns an error if the address is invalid, cannot be bound, or the
/// server fails while running.
pub async fn run_server(cfg: &ServerConfig, cancel: CancellationToken) -> Result<()> {
    let addr = parse_listen_addr(&cfg.listen_addr)?;
    let listener = bind_tcp(addr).await?;
    CalculatorModule::new(cfg, cancel).serve(listener).await
}
