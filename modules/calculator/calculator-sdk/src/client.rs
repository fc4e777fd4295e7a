//! gRPC client implementation of `CalculatorClientV1`

use std::time::Duration;

use async_trait::async_trait;
use calc_transport_grpc::client::{GrpcClientConfig, connect_with_stack};
use futures::StreamExt;
use tonic::transport::Channel;

use crate::api::{CalculatorClientV1, CalculatorError, FibonacciStream};
use crate::proto::calculator_service_client::CalculatorServiceClient;
use crate::proto::{CalculatorRequest, GetFibonacciRequest};

/// gRPC client implementation of `CalculatorClientV1`
#[derive(Clone)]
pub struct CalculatorGrpcClient {
    inner: CalculatorServiceClient<Channel>,
    rpc_timeout: Duration,
}

impl CalculatorGrpcClient {
    /// Connect to the `CalculatorService` with an explicit transport config.
    ///
    /// # Errors
    /// Returns an error if the endpoint cannot be reached.
    pub async fn connect_with_config(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> anyhow::Result<Self> {
        let inner: CalculatorServiceClient<Channel> = connect_with_stack(uri, cfg).await?;
        Ok(Self {
            inner,
            rpc_timeout: cfg.rpc_timeout,
        })
    }
}

/// Map a status returned while starting a call.
fn call_error(status: &tonic::Status) -> CalculatorError {
    match status.code() {
        tonic::Code::InvalidArgument => {
            CalculatorError::InvalidArgument(status.message().to_owned())
        }
        _ => CalculatorError::Transport(status.message().to_owned()),
    }
}

/// Map a status received in the middle of a response stream.
fn stream_error(status: &tonic::Status) -> CalculatorError {
    CalculatorError::Stream(format!("{:?}: {}", status.code(), status.message()))
}

#[async_trait]
impl CalculatorClientV1 for CalculatorGrpcClient {
    async fn sum(&self, a: i64, b: i64) -> Result<i64, CalculatorError> {
        let mut client = self.inner.clone();

        let mut request = tonic::Request::new(CalculatorRequest { a, b });
        request.set_timeout(self.rpc_timeout);

        let response = client.sum(request).await.map_err(|s| call_error(&s))?;

        Ok(response.into_inner().result)
    }

    async fn get_fibonacci(&self, n: i64) -> Result<FibonacciStream, CalculatorError> {
        let mut client = self.inner.clone();

        // No deadline: the stream is paced by the server and outlives rpc_timeout.
        let request = tonic::Request::new(GetFibonacciRequest { num: n });

        let stream = client
            .get_fibonacci(request)
            .await
            .map_err(|s| call_error(&s))?
            .into_inner();

        tracing::debug!(n, "GetFibonacci stream opened");

        Ok(Box::pin(stream.map(|item| match item {
            Ok(msg) => Ok(msg.num),
            Err(status) => Err(stream_error(&status)),
        })))
    }
}
