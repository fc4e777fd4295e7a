//! gRPC Server implementation for calculator
//!
//! The server implementation handles gRPC requests and delegates
//! to the domain Service for business logic.

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tonic::{Request, Response, Status};

use calculator_sdk::{
    CalculatorRequest, CalculatorResponse, CalculatorService, GetFibonacciRequest,
    GetFibonacciResponse,
};

use crate::domain::{DomainError, Service};

/// Response stream for `GetFibonacci`.
pub type FibonacciResponseStream =
    Pin<Box<dyn Stream<Item = Result<GetFibonacciResponse, Status>> + Send + 'static>>;

/// gRPC service implementation that wraps the domain Service.
#[derive(Clone)]
pub struct CalculatorServiceImpl {
    service: Arc<Service>,
}

impl CalculatorServiceImpl {
    /// Create a new `CalculatorService` implementation with the given Service.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

fn domain_status(err: &DomainError) -> Status {
    match err {
        DomainError::PositionOutOfRange(_) => Status::invalid_argument(err.to_string()),
        DomainError::Cancelled { .. } => Status::unavailable(err.to_string()),
    }
}

#[tonic::async_trait]
impl CalculatorService for CalculatorServiceImpl {
    async fn sum(
        &self,
        request: Request<CalculatorRequest>,
    ) -> Result<Response<CalculatorResponse>, Status> {
        let req = request.into_inner();

        let result = self.service.sum(req.a, req.b);

        Ok(Response::new(CalculatorResponse { result }))
    }

    type GetFibonacciStream = FibonacciResponseStream;

    async fn get_fibonacci(
        &self,
        request: Request<GetFibonacciRequest>,
    ) -> Result<Response<Self::GetFibonacciStream>, Status> {
        let req = request.into_inner();

        let terms = self
            .service
            .fibonacci(req.num)
            .map_err(|e| domain_status(&e))?;

        let stream = terms.map(|term| match term {
            Ok(num) => Ok(GetFibonacciResponse { num }),
            Err(e) => Err(domain_status(&e)),
        });
        Ok(Response::new(Box::pin(stream)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn service_impl() -> CalculatorServiceImpl {
        let service = Service::new(Duration::from_millis(5), CancellationToken::new());
        CalculatorServiceImpl::new(Arc::new(service))
    }

    #[test]
    fn domain_errors_map_to_status_codes() {
        let status = domain_status(&DomainError::PositionOutOfRange(93));
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status = domain_status(&DomainError::Cancelled { sent: 2, total: 10 });
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert!(status.message().contains("2 of 10"));
    }

    #[tokio::test]
    async fn sum_returns_result_field() {
        let svc = service_impl();
        let response = svc
            .sum(Request::new(CalculatorRequest { a: 3, b: 10 }))
            .await
            .unwrap();
        assert_eq!(response.into_inner().result, 13);
    }

    #[tokio::test]
    async fn get_fibonacci_streams_messages() {
        let svc = service_impl();
        let stream = svc
            .get_fibonacci(Request::new(GetFibonacciRequest { num: 6 }))
            .await
            .unwrap()
            .into_inner();

        let nums: Vec<i64> = stream.map(|msg| msg.unwrap().num).collect().await;
        assert_eq!(nums, vec![0, 1, 1, 2, 3, 5, 8]);
    }

    #[tokio::test]
    async fn get_fibonacci_rejects_negative() {
        let svc = service_impl();
        let Err(status) = svc
            .get_fibonacci(Request::new(GetFibonacciRequest { num: -1 }))
            .await
        else {
            panic!("negative position must be rejected");
        };
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn get_fibonacci_ends_with_unavailable_on_shutdown() {
        let cancel = CancellationToken::new();
        let service = Service::new(Duration::from_secs(60), cancel.clone());
        let svc = CalculatorServiceImpl::new(Arc::new(service));
        let mut stream = svc
            .get_fibonacci(Request::new(GetFibonacciRequest { num: 20 }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(stream.next().await.unwrap().unwrap().num, 0);
        cancel.cancel();

        let status = stream.next().await.unwrap().unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert!(stream.next().await.is_none());
    }
}
