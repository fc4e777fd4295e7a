//! Domain service for calculator
//!
//! Contains the core business logic: a wrapping sum and a paced, cancellable
//! Fibonacci producer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::error::DomainError;
use super::fibonacci::FibonacciMemo;

/// Capacity of the channel between a Fibonacci producer and its response stream.
pub const STREAM_BUFFER: usize = 4;

/// Terms of one `GetFibonacci` call, in index order.
pub type FibonacciTerms = ReceiverStream<Result<i64, DomainError>>;

const DEFAULT_EMIT_INTERVAL: Duration = Duration::from_secs(1);

/// Domain service behind the gRPC layer.
///
/// Stateless apart from its settings; every call allocates its own memo.
#[derive(Clone, Debug)]
pub struct Service {
    emit_interval: Duration,
    shutdown: CancellationToken,
}

impl Default for Service {
    fn default() -> Self {
        Self::new(DEFAULT_EMIT_INTERVAL, CancellationToken::new())
    }
}

impl Service {
    /// Create a service pacing Fibonacci streams by `emit_interval`.
    ///
    /// Cancelling `shutdown` stops every in-flight stream.
    #[must_use]
    pub fn new(emit_interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            emit_interval,
            shutdown,
        }
    }

    #[must_use]
    pub fn emit_interval(&self) -> Duration {
        self.emit_interval
    }

    /// Add two numbers, wrapping on overflow.
    #[must_use]
    pub fn sum(&self, a: i64, b: i64) -> i64 {
        info!(a, b, "Sum invoked");
        a.wrapping_add(b)
    }

    /// Start streaming the Fibonacci terms for indices `0..=n`.
    ///
    /// The producer runs on its own task and is dropped together with the
    /// returned stream's receiver. A stream cut short by server shutdown ends
    /// with a [`DomainError::Cancelled`] item instead of closing quietly.
    ///
    /// # Errors
    /// Returns [`DomainError::PositionOutOfRange`] before anything is spawned
    /// if `n` is outside `0..=92`.
    pub fn fibonacci(&self, n: i64) -> Result<FibonacciTerms, DomainError> {
        info!(n, "GetFibonacci invoked");
        let memo = FibonacciMemo::new(n)?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let interval = self.emit_interval;
        let cancel = self.shutdown.child_token();
        tokio::spawn(async move {
            let emission = emit_fibonacci(memo, interval, tx, cancel).await;
            debug!(
                n,
                sent = emission.sent,
                completed = emission.completed,
                "GetFibonacci finished"
            );
        });

        Ok(ReceiverStream::new(rx))
    }
}

/// Outcome of one producer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    /// Terms handed to the channel.
    pub sent: usize,
    /// Whether every term was handed over.
    pub completed: bool,
}

/// Why the producer left its loop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Disconnected,
    Shutdown,
}

/// Compute terms one at a time and send each into `tx`, pausing `interval`
/// after every send including the last.
///
/// Stops without sending more terms when the receiver is dropped. When
/// `cancel` fires before every term is out, a final
/// [`DomainError::Cancelled`] is sent so the reader can tell the stream
/// was truncated.
pub async fn emit_fibonacci(
    mut memo: FibonacciMemo,
    interval: Duration,
    tx: mpsc::Sender<Result<i64, DomainError>>,
    cancel: CancellationToken,
) -> Emission {
    let total = memo.len();
    let mut sent = 0;
    let mut halt = None;

    for position in 0..total {
        let Some(term) = memo.term(position) else {
            break;
        };

        let delivered = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Halt::Shutdown),
            res = tx.send(Ok(term)) => res.map_err(|_| Halt::Disconnected),
        };
        if let Err(reason) = delivered {
            debug!(position, ?reason, "Fibonacci stream stopped before send");
            halt = Some(reason);
            break;
        }
        sent += 1;

        let paused = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Halt::Shutdown),
            () = tx.closed() => Err(Halt::Disconnected),
            () = tokio::time::sleep(interval) => Ok(()),
        };
        if let Err(reason) = paused {
            debug!(position, ?reason, "Fibonacci stream stopped during pause");
            halt = Some(reason);
            break;
        }
    }

    // Shutdown during the trailing pause leaves nothing undelivered.
    if halt == Some(Halt::Shutdown) && sent < total {
        let notice = DomainError::Cancelled { sent, total };
        if tx.send(Err(notice)).await.is_err() {
            debug!(sent, "receiver gone before shutdown notice");
        }
    }

    Emission {
        sent,
        completed: sent == total,
    }
}
