//! Serializing request governor.
//!
//! Every outbound call funnels through one FIFO queue drained by a single
//! service task. The task dequeues the oldest entry, waits the pacing
//! interval, issues the call, settles the caller's future and moves on, so
//! at most one call is in flight and dispatches are spaced by at least the
//! pacing interval no matter how many callers enqueue concurrently.
//!
//! Failures are local to their entry: there is no retry, and an error or a
//! panic in the transport never stalls the rest of the queue.

use super::error::ApiError;
use super::request::RequestDescriptor;
use super::transport::Transport;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Keeps throughput at roughly 3 requests per second
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_millis(350);

/// Governor settings
#[derive(Debug, Clone)]
pub struct GovernorConfig {
    /// Delay between dequeuing an entry and dispatching it
    pub pacing_interval: Duration,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            pacing_interval: DEFAULT_PACING_INTERVAL,
        }
    }
}

impl GovernorConfig {
    pub fn from_config(config: &shared::JikanConfig) -> Self {
        Self {
            pacing_interval: config.pacing_interval(),
        }
    }
}

/// Point-in-time view of a governor's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GovernorStats {
    /// Requests accepted by `enqueue`
    pub enqueued: u64,
    /// Requests handed to the transport
    pub dispatched: u64,
    /// Dispatches that returned a payload
    pub succeeded: u64,
    /// Dispatches that ended in an error
    pub failed: u64,
    /// Entries waiting in the queue, not yet dequeued
    pub queued: usize,
    /// Whether the service task is currently handling an entry
    pub processing: bool,
}

struct QueuedRequest {
    request: RequestDescriptor,
    responder: oneshot::Sender<Result<Value, ApiError>>,
}

#[derive(Debug, Default)]
struct Counters {
    enqueued: AtomicU64,
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    queued: AtomicUsize,
    processing: AtomicBool,
}

/// Clears the processing flag on every exit path, including unwinding.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        let was_processing = flag.swap(true, Ordering::SeqCst);
        debug_assert!(!was_processing, "service loop entered twice");
        Self(flag)
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a running governor.
///
/// Clones share the same queue and service task. The task stops once every
/// handle is dropped and the queue has drained.
#[derive(Clone)]
pub struct Governor {
    sender: mpsc::UnboundedSender<QueuedRequest>,
    counters: Arc<Counters>,
}

impl Governor {
    /// Start a governor on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(transport: Arc<dyn Transport>, config: GovernorConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());

        let service = ServiceLoop {
            receiver,
            transport,
            pacing_interval: config.pacing_interval,
            counters: Arc::clone(&counters),
        };

        info!(
            pacing_ms = config.pacing_interval.as_millis() as u64,
            "Starting request governor"
        );
        tokio::spawn(service.run());

        Self { sender, counters }
    }

    /// Append a request to the tail of the queue.
    ///
    /// The entry is queued before this returns, so service order follows
    /// call order even if the returned future is polled later or never.
    pub fn enqueue(&self, request: RequestDescriptor) -> PendingResponse {
        let (responder, receiver) = oneshot::channel();

        self.counters.enqueued.fetch_add(1, Ordering::SeqCst);
        let queued = self.counters.queued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(request = %request, queued = queued, "Request enqueued");

        let entry = QueuedRequest { request, responder };
        if let Err(mpsc::error::SendError(entry)) = self.sender.send(entry) {
            self.counters.queued.fetch_sub(1, Ordering::SeqCst);
            warn!(request = %entry.request, "Request governor is not running");
            let _ = entry.responder.send(Err(ApiError::Closed));
        }

        PendingResponse { receiver }
    }

    pub fn is_processing(&self) -> bool {
        self.counters.processing.load(Ordering::SeqCst)
    }

    pub fn queued(&self) -> usize {
        self.counters.queued.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> GovernorStats {
        GovernorStats {
            enqueued: self.counters.enqueued.load(Ordering::SeqCst),
            dispatched: self.counters.dispatched.load(Ordering::SeqCst),
            succeeded: self.counters.succeeded.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
            queued: self.queued(),
            processing: self.is_processing(),
        }
    }
}

/// Resolves with the decoded JSON body, or the error that ended the request.
///
/// Settles exactly once. If the governor goes away before servicing the
/// entry it resolves to [`ApiError::Closed`].
#[must_use = "the response is only observable by awaiting it"]
pub struct PendingResponse {
    receiver: oneshot::Receiver<Result<Value, ApiError>>,
}

impl Future for PendingResponse {
    type Output = Result<Value, ApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|settled| settled.unwrap_or_else(|_| Err(ApiError::Closed)))
    }
}

struct ServiceLoop {
    receiver: mpsc::UnboundedReceiver<QueuedRequest>,
    transport: Arc<dyn Transport>,
    pacing_interval: Duration,
    counters: Arc<Counters>,
}

impl ServiceLoop {
    async fn run(self) {
        let ServiceLoop {
            mut receiver,
            transport,
            pacing_interval,
            counters,
        } = self;

        while let Some(entry) = receiver.recv().await {
            counters.queued.fetch_sub(1, Ordering::SeqCst);
            let label = entry.request.to_string();

            // The flag is cleared before settling, so a caller that sees its
            // response never observes a stale `processing` state.
            let outcome = {
                let _processing = ProcessingGuard::engage(&counters.processing);

                sleep(pacing_interval).await;

                counters.dispatched.fetch_add(1, Ordering::SeqCst);
                debug!(
                    request = %label,
                    queued = counters.queued.load(Ordering::SeqCst),
                    "Dispatching request"
                );

                let outcome = dispatch(Arc::clone(&transport), entry.request).await;
                match &outcome {
                    Ok(_) => {
                        counters.succeeded.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::SeqCst);
                        warn!(request = %label, error = %e, "Jikan API error");
                    }
                }
                outcome
            };

            if entry.responder.send(outcome).is_err() {
                debug!(request = %label, "Caller dropped before response was delivered");
            }
        }

        info!("Request governor stopped");
    }
}

/// Run the call on its own task so a panicking transport surfaces as an
/// error instead of killing the service loop.
async fn dispatch(
    transport: Arc<dyn Transport>,
    request: RequestDescriptor,
) -> Result<Value, ApiError> {
    let call = tokio::spawn(async move { transport.get(&request).await });

    match call.await {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => Err(ApiError::Panicked),
        Err(_) => Err(ApiError::Closed),
    }
}
