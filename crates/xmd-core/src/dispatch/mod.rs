//! Rate-limited request dispatcher.
//!
//! Every resolution request funnels through one [`Dispatcher`]: a single
//! scheduler task pops one queued request at a time, fills in identity
//! headers, sends it, and then sleeps a fixed inter-request delay whatever the
//! outcome. HTTP 429 and network-class failures are requeued at the tail after
//! a fixed backoff, up to the retry limit. At most one request is ever in
//! flight.

mod classify;
mod error;
mod identity;
mod policy;
mod request;
mod scheduler;
mod state;
mod transport;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use identity::{cache_policy_for, random_user_agent, USER_AGENTS};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use request::{CachePolicy, Request, Response};
pub use state::RequestState;
pub use transport::{CurlTransport, Transport};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::DispatchConfig;
use scheduler::Scheduler;
use state::QueuedRequest;

/// Handle to the scheduler task. Construct once per process and share it
/// (`Arc<Dispatcher>`) with every strategy.
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<QueuedRequest>,
    task: JoinHandle<()>,
}

impl Dispatcher {
    /// Spawn the scheduler on the current tokio runtime.
    pub fn spawn(transport: Arc<dyn Transport>, policy: RetryPolicy, request_delay: Duration) -> Self {
        let (tx, inbox) = mpsc::unbounded_channel();
        let scheduler = Scheduler {
            transport,
            policy,
            request_delay,
            inbox,
            requeue: tx.downgrade(),
        };
        let task = tokio::spawn(scheduler.run());
        Self { tx, task }
    }

    /// Spawn with throttling parameters from config.
    pub fn from_config(transport: Arc<dyn Transport>, cfg: &DispatchConfig) -> Self {
        Self::spawn(transport, RetryPolicy::from(cfg), cfg.request_delay())
    }

    /// Spawn with a [`CurlTransport`] configured from `cfg`.
    pub fn with_curl(cfg: &DispatchConfig) -> Self {
        let transport = CurlTransport::new(Duration::from_secs(cfg.connect_timeout_secs));
        Self::from_config(Arc::new(transport), cfg)
    }

    /// Queue a request and wait for its final outcome.
    ///
    /// Resolves with the response even for non-2xx statuses (including a 429
    /// that exhausted its retries); only a transport failure is an error.
    /// Dropping the returned future does not cancel the request.
    pub async fn enqueue(&self, request: Request) -> Result<Response, FetchError> {
        let (reply, wait) = oneshot::channel();
        self.tx
            .send(QueuedRequest::new(request, reply))
            .map_err(|_| FetchError::DispatcherClosed)?;
        wait.await.map_err(|_| FetchError::DispatcherClosed)?
    }

    /// Stop accepting requests and wait for queued ones (and their retries)
    /// to finish.
    pub async fn shutdown(self) {
        let Self { tx, task } = self;
        drop(tx);
        let _ = task.await;
    }
}
