//! Per-request lifecycle owned by the scheduler.

use std::time::Duration;

use tokio::sync::oneshot;

use super::error::FetchError;
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use super::request::{Request, Response};

pub(super) type Reply = oneshot::Sender<Result<Response, FetchError>>;

/// Lifecycle of a queued request.
///
/// `Queued → InFlight → Resolved | Failed`, or
/// `InFlight → AwaitingBackoff(n) → Queued` for a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Queued,
    InFlight,
    /// Waiting out the backoff before retry number `attempt`.
    AwaitingBackoff { attempt: u32 },
    Resolved,
    Failed,
}

/// A request plus its continuation, as held by the scheduler.
#[derive(Debug)]
pub(crate) struct QueuedRequest {
    pub(super) request: Request,
    pub(super) retry_count: u32,
    pub(super) state: RequestState,
    pub(super) reply: Reply,
}

impl QueuedRequest {
    pub(super) fn new(request: Request, reply: Reply) -> Self {
        Self {
            request,
            retry_count: 0,
            state: RequestState::Queued,
            reply,
        }
    }

    pub(super) fn transition(&mut self, next: RequestState) {
        tracing::trace!(url = %self.request.url(), from = ?self.state, to = ?next, "request state");
        self.state = next;
    }

    /// Hand the outcome to the waiting caller. A caller that stopped waiting
    /// is not an error.
    pub(super) fn finish(mut self, outcome: Result<Response, FetchError>) {
        let next = if outcome.is_ok() {
            RequestState::Resolved
        } else {
            RequestState::Failed
        };
        self.transition(next);
        let _ = self.reply.send(outcome);
    }
}

/// What the scheduler does with a finished dispatch.
#[derive(Debug)]
pub(super) enum Settlement {
    Deliver(Result<Response, FetchError>),
    Retry(Duration),
}

/// Decide between delivering an outcome and requeueing the request.
///
/// A 429 or network-class failure is retried while `retry_count` is below the
/// policy limit; a 429 that runs out of retries is delivered as a response.
pub(super) fn settle(
    outcome: Result<Response, FetchError>,
    retry_count: u32,
    policy: &RetryPolicy,
    kind: ErrorKind,
) -> Settlement {
    match policy.decide(retry_count, kind) {
        RetryDecision::RetryAfter(delay) => Settlement::Retry(delay),
        RetryDecision::NoRetry => Settlement::Deliver(outcome),
    }
}
