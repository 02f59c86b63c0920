//! The single loop that drains the request queue.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};

use super::classify;
use super::identity;
use super::policy::RetryPolicy;
use super::state::{settle, QueuedRequest, RequestState, Settlement};
use super::transport::Transport;

pub(super) struct Scheduler {
    pub(super) transport: Arc<dyn Transport>,
    pub(super) policy: RetryPolicy,
    pub(super) request_delay: Duration,
    pub(super) inbox: UnboundedReceiver<QueuedRequest>,
    /// Weak so that dropping the `Dispatcher` lets the loop finish once the
    /// queue and all pending backoffs are empty.
    pub(super) requeue: WeakUnboundedSender<QueuedRequest>,
}

impl Scheduler {
    pub(super) async fn run(mut self) {
        let mut queue: VecDeque<QueuedRequest> = VecDeque::new();
        loop {
            while let Ok(req) = self.inbox.try_recv() {
                queue.push_back(req);
            }
            let req = match queue.pop_front() {
                Some(req) => req,
                None => match self.inbox.recv().await {
                    Some(req) => req,
                    None => break,
                },
            };
            self.dispatch(req).await;
            tokio::time::sleep(self.request_delay).await;
        }
        tracing::debug!("dispatcher queue closed");
    }

    async fn dispatch(&self, mut req: QueuedRequest) {
        req.transition(RequestState::InFlight);
        identity::apply_identity(&mut req.request);
        tracing::debug!(
            url = %req.request.url(),
            attempt = req.retry_count + 1,
            "dispatching request"
        );

        let outcome = self.transport.execute(&req.request).await;
        let kind = classify::classify(&outcome);

        match settle(outcome, req.retry_count, &self.policy, kind) {
            Settlement::Deliver(outcome) => {
                match &outcome {
                    Ok(resp) => tracing::debug!(url = %req.request.url(), status = resp.status, "request done"),
                    Err(e) => tracing::warn!(url = %req.request.url(), error = %e, "request failed"),
                }
                req.finish(outcome);
            }
            Settlement::Retry(delay) => {
                req.retry_count += 1;
                req.transition(RequestState::AwaitingBackoff {
                    attempt: req.retry_count,
                });
                tracing::info!(
                    url = %req.request.url(),
                    ?kind,
                    retry = req.retry_count,
                    "transient failure, requeueing after {:?}",
                    delay
                );
                self.schedule_requeue(req, delay);
            }
        }
    }

    /// Park the request outside the queue, then append it at the tail.
    fn schedule_requeue(&self, mut req: QueuedRequest, delay: Duration) {
        let Some(tx) = self.requeue.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            req.transition(RequestState::Queued);
            // A closed channel drops the request; its caller sees DispatcherClosed.
            let _ = tx.send(req);
        });
    }
}
