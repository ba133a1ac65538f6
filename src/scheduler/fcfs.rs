//! First-come-first-served policy.
//!
//! Requests are served strictly by arrival time (ties by insertion order).
//! Priority is ignored. Unserved requests keep their relative order.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::{Request, RequestHandle, Resource};
use crate::scheduler::{claim_matching, CompletionLedger, Grant, Scheduler, SchedulerMetrics};

struct Queued {
    arrival_ms: u128,
    request: RequestHandle,
}

/// FIFO queue keyed on arrival time.
#[derive(Default)]
pub struct FcfsScheduler {
    queue: VecDeque<Queued>,
    ledger: CompletionLedger,
}

impl FcfsScheduler {
    /// Create an empty FCFS scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> &str {
        "FCFS (First-Come-First-Served)"
    }

    fn add_request(&mut self, request: Request) -> RequestHandle {
        let arrival_ms = request.arrival_ms();
        let handle = request.into_handle();
        // Insert after every request that arrived at or before this one.
        let pos = self
            .queue
            .iter()
            .rposition(|q| q.arrival_ms <= arrival_ms)
            .map_or(0, |i| i + 1);
        self.queue.insert(
            pos,
            Queued {
                arrival_ms,
                request: Arc::clone(&handle),
            },
        );
        self.ledger.submitted();
        handle
    }

    fn get_next_request(&self) -> Option<Request> {
        self.queue.front().map(|q| q.request.lock().clone())
    }

    fn schedule(&mut self, available: &[Arc<Resource>], now_ms: u128) -> Vec<Grant> {
        self.ledger.fold_completed();
        let mut grants = Vec::new();
        let mut retained = VecDeque::with_capacity(self.queue.len());

        for queued in self.queue.drain(..) {
            let mut req = queued.request.lock();
            let Some(resource) = claim_matching(available, req.resource_type()) else {
                tracing::debug!(request = req.id(), kind = %req.resource_type(), "deferred");
                drop(req);
                retained.push_back(queued);
                continue;
            };

            req.record_grant(&resource, now_ms);
            tracing::debug!(request = req.id(), resource = resource.id(), "granted");
            grants.push(Grant {
                request_id: req.id(),
                request: Arc::clone(&queued.request),
                resource,
                slice_minutes: req.duration_minutes(),
                remaining_minutes: 0,
                completes: true,
            });
            drop(req);
            self.ledger.served(queued.request);
        }

        self.queue = retained;
        grants
    }

    fn pending(&self) -> Vec<Request> {
        self.queue.iter().map(|q| q.request.lock().clone()).collect()
    }

    fn metrics(&self) -> SchedulerMetrics {
        self.ledger.metrics(self.queue.len())
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.ledger.clear();
    }
}
