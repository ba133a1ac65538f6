//! Round-robin policy with a fixed time quantum.
//!
//! Each pass walks the ready queue exactly once. A matched request is granted
//! `min(quantum, remaining)` minutes and, if work remains, goes to the tail
//! behind every request that was passed over in the same pass.
//! The resource returns to contention once that slice expires; it is not held
//! across quanta. A request whose previous slice has not yet expired is
//! treated like an unmatched one, so it never holds two resources at once.
//!
//! A slice is charged in full when granted. Releasing the resource early
//! through the manager neither refunds the unused minutes nor ends the slice:
//! the request stays in service until the slice's scheduled end.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::core::{AllocationError, Request, RequestHandle, RequestId, Resource};
use crate::scheduler::{claim_matching, CompletionLedger, Grant, Scheduler, SchedulerMetrics};
use crate::util::clock::minutes_to_ms;

/// Default quantum in minutes.
pub const DEFAULT_QUANTUM_MINUTES: u32 = 30;

/// Circular ready queue with per-request remaining time.
pub struct RoundRobinScheduler {
    name: String,
    quantum_minutes: u32,
    ready: VecDeque<RequestHandle>,
    remaining: HashMap<RequestId, u32>,
    slice_ends_ms: HashMap<RequestId, u128>,
    ledger: CompletionLedger,
}

impl RoundRobinScheduler {
    /// Create a scheduler; the quantum must be positive.
    pub fn new(quantum_minutes: u32) -> Result<Self, AllocationError> {
        if quantum_minutes == 0 {
            return Err(AllocationError::InvalidConfig(
                "round-robin quantum must be greater than 0".into(),
            ));
        }
        Ok(Self {
            name: format!("Round Robin (Quantum: {quantum_minutes}min)"),
            quantum_minutes,
            ready: VecDeque::new(),
            remaining: HashMap::new(),
            slice_ends_ms: HashMap::new(),
            ledger: CompletionLedger::default(),
        })
    }

    /// Configured quantum.
    pub const fn quantum_minutes(&self) -> u32 {
        self.quantum_minutes
    }

    /// Minutes of work left for a queued request.
    pub fn remaining_minutes(&self, id: RequestId) -> Option<u32> {
        self.remaining.get(&id).copied()
    }

    fn in_service(&self, id: RequestId, now_ms: u128) -> bool {
        self.slice_ends_ms.get(&id).is_some_and(|end| *end > now_ms)
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_request(&mut self, request: Request) -> RequestHandle {
        self.remaining.insert(request.id(), request.duration_minutes());
        let handle = request.into_handle();
        self.ready.push_back(Arc::clone(&handle));
        self.ledger.submitted();
        handle
    }

    fn get_next_request(&self) -> Option<Request> {
        self.ready.front().map(|h| h.lock().clone())
    }

    fn schedule(&mut self, available: &[Arc<Resource>], now_ms: u128) -> Vec<Grant> {
        self.ledger.fold_completed();
        let mut grants = Vec::new();
        let mut requeue = Vec::new();

        for _ in 0..self.ready.len() {
            let Some(handle) = self.ready.pop_front() else {
                break;
            };
            let mut req = handle.lock();
            let id = req.id();

            let claimed = if self.in_service(id, now_ms) {
                None
            } else {
                claim_matching(available, req.resource_type())
            };
            let Some(resource) = claimed else {
                tracing::debug!(request = id, "deferred to tail");
                drop(req);
                self.ready.push_back(handle);
                continue;
            };

            let first_grant = req.start_ms().is_none();
            req.record_grant(&resource, now_ms);

            let left = self.remaining.get(&id).copied().unwrap_or(req.duration_minutes());
            let slice = self.quantum_minutes.min(left);
            let left = left - slice;
            let slice_end = now_ms + minutes_to_ms(slice);

            if left > 0 {
                self.remaining.insert(id, left);
                self.slice_ends_ms.insert(id, slice_end);
            } else {
                req.record_completion(slice_end);
                self.remaining.remove(&id);
                self.slice_ends_ms.remove(&id);
            }
            tracing::debug!(
                request = id,
                resource = resource.id(),
                slice,
                remaining = left,
                "quantum granted"
            );
            drop(req);

            grants.push(Grant {
                request_id: id,
                request: Arc::clone(&handle),
                resource,
                slice_minutes: slice,
                remaining_minutes: left,
                completes: left == 0,
            });
            if first_grant {
                self.ledger.served(Arc::clone(&handle));
            }
            if left > 0 {
                requeue.push(handle);
            }
        }

        self.ready.extend(requeue);
        grants
    }

    fn pending(&self) -> Vec<Request> {
        self.ready.iter().map(|h| h.lock().clone()).collect()
    }

    fn metrics(&self) -> SchedulerMetrics {
        self.ledger.metrics(self.ready.len())
    }

    fn reset(&mut self) {
        self.ready.clear();
        self.remaining.clear();
        self.slice_ends_ms.clear();
        self.ledger.clear();
    }
}
